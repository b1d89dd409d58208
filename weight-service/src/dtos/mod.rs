pub mod auth;
pub mod chart;
pub mod records;
