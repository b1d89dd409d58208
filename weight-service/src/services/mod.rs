pub mod auth;
pub mod error;
pub mod identity;
pub mod records;
pub mod trend;

pub use auth::AuthGate;
pub use error::ServiceError;
pub use identity::IdentityStore;
pub use records::{RecordUpdate, WeightRecordStore};
pub use trend::{Trend, filter_range, fit_trend};
