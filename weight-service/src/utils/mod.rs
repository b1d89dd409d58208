pub mod password;

pub use password::{Password, PasswordDigest, digest_password, verify_password};
