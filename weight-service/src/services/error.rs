use crate::db::BackendError;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // Deliberately covers both "device not registered" and "wrong password"
    // so user-visible text never confirms registry contents.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Role '{0}' is already registered to another device")]
    RoleTaken(String),

    #[error("Unknown session")]
    UnknownSession,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Operation not valid in the current login state")]
    InvalidState,

    #[error("Record not found")]
    RecordNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Concurrent update detected, please retry")]
    WriteConflict,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Backend(e) => AppError::BadGateway(e.to_string()),
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::RoleTaken(role) => AppError::Conflict(anyhow::anyhow!(
                "Role '{}' is already registered to another device",
                role
            )),
            ServiceError::UnknownSession => {
                AppError::Unauthorized(anyhow::anyhow!("No active session"))
            }
            ServiceError::NotLoggedIn => AppError::Unauthorized(anyhow::anyhow!("Not logged in")),
            ServiceError::InvalidState => AppError::BadRequest(anyhow::anyhow!(
                "Operation not valid in the current login state"
            )),
            ServiceError::RecordNotFound => {
                AppError::NotFound(anyhow::anyhow!("Record not found"))
            }
            ServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::WriteConflict => AppError::Conflict(anyhow::anyhow!(
                "Concurrent update detected, please retry"
            )),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
