pub mod auth;
pub mod chart;
pub mod records;

use axum::http::HeaderMap;
use service_core::error::AppError;
use uuid::Uuid;

pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Pull the session id out of the request headers. A missing or malformed
/// header means the client is logged out.
pub fn require_session_id(headers: &HeaderMap) -> Result<Uuid, AppError> {
    headers
        .get(SESSION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("No active session")))
}
