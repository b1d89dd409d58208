use crate::models::{Role, Session, SessionState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Device id the client persisted from an earlier visit. When absent a
    /// fresh one is generated and returned for the client to keep.
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub device_id: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let role = match &session.state {
            SessionState::LoggedIn { role } => Some(role.clone()),
            _ => None,
        };
        Self {
            session_id: session.session_id,
            device_id: session.device_id,
            state: session.state.as_str(),
            role,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
