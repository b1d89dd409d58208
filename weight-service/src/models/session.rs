//! Ephemeral, process-local session state.

use crate::models::Role;
use uuid::Uuid;

/// Where a session sits in the login flow.
///
/// "Logged out" is represented by the absence of a session: a client without
/// a session id (or after logout removed it) has no entry in the session map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The device id was not found in the registry; a registration form is
    /// expected next.
    AwaitingRegistration,
    /// The device is registered; a password is expected next.
    AwaitingPassword,
    /// Authenticated, acting as `role`.
    LoggedIn { role: Role },
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::AwaitingRegistration => "awaiting_registration",
            SessionState::AwaitingPassword => "awaiting_password",
            SessionState::LoggedIn { .. } => "logged_in",
        }
    }
}

/// Per-client session. Never persisted; destroyed on logout.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub device_id: String,
    pub state: SessionState,
}
