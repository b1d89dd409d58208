//! Login state machine over the device registry.
//!
//! Sessions are process-local and ephemeral: created when a client first
//! contacts the service, removed on logout, never persisted. A client may
//! present a device id it has persisted itself; otherwise a fresh one is
//! generated, which means identity does not survive across sessions unless
//! the client stores it.

use crate::models::{Role, Session, SessionState};
use crate::services::{IdentityStore, ServiceError};
use crate::utils::Password;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthGate {
    identity: IdentityStore,
    sessions: Arc<DashMap<Uuid, Session>>,
    roles: [Role; 2],
}

impl AuthGate {
    pub fn new(identity: IdentityStore, roles: [Role; 2]) -> Self {
        Self {
            identity,
            sessions: Arc::new(DashMap::new()),
            roles,
        }
    }

    pub fn valid_roles(&self) -> &[Role; 2] {
        &self.roles
    }

    /// Open a session for a client, resolving its device identity.
    ///
    /// Known device -> password prompt; unknown device -> registration form.
    pub async fn start_session(
        &self,
        device_id: Option<String>,
    ) -> Result<Session, ServiceError> {
        let device_id = device_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let state = match self.identity.lookup(&device_id).await? {
            Some(_) => SessionState::AwaitingPassword,
            None => SessionState::AwaitingRegistration,
        };

        let session = Session {
            session_id: Uuid::new_v4(),
            device_id,
            state,
        };
        self.sessions.insert(session.session_id, session.clone());

        tracing::debug!(session_id = %session.session_id, state = session.state.as_str(), "Session started");
        Ok(session)
    }

    /// Self-register the session's device and log it in.
    ///
    /// On failure the session remains in `AwaitingRegistration`.
    pub async fn register(
        &self,
        session_id: Uuid,
        role: Role,
        password: &Password,
    ) -> Result<Session, ServiceError> {
        let session = self.session(session_id)?;
        if session.state != SessionState::AwaitingRegistration {
            return Err(ServiceError::InvalidState);
        }
        if !self.roles.contains(&role) {
            return Err(ServiceError::Validation(format!(
                "unknown role: {}",
                role
            )));
        }
        if password.is_empty() {
            return Err(ServiceError::Validation(
                "password must not be empty".to_string(),
            ));
        }

        self.identity
            .register(&session.device_id, role.clone(), password)
            .await?;

        // Auto-login after self-registration, no password re-entry.
        self.transition(session_id, SessionState::LoggedIn { role })
    }

    /// Verify the password for the session's device and log it in.
    ///
    /// On failure the session remains in `AwaitingPassword`.
    pub async fn login(
        &self,
        session_id: Uuid,
        password: &Password,
    ) -> Result<Session, ServiceError> {
        let session = self.session(session_id)?;
        if session.state != SessionState::AwaitingPassword {
            return Err(ServiceError::InvalidState);
        }

        let role = self
            .identity
            .authenticate(&session.device_id, password)
            .await?;

        self.transition(session_id, SessionState::LoggedIn { role })
    }

    /// Destroy the session. Logging out a session that no longer exists is a
    /// no-op: the client ends up logged out either way.
    pub fn logout(&self, session_id: Uuid) {
        if self.sessions.remove(&session_id).is_some() {
            tracing::debug!(session_id = %session_id, "Session ended");
        }
    }

    pub fn session(&self, session_id: Uuid) -> Result<Session, ServiceError> {
        self.sessions
            .get(&session_id)
            .map(|entry| entry.clone())
            .ok_or(ServiceError::UnknownSession)
    }

    /// The role a logged-in session acts as.
    pub fn current_role(&self, session_id: Uuid) -> Result<Role, ServiceError> {
        match self.session(session_id)?.state {
            SessionState::LoggedIn { role } => Ok(role),
            _ => Err(ServiceError::NotLoggedIn),
        }
    }

    fn transition(
        &self,
        session_id: Uuid,
        state: SessionState,
    ) -> Result<Session, ServiceError> {
        let mut entry = self
            .sessions
            .get_mut(&session_id)
            .ok_or(ServiceError::UnknownSession)?;
        entry.state = state;
        Ok(entry.clone())
    }
}
