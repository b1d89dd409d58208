//! Device registry access: lookup, registration, password verification.

use crate::db::{KvBackend, Version};
use crate::models::{DeviceRegistration, DeviceRegistry, Role};
use crate::services::ServiceError;
use crate::utils::{Password, digest_password, verify_password};
use chrono::Utc;
use std::sync::Arc;

/// Registry subtree path in the backend.
const DEVICES_PATH: &str = "devices";

#[derive(Clone)]
pub struct IdentityStore {
    backend: Arc<dyn KvBackend>,
}

impl IdentityStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Fetch the whole registry; one backend read. Absent subtree means no
    /// device has registered yet.
    pub async fn get_all(&self) -> Result<(DeviceRegistry, Version), ServiceError> {
        let (value, version) = self.backend.get(DEVICES_PATH).await?;
        let registry = match value {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| anyhow::anyhow!("corrupt device registry: {}", e))?,
            None => DeviceRegistry::new(),
        };
        Ok((registry, version))
    }

    pub async fn lookup(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRegistration>, ServiceError> {
        let (registry, _) = self.get_all().await?;
        Ok(registry.get(device_id).cloned())
    }

    /// Register a device under `role`.
    ///
    /// A role held by a *different* device is rejected (first-registrant-wins
    /// per role); the same device re-registering overwrites its own entry,
    /// last-write-wins. The whole registry is written back conditionally on
    /// the version read, so a racing registration surfaces as `WriteConflict`
    /// instead of silently overwriting.
    pub async fn register(
        &self,
        device_id: &str,
        role: Role,
        password: &Password,
    ) -> Result<DeviceRegistration, ServiceError> {
        let (mut registry, version) = self.get_all().await?;

        let role_taken = registry
            .iter()
            .any(|(id, reg)| id != device_id && reg.role == role);
        if role_taken {
            return Err(ServiceError::RoleTaken(role.to_string()));
        }

        let registration = DeviceRegistration {
            role: role.clone(),
            password: digest_password(password),
            registered_at: Utc::now(),
        };
        registry.insert(device_id.to_string(), registration.clone());

        let value = serde_json::to_value(&registry)
            .map_err(|e| anyhow::anyhow!("failed to encode device registry: {}", e))?;
        let applied = self.backend.put(DEVICES_PATH, &value, Some(&version)).await?;
        if !applied {
            return Err(ServiceError::WriteConflict);
        }

        tracing::info!(device_id, role = %role, "Device registered");
        Ok(registration)
    }

    /// Verify a password for a device and return its role.
    ///
    /// An unknown device and a wrong password produce the same error.
    pub async fn authenticate(
        &self,
        device_id: &str,
        password: &Password,
    ) -> Result<Role, ServiceError> {
        match self.lookup(device_id).await? {
            Some(registration) if verify_password(password, &registration.password) => {
                Ok(registration.role)
            }
            _ => Err(ServiceError::InvalidCredentials),
        }
    }
}
