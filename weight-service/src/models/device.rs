//! Device registry model - one registration per physical device.

use crate::utils::PasswordDigest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the two user roles the service is configured with.
///
/// The valid role names come from configuration; a `Role` is only constructed
/// from a raw string at the API boundary, where it is checked against them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A device's entry in the registry. Created once on registration and never
/// mutated afterwards; there is no de-registration path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub role: Role,
    pub password: PasswordDigest,
    pub registered_at: DateTime<Utc>,
}

/// The full registry subtree, keyed by device id. The backend has no
/// partial-update primitive for this store, so it is always read and written
/// whole.
pub type DeviceRegistry = BTreeMap<String, DeviceRegistration>;
