//! Persistence backend: an opaque hierarchical key-value store reached over
//! the network.
//!
//! The service always reads and writes whole subtrees (the full device
//! registry, or one role's full record list) rather than individual keys, so
//! the interface is deliberately coarse: fetch a subtree with its version,
//! overwrite a subtree conditionally on that version.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod firebase;
pub mod memory;

pub use firebase::FirebaseClient;
pub use memory::MemoryBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("malformed payload at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Opaque version stamp of a subtree, used for conditional writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Read the subtree at `path` together with its current version.
    /// `None` when nothing has ever been written there.
    async fn get(&self, path: &str) -> Result<(Option<Value>, Version), BackendError>;

    /// Overwrite the subtree at `path`.
    ///
    /// When `expected` is given the write only applies if the subtree is
    /// unchanged since the read that produced that version; `Ok(false)`
    /// signals a lost race. Unconditional writes always return `Ok(true)`.
    async fn put(
        &self,
        path: &str,
        value: &Value,
        expected: Option<&Version>,
    ) -> Result<bool, BackendError>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), BackendError>;
}
