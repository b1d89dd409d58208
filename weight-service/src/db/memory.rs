//! In-process backend double for tests and local development.
//!
//! Implements the same versioned subtree semantics as the real backend and
//! can be switched into a failing mode to exercise error paths.

use super::{BackendError, KvBackend, Version};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Version reported for a path that holds no data.
const EMPTY_VERSION: &str = "0";

#[derive(Default)]
pub struct MemoryBackend {
    entries: DashMap<String, (Value, u64)>,
    next_version: AtomicU64,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// When failing, every call errors with `BackendError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable(
                "simulated backend outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, path: &str) -> Result<(Option<Value>, Version), BackendError> {
        self.check_available()?;
        match self.entries.get(path) {
            Some(entry) => Ok((Some(entry.0.clone()), Version::new(entry.1.to_string()))),
            None => Ok((None, Version::new(EMPTY_VERSION))),
        }
    }

    async fn put(
        &self,
        path: &str,
        value: &Value,
        expected: Option<&Version>,
    ) -> Result<bool, BackendError> {
        self.check_available()?;

        let version = self.next_version.fetch_add(1, Ordering::SeqCst) + 1;

        // DashMap entry guard keeps the compare-and-set atomic per path.
        match self.entries.entry(path.to_string()) {
            Entry::Occupied(mut occupied) => {
                if let Some(expected) = expected {
                    if occupied.get().1.to_string() != expected.as_str() {
                        return Ok(false);
                    }
                }
                occupied.insert((value.clone(), version));
            }
            Entry::Vacant(vacant) => {
                if let Some(expected) = expected {
                    if expected.as_str() != EMPTY_VERSION {
                        return Ok(false);
                    }
                }
                vacant.insert((value.clone(), version));
            }
        }
        Ok(true)
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.check_available()
    }
}
