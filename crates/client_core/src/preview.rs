//! Transient preview references for selected files.
//!
//! A [`PreviewHandle`] registers the file content under a `preview://` URI that
//! can be resolved locally without a network round trip. The registration is
//! revoked when the handle is dropped.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::debug;
use uuid::Uuid;

pub const PREVIEW_SCHEME: &str = "preview";

#[derive(Debug, Clone)]
pub struct PreviewContent {
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    entries: HashMap<Uuid, PreviewContent>,
    created: u64,
    revoked: u64,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, mime_type: &str, bytes: Arc<[u8]>) -> PreviewHandle {
        let id = Uuid::new_v4();
        {
            let mut inner = self.lock();
            inner.entries.insert(
                id,
                PreviewContent {
                    mime_type: mime_type.to_string(),
                    bytes,
                },
            );
            inner.created += 1;
        }
        debug!(preview = %id, "preview reference created");
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Looks up a `preview://` URI. Revoked or foreign URIs resolve to `None`.
    pub fn resolve(&self, uri: &str) -> Option<PreviewContent> {
        let id = uri
            .strip_prefix(PREVIEW_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))
            .and_then(|raw| Uuid::parse_str(raw).ok())?;
        self.lock().entries.get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn revoked_count(&self) -> u64 {
        self.lock().revoked
    }

    pub fn created_count(&self) -> u64 {
        self.lock().created
    }

    fn revoke(&self, id: Uuid) {
        let mut inner = self.lock();
        if inner.entries.remove(&id).is_some() {
            inner.revoked += 1;
            debug!(preview = %id, "preview reference revoked");
        }
    }

    // A panic while holding the lock leaves the map itself consistent.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Owned preview registration, revoked on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn uri(&self) -> String {
        format!("{PREVIEW_SCHEME}://{}", self.id)
    }

    pub fn is_live(&self) -> bool {
        self.registry.lock().entries.contains_key(&self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(self.id);
    }
}

#[cfg(test)]
#[path = "tests/preview_tests.rs"]
mod tests;
