use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use docsight_core::ObjectStore;

/// An object as held by [`InMemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Bytes,
}

/// Process-local object store for local runs and tests.
///
/// Keeps the latest version of every object plus a count of all writes, so
/// callers can tell an overwrite from a second object.
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
    writes: Arc<RwLock<usize>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: &str, name: &str) -> Option<StoredObject> {
        let objects = self.objects.read().ok()?;
        objects.get(&(bucket.to_string(), name.to_string())).cloned()
    }

    /// Names of all objects in `bucket`, sorted.
    pub fn list(&self, bucket: &str) -> Vec<String> {
        let Ok(objects) = self.objects.read() else {
            return Vec::new();
        };
        let mut names: Vec<String> = objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of successful `put` calls, overwrites included.
    pub fn write_count(&self) -> usize {
        self.writes.read().map(|w| *w).unwrap_or(0)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, bucket: &str, name: &str, content_type: &str, payload: Bytes) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| anyhow!("object map lock poisoned"))?;
        objects.insert(
            (bucket.to_string(), name.to_string()),
            StoredObject {
                content_type: content_type.to_string(),
                data: payload,
            },
        );
        let mut writes = self
            .writes
            .write()
            .map_err(|_| anyhow!("write counter lock poisoned"))?;
        *writes += 1;
        Ok(())
    }
}
