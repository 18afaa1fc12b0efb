use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::{ObjectClient, PutCondition, PutOutcome};
use crate::error::StoreResult;

/// In-memory, sorted-map object client.
///
/// Used by tests and by deployments that run without object storage
/// configured. The `BTreeMap` keeps keys ordered, so prefix listing is a
/// range walk, the same contiguous-listing shape an S3 bucket returns.
/// Keys are stored and compared literally, so the round-trip rule holds for
/// arbitrary UTF-8 and punctuation by construction.
pub struct InMemoryObjectClient {
    objects: RwLock<BTreeMap<String, Bytes>>,
}

impl InMemoryObjectClient {
    /// Create a new empty client.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryObjectClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectClient for InMemoryObjectClient {
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        condition: PutCondition,
    ) -> StoreResult<PutOutcome> {
        let mut map = self.objects.write().expect("lock poisoned");
        if condition == PutCondition::IfAbsent && map.contains_key(key) {
            return Ok(PutOutcome::PreconditionFailed);
        }
        map.insert(key.to_owned(), Bytes::from(body));
        Ok(PutOutcome::Stored)
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let map = self.objects.read().expect("lock poisoned");
        let keys = map
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        Ok(keys)
    }
}

impl std::fmt::Debug for InMemoryObjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectClient")
            .field("object_count", &self.len())
            .finish()
    }
}
