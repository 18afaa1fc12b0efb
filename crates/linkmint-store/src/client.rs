use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;

/// Write precondition for [`ObjectClient::put`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutCondition {
    /// Last writer wins.
    Overwrite,
    /// Succeed only if no value currently exists for the key. This is the
    /// sole atomic primitive the store offers; slug claiming depends on it.
    IfAbsent,
}

/// Outcome of a [`ObjectClient::put`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    Stored,
    /// The [`PutCondition`] was not met. Not a transport failure: callers
    /// branch on this as ordinary control flow.
    PreconditionFailed,
}

impl PutOutcome {
    pub fn is_stored(self) -> bool {
        matches!(self, Self::Stored)
    }
}

/// Uniform client for a remote key/value object store.
///
/// Implementations must satisfy the crate-level design rules: absent keys
/// are `Ok(None)`, precondition failures are reported distinctly from
/// transport errors, `list` exhausts pagination, and keys round-trip
/// literally. Operations suspend on I/O and propagate the caller's
/// cancellation; no implementation retries internally.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Read the value at `key`. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>>;

    /// Write `body` at `key` under `condition`.
    async fn put(&self, key: &str, body: Vec<u8>, condition: PutCondition)
        -> StoreResult<PutOutcome>;

    /// All keys under `prefix`, in one logical sequence, following
    /// continuation tokens until exhaustion.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;
}
