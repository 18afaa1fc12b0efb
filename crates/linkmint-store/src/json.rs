use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::client::{ObjectClient, PutCondition, PutOutcome};
use crate::error::{StoreError, StoreResult};

/// Read and decode the JSON record at `key`.
///
/// A record that exists but fails to decode is treated as absent, loudly:
/// corrupt blobs must not crash the process, but they must not pass
/// silently either.
pub async fn get_json<T: DeserializeOwned>(
    client: &dyn ObjectClient,
    key: &str,
) -> StoreResult<Option<T>> {
    let Some(bytes) = client.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(key, error = %err, "record failed to decode; treating as absent");
            Ok(None)
        }
    }
}

/// Encode `value` as JSON and write it at `key`.
pub async fn put_json<T: Serialize>(
    client: &dyn ObjectClient,
    key: &str,
    value: &T,
    condition: PutCondition,
) -> StoreResult<PutOutcome> {
    let body = serde_json::to_vec(value).map_err(|err| StoreError::Serialization {
        key: key.to_owned(),
        message: err.to_string(),
    })?;
    client.put(key, body, condition).await
}
