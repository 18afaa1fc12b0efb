use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::client::{ObjectClient, PutCondition, PutOutcome};
use crate::config::S3Config;
use crate::error::{StoreError, StoreResult};

/// Object client backed by an S3-compatible HTTP API.
///
/// Wire mapping, relied on by callers and preserved bit-for-bit:
///
/// - `GET` 404 (`NoSuchKey`) → absent, never an error
/// - `PUT` with [`PutCondition::IfAbsent`] sends `If-None-Match: *`;
///   412 and 409 both map to [`PutOutcome::PreconditionFailed`]
/// - `LIST` drives ListObjectsV2 and follows `NextContinuationToken`
///   until the listing is no longer truncated
/// - every other non-2xx outcome is a fatal [`StoreError`], unretried
///
/// The SDK percent-encodes keys on the wire and decodes listing XML, so a
/// key written with arbitrary UTF-8 or punctuation is retrievable by the
/// same literal string.
pub struct S3ObjectClient {
    client: Client,
    bucket: String,
}

impl S3ObjectClient {
    /// Build a client from connection settings.
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "linkmint",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        }
    }

    /// Wrap an already-configured SDK client.
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectClient for S3ObjectClient {
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match response {
            Ok(output) => {
                let body = output
                    .body
                    .collect()
                    .await
                    .map_err(|err| StoreError::transport(key, err))?;
                Ok(Some(body.into_bytes()))
            }
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|service| service.is_no_such_key())
                    .unwrap_or(false)
                    || status_of(&err) == Some(404);
                if not_found {
                    Ok(None)
                } else {
                    Err(StoreError::transport(key, DisplayFull(&err)))
                }
            }
        }
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        condition: PutCondition,
    ) -> StoreResult<PutOutcome> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body));

        if condition == PutCondition::IfAbsent {
            request = request.if_none_match("*");
        }

        match request.send().await {
            Ok(_) => Ok(PutOutcome::Stored),
            Err(err) => match status_of(&err) {
                Some(status) if precondition_failed(status) => {
                    Ok(PutOutcome::PreconditionFailed)
                }
                _ => Err(StoreError::transport(key, DisplayFull(&err))),
            },
        }
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(token) = &continuation {
                request = request.continuation_token(token);
            }

            let page = request
                .send()
                .await
                .map_err(|err| StoreError::transport(prefix, DisplayFull(&err)))?;

            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_owned());
                }
            }

            continuation = if page.is_truncated() == Some(true) {
                page.next_continuation_token().map(str::to_owned)
            } else {
                None
            };
            if continuation.is_none() {
                break;
            }
        }

        Ok(keys)
    }
}

/// 412 Precondition Failed is the steady-state rejection; 409 Conflict is
/// what S3 returns when two conditional writers race the same key.
fn precondition_failed(status: u16) -> bool {
    status == 412 || status == 409
}

fn status_of<E>(err: &aws_sdk_s3::error::SdkError<E>) -> Option<u16> {
    err.raw_response().map(|response| response.status().as_u16())
}

/// `SdkError`'s `Display` hides the service message; include the debug
/// representation so operators see the real cause.
struct DisplayFull<'a, T: std::fmt::Debug>(&'a T);

impl<T: std::fmt::Debug> std::fmt::Display for DisplayFull<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_config_without_io() {
        let config = S3Config {
            bucket: "linkmint-test".into(),
            region: "us-east-1".into(),
            endpoint: Some("http://localhost:9000".into()),
            access_key_id: "minio".into(),
            secret_access_key: "minio123".into(),
            force_path_style: true,
        };
        let client = S3ObjectClient::new(&config);
        assert_eq!(client.bucket, "linkmint-test");
    }

    #[test]
    fn precondition_statuses() {
        assert!(precondition_failed(412));
        assert!(precondition_failed(409));
        assert!(!precondition_failed(404));
        assert!(!precondition_failed(500));
    }
}
