use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Connection settings for an S3-compatible object store.
///
/// `endpoint` is `None` for AWS proper; R2 and MinIO deployments point it at
/// their own URL. MinIO additionally needs `force_path_style` because it
/// does not serve virtual-hosted bucket addressing.
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub force_path_style: bool,
}

impl S3Config {
    /// Load from the process environment.
    ///
    /// Reads `S3_BUCKET`, `S3_REGION` (default `us-east-1`), `S3_ENDPOINT`,
    /// `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, and
    /// `S3_FORCE_PATH_STYLE`. Missing required variables are a
    /// [`StoreError::Config`], so deployments fail at startup rather than on
    /// the first request.
    pub fn from_env() -> StoreResult<Self> {
        Ok(Self {
            bucket: require_env("S3_BUCKET")?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_owned()),
            endpoint: std::env::var("S3_ENDPOINT").ok(),
            access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            force_path_style: std::env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

fn require_env(name: &str) -> StoreResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(StoreError::Config(format!("{name} is not set"))),
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret() {
        let config = S3Config {
            bucket: "b".into(),
            region: "us-east-1".into(),
            endpoint: None,
            access_key_id: "AKIA123".into(),
            secret_access_key: "super-secret".into(),
            force_path_style: false,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("redacted"));
        assert!(!debug.contains("super-secret"));
    }
}
