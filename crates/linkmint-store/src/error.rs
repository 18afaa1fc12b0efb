/// Errors from object store operations.
///
/// Expected conditions (a missing key, a failed put precondition) are not
/// errors; they are `Ok(None)` and [`crate::PutOutcome::PreconditionFailed`]
/// respectively. Everything here is fatal to the in-flight operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend failed at the transport level.
    #[error("transport error for {key}: {message}")]
    Transport { key: String, message: String },

    /// The backend answered with a status the client does not handle.
    #[error("unexpected status {status} for {key}")]
    UnexpectedStatus { key: String, status: u16 },

    /// A value could not be serialized before writing.
    #[error("serialization error for {key}: {message}")]
    Serialization { key: String, message: String },

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn transport(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
