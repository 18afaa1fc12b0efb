use linkmint_store::StoreError;

/// Errors from repository operations.
///
/// Business conditions (a taken slug, a spent token, a missing record) are
/// not errors; they are typed outcomes and `Option`s on the individual
/// operations. What remains is storage failure, fatal to the in-flight
/// operation and surfaced unretried.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
