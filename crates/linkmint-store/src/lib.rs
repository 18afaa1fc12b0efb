//! Key/value object storage for linkmint.
//!
//! The object store is the only persistence linkmint has: every record is a
//! JSON blob under a path-like key, and the store offers exactly three
//! primitives: `GET`, `PUT` (optionally conditional), and prefix `LIST`.
//! There are no multi-key transactions and no atomic increment; everything
//! the repository layer guarantees is built on these.
//!
//! # Backends
//!
//! All backends implement the [`ObjectClient`] trait:
//!
//! - [`S3ObjectClient`] — any S3-compatible HTTP API (AWS, R2, MinIO)
//! - [`InMemoryObjectClient`] — sorted map for tests and deployments
//!   without object storage configured
//!
//! # Design Rules
//!
//! 1. A missing key is `Ok(None)`, never an error.
//! 2. A failed put precondition is [`PutOutcome::PreconditionFailed`],
//!    distinct from every transport failure; callers branch on it.
//! 3. `list` follows continuation tokens to exhaustion and yields one
//!    logical key sequence.
//! 4. Keys round-trip literally: whatever key a record was written under
//!    retrieves it, regardless of punctuation or non-ASCII content.
//! 5. Transport failures are fatal to the in-flight operation and are never
//!    retried here; retry policy belongs to callers.

pub mod client;
pub mod config;
pub mod error;
pub mod json;
pub mod keys;
pub mod memory;
pub mod s3;

pub use client::{ObjectClient, PutCondition, PutOutcome};
pub use config::S3Config;
pub use error::{StoreError, StoreResult};
pub use json::{get_json, put_json};
pub use memory::InMemoryObjectClient;
pub use s3::S3ObjectClient;
