//! Repository layer for linkmint.
//!
//! This crate is the domain-level API the application consumes: CRUD and
//! aggregates over users, links, slug claims, magic tokens, daily stats,
//! and rate-limit counters. It translates domain operations into key-space
//! reads and writes against an [`linkmint_store::ObjectClient`].
//!
//! # Backends
//!
//! Both implement the [`Repository`] trait and one behavioral contract,
//! pinned by a shared conformance suite:
//!
//! - [`KvRepository`] — durable, over any object client
//! - [`MemoryRepository`] — volatile maps, for tests and deployments
//!   without object storage configured
//!
//! # Consistency Model
//!
//! The store offers no transactions and no atomic increment; the only
//! atomic primitive is create-if-absent. Consequences, by design:
//!
//! - Slug claiming is the one correctness-bearing concurrent path, and the
//!   one place the conditional write is used: the claim gates every other
//!   write in `create_link`.
//! - Read-modify-write paths (token consumption, stat and rate counters,
//!   user existence check) accept a lost-update race under concurrent
//!   traffic to the same key. Counters are analytics-grade.
//! - `update_link` writes the link and then mirrors status to the slug
//!   record; a crash between the writes leaves the mirror stale until the
//!   next update. Secondary records are rebuildable, never authoritative.

pub mod error;
pub mod kv;
pub mod memory;
pub mod ratelimit;
pub mod traits;

#[cfg(test)]
mod conformance;

pub use error::{RepoError, RepoResult};
pub use kv::KvRepository;
pub use memory::MemoryRepository;
pub use ratelimit::{check_rate_limit, last_n_dates, today_utc, RateLimitDecision};
pub use traits::{CreateLinkOutcome, Repository};
