//! Domain records for linkmint.
//!
//! This crate defines the typed records the repository layer persists as
//! JSON blobs in the object store. Every other linkmint crate depends on
//! `linkmint-types`.
//!
//! # Key Types
//!
//! - [`User`] — account record, created lazily on first magic-link request
//! - [`Link`] — a redirect record owned by exactly one user
//! - [`SlugRecord`] — the global uniqueness anchor for a slug claim
//! - [`MagicTokenRecord`] — single-use, time-limited login token state
//! - [`DailyStat`] — per-link, per-UTC-day click aggregates
//! - [`RateCounter`] — per-day request counter for rate limiting
//! - [`OwnerIndexEntry`] — secondary index entry for listing links by owner
//!
//! # Wire Format
//!
//! The serde representation of these records IS the persisted schema:
//! camelCase field names, snake_case enum values, RFC 3339 UTC timestamps,
//! and `YYYY-MM-DD` dates. Operators inspect these blobs directly in the
//! bucket, so renames here are schema migrations.

pub mod id;
pub mod link;
pub mod stats;
pub mod user;

pub use id::{LinkId, UserId};
pub use link::{Link, LinkKind, LinkStatus, OwnerIndexEntry, SlugRecord};
pub use stats::{DailyStat, RateCounter};
pub use user::{MagicTokenRecord, User};
