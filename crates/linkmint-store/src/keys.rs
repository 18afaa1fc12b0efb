//! Key-space encoder: the on-disk schema.
//!
//! Pure, deterministic functions from entity identity to segmented key
//! paths. The object store has no secondary indexes, so every "lookup by X"
//! access path owns an explicitly maintained key here: the email index and
//! the owner index are separate records holding only foreign ids.
//!
//! These paths are inspected directly by operators; changing one is a
//! schema migration, not a refactor.

use chrono::NaiveDate;
use linkmint_types::{LinkId, UserId};

/// `links/{linkId}.json`: the link record itself.
pub fn link(id: &LinkId) -> String {
    format!("links/{id}.json")
}

/// `owner/{ownerId}/links/{linkId}.json`: owner-index entry.
pub fn owner_index(owner_id: &UserId, link_id: &LinkId) -> String {
    format!("owner/{owner_id}/links/{link_id}.json")
}

/// Listing prefix for one owner's index entries.
pub fn owner_index_prefix(owner_id: &UserId) -> String {
    format!("owner/{owner_id}/links/")
}

/// The link id encoded in an owner-index key, if the key has the expected
/// shape. Foreign keys in the path segment, not the blob: listing alone is
/// enough to resolve an owner's links.
pub fn owner_index_link_id(key: &str) -> Option<LinkId> {
    let file = key.rsplit('/').next()?;
    let id = file.strip_suffix(".json")?;
    if id.is_empty() {
        return None;
    }
    Some(LinkId::new(id))
}

/// `slug/{slug}.json`: the slug-claim record and uniqueness anchor.
pub fn slug(slug: &str) -> String {
    format!("slug/{slug}.json")
}

/// `stats/{linkId}/{date}.json`: daily click aggregates.
pub fn stat(link_id: &LinkId, date: NaiveDate) -> String {
    format!("stats/{link_id}/{date}.json")
}

/// `users/{userId}.json`: the user record.
pub fn user(user_id: &UserId) -> String {
    format!("users/{user_id}.json")
}

/// `users/by-email/{emailHash}.json`: email-lookup index record holding
/// only the foreign user id.
pub fn user_by_email(email_hash: &str) -> String {
    format!("users/by-email/{email_hash}.json")
}

/// `auth/magic/{tokenHash}.json`: magic-token state, keyed by token hash.
pub fn magic_token(token_hash: &str) -> String {
    format!("auth/magic/{token_hash}.json")
}

/// `ratelimit/{date}/{scope}/{identifierHash}.json`: per-day counter.
pub fn rate_limit(date: NaiveDate, scope: &str, identifier_hash: &str) -> String {
    format!("ratelimit/{date}/{scope}/{identifier_hash}.json")
}
