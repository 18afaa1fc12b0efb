use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Account record, one per email address.
///
/// Created lazily the first time an email requests a magic link. The email
/// is stored as given by the user; lookups go through the normalized
/// (trimmed, lowercased) email-hash index key, not this field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted state of a single-use magic-link token.
///
/// `id` is the SHA-256 hex of the raw token; the raw token only ever exists
/// in the emailed URL. `used_at` transitions from `None` exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicTokenRecord {
    pub id: String,
    pub user_id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl MagicTokenRecord {
    /// Whether the token can still be consumed at `now`.
    pub fn is_consumable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at >= now
    }
}
