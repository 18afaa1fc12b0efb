use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{LinkId, UserId};

/// What a link does when the slug is hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Plain HTTP redirect.
    Short,
    /// Redirect whose primary surface is a rendered QR code.
    Qrcode,
    /// Redirect whose target the owner re-points over time.
    LiveUrl,
}

/// Whether the slug currently resolves.
///
/// Links are never hard-deleted; deletion is modeled as `Disabled`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Active,
    Disabled,
}

impl LinkStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A redirect record owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub owner_id: UserId,
    pub kind: LinkKind,
    pub slug: String,
    pub target_url: String,
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The global uniqueness anchor for a slug claim.
///
/// One record per slug, created by the conditional first-writer-wins put in
/// `create_link`. `status` mirrors the owning [`Link`]'s status so the
/// redirect path can gate on a single key read; the mirror is refreshed on
/// every link update and may lag if the process dies between the two writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugRecord {
    pub slug: String,
    pub link_id: LinkId,
    pub owner_id: UserId,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SlugRecord {
    /// The claim record for a link, as written at creation time.
    pub fn for_link(link: &Link) -> Self {
        Self {
            slug: link.slug.clone(),
            link_id: link.id.clone(),
            owner_id: link.owner_id.clone(),
            status: link.status,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Secondary index entry under `owner/{ownerId}/links/`, enabling
/// "list links by owner" without scanning every link record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerIndexEntry {
    pub link_id: LinkId,
    pub updated_at: DateTime<Utc>,
}

impl OwnerIndexEntry {
    pub fn for_link(link: &Link) -> Self {
        Self {
            link_id: link.id.clone(),
            updated_at: link.updated_at,
        }
    }
}
