use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use linkmint_types::{DailyStat, Link, LinkId, LinkStatus, MagicTokenRecord, SlugRecord, User, UserId};

use crate::error::RepoResult;

/// Outcome of [`Repository::create_link`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateLinkOutcome {
    Created,
    /// Another link already claimed the slug. No record was written.
    SlugTaken,
}

impl CreateLinkOutcome {
    pub fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

/// Domain-level persistence API.
///
/// All operations may suspend on I/O and propagate the caller's
/// cancellation. Expected business conditions are typed outcomes, never
/// errors; [`crate::RepoError`] means storage itself failed.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Look up a user by email, normalized (trimmed, lowercased) first.
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Create the user for `email`, or return the existing record.
    ///
    /// Safe to call repeatedly for the same address. The existence check is
    /// read-then-write, so two concurrent first-time requests for one email
    /// can each mint a user; the email index converges on the last write
    /// and the stray record is unreachable. Accepted: magic-link issuance
    /// is the only caller and tokens embed the winning id.
    async fn create_user(&self, email: &str) -> RepoResult<User>;

    /// Persist magic-token state under its hash. Unconditional overwrite:
    /// hashes derive from fresh CSPRNG tokens and do not collide in
    /// practice.
    async fn save_magic_token(&self, token_hash: &str, record: &MagicTokenRecord)
        -> RepoResult<()>;

    /// Consume a magic token: `None` when missing, already used, or expired
    /// at `now`. On success the record is persisted with `used_at = now`
    /// before it is returned.
    async fn consume_magic_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<MagicTokenRecord>>;

    /// Create a link by claiming its slug first.
    ///
    /// The slug claim is a conditional create-if-absent write and gates
    /// everything: on [`CreateLinkOutcome::SlugTaken`] no other record is
    /// written, and the link record never exists for an unclaimed slug.
    async fn create_link(&self, link: &Link) -> RepoResult<CreateLinkOutcome>;

    /// All links for `owner_id`, newest `updated_at` first. Owner-index
    /// entries whose link record is missing are dropped silently.
    async fn list_links(&self, owner_id: &UserId) -> RepoResult<Vec<Link>>;

    async fn get_link_by_id(&self, id: &LinkId) -> RepoResult<Option<Link>>;

    async fn get_slug_record(&self, slug: &str) -> RepoResult<Option<SlugRecord>>;

    /// Overwrite the link, refresh its owner-index entry, and mirror the
    /// status onto the slug record. Two writes with no rollback: a failure
    /// in between leaves the slug mirror stale until the next update.
    /// Callers must have authorized the mutation; no ownership check here.
    async fn update_link(&self, link: &Link) -> RepoResult<()>;

    /// Mirror `status` onto the slug record. No-op when the slug has no
    /// record.
    async fn update_slug_status(&self, slug: &str, status: LinkStatus) -> RepoResult<()>;

    /// Add one click to the (link, day) aggregates and return the new
    /// value. Read-modify-write: approximate under concurrent writers.
    async fn increment_stat(
        &self,
        link_id: &LinkId,
        date: NaiveDate,
        country: &str,
        device: &str,
    ) -> RepoResult<DailyStat>;

    /// The existing stats among `dates`; dates with no record are simply
    /// absent from the result.
    async fn get_daily_stats(
        &self,
        link_id: &LinkId,
        dates: &[NaiveDate],
    ) -> RepoResult<Vec<DailyStat>>;

    /// Bump the (date, scope, identifier) counter and return the new count.
    /// Read-modify-write: approximate under concurrent writers.
    async fn increment_rate_limit(
        &self,
        date: NaiveDate,
        scope: &str,
        identifier_hash: &str,
    ) -> RepoResult<u64>;
}
