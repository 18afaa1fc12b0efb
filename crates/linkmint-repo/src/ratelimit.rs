use chrono::{DateTime, Days, NaiveDate, Utc};
use linkmint_crypto::sha256_hex;

use crate::error::RepoResult;
use crate::traits::Repository;

/// Result of a rate-limit check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// The count after this request, limit included, so callers can report
    /// remaining quota.
    pub count: u64,
}

/// Count one request against `(scope, identifier)` for the UTC day of `now`
/// and decide whether it stays within `limit`.
///
/// The raw identifier (an email, an IP) is hashed before it becomes part of
/// a storage key. Counts are read-modify-write and therefore approximate
/// under concurrent traffic; a limit enforced here is throttling, not an
/// exact quota.
pub async fn check_rate_limit(
    repo: &dyn Repository,
    scope: &str,
    identifier: &str,
    limit: u64,
    now: DateTime<Utc>,
) -> RepoResult<RateLimitDecision> {
    let count = repo
        .increment_rate_limit(today_utc(now), scope, &sha256_hex(identifier))
        .await?;
    Ok(RateLimitDecision {
        allowed: count <= limit,
        count,
    })
}

/// The UTC calendar date of `now`.
pub fn today_utc(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// The last `days` UTC dates ending with today, oldest first: the window
/// shape the stats dashboard asks [`Repository::get_daily_stats`] for.
pub fn last_n_dates(now: DateTime<Utc>, days: u64) -> Vec<NaiveDate> {
    let today = today_utc(now);
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .collect()
}
