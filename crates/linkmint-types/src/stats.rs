use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::id::LinkId;

/// Per-link, per-UTC-day click aggregates.
///
/// `total` equals the sum of `by_country` values and the sum of `by_device`
/// values for single-writer sequences. Increments are read-modify-write
/// against the store, so concurrent writers to the same day may lose
/// updates; counts are analytics-grade, not a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub link_id: LinkId,
    pub date: NaiveDate,
    pub total: u64,
    pub by_country: BTreeMap<String, u64>,
    pub by_device: BTreeMap<String, u64>,
    pub updated_at: DateTime<Utc>,
}

impl DailyStat {
    /// A zeroed record for the first click of a (link, day) pair.
    pub fn zeroed(link_id: LinkId, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            link_id,
            date,
            total: 0,
            by_country: BTreeMap::new(),
            by_device: BTreeMap::new(),
            updated_at: now,
        }
    }

    /// Apply one click to the aggregates.
    pub fn record_click(&mut self, country: &str, device: &str, now: DateTime<Utc>) {
        self.total += 1;
        *self.by_country.entry(country.to_owned()).or_insert(0) += 1;
        *self.by_device.entry(device.to_owned()).or_insert(0) += 1;
        self.updated_at = now;
    }
}

/// Per-day request counter for rate limiting.
///
/// Keyed by (date, scope, identifier hash); limits reset naturally when the
/// UTC date rolls over because the key changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCounter {
    pub count: u64,
    pub updated_at: DateTime<Utc>,
}
