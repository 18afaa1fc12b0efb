use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use linkmint_crypto::{normalize_email, random_id};
use linkmint_types::{
    DailyStat, Link, LinkId, LinkStatus, MagicTokenRecord, RateCounter, SlugRecord, User, UserId,
};

use crate::error::RepoResult;
use crate::traits::{CreateLinkOutcome, Repository};

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    users_by_email: HashMap<String, UserId>,
    tokens: HashMap<String, MagicTokenRecord>,
    links: HashMap<LinkId, Link>,
    slugs: HashMap<String, SlugRecord>,
    owner_links: HashMap<UserId, BTreeSet<LinkId>>,
    stats: HashMap<(LinkId, NaiveDate), DailyStat>,
    limits: HashMap<(NaiveDate, String, String), RateCounter>,
}

/// Volatile repository over in-process maps.
///
/// Used by tests and by deployments running without object storage
/// configured. Each operation takes the lock once, so operations serialize;
/// tests that depend on the durable backend's interleaving races must
/// target [`crate::KvRepository`] instead.
pub struct MemoryRepository {
    inner: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryState::default()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let state = self.inner.read().expect("lock poisoned");
        let Some(user_id) = state.users_by_email.get(&normalize_email(email)) else {
            return Ok(None);
        };
        Ok(state.users.get(user_id).cloned())
    }

    async fn create_user(&self, email: &str) -> RepoResult<User> {
        let mut state = self.inner.write().expect("lock poisoned");
        let normalized = normalize_email(email);
        if let Some(existing) = state
            .users_by_email
            .get(&normalized)
            .and_then(|id| state.users.get(id))
        {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(random_id("usr")),
            email: email.to_owned(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id.clone(), user.clone());
        state.users_by_email.insert(normalized, user.id.clone());
        Ok(user)
    }

    async fn save_magic_token(
        &self,
        token_hash: &str,
        record: &MagicTokenRecord,
    ) -> RepoResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.tokens.insert(token_hash.to_owned(), record.clone());
        Ok(())
    }

    async fn consume_magic_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<MagicTokenRecord>> {
        let mut state = self.inner.write().expect("lock poisoned");
        let Some(record) = state.tokens.get_mut(token_hash) else {
            return Ok(None);
        };
        if !record.is_consumable(now) {
            return Ok(None);
        }

        record.used_at = Some(now);
        Ok(Some(record.clone()))
    }

    async fn create_link(&self, link: &Link) -> RepoResult<CreateLinkOutcome> {
        let mut state = self.inner.write().expect("lock poisoned");
        if state.slugs.contains_key(&link.slug) {
            return Ok(CreateLinkOutcome::SlugTaken);
        }

        state
            .slugs
            .insert(link.slug.clone(), SlugRecord::for_link(link));
        state.links.insert(link.id.clone(), link.clone());
        state
            .owner_links
            .entry(link.owner_id.clone())
            .or_default()
            .insert(link.id.clone());
        Ok(CreateLinkOutcome::Created)
    }

    async fn list_links(&self, owner_id: &UserId) -> RepoResult<Vec<Link>> {
        let state = self.inner.read().expect("lock poisoned");
        let Some(ids) = state.owner_links.get(owner_id) else {
            return Ok(Vec::new());
        };

        let mut links: Vec<Link> = ids
            .iter()
            .filter_map(|id| state.links.get(id).cloned())
            .collect();
        links.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(links)
    }

    async fn get_link_by_id(&self, id: &LinkId) -> RepoResult<Option<Link>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.links.get(id).cloned())
    }

    async fn get_slug_record(&self, slug: &str) -> RepoResult<Option<SlugRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.slugs.get(slug).cloned())
    }

    async fn update_link(&self, link: &Link) -> RepoResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.links.insert(link.id.clone(), link.clone());
        state
            .owner_links
            .entry(link.owner_id.clone())
            .or_default()
            .insert(link.id.clone());
        if let Some(record) = state.slugs.get_mut(&link.slug) {
            record.status = link.status;
            record.updated_at = link.updated_at;
        }
        Ok(())
    }

    async fn update_slug_status(&self, slug: &str, status: LinkStatus) -> RepoResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        if let Some(record) = state.slugs.get_mut(slug) {
            record.status = status;
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn increment_stat(
        &self,
        link_id: &LinkId,
        date: NaiveDate,
        country: &str,
        device: &str,
    ) -> RepoResult<DailyStat> {
        let mut state = self.inner.write().expect("lock poisoned");
        let now = Utc::now();
        let stat = state
            .stats
            .entry((link_id.clone(), date))
            .or_insert_with(|| DailyStat::zeroed(link_id.clone(), date, now));

        stat.record_click(country, device, now);
        Ok(stat.clone())
    }

    async fn get_daily_stats(
        &self,
        link_id: &LinkId,
        dates: &[NaiveDate],
    ) -> RepoResult<Vec<DailyStat>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(dates
            .iter()
            .filter_map(|date| state.stats.get(&(link_id.clone(), *date)).cloned())
            .collect())
    }

    async fn increment_rate_limit(
        &self,
        date: NaiveDate,
        scope: &str,
        identifier_hash: &str,
    ) -> RepoResult<u64> {
        let mut state = self.inner.write().expect("lock poisoned");
        let counter = state
            .limits
            .entry((date, scope.to_owned(), identifier_hash.to_owned()))
            .or_insert(RateCounter {
                count: 0,
                updated_at: Utc::now(),
            });

        counter.count += 1;
        counter.updated_at = Utc::now();
        Ok(counter.count)
    }
}
