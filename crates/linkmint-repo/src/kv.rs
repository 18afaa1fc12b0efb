use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use linkmint_crypto::{email_hash, random_id};
use linkmint_store::{
    get_json, keys, put_json, ObjectClient, PutCondition, PutOutcome, S3Config, S3ObjectClient,
};
use linkmint_types::{
    DailyStat, Link, LinkId, LinkStatus, MagicTokenRecord, OwnerIndexEntry, RateCounter,
    SlugRecord, User, UserId,
};

use crate::error::RepoResult;
use crate::traits::{CreateLinkOutcome, Repository};

/// Email-lookup index blob: only the foreign id.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailIndexRecord {
    user_id: UserId,
}

/// Durable repository over a key/value object client.
///
/// Holds the process-wide storage handle: constructed once at startup and
/// injected wherever persistence is needed.
pub struct KvRepository {
    client: Arc<dyn ObjectClient>,
}

impl KvRepository {
    pub fn new(client: Arc<dyn ObjectClient>) -> Self {
        Self { client }
    }

    /// Convenience constructor for the S3 backend.
    pub fn open(config: &S3Config) -> Self {
        Self::new(Arc::new(S3ObjectClient::new(config)))
    }

    fn client(&self) -> &dyn ObjectClient {
        self.client.as_ref()
    }
}

#[async_trait]
impl Repository for KvRepository {
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let hash = email_hash(email);
        let mapping: Option<EmailIndexRecord> =
            get_json(self.client(), &keys::user_by_email(&hash)).await?;
        let Some(mapping) = mapping else {
            return Ok(None);
        };

        Ok(get_json(self.client(), &keys::user(&mapping.user_id)).await?)
    }

    async fn create_user(&self, email: &str) -> RepoResult<User> {
        if let Some(existing) = self.find_user_by_email(email).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(random_id("usr")),
            email: email.to_owned(),
            created_at: now,
            updated_at: now,
        };

        put_json(
            self.client(),
            &keys::user(&user.id),
            &user,
            PutCondition::Overwrite,
        )
        .await?;
        put_json(
            self.client(),
            &keys::user_by_email(&email_hash(email)),
            &EmailIndexRecord {
                user_id: user.id.clone(),
            },
            PutCondition::Overwrite,
        )
        .await?;

        debug!(user_id = %user.id, "created user");
        Ok(user)
    }

    async fn save_magic_token(
        &self,
        token_hash: &str,
        record: &MagicTokenRecord,
    ) -> RepoResult<()> {
        put_json(
            self.client(),
            &keys::magic_token(token_hash),
            record,
            PutCondition::Overwrite,
        )
        .await?;
        Ok(())
    }

    async fn consume_magic_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<MagicTokenRecord>> {
        let key = keys::magic_token(token_hash);
        let Some(record) = get_json::<MagicTokenRecord>(self.client(), &key).await? else {
            return Ok(None);
        };
        if !record.is_consumable(now) {
            return Ok(None);
        }

        let consumed = MagicTokenRecord {
            used_at: Some(now),
            ..record
        };
        put_json(self.client(), &key, &consumed, PutCondition::Overwrite).await?;
        Ok(Some(consumed))
    }

    async fn create_link(&self, link: &Link) -> RepoResult<CreateLinkOutcome> {
        // The slug claim gates everything. If this conditional write loses,
        // nothing else may be written.
        let claim = put_json(
            self.client(),
            &keys::slug(&link.slug),
            &SlugRecord::for_link(link),
            PutCondition::IfAbsent,
        )
        .await?;

        if claim == PutOutcome::PreconditionFailed {
            debug!(slug = %link.slug, "slug already claimed");
            return Ok(CreateLinkOutcome::SlugTaken);
        }

        put_json(
            self.client(),
            &keys::link(&link.id),
            link,
            PutCondition::Overwrite,
        )
        .await?;
        put_json(
            self.client(),
            &keys::owner_index(&link.owner_id, &link.id),
            &OwnerIndexEntry::for_link(link),
            PutCondition::Overwrite,
        )
        .await?;

        Ok(CreateLinkOutcome::Created)
    }

    async fn list_links(&self, owner_id: &UserId) -> RepoResult<Vec<Link>> {
        let index_keys = self
            .client()
            .list(&keys::owner_index_prefix(owner_id))
            .await?;

        let mut links = Vec::with_capacity(index_keys.len());
        for index_key in &index_keys {
            let Some(link_id) = keys::owner_index_link_id(index_key) else {
                continue;
            };
            // Index entries can outlive a corrupt or half-written link
            // record; those are dropped, not surfaced.
            if let Some(link) = get_json::<Link>(self.client(), &keys::link(&link_id)).await? {
                links.push(link);
            }
        }

        links.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(links)
    }

    async fn get_link_by_id(&self, id: &LinkId) -> RepoResult<Option<Link>> {
        Ok(get_json(self.client(), &keys::link(id)).await?)
    }

    async fn get_slug_record(&self, slug: &str) -> RepoResult<Option<SlugRecord>> {
        Ok(get_json(self.client(), &keys::slug(slug)).await?)
    }

    async fn update_link(&self, link: &Link) -> RepoResult<()> {
        put_json(
            self.client(),
            &keys::link(&link.id),
            link,
            PutCondition::Overwrite,
        )
        .await?;
        put_json(
            self.client(),
            &keys::owner_index(&link.owner_id, &link.id),
            &OwnerIndexEntry::for_link(link),
            PutCondition::Overwrite,
        )
        .await?;
        self.update_slug_status(&link.slug, link.status).await
    }

    async fn update_slug_status(&self, slug: &str, status: LinkStatus) -> RepoResult<()> {
        let key = keys::slug(slug);
        let Some(record) = get_json::<SlugRecord>(self.client(), &key).await? else {
            return Ok(());
        };

        let updated = SlugRecord {
            status,
            updated_at: Utc::now(),
            ..record
        };
        put_json(self.client(), &key, &updated, PutCondition::Overwrite).await?;
        Ok(())
    }

    async fn increment_stat(
        &self,
        link_id: &LinkId,
        date: NaiveDate,
        country: &str,
        device: &str,
    ) -> RepoResult<DailyStat> {
        let key = keys::stat(link_id, date);
        let now = Utc::now();
        let mut stat: DailyStat = get_json(self.client(), &key)
            .await?
            .unwrap_or_else(|| DailyStat::zeroed(link_id.clone(), date, now));

        stat.record_click(country, device, now);
        put_json(self.client(), &key, &stat, PutCondition::Overwrite).await?;
        Ok(stat)
    }

    async fn get_daily_stats(
        &self,
        link_id: &LinkId,
        dates: &[NaiveDate],
    ) -> RepoResult<Vec<DailyStat>> {
        let mut stats = Vec::with_capacity(dates.len());
        for date in dates {
            if let Some(stat) =
                get_json::<DailyStat>(self.client(), &keys::stat(link_id, *date)).await?
            {
                stats.push(stat);
            }
        }
        Ok(stats)
    }

    async fn increment_rate_limit(
        &self,
        date: NaiveDate,
        scope: &str,
        identifier_hash: &str,
    ) -> RepoResult<u64> {
        let key = keys::rate_limit(date, scope, identifier_hash);
        let current: Option<RateCounter> = get_json(self.client(), &key).await?;
        let next = RateCounter {
            count: current.map(|c| c.count).unwrap_or(0) + 1,
            updated_at: Utc::now(),
        };

        put_json(self.client(), &key, &next, PutCondition::Overwrite).await?;
        Ok(next.count)
    }
}
