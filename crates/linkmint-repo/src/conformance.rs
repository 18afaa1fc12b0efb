//! Behavioral contract shared by both repository backends.
//!
//! Every property runs against [`MemoryRepository`] and against
//! [`KvRepository`] over the in-memory object client, the same code path
//! the S3 deployment runs minus the wire.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use linkmint_store::InMemoryObjectClient;
use linkmint_types::{
    Link, LinkId, LinkKind, LinkStatus, MagicTokenRecord, UserId,
};

use crate::kv::KvRepository;
use crate::memory::MemoryRepository;
use crate::traits::{CreateLinkOutcome, Repository};

fn kv() -> KvRepository {
    KvRepository::new(Arc::new(InMemoryObjectClient::new()))
}

fn mem() -> MemoryRepository {
    MemoryRepository::new()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn link_at(id: &str, owner: &str, slug: &str, updated_at: DateTime<Utc>) -> Link {
    Link {
        id: LinkId::new(id),
        owner_id: UserId::new(owner),
        kind: LinkKind::Short,
        slug: slug.into(),
        target_url: "https://example.com/landing".into(),
        status: LinkStatus::Active,
        title: None,
        created_at: updated_at,
        updated_at,
    }
}

fn token_record(hash: &str, expires_at: DateTime<Utc>) -> MagicTokenRecord {
    MagicTokenRecord {
        id: hash.to_owned(),
        user_id: UserId::new("usr_1"),
        email: "user@example.com".into(),
        created_at: expires_at - Duration::minutes(15),
        expires_at,
        used_at: None,
    }
}

// ---- Users ----

async fn missing_user_is_absent(repo: impl Repository) {
    assert!(repo
        .find_user_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn missing_user_is_absent_kv() {
    missing_user_is_absent(kv()).await;
}

#[tokio::test]
async fn missing_user_is_absent_memory() {
    missing_user_is_absent(mem()).await;
}

async fn user_creation_is_idempotent_per_email(repo: impl Repository) {
    let created = repo.create_user("User@Example.COM").await.unwrap();
    // The record keeps the email as given; identity is the normalized form.
    assert_eq!(created.email, "User@Example.COM");

    let found = repo
        .find_user_by_email("  user@example.com ")
        .await
        .unwrap()
        .expect("normalized lookup hits the same account");
    assert_eq!(found.id, created.id);

    let again = repo.create_user("user@example.com").await.unwrap();
    assert_eq!(again.id, created.id);
}

#[tokio::test]
async fn user_creation_is_idempotent_per_email_kv() {
    user_creation_is_idempotent_per_email(kv()).await;
}

#[tokio::test]
async fn user_creation_is_idempotent_per_email_memory() {
    user_creation_is_idempotent_per_email(mem()).await;
}

// ---- Magic tokens ----

async fn magic_token_consumes_exactly_once(repo: impl Repository) {
    let now = at(2024, 1, 1, 12);
    let record = token_record("hash-1", now + Duration::minutes(15));
    repo.save_magic_token("hash-1", &record).await.unwrap();

    let consumed = repo
        .consume_magic_token("hash-1", now)
        .await
        .unwrap()
        .expect("first consumption succeeds");
    assert_eq!(consumed.used_at, Some(now));

    // Every later attempt sees a spent token, even at the same instant.
    assert!(repo.consume_magic_token("hash-1", now).await.unwrap().is_none());
    assert!(repo
        .consume_magic_token("hash-1", now + Duration::seconds(1))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn magic_token_consumes_exactly_once_kv() {
    magic_token_consumes_exactly_once(kv()).await;
}

#[tokio::test]
async fn magic_token_consumes_exactly_once_memory() {
    magic_token_consumes_exactly_once(mem()).await;
}

async fn expired_magic_token_is_never_consumable(repo: impl Repository) {
    let expiry = at(2024, 1, 1, 12);
    let record = token_record("hash-2", expiry);
    repo.save_magic_token("hash-2", &record).await.unwrap();

    assert!(repo
        .consume_magic_token("hash-2", expiry + Duration::seconds(1))
        .await
        .unwrap()
        .is_none());
    // Expiry itself is still inside the window.
    assert!(repo
        .consume_magic_token("hash-2", expiry)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn expired_magic_token_is_never_consumable_kv() {
    expired_magic_token_is_never_consumable(kv()).await;
}

#[tokio::test]
async fn expired_magic_token_is_never_consumable_memory() {
    expired_magic_token_is_never_consumable(mem()).await;
}

async fn unknown_magic_token_is_absent(repo: impl Repository) {
    assert!(repo
        .consume_magic_token("never-saved", at(2024, 1, 1, 12))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn unknown_magic_token_is_absent_kv() {
    unknown_magic_token_is_absent(kv()).await;
}

#[tokio::test]
async fn unknown_magic_token_is_absent_memory() {
    unknown_magic_token_is_absent(mem()).await;
}

// ---- Links and slugs ----

async fn slug_claim_is_first_writer_wins(repo: impl Repository) {
    let now = at(2024, 1, 1, 12);
    let first = link_at("lnk_1", "u1", "promo1", now);
    let second = link_at("lnk_2", "u2", "promo1", now);

    assert_eq!(
        repo.create_link(&first).await.unwrap(),
        CreateLinkOutcome::Created
    );
    assert_eq!(
        repo.create_link(&second).await.unwrap(),
        CreateLinkOutcome::SlugTaken
    );

    // The loser produced no link record.
    assert!(repo
        .get_link_by_id(&LinkId::new("lnk_2"))
        .await
        .unwrap()
        .is_none());

    let claim = repo
        .get_slug_record("promo1")
        .await
        .unwrap()
        .expect("claim record exists");
    assert_eq!(claim.owner_id, UserId::new("u1"));
    assert_eq!(claim.link_id, LinkId::new("lnk_1"));
}

#[tokio::test]
async fn slug_claim_is_first_writer_wins_kv() {
    slug_claim_is_first_writer_wins(kv()).await;
}

#[tokio::test]
async fn slug_claim_is_first_writer_wins_memory() {
    slug_claim_is_first_writer_wins(mem()).await;
}

async fn list_links_isolates_owners_and_sorts_newest_first(repo: impl Repository) {
    let older = at(2024, 1, 1, 9);
    let newer = at(2024, 1, 2, 9);
    repo.create_link(&link_at("lnk_a", "u1", "aaa1", older))
        .await
        .unwrap();
    repo.create_link(&link_at("lnk_b", "u1", "bbb1", newer))
        .await
        .unwrap();
    repo.create_link(&link_at("lnk_c", "u2", "ccc1", newer))
        .await
        .unwrap();

    let links = repo.list_links(&UserId::new("u1")).await.unwrap();
    let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["lnk_b", "lnk_a"]);
    assert!(links.iter().all(|l| l.owner_id == UserId::new("u1")));

    assert!(repo
        .list_links(&UserId::new("u3"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn list_links_isolates_owners_and_sorts_newest_first_kv() {
    list_links_isolates_owners_and_sorts_newest_first(kv()).await;
}

#[tokio::test]
async fn list_links_isolates_owners_and_sorts_newest_first_memory() {
    list_links_isolates_owners_and_sorts_newest_first(mem()).await;
}

async fn disabling_a_link_reaches_the_slug_record(repo: impl Repository) {
    let created_at = at(2024, 1, 1, 9);
    let mut link = link_at("lnk_1", "u1", "gate1", created_at);
    repo.create_link(&link).await.unwrap();

    link.status = LinkStatus::Disabled;
    link.updated_at = at(2024, 1, 2, 9);
    repo.update_link(&link).await.unwrap();

    // The redirect path gates on the slug record alone.
    let claim = repo.get_slug_record("gate1").await.unwrap().unwrap();
    assert_eq!(claim.status, LinkStatus::Disabled);

    let stored = repo
        .get_link_by_id(&LinkId::new("lnk_1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, LinkStatus::Disabled);
}

#[tokio::test]
async fn disabling_a_link_reaches_the_slug_record_kv() {
    disabling_a_link_reaches_the_slug_record(kv()).await;
}

#[tokio::test]
async fn disabling_a_link_reaches_the_slug_record_memory() {
    disabling_a_link_reaches_the_slug_record(mem()).await;
}

async fn slug_status_update_without_record_is_a_noop(repo: impl Repository) {
    repo.update_slug_status("never-claimed", LinkStatus::Disabled)
        .await
        .unwrap();
    assert!(repo.get_slug_record("never-claimed").await.unwrap().is_none());
}

#[tokio::test]
async fn slug_status_update_without_record_is_a_noop_kv() {
    slug_status_update_without_record_is_a_noop(kv()).await;
}

#[tokio::test]
async fn slug_status_update_without_record_is_a_noop_memory() {
    slug_status_update_without_record_is_a_noop(mem()).await;
}

// ---- Stats and counters ----

async fn stat_increments_keep_sums_aligned(repo: impl Repository) {
    let link_id = LinkId::new("lnk_1");
    let date = today(2024, 1, 1);

    for _ in 0..3 {
        repo.increment_stat(&link_id, date, "US", "mobile")
            .await
            .unwrap();
    }

    let missing = today(2024, 1, 2);
    let stats = repo
        .get_daily_stats(&link_id, &[date, missing])
        .await
        .unwrap();
    assert_eq!(stats.len(), 1);

    let stat = &stats[0];
    assert_eq!(stat.total, 3);
    assert_eq!(stat.by_country.get("US"), Some(&3));
    assert_eq!(stat.by_device.get("mobile"), Some(&3));
    assert_eq!(stat.by_country.values().sum::<u64>(), 3);
    assert_eq!(stat.by_device.values().sum::<u64>(), 3);
}

#[tokio::test]
async fn stat_increments_keep_sums_aligned_kv() {
    stat_increments_keep_sums_aligned(kv()).await;
}

#[tokio::test]
async fn stat_increments_keep_sums_aligned_memory() {
    stat_increments_keep_sums_aligned(mem()).await;
}

async fn mixed_stat_buckets_share_one_total(repo: impl Repository) {
    let link_id = LinkId::new("lnk_1");
    let date = today(2024, 1, 1);

    repo.increment_stat(&link_id, date, "US", "mobile").await.unwrap();
    repo.increment_stat(&link_id, date, "DE", "desktop").await.unwrap();
    let last = repo
        .increment_stat(&link_id, date, "US", "desktop")
        .await
        .unwrap();

    assert_eq!(last.total, 3);
    assert_eq!(last.by_country.get("US"), Some(&2));
    assert_eq!(last.by_country.get("DE"), Some(&1));
    assert_eq!(last.by_device.get("desktop"), Some(&2));
    assert_eq!(last.by_device.get("mobile"), Some(&1));
}

#[tokio::test]
async fn mixed_stat_buckets_share_one_total_kv() {
    mixed_stat_buckets_share_one_total(kv()).await;
}

#[tokio::test]
async fn mixed_stat_buckets_share_one_total_memory() {
    mixed_stat_buckets_share_one_total(mem()).await;
}

async fn rate_limit_counts_per_key(repo: impl Repository) {
    let date = today(2024, 1, 1);
    assert_eq!(
        repo.increment_rate_limit(date, "create_link", "aa").await.unwrap(),
        1
    );
    assert_eq!(
        repo.increment_rate_limit(date, "create_link", "aa").await.unwrap(),
        2
    );
    // Scope, identifier, and date each partition the counter.
    assert_eq!(
        repo.increment_rate_limit(date, "magic_link", "aa").await.unwrap(),
        1
    );
    assert_eq!(
        repo.increment_rate_limit(date, "create_link", "bb").await.unwrap(),
        1
    );
    assert_eq!(
        repo.increment_rate_limit(today(2024, 1, 2), "create_link", "aa")
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn rate_limit_counts_per_key_kv() {
    rate_limit_counts_per_key(kv()).await;
}

#[tokio::test]
async fn rate_limit_counts_per_key_memory() {
    rate_limit_counts_per_key(mem()).await;
}

fn today(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
