use crate::IdentityRepository;

use idhub_core::{IdentityFilter, SiteMembership};

use sqlx::{SqlitePool, migrate};

async fn setup_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:")
        .await
        .expect("Failed to create test database");

    migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn membership(site: &str, url: &str, user: &str, roles: &[&str]) -> SiteMembership {
    SiteMembership::new(
        site.to_string(),
        url,
        user.to_string(),
        roles.iter().map(|r| r.to_string()).collect(),
    )
}

#[tokio::test]
async fn given_unknown_email_when_upserted_then_creates_identity_with_one_membership() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com", "u-1", &["customer"]),
    )
    .await
    .unwrap();

    let identity = repo
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .expect("identity should exist");

    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.first_name, "Ada");
    assert_eq!(identity.sites.len(), 1);
    assert_eq!(identity.sites[0].site_url, "https://a.example.com");
    assert_eq!(identity.sites[0].roles, vec!["customer".to_string()]);
}

#[tokio::test]
async fn given_same_email_from_two_sites_when_upserted_then_memberships_accumulate() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com", "u-1", &["customer"]),
    )
    .await
    .unwrap();

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop B", "https://b.example.com", "u-9", &["editor"]),
    )
    .await
    .unwrap();

    let identity = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(identity.sites.len(), 2);
}

#[tokio::test]
async fn given_existing_membership_when_reapplied_then_replaced_not_duplicated() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com", "u-1", &["customer"]),
    )
    .await
    .unwrap();

    // Same site with a trailing slash and a new role set.
    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com/", "u-1", &["admin"]),
    )
    .await
    .unwrap();

    let identity = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(identity.sites.len(), 1);
    assert_eq!(identity.sites[0].roles, vec!["admin".to_string()]);
}

#[tokio::test]
async fn given_identical_record_when_reapplied_then_noop_by_value() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    let m = membership("Shop A", "https://a.example.com", "u-1", &["customer"]);
    repo.upsert_membership("ada@example.com", "Ada", "Lovelace", m.clone())
        .await
        .unwrap();
    let before = repo.find_by_email("ada@example.com").await.unwrap().unwrap();

    repo.upsert_membership("ada@example.com", "Ada", "Lovelace", m)
        .await
        .unwrap();
    let after = repo.find_by_email("ada@example.com").await.unwrap().unwrap();

    assert_eq!(before.id, after.id);
    assert_eq!(before.sites, after.sites);
}

#[tokio::test]
async fn given_membership_when_role_updated_then_role_set_replaced() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com", "u-1", &["customer"]),
    )
    .await
    .unwrap();

    let updated = repo
        .update_role(
            "ada@example.com",
            "https://a.example.com/",
            &["manager".to_string()],
        )
        .await
        .unwrap();
    assert!(updated);

    let identity = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(identity.sites[0].roles, vec!["manager".to_string()]);
}

#[tokio::test]
async fn given_unknown_membership_when_role_updated_then_returns_false() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    let updated = repo
        .update_role("ghost@example.com", "https://a.example.com", &[])
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn given_two_memberships_when_one_removed_then_identity_survives() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com", "u-1", &[]),
    )
    .await
    .unwrap();
    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop B", "https://b.example.com", "u-9", &[]),
    )
    .await
    .unwrap();

    let removed = repo
        .remove_membership("ada@example.com", "https://a.example.com")
        .await
        .unwrap();
    assert!(removed);

    let identity = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(identity.sites.len(), 1);
    assert_eq!(identity.sites[0].site_url, "https://b.example.com");
}

#[tokio::test]
async fn given_last_membership_when_removed_then_identity_deleted() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com", "u-1", &[]),
    )
    .await
    .unwrap();

    let removed = repo
        .remove_membership("ada@example.com", "https://a.example.com/")
        .await
        .unwrap();
    assert!(removed);

    let identity = repo.find_by_email("ada@example.com").await.unwrap();
    assert!(identity.is_none());
}

#[tokio::test]
async fn given_filters_when_querying_then_matches_and_paginates() {
    let pool = setup_db().await;
    let repo = IdentityRepository::new(pool);

    repo.upsert_membership(
        "ada@example.com",
        "Ada",
        "Lovelace",
        membership("Shop A", "https://a.example.com", "u-1", &["admin"]),
    )
    .await
    .unwrap();
    repo.upsert_membership(
        "grace@example.com",
        "Grace",
        "Hopper",
        membership("Shop B", "https://b.example.com", "u-2", &["customer"]),
    )
    .await
    .unwrap();

    let (all, total) = repo.query(&IdentityFilter::default(), 1, 10).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(all.len(), 2);

    let filter = IdentityFilter {
        role: Some("admin".to_string()),
        ..Default::default()
    };
    let (admins, total) = repo.query(&filter, 1, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(admins[0].email, "ada@example.com");

    let filter = IdentityFilter {
        search: Some("grace".to_string()),
        ..Default::default()
    };
    let (found, _) = repo.query(&filter, 1, 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "grace@example.com");

    let (page_two, total) = repo.query(&IdentityFilter::default(), 2, 1).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].email, "grace@example.com");
}
