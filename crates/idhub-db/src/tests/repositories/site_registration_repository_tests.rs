use crate::{DbError, SiteRegistrationRepository};

use idhub_core::SiteRegistration;

use sqlx::{SqlitePool, migrate};
use uuid::Uuid;

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

fn registration(name: &str, url: &str) -> SiteRegistration {
    SiteRegistration::new(name.to_string(), url, format!("key-{}", name))
}

#[tokio::test]
async fn given_new_site_when_registered_then_found_by_url() {
    let pool = setup_db().await;
    let repo = SiteRegistrationRepository::new(pool);

    let site = registration("Shop A", "https://a.example.com");
    repo.create(&site).await.unwrap();

    let found = repo
        .find_by_url("https://a.example.com/")
        .await
        .unwrap()
        .expect("registration should exist");
    assert_eq!(found.id, site.id);
    assert_eq!(found.name, "Shop A");
}

#[tokio::test]
async fn given_registered_url_when_registered_again_then_duplicate_error() {
    let pool = setup_db().await;
    let repo = SiteRegistrationRepository::new(pool);

    repo.create(&registration("Shop A", "https://a.example.com"))
        .await
        .unwrap();

    let result = repo
        .create(&registration("Shop A again", "https://a.example.com/"))
        .await;
    assert!(matches!(result, Err(DbError::DuplicateSiteUrl { .. })));
}

#[tokio::test]
async fn given_several_sites_when_listed_then_sorted_by_name() {
    let pool = setup_db().await;
    let repo = SiteRegistrationRepository::new(pool);

    repo.create(&registration("Zeta", "https://z.example.com"))
        .await
        .unwrap();
    repo.create(&registration("Alpha", "https://a.example.com"))
        .await
        .unwrap();

    let sites = repo.list().await.unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].name, "Alpha");
    assert_eq!(sites[1].name, "Zeta");
}

#[tokio::test]
async fn given_registered_site_when_deleted_then_gone() {
    let pool = setup_db().await;
    let repo = SiteRegistrationRepository::new(pool);

    let site = registration("Shop A", "https://a.example.com");
    repo.create(&site).await.unwrap();

    assert!(repo.delete(site.id).await.unwrap());
    assert!(!repo.delete(Uuid::new_v4()).await.unwrap());
    assert!(repo.find_by_url("https://a.example.com").await.unwrap().is_none());
}
