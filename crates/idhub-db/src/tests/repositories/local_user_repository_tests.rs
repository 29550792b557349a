use crate::LocalUserRepository;

use idhub_core::LocalUser;

use chrono::Utc;
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

fn sample_user(email: &str) -> LocalUser {
    let mut user = LocalUser::new(
        email.to_string(),
        email.split('@').next().unwrap().to_string(),
        "Test User".to_string(),
    );
    user.roles = vec!["customer".to_string()];
    user.meta.insert("phone".to_string(), "555-0100".to_string());
    user
}

#[tokio::test]
async fn given_new_user_when_created_then_round_trips() {
    let pool = setup_db().await;
    let repo = LocalUserRepository::new(pool);

    let user = sample_user("ada@example.com");
    repo.create(&user).await.unwrap();

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.email, "ada@example.com");
    assert_eq!(found.roles, user.roles);
    assert_eq!(found.meta_value("phone"), "555-0100");
}

#[tokio::test]
async fn given_unknown_id_when_found_then_none() {
    let pool = setup_db().await;
    let repo = LocalUserRepository::new(pool);

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn given_existing_user_when_updated_then_changes_persist() {
    let pool = setup_db().await;
    let repo = LocalUserRepository::new(pool);

    let mut user = sample_user("ada@example.com");
    repo.create(&user).await.unwrap();

    user.display_name = "Ada L".to_string();
    user.meta.insert("phone".to_string(), "555-0199".to_string());
    user.updated_at = Utc::now();
    repo.update(&user).await.unwrap();

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.display_name, "Ada L");
    assert_eq!(found.meta_value("phone"), "555-0199");
}

#[tokio::test]
async fn given_many_users_when_paged_then_stable_order_and_count() {
    let pool = setup_db().await;
    let repo = LocalUserRepository::new(pool);

    for i in 0..5 {
        repo.create(&sample_user(&format!("user{}@example.com", i)))
            .await
            .unwrap();
    }

    assert_eq!(repo.count().await.unwrap(), 5);

    let first = repo.page(0, 2).await.unwrap();
    let second = repo.page(2, 2).await.unwrap();
    let third = repo.page(4, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(third.len(), 1);

    let mut seen: Vec<String> = first
        .iter()
        .chain(&second)
        .chain(&third)
        .map(|u| u.email.clone())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5);
}
