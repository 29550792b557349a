use crate::SyncStatusRepository;

use idhub_core::SyncStatus;

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

#[tokio::test]
async fn given_unknown_user_when_read_then_unsynced() {
    let pool = setup_db().await;
    let repo = SyncStatusRepository::new(pool);

    assert_eq!(repo.get("u-1").await.unwrap(), SyncStatus::Unsynced);
}

#[tokio::test]
async fn given_status_set_when_read_then_round_trips() {
    let pool = setup_db().await;
    let repo = SyncStatusRepository::new(pool);

    repo.set("u-1", SyncStatus::InProgress).await.unwrap();
    assert_eq!(repo.get("u-1").await.unwrap(), SyncStatus::InProgress);
}

#[tokio::test]
async fn given_existing_status_when_set_again_then_overwritten() {
    let pool = setup_db().await;
    let repo = SyncStatusRepository::new(pool);

    repo.set("u-1", SyncStatus::InProgress).await.unwrap();
    repo.set("u-1", SyncStatus::Synced).await.unwrap();
    repo.set("u-2", SyncStatus::Failed).await.unwrap();

    assert_eq!(repo.get("u-1").await.unwrap(), SyncStatus::Synced);
    assert_eq!(repo.get("u-2").await.unwrap(), SyncStatus::Failed);
}
