use crate::SyncJobRepository;

use idhub_core::{SyncAction, SyncJob, UserRecord};

use chrono::{Duration, Utc};
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

fn sample_record(user_id: &str, action: SyncAction) -> UserRecord {
    UserRecord {
        user_id: user_id.to_string(),
        email: format!("{}@example.com", user_id),
        username: user_id.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        roles: vec!["customer".to_string()],
        site_name: "Shop A".to_string(),
        site_url: "https://a.example.com".to_string(),
        action,
    }
}

#[tokio::test]
async fn given_new_job_when_inserted_then_due_after_run_at() {
    let pool = setup_db().await;
    let repo = SyncJobRepository::new(pool);

    let job = SyncJob::new(
        "u-1".to_string(),
        SyncAction::Create,
        sample_record("u-1", SyncAction::Create),
    );
    assert!(repo.insert(&job).await.unwrap());

    let due = repo.due_jobs(Utc::now(), 10).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].job_id, job.job_id);
    assert_eq!(due[0].payload, job.payload);
}

#[tokio::test]
async fn given_duplicate_job_id_when_inserted_then_collapses_to_one() {
    let pool = setup_db().await;
    let repo = SyncJobRepository::new(pool);

    let job = SyncJob::new(
        "u-1".to_string(),
        SyncAction::Update,
        sample_record("u-1", SyncAction::Update),
    );
    assert!(repo.insert(&job).await.unwrap());
    assert!(!repo.insert(&job).await.unwrap());

    assert_eq!(repo.pending_for_user("u-1").await.unwrap(), 1);
}

#[tokio::test]
async fn given_future_run_at_when_queried_then_not_due_yet() {
    let pool = setup_db().await;
    let repo = SyncJobRepository::new(pool);

    let mut job = SyncJob::new(
        "u-1".to_string(),
        SyncAction::Create,
        sample_record("u-1", SyncAction::Create),
    );
    job.run_at = Utc::now() + Duration::minutes(5);
    repo.insert(&job).await.unwrap();

    let due = repo.due_jobs(Utc::now(), 10).await.unwrap();
    assert!(due.is_empty());

    let due = repo.due_jobs(Utc::now() + Duration::minutes(6), 10).await.unwrap();
    assert_eq!(due.len(), 1);
}

#[tokio::test]
async fn given_failed_job_when_rescheduled_then_attempt_and_run_at_updated() {
    let pool = setup_db().await;
    let repo = SyncJobRepository::new(pool);

    let job = SyncJob::new(
        "u-1".to_string(),
        SyncAction::Create,
        sample_record("u-1", SyncAction::Create),
    );
    repo.insert(&job).await.unwrap();

    let next_run = Utc::now() + Duration::minutes(2);
    repo.reschedule(&job.job_id, 1, next_run).await.unwrap();

    assert!(repo.due_jobs(Utc::now(), 10).await.unwrap().is_empty());

    let due = repo
        .due_jobs(Utc::now() + Duration::minutes(3), 10)
        .await
        .unwrap();
    assert_eq!(due[0].attempt, 1);
}

#[tokio::test]
async fn given_delivered_job_when_deleted_then_queue_is_empty() {
    let pool = setup_db().await;
    let repo = SyncJobRepository::new(pool);

    let job = SyncJob::new(
        "u-1".to_string(),
        SyncAction::Create,
        sample_record("u-1", SyncAction::Create),
    );
    repo.insert(&job).await.unwrap();
    repo.delete(&job.job_id).await.unwrap();

    assert_eq!(repo.pending_for_user("u-1").await.unwrap(), 0);
}

#[tokio::test]
async fn given_multiple_due_jobs_when_queried_then_oldest_first_and_capped() {
    let pool = setup_db().await;
    let repo = SyncJobRepository::new(pool);

    let base = Utc::now() - Duration::minutes(10);
    for i in 0..3 {
        let mut job = SyncJob::new(
            format!("u-{}", i),
            SyncAction::Create,
            sample_record(&format!("u-{}", i), SyncAction::Create),
        );
        job.run_at = base + Duration::minutes(i);
        repo.insert(&job).await.unwrap();
    }

    let due = repo.due_jobs(Utc::now(), 2).await.unwrap();
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].user_id, "u-0");
    assert_eq!(due[1].user_id, "u-1");
}
