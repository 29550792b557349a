use crate::{ChangeRequestRepository, DbError, RequestFilter};

use idhub_core::{ChangeRequest, ChangeRequestStatus, FieldChange};

use std::collections::BTreeMap;

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

fn sample_request(user_id: &str) -> ChangeRequest {
    let mut data = BTreeMap::new();
    data.insert(
        "email".to_string(),
        FieldChange::new("old@example.com", "new@example.com"),
    );
    ChangeRequest::new_pending(user_id.to_string(), data, BTreeMap::new(), "u-42".to_string())
}

#[tokio::test]
async fn given_no_pending_request_when_created_then_persisted() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let request = sample_request("u-1");
    let created = repo.create_pending(&request).await.unwrap();
    assert!(created);

    let found = repo.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(found.user_id, "u-1");
    assert_eq!(found.status, ChangeRequestStatus::Pending);
    assert_eq!(found.data, request.data);
}

#[tokio::test]
async fn given_pending_request_when_second_created_then_first_wins() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let first = sample_request("u-1");
    assert!(repo.create_pending(&first).await.unwrap());

    let second = sample_request("u-1");
    let created = repo.create_pending(&second).await.unwrap();
    assert!(!created);

    let pending = repo.find_pending_for_user("u-1").await.unwrap().unwrap();
    assert_eq!(pending.id, first.id);
    assert_eq!(repo.count_pending().await.unwrap(), 1);
}

#[tokio::test]
async fn given_resolved_request_when_new_one_raised_then_allowed() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let first = sample_request("u-1");
    repo.create_pending(&first).await.unwrap();
    repo.approve(first.id).await.unwrap();

    let second = sample_request("u-1");
    assert!(repo.create_pending(&second).await.unwrap());
}

#[tokio::test]
async fn given_pending_request_when_approved_then_status_transitions() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let request = sample_request("u-1");
    repo.create_pending(&request).await.unwrap();

    let approved = repo.approve(request.id).await.unwrap();
    assert_eq!(approved.status, ChangeRequestStatus::Approved);
    assert!(approved.updated_at >= request.updated_at);
}

#[tokio::test]
async fn given_pending_request_when_rejected_then_comment_stored() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let request = sample_request("u-1");
    repo.create_pending(&request).await.unwrap();

    let rejected = repo.reject(request.id, "email domain not allowed").await.unwrap();
    assert_eq!(rejected.status, ChangeRequestStatus::Rejected);
    assert_eq!(rejected.comment.as_deref(), Some("email domain not allowed"));
}

#[tokio::test]
async fn given_resolved_request_when_resolved_again_then_not_pending_error() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let request = sample_request("u-1");
    repo.create_pending(&request).await.unwrap();
    repo.approve(request.id).await.unwrap();

    let result = repo.reject(request.id, "too late").await;
    assert!(matches!(result, Err(DbError::RequestNotPending { .. })));
}

#[tokio::test]
async fn given_unknown_id_when_resolved_then_not_pending_error() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let result = repo.approve(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DbError::RequestNotPending { .. })));
}

#[tokio::test]
async fn given_mixed_statuses_when_listed_with_filter_then_only_matching_returned() {
    let pool = setup_db().await;
    let repo = ChangeRequestRepository::new(pool);

    let pending = sample_request("u-1");
    repo.create_pending(&pending).await.unwrap();

    let resolved = sample_request("u-2");
    repo.create_pending(&resolved).await.unwrap();
    repo.approve(resolved.id).await.unwrap();

    let filter = RequestFilter {
        status: Some(ChangeRequestStatus::Pending),
        search: None,
    };
    let (items, total) = repo.list(&filter, 0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, pending.id);

    let (all, total) = repo.list(&RequestFilter::default(), 0, 10).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(all.len(), 2);

    let filter = RequestFilter {
        status: None,
        search: Some("u-2".to_string()),
    };
    let (items, total) = repo.list(&filter, 0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].user_id, "u-2");
}
