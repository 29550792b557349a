//! Ingestion endpoint of the governing node.
//!
//! Receives user batches from brand nodes and folds them into the
//! deduplicated identity store. Invalid records are dropped from the batch
//! silently; only the aggregate processed count surfaces, so re-delivery of
//! the same batch is idempotent by value.

use crate::app_state::AppState;
use crate::{ApiResult, AuthenticatedCaller, IngestRequest, IngestResponse};

use idhub_core::SyncAction;
use idhub_db::IdentityRepository;

use axum::{Json, extract::State};
use log::{debug, info};

/// POST /deduplicated-users
///
/// Apply one batch of user records to the identity store
pub async fn ingest_users(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Json(request): Json<IngestRequest>,
) -> ApiResult<Json<IngestResponse>> {
    let repo = IdentityRepository::new(state.pool.clone());
    let batch_size = request.users.len();
    let mut users_processed: u64 = 0;

    for record in &request.users {
        if !record.is_valid() {
            debug!(
                "Dropping invalid record for user {} from site {}",
                record.user_id, record.site_url
            );
            continue;
        }

        let applied = match record.action {
            SyncAction::Create | SyncAction::Update => {
                repo.upsert_membership(
                    &record.email,
                    &record.first_name,
                    &record.last_name,
                    record.membership(),
                )
                .await?;
                true
            }
            SyncAction::Delete => {
                repo.remove_membership(&record.email, &record.site_url)
                    .await?
            }
            SyncAction::RoleChange => {
                repo.update_role(&record.email, &record.site_url, &record.roles)
                    .await?
            }
        };

        if applied {
            users_processed += 1;
        }
    }

    info!(
        "Ingested batch: {} of {} records applied",
        users_processed, batch_size
    );

    Ok(Json(IngestResponse {
        success: true,
        users_processed,
    }))
}
