//! A brand node's own change-request endpoints: the local listing the
//! governing node drains, and local resolution of a request.

use crate::app_state::AppState;
use crate::{
    ApiResult, AuthenticatedCaller, BrandRequestListResponse, DecisionRequest, DecisionResponse,
    ListBrandRequestsQuery,
};
use crate::api::brand_requests::brand_request_dto::BrandRequestDto;

use idhub_core::ChangeRequestStatus;
use idhub_db::{ChangeRequestRepository, LocalUserRepository, RequestFilter};
use idhub_sync::ChangeRequestService;

use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
};
use log::{error, info};
use uuid::Uuid;

/// GET /brand-profile-requests
///
/// Cursor-paginated local listing, newest first
pub async fn list_brand_requests(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Query(query): Query<ListBrandRequestsQuery>,
) -> ApiResult<Json<BrandRequestListResponse>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(ChangeRequestStatus::from_str)
        .transpose()?;

    let filter = RequestFilter {
        status,
        search: query.search,
    };

    let cursor = query.cursor.unwrap_or(0).max(0);
    let page_size = state.config.aggregator.page_size;

    let repo = ChangeRequestRepository::new(state.pool.clone());
    let (items, total_count) = repo.list(&filter, cursor, page_size).await?;
    let pending_count = repo.count_pending().await?;

    let has_more = cursor + (items.len() as i64) < total_count;
    let next_cursor = has_more.then_some(cursor + items.len() as i64);

    Ok(Json(BrandRequestListResponse {
        profile_requests: items.into_iter().map(BrandRequestDto::from).collect(),
        total_count,
        pending_count,
        has_more,
        next_cursor,
    }))
}

/// POST /profile-requests/approve
///
/// Transition a pending request to approved and patch the live profile.
/// An approved email change is what the governing node must hear about, so
/// it is replayed through the sync producer afterwards.
pub async fn approve_local_request(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Json(request): Json<DecisionRequest>,
) -> ApiResult<Json<DecisionResponse>> {
    let request_id = Uuid::parse_str(&request.request_id)?;
    let service = workflow(&state);

    let approved = service.approve(request_id).await?;
    info!("Approved change request {}", request_id);

    // The request is already approved; a scheduling failure must not turn
    // the response into an error, or a retry from the governing node would
    // hit the resolved request and get a conflict. Backfill re-sends users
    // whose scheduling was lost here.
    if let Some(producer) = &state.producer
        && let Some(change) = approved.data.get("email")
        && let Ok(user_id) = Uuid::parse_str(&approved.user_id)
    {
        let users = LocalUserRepository::new(state.pool.clone());
        match users.find_by_id(user_id).await {
            Ok(Some(user)) => {
                let mut before = user.clone();
                before.email = change.old.clone();
                if let Err(e) = producer.on_user_changed(&user, &before).await {
                    error!("Failed to schedule email sync for user {}: {}", user_id, e);
                }
            }
            Ok(None) => {}
            Err(e) => error!("Failed to load user {} for email sync: {}", user_id, e),
        }
    }

    Ok(Json(DecisionResponse { success: true }))
}

/// POST /profile-requests/reject
///
/// Transition a pending request to rejected, storing the mandatory comment
pub async fn reject_local_request(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Json(request): Json<DecisionRequest>,
) -> ApiResult<Json<DecisionResponse>> {
    let request_id = Uuid::parse_str(&request.request_id)?;
    let comment = request.comment.as_deref().unwrap_or_default();

    workflow(&state).reject(request_id, comment).await?;
    info!("Rejected change request {}", request_id);

    Ok(Json(DecisionResponse { success: true }))
}

fn workflow(state: &AppState) -> ChangeRequestService {
    ChangeRequestService::new(
        ChangeRequestRepository::new(state.pool.clone()),
        LocalUserRepository::new(state.pool.clone()),
    )
}
