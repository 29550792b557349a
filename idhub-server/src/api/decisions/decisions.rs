//! Decision proxying on the governing node.
//!
//! The governing node never resolves a change request itself; the owning
//! brand node does. These handlers forward the decision and invalidate the
//! aggregation cache once the remote transition succeeded.

use crate::app_state::AppState;
use crate::{ApiError, ApiResult, AuthenticatedCaller, DecisionRequest, DecisionResponse};

use idhub_db::SiteRegistrationRepository;

use std::panic::Location;

use axum::{Json, extract::State};
use error_location::ErrorLocation;
use idhub_core::SiteRegistration;
use log::info;

/// POST /profile-requests/approve
///
/// Forward an approval to the owning brand node
pub async fn approve_remote_request(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Json(request): Json<DecisionRequest>,
) -> ApiResult<Json<DecisionResponse>> {
    let site = owning_site(&state, request.site_url.as_deref()).await?;

    let ack = state
        .gateway()?
        .approve(&site, &request.request_id)
        .await?;

    state.aggregator()?.invalidate();
    info!(
        "Approved change request {} on {}",
        request.request_id, site.url
    );

    Ok(Json(DecisionResponse {
        success: ack.success,
    }))
}

/// POST /profile-requests/reject
///
/// Forward a rejection, with its mandatory comment, to the owning brand node
pub async fn reject_remote_request(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Json(request): Json<DecisionRequest>,
) -> ApiResult<Json<DecisionResponse>> {
    let comment = request
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation {
            message: "Rejection requires a comment".to_string(),
            field: Some("comment".to_string()),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let site = owning_site(&state, request.site_url.as_deref()).await?;

    let ack = state
        .gateway()?
        .reject(&site, &request.request_id, comment)
        .await?;

    state.aggregator()?.invalidate();
    info!(
        "Rejected change request {} on {}",
        request.request_id, site.url
    );

    Ok(Json(DecisionResponse {
        success: ack.success,
    }))
}

async fn owning_site(
    state: &AppState,
    site_url: Option<&str>,
) -> ApiResult<SiteRegistration> {
    let site_url = site_url.ok_or_else(|| ApiError::Validation {
        message: "site_url of the owning node is required".to_string(),
        field: Some("site_url".to_string()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    SiteRegistrationRepository::new(state.pool.clone())
        .find_by_url(site_url)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: format!("No registered site with URL {}", site_url),
            location: ErrorLocation::from(Location::caller()),
        })
}
