//! Local account handlers on a brand node.
//!
//! Account creation feeds the outbound sync queue; profile edits on the
//! intercepted fields raise change requests instead of writing through.

use crate::app_state::AppState;
use crate::api::local_users::{
    backfill_response::{BackfillResponse, PageError},
    edit_profile_request::EditProfileRequest,
    edit_profile_response::EditProfileResponse,
    user_response::UserResponse,
};
use crate::{ApiError, ApiResult, AuthenticatedCaller, CreateUserRequest};

use idhub_core::{LocalUser, ProposedProfile, is_well_formed_email};
use idhub_db::{ChangeRequestRepository, LocalUserRepository};
use idhub_sync::ChangeRequestService;

use std::panic::Location;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use error_location::ErrorLocation;
use log::info;
use uuid::Uuid;

/// POST /local-users
///
/// Create a local account and schedule its sync to the governing node
pub async fn create_local_user(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    if !is_well_formed_email(&request.email) {
        return Err(ApiError::Validation {
            message: format!("Invalid email address: {}", request.email),
            field: Some("email".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if request.username.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "Username must not be empty".to_string(),
            field: Some("username".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let mut user = LocalUser::new(request.email, request.username, request.display_name);
    user.first_name = request.first_name;
    user.last_name = request.last_name;
    user.url = request.url;
    user.roles = request.roles;
    user.meta = request.meta;

    LocalUserRepository::new(state.pool.clone())
        .create(&user)
        .await?;
    info!("Created local user {} ({})", user.id, user.email);

    state.producer()?.on_user_created(&user).await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// POST /local-users/{id}/profile
///
/// Intercept a profile edit: diff it against the stored profile and raise a
/// change request instead of applying it
pub async fn edit_local_profile(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Path(id): Path<String>,
    Json(request): Json<EditProfileRequest>,
) -> ApiResult<Json<EditProfileResponse>> {
    let user_id = Uuid::parse_str(&id)?;

    let users = LocalUserRepository::new(state.pool.clone());
    let current = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: format!("User {} not found", id),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let requested_by = request
        .requested_by
        .clone()
        .unwrap_or_else(|| current.username.clone());

    let proposed = ProposedProfile {
        email: request.email,
        url: request.url,
        display_name: request.display_name,
        username: request.username,
        meta: request.meta,
    };

    let service = ChangeRequestService::new(
        ChangeRequestRepository::new(state.pool.clone()),
        LocalUserRepository::new(state.pool.clone()),
    );
    let outcome = service.raise(user_id, &proposed, &requested_by).await?;

    // The write carries the stored values back; intercepted fields stay
    // unchanged until approval.
    users.update(&outcome.write).await?;

    Ok(Json(EditProfileResponse {
        request_raised: outcome.request.is_some(),
        request_id: outcome.request.map(|r| r.id.to_string()),
    }))
}

/// POST /sync/backfill
///
/// Push the whole local user set to the governing node in batches
pub async fn run_backfill(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
) -> ApiResult<Json<BackfillResponse>> {
    let report = state.producer()?.send_all_users_for_deduplication().await?;

    Ok(Json(BackfillResponse {
        success: !report.is_partial(),
        pages_sent: report.pages_sent,
        users_sent: report.users_sent,
        page_errors: report
            .page_errors
            .into_iter()
            .map(|(page, message)| PageError { page, message })
            .collect(),
    }))
}
