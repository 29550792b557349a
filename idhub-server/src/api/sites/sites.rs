//! Site registration management on the governing node.
//!
//! A registration is only activated after the candidate node answers the
//! authenticated health check, so a typo'd URL or key never enters the
//! aggregation fan-out.

use crate::app_state::AppState;
use crate::api::sites::site_response::SiteResponse;
use crate::{ApiError, ApiResult, AuthenticatedCaller, RegisterSiteRequest, SiteDto, SiteListResponse};

use idhub_core::SiteRegistration;
use idhub_db::SiteRegistrationRepository;

use std::panic::Location;

use axum::{Json, extract::State, http::StatusCode};
use error_location::ErrorLocation;
use log::info;

/// POST /sites
///
/// Register a brand node, vetting it with a health check first
pub async fn register_site(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Json(request): Json<RegisterSiteRequest>,
) -> ApiResult<(StatusCode, Json<SiteResponse>)> {
    for (value, field) in [
        (&request.name, "name"),
        (&request.url, "url"),
        (&request.api_key, "api_key"),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation {
                message: format!("{} must not be empty", field),
                field: Some(field.to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    }

    let registration = SiteRegistration::new(request.name, &request.url, request.api_key);

    let healthy = state.gateway()?.health_check(&registration).await?;
    if !healthy {
        return Err(ApiError::Upstream {
            message: format!("Site {} failed its health check", registration.url),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    SiteRegistrationRepository::new(state.pool.clone())
        .create(&registration)
        .await?;
    info!("Registered site {} ({})", registration.name, registration.url);

    Ok((
        StatusCode::CREATED,
        Json(SiteResponse {
            site: registration.into(),
        }),
    ))
}

/// GET /sites
///
/// List registered brand nodes
pub async fn list_sites(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
) -> ApiResult<Json<SiteListResponse>> {
    let sites = SiteRegistrationRepository::new(state.pool.clone())
        .list()
        .await?;

    Ok(Json(SiteListResponse {
        sites: sites.into_iter().map(SiteDto::from).collect(),
    }))
}
