pub mod api;
pub mod app_state;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    brand_requests::{
        brand_request_dto::BrandRequestDto,
        brand_requests::{approve_local_request, list_brand_requests, reject_local_request},
        list_query::ListBrandRequestsQuery,
        list_response::BrandRequestListResponse,
    },
    decisions::{
        decision_request::DecisionRequest,
        decision_response::DecisionResponse,
        decisions::{approve_remote_request, reject_remote_request},
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::caller::AuthenticatedCaller,
    identities::{
        identities::list_identities, identity_list_response::IdentityListResponse,
        list_identities_query::ListIdentitiesQuery,
    },
    ingest::{
        ingest::ingest_users, ingest_request::IngestRequest, ingest_response::IngestResponse,
    },
    local_users::{
        backfill_response::BackfillResponse,
        create_user_request::CreateUserRequest,
        edit_profile_request::EditProfileRequest,
        edit_profile_response::EditProfileResponse,
        local_users::{create_local_user, edit_local_profile, run_backfill},
        user_response::UserResponse,
    },
    profile_requests::{
        list_requests_query::ListRequestsQuery, profile_requests::list_aggregated_requests,
    },
    sites::{
        register_site_request::RegisterSiteRequest,
        site_response::{SiteDto, SiteListResponse, SiteResponse},
        sites::{list_sites, register_site},
    },
};

pub use crate::app_state::AppState;
pub use crate::routes::build_router;
