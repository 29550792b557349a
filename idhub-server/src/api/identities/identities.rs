//! Identity store listing for the governing node's admin surface.

use crate::app_state::AppState;
use crate::{ApiResult, AuthenticatedCaller, IdentityListResponse, ListIdentitiesQuery};

use idhub_core::IdentityFilter;
use idhub_db::IdentityRepository;

use axum::{
    Json,
    extract::{Query, State},
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// GET /deduplicated-users
///
/// Paged, filtered query over the deduplicated identity store
pub async fn list_identities(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Query(query): Query<ListIdentitiesQuery>,
) -> ApiResult<Json<IdentityListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let filter = IdentityFilter {
        search: query.search,
        role: query.role,
        site: query.site,
    };

    let repo = IdentityRepository::new(state.pool.clone());
    let (users, total_count) = repo.query(&filter, page, page_size).await?;

    Ok(Json(IdentityListResponse {
        users,
        total_count,
        page,
        page_size,
    }))
}
