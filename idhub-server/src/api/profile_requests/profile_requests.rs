//! Aggregated change-request listing on the governing node.
//!
//! Fans out to every registered brand node and returns one merged page.
//! Node failures never fail the response; they surface in `errors` next to
//! whatever was collected, always with HTTP 200.

use crate::app_state::AppState;
use crate::{ApiResult, AuthenticatedCaller, ListRequestsQuery};

use idhub_sync::{AggregatedPage, AggregatorQuery};

use axum::{
    Json,
    extract::{Query, State},
};

/// GET /profile-requests
///
/// One merged page of change requests across all registered brand nodes
pub async fn list_aggregated_requests(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Query(query): Query<ListRequestsQuery>,
) -> ApiResult<Json<AggregatedPage>> {
    let aggregator = state.aggregator()?;

    let page = aggregator
        .query(&AggregatorQuery {
            site: query.site,
            status: query.status,
            search: query.search,
            cursor: query.cursor.unwrap_or(0).max(0),
        })
        .await?;

    Ok(Json(page))
}
