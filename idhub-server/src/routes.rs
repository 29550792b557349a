use crate::app_state::AppState;
use crate::health;
use crate::{
    approve_local_request, approve_remote_request, create_local_user, edit_local_profile,
    ingest_users, list_aggregated_requests, list_brand_requests, list_identities, list_sites,
    register_site, reject_local_request, reject_remote_request, run_backfill,
};

use idhub_config::NodeRole;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router for the configured node role
pub fn build_router(state: AppState) -> Router {
    let role_routes = match state.config.node.role {
        NodeRole::Governing => Router::new()
            // Identity store
            .route(
                "/deduplicated-users",
                post(ingest_users).get(list_identities),
            )
            // Cross-node change-request aggregation and decisions
            .route("/profile-requests", get(list_aggregated_requests))
            .route("/profile-requests/approve", post(approve_remote_request))
            .route("/profile-requests/reject", post(reject_remote_request))
            // Registration management
            .route("/sites", post(register_site).get(list_sites)),
        NodeRole::Brand => Router::new()
            // Local change requests
            .route("/brand-profile-requests", get(list_brand_requests))
            .route("/profile-requests/approve", post(approve_local_request))
            .route("/profile-requests/reject", post(reject_local_request))
            // Local accounts feeding the sync queue
            .route("/local-users", post(create_local_user))
            .route("/local-users/{id}/profile", post(edit_local_profile))
            .route("/sync/backfill", post(run_backfill)),
    };

    role_routes
        // Health check endpoints
        .route("/health-check", get(health::health_check))
        .route("/health", get(health::health))
        // Add shared state
        .with_state(state)
        // CORS middleware (node-to-node calls carry their own token auth)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
