//! Shared state handed to every handler.
//!
//! The role-specific services are optional: a governing node carries the
//! aggregator and node gateway, a brand node carries the sync producer.
//! Routing is role-gated, so a handler only runs on a node that has its
//! services; the accessors still fail cleanly instead of panicking.

use crate::api::error::{ApiError, Result as ApiResult};

use idhub_config::Config;
use idhub_sync::{NodeGateway, RequestAggregator, SyncProducer};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub aggregator: Option<Arc<RequestAggregator>>,
    pub gateway: Option<Arc<dyn NodeGateway>>,
    pub producer: Option<Arc<SyncProducer>>,
}

impl AppState {
    #[track_caller]
    pub fn aggregator(&self) -> ApiResult<&Arc<RequestAggregator>> {
        self.aggregator.as_ref().ok_or_else(|| ApiError::Internal {
            message: "Request aggregation is not available on this node".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub fn gateway(&self) -> ApiResult<&Arc<dyn NodeGateway>> {
        self.gateway.as_ref().ok_or_else(|| ApiError::Internal {
            message: "Node gateway is not available on this node".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub fn producer(&self) -> ApiResult<&Arc<SyncProducer>> {
        self.producer.as_ref().ok_or_else(|| ApiError::Internal {
            message: "Sync producer is not available on this node".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
