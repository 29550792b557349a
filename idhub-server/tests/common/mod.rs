#![allow(dead_code)]

//! Test infrastructure for idhub-server API tests

use idhub_client::{
    ClientError, DecisionAck, IngestAck, RemoteChangeRequest, RemoteRequestPage,
    Result as ClientResult,
};
use idhub_config::{Config, NodeConfig, NodeRole};
use idhub_core::{SiteRegistration, UserRecord};
use idhub_db::{
    LocalUserRepository, SiteRegistrationRepository, SyncStatusRepository,
};
use idhub_server::app_state::AppState;
use idhub_sync::{
    HubGateway, LogNotifier, NodeGateway, RequestAggregator, SqliteJobQueue, SyncProducer,
};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::panic::Location;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use error_location::ErrorLocation;
use sqlx::SqlitePool;

/// Create a test pool with in-memory SQLite
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:")
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("../crates/idhub-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn governing_config() -> Config {
    Config {
        node: NodeConfig {
            role: NodeRole::Governing,
            site_name: "Identity Hub".to_string(),
            site_url: "https://hub.example.com".to_string(),
            shared_secret: None,
            hub_url: None,
        },
        ..Default::default()
    }
}

pub fn brand_config() -> Config {
    Config {
        node: NodeConfig {
            role: NodeRole::Brand,
            site_name: "Shop A".to_string(),
            site_url: "https://a.example.com".to_string(),
            shared_secret: Some("brand-secret".to_string()),
            hub_url: Some("https://hub.example.com".to_string()),
        },
        ..Default::default()
    }
}

/// Create governing AppState over a stub node gateway
pub async fn governing_state(gateway: Arc<StubNodeGateway>) -> AppState {
    let pool = create_test_pool().await;
    let config = Arc::new(governing_config());

    let gateway: Arc<dyn NodeGateway> = gateway;
    let aggregator = Arc::new(RequestAggregator::new(
        gateway.clone(),
        SiteRegistrationRepository::new(pool.clone()),
        config.aggregator.clone(),
    ));

    AppState {
        pool,
        config,
        aggregator: Some(aggregator),
        gateway: Some(gateway),
        producer: None,
    }
}

/// Create brand AppState over a stub hub gateway
pub async fn brand_state(hub: Arc<StubHubGateway>) -> AppState {
    let pool = create_test_pool().await;
    let config = Arc::new(brand_config());

    let queue = Arc::new(SqliteJobQueue::new(pool.clone()));
    let producer = Arc::new(SyncProducer::new(
        queue,
        hub,
        SyncStatusRepository::new(pool.clone()),
        Arc::new(LocalUserRepository::new(pool.clone())),
        Arc::new(LogNotifier),
        config.sync.clone(),
        &config.node.site_name,
        &config.node.site_url,
    ));

    AppState {
        pool,
        config,
        aggregator: None,
        gateway: None,
        producer: Some(producer),
    }
}

/// Brand AppState whose producer runs against a closed pool, so scheduling
/// a sync fails while request handling on the live pool succeeds
pub async fn brand_state_with_failing_scheduler(hub: Arc<StubHubGateway>) -> AppState {
    let pool = create_test_pool().await;
    let config = Arc::new(brand_config());

    let dead_pool = create_test_pool().await;
    dead_pool.close().await;

    let queue = Arc::new(SqliteJobQueue::new(dead_pool.clone()));
    let producer = Arc::new(SyncProducer::new(
        queue,
        hub,
        SyncStatusRepository::new(dead_pool.clone()),
        Arc::new(LocalUserRepository::new(dead_pool)),
        Arc::new(LogNotifier),
        config.sync.clone(),
        &config.node.site_name,
        &config.node.site_url,
    ));

    AppState {
        pool,
        config,
        aggregator: None,
        gateway: None,
        producer: Some(producer),
    }
}

/// Register a brand node directly in the database
pub async fn seed_site(pool: &SqlitePool, name: &str, url: &str, api_key: &str) {
    SiteRegistrationRepository::new(pool.clone())
        .create(&SiteRegistration::new(
            name.to_string(),
            url,
            api_key.to_string(),
        ))
        .await
        .expect("Failed to seed site registration");
}

/// Authenticated GET with the node-to-node headers
pub fn authed_get(uri: &str, token: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("X-Access-Token", token)
        .header("Origin", origin)
        .body(Body::empty())
        .unwrap()
}

/// Authenticated POST with a JSON body
pub fn authed_post_json(
    uri: &str,
    token: &str,
    origin: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Access-Token", token)
        .header("Origin", origin)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A remote change request as a brand node would report it
pub fn remote_request(id: &str, user_id: &str, status: &str, created_at: i64) -> RemoteChangeRequest {
    RemoteChangeRequest {
        id: id.to_string(),
        user_id: user_id.to_string(),
        status: status.to_string(),
        comment: None,
        data: BTreeMap::new(),
        metadata: BTreeMap::new(),
        requested_by: "tester".to_string(),
        created_at,
        updated_at: created_at,
        site_name: String::new(),
        site_url: String::new(),
    }
}

fn stub_error(message: &str) -> ClientError {
    ClientError::Api {
        code: "STUB_FAILURE".to_string(),
        message: message.to_string(),
        status: 500,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// In-memory brand node fleet for governing-side tests
#[derive(Default)]
pub struct StubNodeGateway {
    requests: Mutex<HashMap<String, Vec<RemoteChangeRequest>>>,
    failing: Mutex<HashSet<String>>,
    unhealthy: Mutex<HashSet<String>>,
    pub decisions: Mutex<Vec<(String, String, String)>>,
}

impl StubNodeGateway {
    pub fn with_requests(self, site_url: &str, items: Vec<RemoteChangeRequest>) -> Self {
        self.requests
            .lock()
            .unwrap()
            .insert(site_url.to_string(), items);
        self
    }

    pub fn with_failing_node(self, site_url: &str) -> Self {
        self.failing.lock().unwrap().insert(site_url.to_string());
        self
    }

    pub fn with_unhealthy_node(self, site_url: &str) -> Self {
        self.unhealthy.lock().unwrap().insert(site_url.to_string());
        self
    }
}

#[async_trait]
impl NodeGateway for StubNodeGateway {
    async fn fetch_requests(
        &self,
        site: &SiteRegistration,
        status: Option<&str>,
        search: Option<&str>,
        _cursor: Option<i64>,
    ) -> ClientResult<RemoteRequestPage> {
        if self.failing.lock().unwrap().contains(&site.url) {
            return Err(stub_error("node unreachable"));
        }

        let items: Vec<RemoteChangeRequest> = self
            .requests
            .lock()
            .unwrap()
            .get(&site.url)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .filter(|r| search.is_none_or(|s| r.user_id.contains(s)))
            .collect();

        let pending_count = items.iter().filter(|r| r.status == "pending").count() as i64;

        Ok(RemoteRequestPage {
            total_count: items.len() as i64,
            pending_count,
            has_more: false,
            next_cursor: None,
            profile_requests: items,
        })
    }

    async fn approve(
        &self,
        site: &SiteRegistration,
        request_id: &str,
    ) -> ClientResult<DecisionAck> {
        if self.failing.lock().unwrap().contains(&site.url) {
            return Err(stub_error("node unreachable"));
        }
        self.decisions.lock().unwrap().push((
            site.url.clone(),
            request_id.to_string(),
            "approve".to_string(),
        ));
        Ok(DecisionAck { success: true })
    }

    async fn reject(
        &self,
        site: &SiteRegistration,
        request_id: &str,
        _comment: &str,
    ) -> ClientResult<DecisionAck> {
        if self.failing.lock().unwrap().contains(&site.url) {
            return Err(stub_error("node unreachable"));
        }
        self.decisions.lock().unwrap().push((
            site.url.clone(),
            request_id.to_string(),
            "reject".to_string(),
        ));
        Ok(DecisionAck { success: true })
    }

    async fn health_check(&self, site: &SiteRegistration) -> ClientResult<bool> {
        if self.failing.lock().unwrap().contains(&site.url) {
            return Err(stub_error("node unreachable"));
        }
        Ok(!self.unhealthy.lock().unwrap().contains(&site.url))
    }
}

/// Governing-node stand-in recording pushed batches
#[derive(Default)]
pub struct StubHubGateway {
    pub batches: Mutex<Vec<usize>>,
}

#[async_trait]
impl HubGateway for StubHubGateway {
    async fn push_users(&self, users: &[UserRecord]) -> ClientResult<IngestAck> {
        self.batches.lock().unwrap().push(users.len());
        Ok(IngestAck {
            success: true,
            users_processed: users.len() as u64,
        })
    }
}
