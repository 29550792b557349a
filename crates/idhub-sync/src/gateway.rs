//! Traits over the HTTP edges so the engine is testable with fakes.

use idhub_client::{
    DecisionAck, IngestAck, NodeClient, RemoteRequestPage, Result as ClientResult,
};
use idhub_core::{SiteRegistration, UserRecord};

use std::time::Duration;

use async_trait::async_trait;
use log::error;

/// A brand node's view of the governing node.
#[async_trait]
pub trait HubGateway: Send + Sync {
    async fn push_users(&self, users: &[UserRecord]) -> ClientResult<IngestAck>;
}

/// The governing node's view of one registered brand node.
#[async_trait]
pub trait NodeGateway: Send + Sync {
    async fn fetch_requests(
        &self,
        site: &SiteRegistration,
        status: Option<&str>,
        search: Option<&str>,
        cursor: Option<i64>,
    ) -> ClientResult<RemoteRequestPage>;

    async fn approve(&self, site: &SiteRegistration, request_id: &str)
    -> ClientResult<DecisionAck>;

    async fn reject(
        &self,
        site: &SiteRegistration,
        request_id: &str,
        comment: &str,
    ) -> ClientResult<DecisionAck>;

    async fn health_check(&self, site: &SiteRegistration) -> ClientResult<bool>;
}

/// Escalation hook for terminally failed sync jobs. Delivery of the
/// notification itself is out of band.
pub trait FailureNotifier: Send + Sync {
    fn notify_failure(&self, user_id: &str, attempts: i32, last_error: &str);
}

/// Default notifier: an error log line an operator can alert on.
pub struct LogNotifier;

impl FailureNotifier for LogNotifier {
    fn notify_failure(&self, user_id: &str, attempts: i32, last_error: &str) {
        error!(
            "Sync for user {} failed terminally after {} attempts: {}",
            user_id, attempts, last_error
        );
    }
}

pub struct HttpHubGateway {
    client: NodeClient,
}

impl HttpHubGateway {
    pub fn new(
        hub_url: &str,
        shared_secret: &str,
        self_site_url: &str,
        timeout: Duration,
    ) -> ClientResult<Self> {
        Ok(Self {
            client: NodeClient::new(hub_url, shared_secret, self_site_url, timeout)?,
        })
    }
}

#[async_trait]
impl HubGateway for HttpHubGateway {
    async fn push_users(&self, users: &[UserRecord]) -> ClientResult<IngestAck> {
        self.client.push_users(users).await
    }
}

/// Builds a per-site client on each call; each registration carries its own
/// api_key and URL.
pub struct HttpNodeGateway {
    self_site_url: String,
    timeout: Duration,
}

impl HttpNodeGateway {
    pub fn new(self_site_url: &str, timeout: Duration) -> Self {
        Self {
            self_site_url: self_site_url.to_string(),
            timeout,
        }
    }

    fn client_for(&self, site: &SiteRegistration) -> ClientResult<NodeClient> {
        NodeClient::new(&site.url, &site.api_key, &self.self_site_url, self.timeout)
    }
}

#[async_trait]
impl NodeGateway for HttpNodeGateway {
    async fn fetch_requests(
        &self,
        site: &SiteRegistration,
        status: Option<&str>,
        search: Option<&str>,
        cursor: Option<i64>,
    ) -> ClientResult<RemoteRequestPage> {
        self.client_for(site)?
            .fetch_profile_requests(status, search, cursor)
            .await
    }

    async fn approve(
        &self,
        site: &SiteRegistration,
        request_id: &str,
    ) -> ClientResult<DecisionAck> {
        self.client_for(site)?.approve(request_id).await
    }

    async fn reject(
        &self,
        site: &SiteRegistration,
        request_id: &str,
        comment: &str,
    ) -> ClientResult<DecisionAck> {
        self.client_for(site)?.reject(request_id, comment).await
    }

    async fn health_check(&self, site: &SiteRegistration) -> ClientResult<bool> {
        self.client_for(site)?.health_check().await
    }
}
