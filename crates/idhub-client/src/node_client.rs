use crate::types::{DecisionAck, IngestAck, RemoteRequestPage};
use crate::{ClientError, Result as ClientResult};

use idhub_core::UserRecord;

use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde_json::Value;

/// HTTP client for calls between nodes.
///
/// Carries the shared credential in X-Access-Token and identifies the
/// calling site through the Origin header and a User-Agent containing the
/// site URL, which is what the remote side matches registrations against.
pub struct NodeClient {
    pub base_url: String,
    token: String,
    self_site_url: String,
    client: ReqwestClient,
}

impl NodeClient {
    /// # Arguments
    /// * `base_url` - Remote node URL (e.g., "https://hub.example.com")
    /// * `token` - Shared credential expected by the remote node
    /// * `self_site_url` - This node's own URL, sent as the caller identity
    /// * `timeout` - Per-request deadline
    pub fn new(
        base_url: &str,
        token: &str,
        self_site_url: &str,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            self_site_url: self_site_url.to_string(),
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("X-Access-Token", &self.token)
            .header("Origin", &self.self_site_url)
            .header(
                "User-Agent",
                format!(
                    "idhub/{}; {}",
                    env!("CARGO_PKG_VERSION"),
                    self.self_site_url
                ),
            )
    }

    /// Execute a request, surfacing `{error: {code, message}}` bodies and
    /// bare non-success statuses as Api errors.
    async fn execute(&self, req: reqwest::RequestBuilder) -> ClientResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            let (code, message) = match body.get("error") {
                Some(error) => (
                    error
                        .get("code")
                        .and_then(|v| v.as_str())
                        .unwrap_or("UNKNOWN")
                        .to_string(),
                    error
                        .get("message")
                        .and_then(|v| v.as_str())
                        .unwrap_or("Unknown error")
                        .to_string(),
                ),
                None => ("UNKNOWN".to_string(), format!("HTTP {}", status.as_u16())),
            };
            return Err(ClientError::Api {
                code,
                message,
                status: status.as_u16(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(body)
    }

    /// `GET /health-check`: used to vet a registration before accepting it.
    pub async fn health_check(&self) -> ClientResult<bool> {
        let req = self.request(Method::GET, "/health-check");
        let body = self.execute(req).await?;
        Ok(body.get("success").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Push one batch of user records to the governing node's ingest
    /// endpoint. Success means HTTP 200 with `success: true`.
    pub async fn push_users(&self, users: &[UserRecord]) -> ClientResult<IngestAck> {
        #[derive(Serialize)]
        struct PushBody<'a> {
            users: &'a [UserRecord],
        }

        let req = self
            .request(Method::POST, "/deduplicated-users")
            .json(&PushBody { users });
        let body = self.execute(req).await?;

        serde_json::from_value(body).map_err(|e| ClientError::malformed(e.to_string()))
    }

    /// Fetch one page of a brand node's local change-request listing.
    ///
    /// The body must carry a `profile_requests` array; anything else is a
    /// malformed response, reported as such rather than an empty page.
    pub async fn fetch_profile_requests(
        &self,
        status: Option<&str>,
        search: Option<&str>,
        cursor: Option<i64>,
    ) -> ClientResult<RemoteRequestPage> {
        let mut req = self.request(Method::GET, "/brand-profile-requests");
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }
        if let Some(search) = search {
            req = req.query(&[("search", search)]);
        }
        if let Some(cursor) = cursor {
            req = req.query(&[("cursor", cursor.to_string())]);
        }

        let body = self.execute(req).await?;

        if !body
            .get("profile_requests")
            .map(Value::is_array)
            .unwrap_or(false)
        {
            return Err(ClientError::malformed(
                "response has no profile_requests array",
            ));
        }

        serde_json::from_value(body).map_err(|e| ClientError::malformed(e.to_string()))
    }

    /// Forward an approval to the brand node that owns the request.
    pub async fn approve(&self, request_id: &str) -> ClientResult<DecisionAck> {
        self.decide("/profile-requests/approve", request_id, None)
            .await
    }

    /// Forward a rejection, comment included.
    pub async fn reject(&self, request_id: &str, comment: &str) -> ClientResult<DecisionAck> {
        self.decide("/profile-requests/reject", request_id, Some(comment))
            .await
    }

    async fn decide(
        &self,
        path: &str,
        request_id: &str,
        comment: Option<&str>,
    ) -> ClientResult<DecisionAck> {
        #[derive(Serialize)]
        struct DecisionBody<'a> {
            request_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            comment: Option<&'a str>,
        }

        let req = self.request(Method::POST, path).json(&DecisionBody {
            request_id,
            comment,
        });
        let body = self.execute(req).await?;

        serde_json::from_value(body).map_err(|e| ClientError::malformed(e.to_string()))
    }
}
