//! Axum extractors for node-to-node request authentication

use crate::ApiError;
use crate::app_state::AppState;

use idhub_auth::{CallerHeaders, authorize_brand, authorize_governing};
use idhub_config::NodeRole;
use idhub_core::SiteRegistration;
use idhub_db::SiteRegistrationRepository;

use std::future::Future;
use std::panic::Location;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use error_location::ErrorLocation;

/// Authenticates the calling node from the `X-Access-Token`, `Origin` and
/// `User-Agent` headers.
///
/// On a governing node the token must be the api_key of the registration the
/// other headers identify; that registration is carried along so handlers
/// know which brand node is calling. On a brand node the token must be the
/// configured shared secret.
pub struct AuthenticatedCaller {
    /// The matched registration; only present on a governing node.
    pub site: Option<SiteRegistration>,
}

impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let headers = &parts.headers;
            let caller = CallerHeaders {
                token: header_str(headers, "X-Access-Token"),
                origin: header_str(headers, "Origin"),
                user_agent: header_str(headers, "User-Agent"),
            };

            match state.config.node.role {
                NodeRole::Governing => {
                    let registrations = SiteRegistrationRepository::new(state.pool.clone())
                        .list()
                        .await?;
                    let site = authorize_governing(caller, &registrations)?;
                    Ok(AuthenticatedCaller {
                        site: Some(site.clone()),
                    })
                }
                NodeRole::Brand => {
                    let Some(secret) = state.config.node.shared_secret.as_deref() else {
                        return Err(ApiError::Internal {
                            message: "Shared secret is not configured".to_string(),
                            location: ErrorLocation::from(Location::caller()),
                        });
                    };
                    authorize_brand(caller.token, secret)?;
                    Ok(AuthenticatedCaller { site: None })
                }
            }
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
