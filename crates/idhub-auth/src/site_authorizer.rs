//! Shared-secret request authorization for node-to-node calls.
//!
//! A governing node authorizes callers against its registration table: the
//! token must equal the api_key of a registration whose URL matches the
//! request Origin or appears inside the User-Agent. A brand node authorizes
//! against its single configured shared secret.

use crate::{AuthError, Result as AuthErrorResult};

use idhub_core::{SiteRegistration, normalize_site_url, urls_match};

use std::panic::Location;

use error_location::ErrorLocation;
use subtle::ConstantTimeEq;

/// The identifying headers of an inbound node-to-node request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerHeaders<'a> {
    pub token: Option<&'a str>,
    pub origin: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

/// Compares tokens without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Authorize a call into a governing node.
///
/// Returns the matched registration so handlers know which brand node is
/// calling. The token comparison runs even against a matched registration
/// only, never against the whole table, so an attacker cannot probe api_keys
/// of sites it cannot impersonate at the header level.
#[track_caller]
pub fn authorize_governing<'a>(
    caller: CallerHeaders<'_>,
    registrations: &'a [SiteRegistration],
) -> AuthErrorResult<&'a SiteRegistration> {
    let token = caller.token.ok_or(AuthError::MissingToken {
        location: ErrorLocation::from(Location::caller()),
    })?;

    let registration = registrations
        .iter()
        .find(|r| caller_matches(&caller, &r.url))
        .ok_or(AuthError::UnknownCaller {
            location: ErrorLocation::from(Location::caller()),
        })?;

    if !constant_time_eq(token, &registration.api_key) {
        return Err(AuthError::InvalidToken {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(registration)
}

/// Authorize a call into a brand node against its configured shared secret.
#[track_caller]
pub fn authorize_brand(token: Option<&str>, shared_secret: &str) -> AuthErrorResult<()> {
    let token = token.ok_or(AuthError::MissingToken {
        location: ErrorLocation::from(Location::caller()),
    })?;

    if !constant_time_eq(token, shared_secret) {
        return Err(AuthError::InvalidToken {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(())
}

fn caller_matches(caller: &CallerHeaders<'_>, site_url: &str) -> bool {
    if let Some(origin) = caller.origin
        && urls_match(origin, site_url)
    {
        return true;
    }

    if let Some(user_agent) = caller.user_agent
        && user_agent.contains(&normalize_site_url(site_url))
    {
        return true;
    }

    false
}
