use crate::{AuthError, CallerHeaders, authorize_brand, authorize_governing, constant_time_eq};

use idhub_core::SiteRegistration;

fn registrations() -> Vec<SiteRegistration> {
    vec![
        SiteRegistration::new(
            "Shop A".to_string(),
            "https://a.example.com/",
            "key-a".to_string(),
        ),
        SiteRegistration::new(
            "Shop B".to_string(),
            "https://b.example.com",
            "key-b".to_string(),
        ),
    ]
}

#[test]
fn given_equal_tokens_when_compared_then_true() {
    assert!(constant_time_eq("secret-token", "secret-token"));
    assert!(!constant_time_eq("secret-token", "secret-tokex"));
    assert!(!constant_time_eq("short", "much-longer-token"));
}

#[test]
fn given_matching_origin_and_key_when_authorized_then_registration_returned() {
    let regs = registrations();
    let caller = CallerHeaders {
        token: Some("key-a"),
        origin: Some("https://a.example.com"),
        user_agent: None,
    };

    let matched = authorize_governing(caller, &regs).unwrap();
    assert_eq!(matched.name, "Shop A");
}

#[test]
fn given_site_url_in_user_agent_when_authorized_then_matches() {
    let regs = registrations();
    let caller = CallerHeaders {
        token: Some("key-b"),
        origin: None,
        user_agent: Some("idhub-sync; https://b.example.com"),
    };

    let matched = authorize_governing(caller, &regs).unwrap();
    assert_eq!(matched.name, "Shop B");
}

#[test]
fn given_missing_token_when_authorized_then_missing_token_error() {
    let regs = registrations();
    let caller = CallerHeaders {
        token: None,
        origin: Some("https://a.example.com"),
        user_agent: None,
    };

    let result = authorize_governing(caller, &regs);
    assert!(matches!(result, Err(AuthError::MissingToken { .. })));
}

#[test]
fn given_unknown_origin_when_authorized_then_unknown_caller_error() {
    let regs = registrations();
    let caller = CallerHeaders {
        token: Some("key-a"),
        origin: Some("https://evil.example.com"),
        user_agent: Some("plain agent"),
    };

    let result = authorize_governing(caller, &regs);
    assert!(matches!(result, Err(AuthError::UnknownCaller { .. })));
}

#[test]
fn given_wrong_key_for_matched_site_when_authorized_then_invalid_token_error() {
    let regs = registrations();
    let caller = CallerHeaders {
        token: Some("key-b"),
        origin: Some("https://a.example.com"),
        user_agent: None,
    };

    let result = authorize_governing(caller, &regs);
    assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
}

#[test]
fn given_shared_secret_when_brand_authorized_then_exact_match_required() {
    assert!(authorize_brand(Some("hub-secret"), "hub-secret").is_ok());
    assert!(matches!(
        authorize_brand(Some("wrong"), "hub-secret"),
        Err(AuthError::InvalidToken { .. })
    ));
    assert!(matches!(
        authorize_brand(None, "hub-secret"),
        Err(AuthError::MissingToken { .. })
    ));
}
