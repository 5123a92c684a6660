//! Test that handlers run against an injected fake authenticator.

use std::sync::Arc;

use crate::auth::TelegramAuth;
use crate::e2e_tests::helpers::*;
use crate::testing::{FakeTelegramAuth, fixture_fields};

#[test]
fn test_passing_fake_lets_everyone_in() {
    let server = TestServer::with_auth(Arc::new(FakeTelegramAuth::new(true, "alice")));

    let response = server.visit_index(None);

    assert_ok(&response);
    let body = server.body_text(response);
    assert!(body.contains("Welcome, alice"), "body: {body}");
}

#[test]
fn test_failing_fake_keeps_everyone_out() {
    let server = TestServer::with_auth(Arc::new(FakeTelegramAuth::new(false, "alice")));

    assert_redirects_to_login(&server.visit_index(None));
    let response = server.login(&fixture_fields());
    assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[test]
fn test_passing_fake_login_sets_no_cookie() {
    let server = TestServer::with_auth(Arc::new(FakeTelegramAuth::new(true, "alice")));

    let response = server.login(&fixture_fields());

    assert!(response.status().is_redirection());
    assert!(session_cookie(&response).is_none());
}

#[test]
fn test_fixture_fields_pass_real_verification() {
    // The fixture is a real signed assertion, usable with the real authenticator too.
    let server = TestServer::at(AUTH_DATE + 60);
    assert!(server.state.auth.check_auth(&fixture_fields()).is_ok());

    let stale = TestServer::at(AUTH_DATE + 2 * DAY_SECS);
    assert!(stale.state.auth.check_auth(&fixture_fields()).is_err());
}
