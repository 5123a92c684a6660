//! Test how cookie lifetime and assertion freshness interact.
//!
//! The cookie's `Max-Age` and the `auth_date` freshness window are independent.
//! Only the freshness window is enforced by the server; the cookie lifetime is
//! a hint to the browser. These tests pin both sides of the gap.

use crate::auth::{AuthError, TelegramAuth, decode};
use crate::e2e_tests::helpers::*;

#[test]
fn test_session_valid_until_assertion_is_a_day_old() {
    let login_server = TestServer::at(AUTH_DATE);
    let cookie = session_cookie(&login_server.login(&signed_fields(AUTH_DATE)))
        .expect("session cookie issued");

    let later = TestServer::at(AUTH_DATE + DAY_SECS);
    assert_ok(&later.visit_index(Some(&cookie)));

    let too_late = TestServer::at(AUTH_DATE + DAY_SECS + 1);
    assert_redirects_to_login(&too_late.visit_index(Some(&cookie)));
}

#[test]
fn test_long_cookie_does_not_extend_session() {
    let config = auth_config().with_session_ttl(secs(7 * DAY_SECS));
    let login_server = TestServer::with_config(config.clone(), AUTH_DATE);
    let login = login_server.login(&signed_fields(AUTH_DATE));
    let cookie = session_cookie(&login).expect("session cookie issued");
    assert_eq!(
        cookie_attribute(&login, "Max-Age").as_deref(),
        Some("604800")
    );

    // The browser still holds the cookie two days later, but the assertion is stale.
    let later = TestServer::with_config(config, AUTH_DATE + 2 * DAY_SECS);
    let (_, token) = cookie.split_once('=').expect("name=value");
    let fields = decode(token).expect("token decodes");
    assert!(matches!(
        later.state.auth.check_auth(&fields),
        Err(AuthError::Expired { .. })
    ));
    assert_redirects_to_login(&later.visit_index(Some(&cookie)));
}

#[test]
fn test_short_cookie_does_not_shorten_session() {
    let config = auth_config().with_session_ttl(secs(60 * 60));
    let login_server = TestServer::with_config(config.clone(), AUTH_DATE);
    let login = login_server.login(&signed_fields(AUTH_DATE));
    let cookie = session_cookie(&login).expect("session cookie issued");
    assert_eq!(cookie_attribute(&login, "Max-Age").as_deref(), Some("3600"));

    // A client that keeps the cookie past Max-Age is still let in.
    let later = TestServer::with_config(config, AUTH_DATE + 2 * 60 * 60);
    assert_ok(&later.visit_index(Some(&cookie)));
}

#[test]
fn test_custom_freshness_window() {
    let config = auth_config().with_max_age(secs(60 * 60));
    let fields = signed_fields(AUTH_DATE);

    let within = TestServer::with_config(config.clone(), AUTH_DATE + 60 * 60);
    assert!(within.state.auth.check_auth(&fields).is_ok());

    let outside = TestServer::with_config(config, AUTH_DATE + 60 * 60 + 1);
    assert_eq!(
        outside.state.auth.check_auth(&fields),
        Err(AuthError::Expired {
            auth_date: AUTH_DATE,
            oldest_accepted: AUTH_DATE + 1,
        })
    );
}
