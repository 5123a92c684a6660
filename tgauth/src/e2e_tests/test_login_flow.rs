//! Test the full login → cookie → authenticated request cycle.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_login_sets_cookie_and_redirects_home() {
    let server = TestServer::at(AUTH_DATE + 60);

    let response = server.login(&signed_fields(AUTH_DATE));

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/"));
    let cookie = session_cookie(&response).expect("session cookie issued");
    assert!(cookie.starts_with("tg_auth="));
    assert_eq!(cookie_attribute(&response, "Path").as_deref(), Some("/"));
    assert_eq!(cookie_attribute(&response, "Max-Age").as_deref(), Some("86400"));
}

#[test]
fn test_session_cookie_grants_access() {
    let server = TestServer::at(AUTH_DATE + 60);
    let login = server.login(&signed_fields(AUTH_DATE));
    let cookie = session_cookie(&login).expect("session cookie issued");

    let response = server.visit_index(Some(&cookie));

    assert_ok(&response);
    let body = server.body_text(response);
    assert!(body.contains("Welcome, John"), "body: {body}");
}

#[test]
fn test_cookie_among_other_cookies() {
    let server = TestServer::at(AUTH_DATE + 60);
    let login = server.login(&signed_fields(AUTH_DATE));
    let cookie = session_cookie(&login).expect("session cookie issued");

    let response = server.visit_index(Some(&format!("theme=dark; {cookie}; lang=en")));
    assert_ok(&response);
}

#[test]
fn test_index_without_cookie_redirects_to_login() {
    let server = TestServer::at(AUTH_DATE);
    let response = server.visit_index(None);
    assert_redirects_to_login(&response);
}

#[test]
fn test_login_with_bad_hash_is_rejected() {
    let server = TestServer::at(AUTH_DATE);
    let mut fields = signed_fields(AUTH_DATE);
    fields.insert("username", "mallory");

    let response = server.login(&fields);

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());
}

#[test]
fn test_login_without_hash_is_rejected() {
    let server = TestServer::at(AUTH_DATE);
    let mut fields = signed_fields(AUTH_DATE);
    fields.remove("hash");

    let response = server.login(&fields);
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_login_with_stale_assertion_is_rejected() {
    let server = TestServer::at(AUTH_DATE + 4 * DAY_SECS);
    let response = server.login(&signed_fields(AUTH_DATE));
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_signed_session_without_display_name_redirects() {
    let server = TestServer::at(AUTH_DATE);
    let mut fields = signed_fields(AUTH_DATE);
    fields.remove("username");
    fields.remove("first_name");
    sign(&mut fields);

    let login = server.login(&fields);
    let cookie = session_cookie(&login).expect("signature alone is enough to log in");

    let response = server.visit_index(Some(&cookie));
    assert_redirects_to_login(&response);
}

#[test]
fn test_login_page_embeds_widget() {
    let server = TestServer::at(AUTH_DATE);
    let html = server.visit_login_page();

    assert!(html.contains(r#"data-telegram-login="test_bot""#));
    assert!(html.contains(r#"data-auth-url="http://tgauth.test/check-auth""#));
}
