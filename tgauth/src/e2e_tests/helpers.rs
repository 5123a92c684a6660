//! Common helpers for end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

use crate::auth::{AuthConfig, IdentityFields, TelegramAuth, TelegramAuthenticator, compute_hash};
use crate::config::ServerConfig;
use crate::time::FixedTimeSource;
use crate::web::{self, AppState};

pub const BOT_TOKEN: &str = "bot_token";
pub const AUTH_DATE: i64 = 1_234_567_890;
pub const DAY_SECS: i64 = 24 * 60 * 60;

/// A demo server whose clock is frozen at a chosen instant.
pub struct TestServer {
    pub state: AppState,
    pub runtime: tokio::runtime::Runtime,
}

impl TestServer {
    /// Server backed by the real authenticator, default settings, clock at `now`.
    #[must_use]
    pub fn at(now: i64) -> Self {
        Self::with_config(auth_config(), now)
    }

    /// Server backed by the real authenticator with a custom config.
    #[must_use]
    pub fn with_config(config: AuthConfig, now: i64) -> Self {
        let auth = TelegramAuthenticator::with_clock(config, FixedTimeSource::new(now));
        Self::with_auth(Arc::new(auth))
    }

    /// Server backed by any `TelegramAuth`.
    #[must_use]
    pub fn with_auth(auth: Arc<dyn TelegramAuth>) -> Self {
        let config = ServerConfig {
            bot_name: "test_bot".to_string(),
            domain: "tgauth.test".to_string(),
            listen_port: ServerConfig::DEFAULT_PORT,
        };

        #[allow(clippy::expect_used)]
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");

        Self {
            state: AppState {
                auth,
                config: Arc::new(config),
            },
            runtime,
        }
    }

    /// Hit the widget callback with `fields` as query parameters.
    pub fn login(&self, fields: &IdentityFields) -> Response {
        let pairs = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.runtime.block_on(web::handle_check_auth(
            State(self.state.clone()),
            Query(pairs),
        ))
    }

    /// Request the index page, optionally presenting a `name=value` cookie pair.
    pub fn visit_index(&self, cookie: Option<&str>) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(pair) = cookie {
            #[allow(clippy::expect_used)]
            headers.insert(COOKIE, HeaderValue::from_str(pair).expect("valid cookie header"));
        }
        self.runtime
            .block_on(web::handle_index(State(self.state.clone()), headers))
    }

    /// Request the login page.
    pub fn visit_login_page(&self) -> String {
        let html = self
            .runtime
            .block_on(web::handle_login_page(State(self.state.clone())));
        html.0
    }

    /// Read a response body as text.
    pub fn body_text(&self, response: Response) -> String {
        let body: Body = response.into_body();
        #[allow(clippy::expect_used)]
        let bytes = self
            .runtime
            .block_on(axum::body::to_bytes(body, usize::MAX))
            .expect("body readable");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[must_use]
pub fn auth_config() -> AuthConfig {
    #[allow(clippy::expect_used)]
    AuthConfig::new(BOT_TOKEN).expect("valid bot token")
}

/// Fields for user `john`, signed with `BOT_TOKEN`, dated `auth_date`.
#[must_use]
pub fn signed_fields(auth_date: i64) -> IdentityFields {
    let mut fields = IdentityFields::from([
        ("id", "123"),
        ("first_name", "John"),
        ("username", "john"),
        ("photo_url", "http://example.com/photo.jpg"),
    ]);
    fields.insert("auth_date", auth_date.to_string());
    sign(&mut fields);
    fields
}

/// Replace the `hash` field with a correct signature.
pub fn sign(fields: &mut IdentityFields) {
    let hash = compute_hash(fields, auth_config().bot_token());
    fields.insert("hash", hash);
}

/// The `name=value` pair a browser would send back for the response's cookie.
#[must_use]
pub fn session_cookie(response: &Response) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').next().map(str::to_string)
}

/// Attribute `name` of the response's `Set-Cookie` header.
#[must_use]
pub fn cookie_attribute(response: &Response, name: &str) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').skip(1).find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(LOCATION)?.to_str().ok()
}

pub fn assert_redirects_to_login(response: &Response) {
    assert!(response.status().is_redirection(), "status {}", response.status());
    assert_eq!(location(response), Some(web::AUTH_PAGE));
}

pub fn assert_ok(response: &Response) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[must_use]
pub const fn secs(n: i64) -> Duration {
    Duration::from_secs(n.unsigned_abs())
}
