//! HTTP handlers for the demo server.
//!
//! Three routes: a login page embedding the Telegram widget, the callback the
//! widget redirects to, and an index page that requires a session.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

use crate::auth::{IdentityFields, TelegramAuth};
use crate::config::ServerConfig;

pub const INDEX_PAGE: &str = "/";
pub const AUTH_PAGE: &str = "/auth";
pub const CHECK_AUTH_PAGE: &str = "/check-auth";

#[derive(Clone)]
pub struct AppState {
    /// Injected so tests can swap in a fake.
    pub auth: Arc<dyn TelegramAuth>,
    pub config: Arc<ServerConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(INDEX_PAGE, get(handle_index))
        .route(AUTH_PAGE, get(handle_login_page))
        .route(CHECK_AUTH_PAGE, get(handle_check_auth))
        .with_state(state)
}

/// Widget callback: verify the query fields, then store them in the session cookie.
pub async fn handle_check_auth(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let fields = IdentityFields::from_multi(pairs.into_iter().map(|(key, value)| (key, [value])));

    if let Err(e) = state.auth.check_auth(&fields) {
        tracing::warn!("rejected login assertion: {e}");
        return (StatusCode::UNAUTHORIZED, "Invalid auth").into_response();
    }

    let mut headers = HeaderMap::new();
    if let Err(e) = state.auth.set_cookie(&mut headers, &fields) {
        tracing::error!("failed to set session cookie: {e}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    tracing::debug!("login accepted, session cookie issued");
    (headers, Redirect::to(INDEX_PAGE)).into_response()
}

pub async fn handle_login_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html><head><title>Telegram Login</title></head>
<body><h1>Hello, anonymous!</h1>
<script async src="https://telegram.org/js/telegram-widget.js?22" data-telegram-login="{bot}" data-size="large" data-auth-url="http://{domain}{check}" data-request-access="write"></script>
</body></html>"#,
        bot = escape_html(&state.config.bot_name),
        domain = escape_html(&state.config.domain),
        check = CHECK_AUTH_PAGE,
    ))
}

/// Welcome page; anyone without a valid session goes back to the login page.
pub async fn handle_index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let fields = match state.auth.params_from_cookie(&headers) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::info!("unable to get params from cookie: {e}");
            return Redirect::to(AUTH_PAGE).into_response();
        }
    };

    // The cookie is not signed, so the fields are checked on every request.
    if let Err(e) = state.auth.check_auth(&fields) {
        tracing::info!("session rejected: {e}");
        return Redirect::to(AUTH_PAGE).into_response();
    }

    match state.auth.user_info(&fields) {
        Ok(identity) => {
            let name = identity.first_name.as_deref().unwrap_or(&identity.username);
            Html(format!(
                "<html><body><h1>Welcome, {}</h1></body></html>",
                escape_html(name)
            ))
            .into_response()
        }
        Err(e) => {
            tracing::info!("session has no usable identity: {e}");
            Redirect::to(AUTH_PAGE).into_response()
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("John"), "John");
    }
}
