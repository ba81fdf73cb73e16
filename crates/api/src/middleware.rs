use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};

use cartkit_core::SessionId;

use crate::context::SessionContext;

#[derive(Clone)]
pub struct SessionState {
    pub cookie_name: Arc<str>,
}

impl SessionState {
    pub fn new(cookie_name: &str) -> Self {
        Self {
            cookie_name: Arc::from(cookie_name),
        }
    }
}

/// Resolve (or mint) the shopper session and expose it as [`SessionContext`].
///
/// A missing or malformed session cookie starts a new session; the cookie for it is
/// set on the way out.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let existing = read_cookie(req.headers(), &state.cookie_name)
        .and_then(|raw| raw.parse::<SessionId>().ok());

    let ctx = match existing {
        Some(session_id) => SessionContext::new(session_id, false),
        None => SessionContext::new(SessionId::new(), true),
    };
    req.extensions_mut().insert(ctx);

    let mut res = next.run(req).await;

    if ctx.is_new() {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            state.cookie_name,
            ctx.session_id()
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                res.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("session cookie not set: {e}"),
        }
    }

    res
}

fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value.trim())
        })
}
