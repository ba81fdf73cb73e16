use axum::http::{HeaderMap, header};

use cartkit_core::SessionId;

/// Session context for a request.
///
/// Inserted by the session middleware; present for every cart route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
    is_new: bool,
}

impl SessionContext {
    pub fn new(session_id: SessionId, is_new: bool) -> Self {
        Self { session_id, is_new }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The session was minted for this request (no valid cookie came in).
    pub fn is_new(&self) -> bool {
        self.is_new
    }
}

/// Representation the client asked for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Html,
    Json,
}

impl ResponseFormat {
    /// JSON only when `Accept` names `application/json` ahead of `text/html`.
    ///
    /// Listing order decides; `q` weights are not ranked, but entries with `q=0`
    /// (explicitly refused) are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
            return Self::Html;
        };

        for entry in accept.split(',') {
            let mut parts = entry.split(';');
            let media = parts.next().unwrap_or("").trim();
            if parts.any(is_refused) {
                continue;
            }
            match media {
                "text/html" | "application/xhtml+xml" => return Self::Html,
                "application/json" => return Self::Json,
                _ => {}
            }
        }

        Self::Html
    }
}

fn is_refused(param: &str) -> bool {
    param
        .trim()
        .strip_prefix("q=")
        .and_then(|q| q.trim().parse::<f32>().ok())
        .is_some_and(|q| q <= 0.0)
}
