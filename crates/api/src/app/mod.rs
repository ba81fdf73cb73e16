//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared stores and the per-request cart handler scope
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    let services = Arc::new(services::CartServices::new(config));
    let session_state = middleware::SessionState::new(&config.session_cookie);

    // Cart routes: require a shopper session.
    let cart = Router::new()
        .nest(&config.summary_path, routes::cart::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    session_state,
                    middleware::session_middleware,
                ))
                .layer(Extension(services)),
        );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(cart)
}
