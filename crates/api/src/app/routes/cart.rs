use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use cartkit_cart::{CartOperator, CartProvider, FormSubmission};
use cartkit_core::CartItemId;

use crate::app::services::{CartServices, ScopedCartHandler};
use crate::app::{dto, errors};
use crate::context::{ResponseFormat, SessionContext};
use crate::controller::{CartResponse, HandlerError};

/// Routes mounted under the configured summary path.
pub fn router() -> Router {
    Router::new()
        .route("/", get(show_summary).post(save_summary))
        .route("/clear", post(clear_cart))
        .route("/items", post(add_item))
        .route("/items/:id/remove", post(remove_item))
}

impl IntoResponse for CartResponse {
    fn into_response(self) -> Response {
        match self {
            CartResponse::Rendered {
                content_type, body, ..
            } => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response(),
            CartResponse::Redirect { location, .. } => Redirect::to(&location).into_response(),
        }
    }
}

fn scoped_handler(
    services: &CartServices,
    session: SessionContext,
    headers: &HeaderMap,
) -> Result<ScopedCartHandler, Response> {
    services
        .handler(session.session_id(), ResponseFormat::from_headers(headers))
        .map_err(|e| errors::handler_error_to_response(HandlerError::from(e)))
}

fn respond(result: Result<CartResponse, HandlerError>) -> Response {
    match result {
        Ok(response) => response.into_response(),
        Err(e) => errors::handler_error_to_response(e),
    }
}

pub async fn show_summary(
    Extension(services): Extension<Arc<CartServices>>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
) -> Response {
    let handler = match scoped_handler(&services, session, &headers) {
        Ok(h) => h,
        Err(res) => return res,
    };

    respond(handler.show_summary())
}

pub async fn save_summary(
    Extension(services): Extension<Arc<CartServices>>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
    Form(submission): Form<FormSubmission>,
) -> Response {
    let handler = match scoped_handler(&services, session, &headers) {
        Ok(h) => h,
        Err(res) => return res,
    };

    respond(handler.save_summary(&submission))
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<CartServices>>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
) -> Response {
    let handler = match scoped_handler(&services, session, &headers) {
        Ok(h) => h,
        Err(res) => return res,
    };

    respond(handler.clear_cart())
}

pub async fn add_item(
    Extension(services): Extension<Arc<CartServices>>,
    Extension(session): Extension<SessionContext>,
    Form(body): Form<dto::AddItemRequest>,
) -> Response {
    let provider = services.provider(session.session_id());
    let operator = services.operator(session.session_id());

    let mut cart = match provider.current_cart() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let sku = body.sku.clone();
    if let Err(e) = operator.add_item(&mut cart, body.into()) {
        return errors::domain_error_to_response(e);
    }
    operator.refresh(&mut cart);
    if let Err(e) = operator.save(&mut cart) {
        return errors::domain_error_to_response(e);
    }

    tracing::info!(session = %session.session_id(), sku = %sku, "item added to cart");
    Redirect::to(services.summary_path()).into_response()
}

pub async fn remove_item(
    Extension(services): Extension<Arc<CartServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Response {
    let item_id: CartItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    let provider = services.provider(session.session_id());
    let operator = services.operator(session.session_id());

    let mut cart = match provider.current_cart() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = operator.remove_item(&mut cart, &item_id) {
        return errors::domain_error_to_response(e);
    }
    operator.refresh(&mut cart);
    if let Err(e) = operator.save(&mut cart) {
        return errors::domain_error_to_response(e);
    }

    tracing::info!(session = %session.session_id(), item = %item_id, "item removed from cart");
    Redirect::to(services.summary_path()).into_response()
}
