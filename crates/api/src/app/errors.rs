use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cartkit_core::DomainError;

use crate::controller::HandlerError;
use crate::render::RenderError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Storage(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg),
    }
}

pub fn handler_error_to_response(err: HandlerError) -> axum::response::Response {
    match err {
        HandlerError::Cart(e) => domain_error_to_response(e),
        HandlerError::Dispatch(e) => {
            tracing::error!("cart event dispatch failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "dispatch_error", e.to_string())
        }
        HandlerError::Render(RenderError::TemplateNotFound(name)) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "template_not_found",
            name,
        ),
        HandlerError::Render(e) => {
            tracing::error!("render failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "render_error", e.to_string())
        }
        HandlerError::PayloadReplaced(event) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "payload_replaced",
            format!("listeners for `{event}` replaced the cart payload"),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
