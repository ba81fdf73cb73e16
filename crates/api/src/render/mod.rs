//! Response rendering: turns a template name + JSON context into a response.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use cartkit_cart::FlashStore;
use cartkit_core::{DomainError, SessionId};

mod html;
mod json;
mod templates;

pub use html::{HtmlRenderer, TemplateFn, TemplateRegistry, escape_html};
pub use json::JsonRenderer;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// What a cart action produced, independent of the HTTP framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartResponse {
    Rendered {
        template: String,
        content_type: &'static str,
        body: String,
    },
    Redirect {
        route: &'static str,
        location: String,
    },
}

impl CartResponse {
    pub fn html(template: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Rendered {
            template: template.into(),
            content_type: HTML_CONTENT_TYPE,
            body: body.into(),
        }
    }

    pub fn json(template: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Rendered {
            template: template.into(),
            content_type: JSON_CONTENT_TYPE,
            body: body.into(),
        }
    }

    pub fn redirect(route: &'static str, location: impl Into<String>) -> Self {
        Self::Redirect {
            route,
            location: location.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template `{template}` failed: {message}")]
    Template { template: String, message: String },

    #[error("render context: {0}")]
    Context(#[from] serde_json::Error),

    #[error("flash messages unavailable: {0}")]
    Flashes(#[from] DomainError),
}

/// Renders a named template with a data context.
pub trait ResponseRenderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<CartResponse, RenderError>;
}

impl<R> ResponseRenderer for Arc<R>
where
    R: ResponseRenderer + ?Sized,
{
    fn render(&self, template: &str, context: &Value) -> Result<CartResponse, RenderError> {
        (**self).render(template, context)
    }
}

/// Session flash queue a renderer drains into its output.
#[derive(Clone)]
pub struct FlashSource {
    store: Arc<dyn FlashStore>,
    session: SessionId,
}

impl FlashSource {
    pub fn new(store: Arc<dyn FlashStore>, session: SessionId) -> Self {
        Self { store, session }
    }

    /// Copy of `context` with a `flashes` entry holding the drained messages.
    fn inject(&self, context: &Value) -> Result<Value, RenderError> {
        let flashes = self.store.drain(&self.session)?;
        let mut context = context.clone();
        if let Value::Object(map) = &mut context {
            map.insert("flashes".to_string(), serde_json::to_value(flashes)?);
        }
        Ok(context)
    }
}

impl core::fmt::Debug for FlashSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlashSource")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn with_flashes(flashes: Option<&FlashSource>, context: &Value) -> Result<Value, RenderError> {
    match flashes {
        Some(source) => source.inject(context),
        None => Ok(context.clone()),
    }
}
