use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};

use super::{CartResponse, FlashSource, RenderError, ResponseRenderer, templates, with_flashes};
use crate::controller::SUMMARY_TEMPLATE;

/// A compiled-in template: context in, markup out.
pub type TemplateFn = fn(&Value) -> Result<String, RenderError>;

/// Named templates available to [`HtmlRenderer`].
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateFn>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the cart templates installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SUMMARY_TEMPLATE, templates::cart_summary);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, template: TemplateFn) {
        self.templates.insert(name.into(), template);
    }

    pub fn get(&self, name: &str) -> Option<TemplateFn> {
        self.templates.get(name).copied()
    }
}

/// Renders registered HTML templates.
///
/// Adds two entries to every context: `links` (action URLs under the summary path)
/// and, when a flash source is attached, `flashes` (drained for this render).
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    templates: Arc<TemplateRegistry>,
    links: Value,
    flashes: Option<FlashSource>,
}

impl HtmlRenderer {
    pub fn new(templates: Arc<TemplateRegistry>, summary_path: &str) -> Self {
        let base = summary_path.trim_end_matches('/');
        Self {
            templates,
            links: json!({
                "summary": summary_path,
                "clear": format!("{base}/clear"),
                "add_item": format!("{base}/items"),
                "items": format!("{base}/items"),
            }),
            flashes: None,
        }
    }

    pub fn with_flashes(mut self, flashes: FlashSource) -> Self {
        self.flashes = Some(flashes);
        self
    }
}

impl ResponseRenderer for HtmlRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<CartResponse, RenderError> {
        let render = self
            .templates
            .get(template)
            .ok_or_else(|| RenderError::TemplateNotFound(template.to_string()))?;

        let mut context = with_flashes(self.flashes.as_ref(), context)?;
        if let Value::Object(map) = &mut context {
            map.insert("links".to_string(), self.links.clone());
        }

        let body = render(&context)?;
        Ok(CartResponse::html(template, body))
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
