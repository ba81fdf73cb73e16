use serde_json::Value;

use super::{CartResponse, FlashSource, RenderError, ResponseRenderer, with_flashes};

/// Serialises the render context itself; used for `Accept: application/json`.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    flashes: Option<FlashSource>,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flashes(mut self, flashes: FlashSource) -> Self {
        self.flashes = Some(flashes);
        self
    }
}

impl ResponseRenderer for JsonRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<CartResponse, RenderError> {
        let context = with_flashes(self.flashes.as_ref(), context)?;
        Ok(CartResponse::json(template, serde_json::to_string(&context)?))
    }
}
