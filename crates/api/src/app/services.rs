//! Shared stores plus the per-request cart scope.
//!
//! Stores live for the whole process. Everything session-bound (provider, operator,
//! listeners, renderer) is assembled per request by [`CartServices::handler`].

use std::sync::Arc;

use chrono::Duration;

use cartkit_cart::{
    CartFormBinder, CartLifecycleEvent, FlashStore, InMemoryCartStore, InMemoryFlashStore,
    SessionCartProvider, StoreCartOperator, register_cart_listeners,
};
use cartkit_core::SessionId;
use cartkit_events::{DispatchError, SyncEventDispatcher};

use crate::config::ApiConfig;
use crate::context::ResponseFormat;
use crate::controller::CartActionHandler;
use crate::render::{FlashSource, HtmlRenderer, JsonRenderer, ResponseRenderer, TemplateRegistry};

pub type SessionCartStore = Arc<InMemoryCartStore>;

/// Cart handler wired for one session.
pub type ScopedCartHandler = CartActionHandler<
    SessionCartProvider<SessionCartStore>,
    CartFormBinder,
    SyncEventDispatcher<CartLifecycleEvent>,
    Arc<dyn ResponseRenderer>,
>;

#[derive(Debug)]
pub struct CartServices {
    carts: SessionCartStore,
    flashes: Arc<InMemoryFlashStore>,
    templates: Arc<TemplateRegistry>,
    forms: CartFormBinder,
    cart_ttl: Duration,
    summary_path: String,
}

impl CartServices {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            carts: Arc::new(InMemoryCartStore::new()),
            flashes: Arc::new(InMemoryFlashStore::with_max_age(config.cart_ttl)),
            templates: Arc::new(TemplateRegistry::with_defaults()),
            forms: CartFormBinder::new(),
            cart_ttl: config.cart_ttl,
            summary_path: config.summary_path.clone(),
        }
    }

    pub fn summary_path(&self) -> &str {
        &self.summary_path
    }

    pub fn provider(&self, session: SessionId) -> SessionCartProvider<SessionCartStore> {
        SessionCartProvider::new(self.carts.clone(), session, self.cart_ttl)
    }

    pub fn operator(&self, session: SessionId) -> StoreCartOperator<SessionCartStore> {
        StoreCartOperator::new(self.carts.clone(), session, self.cart_ttl)
    }

    fn renderer(&self, session: SessionId, format: ResponseFormat) -> Arc<dyn ResponseRenderer> {
        let flashes: Arc<dyn FlashStore> = self.flashes.clone();
        let source = FlashSource::new(flashes, session);

        match format {
            ResponseFormat::Html => Arc::new(
                HtmlRenderer::new(self.templates.clone(), &self.summary_path).with_flashes(source),
            ),
            ResponseFormat::Json => Arc::new(JsonRenderer::new().with_flashes(source)),
        }
    }

    /// Assemble the cart controller for `session`.
    pub fn handler(
        &self,
        session: SessionId,
        format: ResponseFormat,
    ) -> Result<ScopedCartHandler, DispatchError> {
        let dispatcher = SyncEventDispatcher::new();
        register_cart_listeners(
            &dispatcher,
            self.operator(session),
            self.flashes.clone(),
            session,
        )?;

        Ok(CartActionHandler::new(
            self.provider(session),
            self.forms,
            dispatcher,
            self.renderer(session, format),
            self.summary_path.clone(),
        ))
    }
}
