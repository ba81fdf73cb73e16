//! Cart controller: summary, save and clear actions.
//!
//! The handler never persists or clears a cart itself. It resolves the current cart,
//! binds the summary form, and announces intent through the dispatcher; whatever
//! listeners are registered for `cart.save.initialize` / `cart.clear.initialize`
//! do the actual work before the matching `*.completed` event fires.

use thiserror::Error;

use cartkit_cart::{
    CART_CLEAR_COMPLETED, CART_CLEAR_INITIALIZE, CART_FORM, CART_SAVE_COMPLETED,
    CART_SAVE_INITIALIZE, Cart, CartEvent, CartForm, CartLifecycleEvent, CartProvider, FlashEvent,
    FormBinder, FormSubmission,
};
use cartkit_core::{DomainError, Entity};
use cartkit_events::{DispatchError, EventDispatcher};

pub use crate::render::CartResponse;
use crate::render::{RenderError, ResponseRenderer};

/// Template used by the summary and save actions.
pub const SUMMARY_TEMPLATE: &str = "cart/summary.html";

/// Named route the clear action redirects to.
pub const SUMMARY_ROUTE: &str = "cart_summary";

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Cart(#[from] DomainError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// A listener swapped the cart payload for something else.
    #[error("listeners for `{0}` replaced the cart payload")]
    PayloadReplaced(&'static str),
}

/// Cart actions over four injected collaborators.
#[derive(Debug)]
pub struct CartActionHandler<P, F, D, R> {
    provider: P,
    forms: F,
    dispatcher: D,
    renderer: R,
    summary_location: String,
}

impl<P, F, D, R> CartActionHandler<P, F, D, R>
where
    P: CartProvider,
    F: FormBinder,
    D: EventDispatcher<CartLifecycleEvent>,
    R: ResponseRenderer,
{
    pub fn new(
        provider: P,
        forms: F,
        dispatcher: D,
        renderer: R,
        summary_location: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            forms,
            dispatcher,
            renderer,
            summary_location: summary_location.into(),
        }
    }

    /// Render the current cart with its (unsubmitted) summary form.
    pub fn show_summary(&self) -> Result<CartResponse, HandlerError> {
        let cart = self.provider.current_cart()?;
        let form = self.forms.create_form(CART_FORM, &cart)?;

        self.render_summary(&cart, &form)
    }

    /// Bind the submitted summary form; on success announce the save.
    ///
    /// Either both save events fire (initialize, then completed) or none do. The
    /// summary is re-rendered in both cases, showing the cart as the
    /// `cart.save.initialize` listeners left it.
    pub fn save_summary(&self, submission: &FormSubmission) -> Result<CartResponse, HandlerError> {
        let mut cart = self.provider.current_cart()?;
        let mut form = self.forms.create_form(CART_FORM, &cart)?;

        if form.bind(&mut cart, submission).is_valid() {
            let mut event = CartLifecycleEvent::from(CartEvent::new(cart).with_fresh(true));
            self.dispatcher.dispatch(CART_SAVE_INITIALIZE, &mut event)?;
            self.dispatcher
                .dispatch(CART_SAVE_COMPLETED, &mut CartLifecycleEvent::from(FlashEvent::new()))?;

            cart = event
                .into_cart_event()
                .map(CartEvent::into_cart)
                .ok_or(HandlerError::PayloadReplaced(CART_SAVE_INITIALIZE))?;
            tracing::info!(cart = %cart.id(), total = cart.total(), "cart summary saved");
        } else {
            tracing::info!(cart = %cart.id(), "cart summary form rejected");
        }

        self.render_summary(&cart, &form)
    }

    /// Announce the clear, then redirect to the summary.
    pub fn clear_cart(&self) -> Result<CartResponse, HandlerError> {
        let cart = self.provider.current_cart()?;
        let cart_id = *cart.id();

        let mut event = CartLifecycleEvent::from(CartEvent::new(cart));
        self.dispatcher.dispatch(CART_CLEAR_INITIALIZE, &mut event)?;
        self.dispatcher
            .dispatch(CART_CLEAR_COMPLETED, &mut CartLifecycleEvent::from(FlashEvent::new()))?;

        tracing::info!(cart = %cart_id, "cart cleared");
        Ok(CartResponse::redirect(SUMMARY_ROUTE, self.summary_location.clone()))
    }

    fn render_summary(&self, cart: &Cart, form: &CartForm) -> Result<CartResponse, HandlerError> {
        let mut context = serde_json::Map::new();
        context.insert("cart".to_string(), serde_json::to_value(cart).map_err(RenderError::from)?);
        context.insert(
            "form".to_string(),
            serde_json::to_value(form.view()).map_err(RenderError::from)?,
        );

        Ok(self
            .renderer
            .render(SUMMARY_TEMPLATE, &serde_json::Value::Object(context))?)
    }
}
