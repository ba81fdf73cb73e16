use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartkit_core::{CartId, CartItemId, DomainError, DomainResult, Entity};

/// A line in the cart: one sku at a quantity and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    id: CartItemId,
    sku: String,
    name: String,
    quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    unit_price: u64,
    total: u64,
}

impl CartItem {
    pub fn new(
        id: CartItemId,
        sku: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        unit_price: u64,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let mut item = Self {
            id,
            sku: sku.into(),
            name: name.into(),
            quantity,
            unit_price,
            total: 0,
        };
        item.calculate_total();
        Ok(item)
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Line total as of the last [`CartItem::calculate_total`].
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Change the quantity. Totals are stale until the next refresh.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn calculate_total(&mut self) {
        self.total = u64::from(self.quantity).saturating_mul(self.unit_price);
    }
}

impl Entity for CartItem {
    type Id = CartItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
}

/// A shopper's order-in-progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    items: Vec<CartItem>,
    total_items: u32,
    total: u64,
    expires_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(id: CartId, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            items: Vec::new(),
            total_items: 0,
            total: 0,
            expires_at,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item quantities as of the last refresh.
    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Cart total as of the last refresh.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn set_expires_at(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = expires_at;
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn find_item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn find_item_mut(&mut self, id: &CartItemId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.id() == id)
    }

    pub fn find_item_by_sku_mut(&mut self, sku: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.sku() == sku)
    }

    pub fn push_item(&mut self, item: CartItem) {
        self.items.push(item);
    }

    pub fn remove_item(&mut self, id: &CartItemId) -> Option<CartItem> {
        let idx = self.items.iter().position(|i| i.id() == id)?;
        Some(self.items.remove(idx))
    }

    /// Recompute line totals, `total_items` and `total`.
    pub fn calculate_total(&mut self) {
        let mut total_items: u32 = 0;
        let mut total: u64 = 0;

        for item in &mut self.items {
            item.calculate_total();
            total_items = total_items.saturating_add(item.quantity());
            total = total.saturating_add(item.total());
        }

        self.total_items = total_items;
        self.total = total;
    }
}

impl Entity for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
