use serde::Deserialize;

use cartkit_cart::NewCartItem;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub sku: String,
    pub name: Option<String>,
    pub unit_price: u64,
    pub quantity: Option<u32>,
}

impl From<AddItemRequest> for NewCartItem {
    fn from(value: AddItemRequest) -> Self {
        let name = value.name.unwrap_or_else(|| value.sku.clone());
        NewCartItem {
            sku: value.sku,
            name,
            quantity: value.quantity.unwrap_or(1),
            unit_price: value.unit_price,
        }
    }
}
