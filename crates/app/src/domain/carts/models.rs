//! Cart Models

use serde::{Deserialize, Serialize};

use crate::{domain::catalog::models::ProductId, uuids::TypedUuid};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_item_id: CartItemUuid,
    pub product: ProductId,
    pub quantity: u32,
}

/// NewCartItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product: ProductId,
    pub quantity: u32,
}

impl NewCartItem {
    pub fn new(product: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }
}
