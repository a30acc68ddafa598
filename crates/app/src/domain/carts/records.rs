//! Cart Records

use serde::{Deserialize, Serialize};

use crate::domain::{
    carts::models::{CartItem, CartItemUuid},
    catalog::models::ProductId,
};

/// Stored form of a cart item. Removal sets `deleted` instead of erasing the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CartItemRecord {
    pub cart_item_id: CartItemUuid,
    pub product: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub deleted: bool,
}

impl From<&CartItem> for CartItemRecord {
    fn from(item: &CartItem) -> Self {
        Self {
            cart_item_id: item.cart_item_id,
            product: item.product.clone(),
            quantity: item.quantity,
            deleted: false,
        }
    }
}

impl From<CartItemRecord> for CartItem {
    fn from(record: CartItemRecord) -> Self {
        Self {
            cart_item_id: record.cart_item_id,
            product: record.product,
            quantity: record.quantity,
        }
    }
}
