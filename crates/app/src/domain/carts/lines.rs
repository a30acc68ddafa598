//! Cart line arithmetic shared by the durable and local sides of a mutation.

use crate::domain::carts::models::{CartItem, CartItemUuid};

/// How adding a product changed a list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineChange {
    /// An existing line for the product absorbed the added quantity.
    Merged(CartItem),

    /// The product was not present, so the candidate line was appended.
    Appended(CartItem),
}

impl LineChange {
    pub(crate) fn into_line(self) -> CartItem {
        match self {
            Self::Merged(line) | Self::Appended(line) => line,
        }
    }
}

/// Merge `candidate` into the line for the same product, or append it.
pub(crate) fn merge_or_append(items: &mut Vec<CartItem>, candidate: CartItem) -> LineChange {
    if let Some(existing) = items
        .iter_mut()
        .find(|line| line.product == candidate.product)
    {
        existing.quantity = existing.quantity.saturating_add(candidate.quantity);

        return LineChange::Merged(existing.clone());
    }

    items.push(candidate.clone());

    LineChange::Appended(candidate)
}

/// Replace the line for `line.product` with `line`, or append it.
pub(crate) fn upsert_line(items: &mut Vec<CartItem>, line: CartItem) {
    match items
        .iter_mut()
        .find(|existing| existing.product == line.product)
    {
        Some(existing) => *existing = line,
        None => items.push(line),
    }
}

/// Drop the line with `cart_item_id`. Returns whether a line was removed.
pub(crate) fn remove_line(items: &mut Vec<CartItem>, cart_item_id: CartItemUuid) -> bool {
    let before = items.len();

    items.retain(|line| line.cart_item_id != cart_item_id);

    items.len() != before
}

/// Set the quantity of the line with `cart_item_id`. Returns whether a line matched.
pub(crate) fn set_quantity(items: &mut [CartItem], cart_item_id: CartItemUuid, quantity: u32) -> bool {
    items
        .iter_mut()
        .find(|line| line.cart_item_id == cart_item_id)
        .map(|line| line.quantity = quantity)
        .is_some()
}
