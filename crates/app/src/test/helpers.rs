//! Test Helpers

use crate::{
    documents::{DocumentStore, StoreError, encode},
    domain::{
        carts::{
            CartHandle, CartsService, CartsServiceError,
            models::{CartItem, NewCartItem},
        },
        orders::models::Order,
    },
    test::TestContext,
};

pub(crate) async fn add_item(
    ctx: &TestContext,
    handle: &CartHandle,
    product: &str,
    quantity: u32,
) -> Result<CartItem, CartsServiceError> {
    ctx.carts
        .add_item(handle, &ctx.user, NewCartItem::new(product, quantity))
        .await
}

/// Write an order document directly, bypassing the orders service.
pub(crate) async fn seed_order(ctx: &TestContext, order: &Order) -> Result<(), StoreError> {
    ctx.store
        .set(&format!("orders/{}", order.uuid), encode(order)?)
        .await
}
