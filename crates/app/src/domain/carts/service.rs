//! Carts service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    documents::DocumentStore,
    domain::{
        carts::{
            errors::CartsServiceError,
            lines::{LineChange, merge_or_append, remove_line, set_quantity, upsert_line},
            models::{CartItem, CartItemUuid, NewCartItem},
            repositories::CartItemsRepository,
            state::{CartHandle, CartState},
        },
        orders::{
            OrdersService,
            models::{NewOrder, Order, OrderUuid},
        },
    },
    identity::{SessionEvent, UserId},
};

/// A line as persisted by an add, with the order it landed in and that order's item list.
struct AddedLine {
    order: OrderUuid,
    line: CartItem,
    items: Vec<CartItem>,
}

#[derive(Clone)]
pub struct StoreCartsService {
    store: Arc<dyn DocumentStore>,
    orders: Arc<dyn OrdersService>,
    items_repository: CartItemsRepository,
}

impl fmt::Debug for StoreCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCartsService")
            .field("items_repository", &self.items_repository)
            .finish_non_exhaustive()
    }
}

impl StoreCartsService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, orders: Arc<dyn OrdersService>) -> Self {
        Self {
            store,
            orders,
            items_repository: CartItemsRepository::new(),
        }
    }

    /// Write a new line durably.
    async fn persist_add(
        &self,
        user: &UserId,
        item: NewCartItem,
    ) -> Result<AddedLine, CartsServiceError> {
        let store = self.store.as_ref();

        let candidate = CartItem {
            cart_item_id: CartItemUuid::new(),
            product: item.product,
            quantity: item.quantity,
        };

        let Some(order) = self.orders.current_order(user).await? else {
            self.items_repository
                .create_item(store, user, &candidate)
                .await?;

            let order = self
                .orders
                .create_order(NewOrder {
                    user: user.clone(),
                    items: vec![candidate.clone()],
                })
                .await?;

            return Ok(AddedLine {
                order: order.uuid,
                line: candidate,
                items: order.items,
            });
        };

        let mut items = order.items;

        let line = match merge_or_append(&mut items, candidate) {
            LineChange::Merged(line) => {
                self.items_repository.write_item(store, user, &line).await?;
                line
            }
            LineChange::Appended(line) => {
                self.items_repository.create_item(store, user, &line).await?;
                line
            }
        };

        let order = self
            .orders
            .replace_items(order.uuid, order.revision, items)
            .await?;

        Ok(AddedLine {
            order: order.uuid,
            line,
            items: order.items,
        })
    }

    async fn persist_removal(
        &self,
        user: &UserId,
        cart_item_id: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        self.items_repository
            .tombstone(self.store.as_ref(), user, cart_item_id)
            .await?;

        if let Some(order) = self.orders.current_order(user).await? {
            let mut items = order.items;

            if remove_line(&mut items, cart_item_id) {
                self.orders
                    .replace_items(order.uuid, order.revision, items)
                    .await?;
            }
        }

        Ok(())
    }

    async fn persist_quantity(
        &self,
        user: &UserId,
        cart_item_id: CartItemUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        self.items_repository
            .update_quantity(self.store.as_ref(), user, cart_item_id, quantity)
            .await?;

        if let Some(order) = self.orders.current_order(user).await? {
            let mut items = order.items;

            if set_quantity(&mut items, cart_item_id, quantity) {
                self.orders
                    .replace_items(order.uuid, order.revision, items)
                    .await?;
            }
        }

        Ok(())
    }

    async fn persist_clear(&self, user: &UserId) -> Result<(), CartsServiceError> {
        if let Some(order) = self.orders.current_order(user).await? {
            self.orders
                .replace_items(order.uuid, order.revision, Vec::new())
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, handle, item),
        fields(
            user = %user,
            product = %item.product,
            quantity = item.quantity,
            order_uuid = tracing::field::Empty,
            cart_item_id = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        handle: &CartHandle,
        user: &UserId,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        let _mutation = handle.lock_mutations().await;

        if item.quantity < 1 {
            return handle
                .settle(Err(CartsServiceError::InvalidQuantity(item.quantity)))
                .await;
        }

        handle.begin_sync().await;

        let AddedLine { order, line, items } =
            handle.settle(self.persist_add(user, item).await).await?;

        let span = Span::current();

        span.record("order_uuid", tracing::field::display(order));
        span.record("cart_item_id", tracing::field::display(line.cart_item_id));

        handle
            .commit(|state| {
                if state.order == Some(order) {
                    upsert_line(&mut state.items, line.clone());
                } else {
                    state.items = items;
                    state.order = Some(order);
                }
            })
            .await;

        info!(order_uuid = %order, cart_item_id = %line.cart_item_id, "added cart item");

        Ok(line)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self, handle),
        fields(user = %user, cart_item_id = %cart_item_id),
        err
    )]
    async fn remove_item(
        &self,
        handle: &CartHandle,
        user: &UserId,
        cart_item_id: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let _mutation = handle.lock_mutations().await;

        handle.begin_sync().await;
        handle
            .settle(self.persist_removal(user, cart_item_id).await)
            .await?;
        handle
            .commit(|state| {
                remove_line(&mut state.items, cart_item_id);
            })
            .await;

        info!(cart_item_id = %cart_item_id, "removed cart item");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.update_item_quantity",
        skip(self, handle),
        fields(user = %user, cart_item_id = %cart_item_id),
        err
    )]
    async fn update_item_quantity(
        &self,
        handle: &CartHandle,
        user: &UserId,
        cart_item_id: CartItemUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        let _mutation = handle.lock_mutations().await;

        if quantity < 1 {
            return handle
                .settle(Err(CartsServiceError::InvalidQuantity(quantity)))
                .await;
        }

        handle.begin_sync().await;
        handle
            .settle(self.persist_quantity(user, cart_item_id, quantity).await)
            .await?;
        handle
            .commit(|state| {
                set_quantity(&mut state.items, cart_item_id, quantity);
            })
            .await;

        info!(cart_item_id = %cart_item_id, quantity, "updated cart item quantity");

        Ok(())
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip(self, handle), fields(user = %user), err)]
    async fn clear_cart(&self, handle: &CartHandle, user: &UserId) -> Result<(), CartsServiceError> {
        let _mutation = handle.lock_mutations().await;

        handle.begin_sync().await;
        handle.settle(self.persist_clear(user).await).await?;
        handle.commit(|state| state.items.clear()).await;

        info!("cleared cart");

        Ok(())
    }

    async fn load_cart_from_order(&self, handle: &CartHandle, order: &Order) {
        let _mutation = handle.lock_mutations().await;

        handle.replace(CartState::from_order(order)).await;
    }

    #[tracing::instrument(
        name = "carts.service.restore_cart",
        skip(self, handle),
        fields(user = %user, order_uuid = tracing::field::Empty),
        err
    )]
    async fn restore_cart(
        &self,
        handle: &CartHandle,
        user: &UserId,
    ) -> Result<Option<Order>, CartsServiceError> {
        let _mutation = handle.lock_mutations().await;

        handle.begin_sync().await;

        let current = self.orders.current_order(user).await.map_err(CartsServiceError::from);
        let current = handle.settle(current).await?;

        match &current {
            Some(order) => {
                Span::current().record("order_uuid", tracing::field::display(order.uuid));
                handle.replace(CartState::from_order(order)).await;
            }
            None => handle.replace(CartState::default()).await,
        }

        Ok(current)
    }

    #[tracing::instrument(
        name = "carts.service.submit_cart",
        skip(self, handle),
        fields(user = %user, order_uuid = tracing::field::Empty),
        err
    )]
    async fn submit_cart(&self, handle: &CartHandle, user: &UserId) -> Result<Order, CartsServiceError> {
        let _mutation = handle.lock_mutations().await;

        handle.begin_sync().await;

        let submitted = self.orders.submit_order(user).await.map_err(CartsServiceError::from);
        let submitted = handle.settle(submitted).await?;

        Span::current().record("order_uuid", tracing::field::display(submitted.uuid));

        handle.replace(CartState::default()).await;

        info!(order_uuid = %submitted.uuid, "submitted cart");

        Ok(submitted)
    }

    async fn handle_session(
        &self,
        handle: &CartHandle,
        event: SessionEvent,
    ) -> Result<(), CartsServiceError> {
        match event {
            SessionEvent::SignedIn(user) => self.restore_cart(handle, &user).await.map(|_| ()),
            SessionEvent::SignedOut => {
                let _mutation = handle.lock_mutations().await;

                handle.replace(CartState::default()).await;

                Ok(())
            }
        }
    }

    async fn list_items(&self, user: &UserId) -> Result<Vec<CartItem>, CartsServiceError> {
        Ok(self
            .items_repository
            .list_items(self.store.as_ref(), user)
            .await?)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add a product to the user's cart.
    ///
    /// A product already in the current order has its quantity increased; otherwise a new line
    /// is created, and a new current order with it when the user has none. Returns the line as
    /// persisted.
    async fn add_item(
        &self,
        handle: &CartHandle,
        user: &UserId,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove a line from the user's cart.
    async fn remove_item(
        &self,
        handle: &CartHandle,
        user: &UserId,
        cart_item_id: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Set the quantity of a line. Quantities below one are rejected without any writes.
    async fn update_item_quantity(
        &self,
        handle: &CartHandle,
        user: &UserId,
        cart_item_id: CartItemUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError>;

    /// Empty the cart. The current order stays current with no items.
    async fn clear_cart(&self, handle: &CartHandle, user: &UserId) -> Result<(), CartsServiceError>;

    /// Overwrite the local cart with a persisted order.
    async fn load_cart_from_order(&self, handle: &CartHandle, order: &Order);

    /// Rebuild the local cart from the user's current order, or empty it if there is none.
    async fn restore_cart(
        &self,
        handle: &CartHandle,
        user: &UserId,
    ) -> Result<Option<Order>, CartsServiceError>;

    /// Submit the current order and start a fresh local cart.
    async fn submit_cart(&self, handle: &CartHandle, user: &UserId) -> Result<Order, CartsServiceError>;

    /// React to a session starting or ending.
    async fn handle_session(
        &self,
        handle: &CartHandle,
        event: SessionEvent,
    ) -> Result<(), CartsServiceError>;

    /// Live cart item records for a user.
    async fn list_items(&self, user: &UserId) -> Result<Vec<CartItem>, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        documents::{MemoryDocumentStore, MockDocumentStore, StoreError},
        domain::{
            carts::state::SyncStatus,
            catalog::models::ProductId,
            orders::{MockOrdersService, OrdersServiceError, models::OrderStage},
        },
        test::{
            TestContext,
            faults::Operation,
            helpers::{add_item, seed_order},
        },
    };

    use super::*;

    fn quantities(items: &[CartItem]) -> Vec<(&str, u32)> {
        items
            .iter()
            .map(|item| (item.product.as_str(), item.quantity))
            .collect()
    }

    #[test]
    fn services_debug_without_their_stores() {
        let ctx = TestContext::new();

        assert!(format!("{:?}", ctx.carts).starts_with("StoreCartsService"));
        assert!(format!("{:?}", ctx.orders).starts_with("StoreOrdersService"));
        assert!(format!("{:?}", ctx.coupons).starts_with("StoreCouponsService"));
        assert_eq!(
            format!("{:?}", ctx.checkout),
            r#"CatalogCheckoutService { currency: "USD", .. }"#
        );
    }

    #[tokio::test]
    async fn first_add_creates_current_order() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let line = add_item(&ctx, &handle, "P1", 1).await?;

        let state = handle.snapshot().await;
        let order = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        assert_eq!(state.order, Some(order.uuid));
        assert_eq!(state.status, SyncStatus::Idle);
        assert_eq!(state.error, None);
        assert!(order.current);
        assert!(!order.is_closed());
        assert_eq!(quantities(&order.items), [("P1", 1)]);
        assert_eq!(state.items, order.items);
        assert_eq!(ctx.carts.list_items(&ctx.user).await?, vec![line]);

        Ok(())
    }

    #[tokio::test]
    async fn adding_existing_product_accumulates_quantity() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let first = add_item(&ctx, &handle, "P1", 2).await?;
        let merged = add_item(&ctx, &handle, "P1", 3).await?;

        let order = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        assert_eq!(merged.cart_item_id, first.cart_item_id);
        assert_eq!(merged.quantity, 5);
        assert_eq!(quantities(&order.items), [("P1", 5)]);
        assert_eq!(handle.items().await, order.items);
        assert_eq!(ctx.carts.list_items(&ctx.user).await?, vec![merged]);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_twice_yields_one_line() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "P1", 1).await?;
        add_item(&ctx, &handle, "P1", 1).await?;

        assert_eq!(quantities(&handle.items().await), [("P1", 2)]);

        Ok(())
    }

    #[tokio::test]
    async fn adding_new_product_appends_to_current_order() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;
        add_item(&ctx, &handle, "tea", 2).await?;

        let orders = ctx.orders.user_orders(&ctx.user).await?;

        assert_eq!(orders.len(), 1, "both lines belong to one order");
        assert_eq!(
            quantities(&handle.items().await),
            [("mug", 1), ("tea", 2)]
        );
        assert_eq!(ctx.carts.list_items(&ctx.user).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_add_is_rejected_without_writes() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let result = add_item(&ctx, &handle, "P1", 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(0))),
            "expected InvalidQuantity, got {result:?}"
        );

        let state = handle.snapshot().await;

        assert!(state.items.is_empty());
        assert_eq!(state.status, SyncStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Quantity must be at least 1"));
        assert!(ctx.orders.user_orders(&ctx.user).await?.is_empty());
        assert!(ctx.carts.list_items(&ctx.user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn quantity_update_below_one_changes_nothing() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let line = add_item(&ctx, &handle, "P1", 3).await?;
        let before = ctx.orders.current_order(&ctx.user).await?;

        let result = ctx
            .carts
            .update_item_quantity(&handle, &ctx.user, line.cart_item_id, 0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(0))),
            "expected InvalidQuantity, got {result:?}"
        );
        assert_eq!(quantities(&handle.items().await), [("P1", 3)]);
        assert_eq!(handle.snapshot().await.status, SyncStatus::Error);
        assert_eq!(ctx.orders.current_order(&ctx.user).await?, before);

        Ok(())
    }

    #[tokio::test]
    async fn quantity_update_reaches_record_order_and_local_state() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let line = add_item(&ctx, &handle, "P1", 1).await?;

        ctx.carts
            .update_item_quantity(&handle, &ctx.user, line.cart_item_id, 4)
            .await?;

        let order = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        assert_eq!(quantities(&order.items), [("P1", 4)]);
        assert_eq!(quantities(&handle.items().await), [("P1", 4)]);
        assert_eq!(
            quantities(&ctx.carts.list_items(&ctx.user).await?),
            [("P1", 4)]
        );
        assert_eq!(handle.snapshot().await.status, SyncStatus::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn removing_unknown_item_fails_and_keeps_local_state() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "P1", 1).await?;

        let before = handle.items().await;

        let result = ctx
            .carts
            .remove_item(&handle, &ctx.user, CartItemUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let state = handle.snapshot().await;

        assert_eq!(state.items, before);
        assert_eq!(state.status, SyncStatus::Error);
        assert!(state.error.is_some(), "expected an error message");

        Ok(())
    }

    #[tokio::test]
    async fn removing_item_tombstones_record_and_updates_order() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let mug = add_item(&ctx, &handle, "mug", 1).await?;
        add_item(&ctx, &handle, "tea", 1).await?;

        ctx.carts
            .remove_item(&handle, &ctx.user, mug.cart_item_id)
            .await?;

        let order = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        assert_eq!(quantities(&order.items), [("tea", 1)]);
        assert_eq!(quantities(&handle.items().await), [("tea", 1)]);
        assert_eq!(
            quantities(&ctx.carts.list_items(&ctx.user).await?),
            [("tea", 1)]
        );

        let record = ctx
            .store
            .get(&format!("carts/{}/items/{}", ctx.user, mug.cart_item_id))
            .await?
            .ok_or("tombstoned record should remain")?;

        assert_eq!(record.get("deleted"), Some(&serde_json::Value::Bool(true)));

        Ok(())
    }

    #[tokio::test]
    async fn quantity_update_on_removed_item_is_not_found() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let mug = add_item(&ctx, &handle, "mug", 1).await?;

        ctx.carts
            .remove_item(&handle, &ctx.user, mug.cart_item_id)
            .await?;

        let result = ctx
            .carts
            .update_item_quantity(&handle, &ctx.user, mug.cart_item_id, 4)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let state = handle.snapshot().await;

        assert!(state.items.is_empty());
        assert_eq!(state.status, SyncStatus::Error);

        let record = ctx
            .store
            .get(&format!("carts/{}/items/{}", ctx.user, mug.cart_item_id))
            .await?
            .ok_or("tombstoned record should remain")?;

        assert_eq!(record.get("quantity"), Some(&serde_json::Value::from(1)));

        Ok(())
    }

    #[tokio::test]
    async fn clearing_cart_keeps_order_current() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;
        add_item(&ctx, &handle, "tea", 1).await?;

        let before = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        ctx.carts.clear_cart(&handle, &ctx.user).await?;

        let after = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("order should stay current")?;

        let state = handle.snapshot().await;

        assert_eq!(after.uuid, before.uuid);
        assert!(after.items.is_empty());
        assert!(after.current);
        assert!(state.items.is_empty());
        assert_eq!(state.order, Some(before.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn failed_order_create_leaves_local_items_untouched() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        ctx.store.fail(Operation::Create, "orders/");

        let result = add_item(&ctx, &handle, "P1", 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::Storage(StoreError::Unavailable(_)))),
            "expected Storage, got {result:?}"
        );

        let state = handle.snapshot().await;

        assert!(state.items.is_empty());
        assert_eq!(state.order, None);
        assert_eq!(state.status, SyncStatus::Error);

        Ok(())
    }

    #[tokio::test]
    async fn failed_item_record_write_leaves_order_and_local_untouched() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;

        ctx.store.fail(Operation::Create, "carts/");

        let result = add_item(&ctx, &handle, "tea", 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::Storage(_))),
            "expected Storage, got {result:?}"
        );

        let order = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        assert_eq!(quantities(&order.items), [("mug", 1)]);
        assert_eq!(quantities(&handle.items().await), [("mug", 1)]);

        ctx.store.clear_faults();

        add_item(&ctx, &handle, "tea", 1).await?;

        let state = handle.snapshot().await;

        assert_eq!(quantities(&state.items), [("mug", 1), ("tea", 1)]);
        assert_eq!(state.status, SyncStatus::Idle);
        assert_eq!(state.error, None);

        Ok(())
    }

    #[tokio::test]
    async fn failed_order_write_leaves_local_items_untouched() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;

        ctx.store.fail(Operation::Update, "orders/");

        let result = add_item(&ctx, &handle, "tea", 1).await;

        assert!(result.is_err(), "expected failure, got {result:?}");
        assert_eq!(quantities(&handle.items().await), [("mug", 1)]);
        assert_eq!(handle.snapshot().await.status, SyncStatus::Error);

        Ok(())
    }

    #[tokio::test]
    async fn failed_merge_write_keeps_previous_quantity() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "P1", 2).await?;

        ctx.store.fail(Operation::Set, "carts/");

        let result = add_item(&ctx, &handle, "P1", 3).await;

        assert!(result.is_err(), "expected failure, got {result:?}");

        let order = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        assert_eq!(quantities(&order.items), [("P1", 2)]);
        assert_eq!(quantities(&handle.items().await), [("P1", 2)]);

        Ok(())
    }

    #[tokio::test]
    async fn failed_restore_keeps_local_cart() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;

        ctx.store.fail(Operation::List, "orders");

        let result = ctx.carts.restore_cart(&handle, &ctx.user).await;

        assert!(
            matches!(result, Err(CartsServiceError::Storage(_))),
            "expected Storage, got {result:?}"
        );

        let state = handle.snapshot().await;

        assert_eq!(quantities(&state.items), [("mug", 1)]);
        assert_eq!(state.status, SyncStatus::Error);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_on_one_handle_are_serialized() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        let (first, second) = tokio::join!(
            add_item(&ctx, &handle, "P1", 1),
            add_item(&ctx, &handle, "P1", 1)
        );

        first?;
        second?;

        let orders = ctx.orders.user_orders(&ctx.user).await?;

        assert_eq!(orders.len(), 1, "expected a single order, got {orders:?}");
        assert_eq!(quantities(&handle.items().await), [("P1", 2)]);

        Ok(())
    }

    #[tokio::test]
    async fn closed_order_is_never_targeted() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;

        let stale = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;

        seed_order(
            &ctx,
            &Order {
                submitted: true,
                current: true,
                ..stale.clone()
            },
        )
        .await?;

        add_item(&ctx, &handle, "tea", 1).await?;

        let state = handle.snapshot().await;
        let fresh = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a new current order")?;

        assert_ne!(fresh.uuid, stale.uuid);
        assert_eq!(quantities(&fresh.items), [("tea", 1)]);
        assert_eq!(state.items, fresh.items);
        assert_eq!(state.order, Some(fresh.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn stale_handle_adopts_order_opened_elsewhere() -> TestResult {
        let ctx = TestContext::new();
        let laptop = CartHandle::new();
        let phone = CartHandle::new();

        add_item(&ctx, &laptop, "mug", 1).await?;

        ctx.orders.submit_order(&ctx.user).await?;

        add_item(&ctx, &phone, "tea", 1).await?;
        add_item(&ctx, &laptop, "kettle", 1).await?;

        let current = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a current order")?;
        let state = laptop.snapshot().await;

        assert_eq!(quantities(&current.items), [("tea", 1), ("kettle", 1)]);
        assert_eq!(state.items, current.items);
        assert_eq!(state.order, Some(current.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn restore_and_sign_out_follow_the_session() -> TestResult {
        let ctx = TestContext::new();
        let shopping = CartHandle::new();

        add_item(&ctx, &shopping, "mug", 2).await?;

        let returning = CartHandle::new();

        ctx.carts
            .handle_session(&returning, SessionEvent::SignedIn(ctx.user.clone()))
            .await?;

        assert_eq!(returning.snapshot().await, shopping.snapshot().await);

        ctx.carts
            .handle_session(&returning, SessionEvent::SignedOut)
            .await?;

        assert_eq!(returning.snapshot().await, CartState::default());

        Ok(())
    }

    #[tokio::test]
    async fn restore_without_current_order_empties_cart() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        handle.commit(|state| state.order = Some(OrderUuid::new())).await;

        let restored = ctx.carts.restore_cart(&handle, &ctx.user).await?;

        assert_eq!(restored, None);
        assert_eq!(handle.snapshot().await, CartState::default());

        Ok(())
    }

    #[tokio::test]
    async fn load_cart_from_order_overwrites_state() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;

        let other = ctx
            .orders
            .create_order(NewOrder {
                user: UserId::new("someone-else"),
                items: Vec::new(),
            })
            .await?;

        let rejected = ctx
            .carts
            .update_item_quantity(&handle, &ctx.user, CartItemUuid::new(), 0)
            .await;

        assert!(rejected.is_err(), "expected zero quantity to be rejected");

        ctx.carts.load_cart_from_order(&handle, &other).await;

        let state = handle.snapshot().await;

        assert!(state.items.is_empty());
        assert_eq!(state.order, Some(other.uuid));
        assert_eq!(state.status, SyncStatus::Idle);
        assert_eq!(state.error, None);

        Ok(())
    }

    #[tokio::test]
    async fn submitting_cart_starts_a_fresh_one() -> TestResult {
        let ctx = TestContext::new();
        let handle = CartHandle::new();

        add_item(&ctx, &handle, "mug", 1).await?;

        let submitted = ctx.carts.submit_cart(&handle, &ctx.user).await?;

        assert!(submitted.has_reached(OrderStage::Submitted));
        assert!(!submitted.current);
        assert_eq!(handle.snapshot().await, CartState::default());

        add_item(&ctx, &handle, "tea", 1).await?;

        let next = ctx
            .orders
            .current_order(&ctx.user)
            .await?
            .ok_or("expected a new current order")?;

        assert_ne!(next.uuid, submitted.uuid);
        assert_eq!(quantities(&next.items), [("tea", 1)]);

        Ok(())
    }

    #[tokio::test]
    async fn conflicting_order_write_is_reported() -> TestResult {
        let mut orders = MockOrdersService::new();

        let order = Order {
            uuid: OrderUuid::new(),
            user: UserId::new("u1"),
            created_at: jiff::Timestamp::now(),
            items: Vec::new(),
            submitted: false,
            paid: false,
            fulfilled: false,
            delivered: false,
            current: true,
            revision: 3,
        };

        orders
            .expect_current_order()
            .returning(move |_| Ok(Some(order.clone())));
        orders
            .expect_replace_items()
            .withf(|_, revision, _| *revision == 3)
            .returning(|_, _, _| Err(OrdersServiceError::Conflict));

        let service =
            StoreCartsService::new(Arc::new(MemoryDocumentStore::new()), Arc::new(orders));
        let handle = CartHandle::new();

        let result = service
            .add_item(&handle, &UserId::new("u1"), NewCartItem::new("mug", 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::Conflict)),
            "expected Conflict, got {result:?}"
        );
        assert!(handle.items().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn item_id_collision_is_a_hard_failure() {
        let mut store = MockDocumentStore::new();
        let mut orders = MockOrdersService::new();

        orders.expect_current_order().returning(|_| Ok(None));
        orders.expect_create_order().never();
        store
            .expect_create()
            .returning(|path, _| Err(StoreError::AlreadyExists(path.to_string())));

        let service = StoreCartsService::new(Arc::new(store), Arc::new(orders));
        let handle = CartHandle::new();

        let result = service
            .add_item(&handle, &UserId::new("u1"), NewCartItem::new(ProductId::new("mug"), 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );
        assert_eq!(handle.snapshot().await.status, SyncStatus::Error);
    }
}
