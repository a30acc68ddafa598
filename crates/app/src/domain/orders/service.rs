//! Orders service.

use std::{cmp::Reverse, fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info, warn};

use crate::{
    documents::DocumentStore,
    domain::{
        carts::models::CartItem,
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderStage, OrderUuid},
            repository::OrdersRepository,
        },
    },
    identity::UserId,
};

#[derive(Clone)]
pub struct StoreOrdersService {
    store: Arc<dyn DocumentStore>,
    repository: OrdersRepository,
}

impl fmt::Debug for StoreOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOrdersService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl StoreOrdersService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            repository: OrdersRepository::new(),
        }
    }

    /// The user's orders with lifecycle flags repaired, newest first.
    async fn repaired_orders(&self, user: &UserId) -> Result<Vec<Order>, OrdersServiceError> {
        let mut orders = self
            .repository
            .list_user_orders(self.store.as_ref(), user)
            .await?;

        for order in &mut orders {
            if order.repair() {
                warn!(
                    user = %user,
                    order_uuid = %order.uuid,
                    "closed order still flagged current; treating as not current"
                );
            }
        }

        orders.sort_by_key(|order| Reverse((order.created_at, order.uuid)));

        Ok(orders)
    }
}

#[async_trait]
impl OrdersService for StoreOrdersService {
    #[tracing::instrument(
        name = "orders.service.current_order",
        skip(self),
        fields(user = %user, order_uuid = tracing::field::Empty),
        err
    )]
    async fn current_order(&self, user: &UserId) -> Result<Option<Order>, OrdersServiceError> {
        let mut current = self
            .repaired_orders(user)
            .await?
            .into_iter()
            .filter(|order| order.current);

        let newest = current.next();
        let ignored = current.count();

        if let Some(order) = &newest {
            Span::current().record("order_uuid", tracing::field::display(order.uuid));

            if ignored > 0 {
                warn!(
                    user = %user,
                    order_uuid = %order.uuid,
                    ignored,
                    "multiple current orders; using the most recently created"
                );
            }
        }

        Ok(newest)
    }

    #[tracing::instrument(name = "orders.service.user_orders", skip(self), fields(user = %user), err)]
    async fn user_orders(&self, user: &UserId) -> Result<Vec<Order>, OrdersServiceError> {
        self.repaired_orders(user).await
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut order = self.repository.get_order(self.store.as_ref(), order).await?;

        order.repair();

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            user = %order.user,
            item_count = order.items.len(),
            order_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let order = Order {
            uuid: OrderUuid::new(),
            user: order.user,
            created_at: Timestamp::now(),
            items: order.items,
            submitted: false,
            paid: false,
            fulfilled: false,
            delivered: false,
            current: true,
            revision: 0,
        };

        Span::current().record("order_uuid", tracing::field::display(order.uuid));

        self.repository
            .create_order(self.store.as_ref(), &order)
            .await?;

        info!(order_uuid = %order.uuid, user = %order.user, "created order");

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.replace_items",
        skip(self, items),
        fields(order_uuid = %order, item_count = items.len()),
        err
    )]
    async fn replace_items(
        &self,
        order: OrderUuid,
        expected_revision: u64,
        items: Vec<CartItem>,
    ) -> Result<Order, OrdersServiceError> {
        let mut stored = self.get_order(order).await?;

        if stored.is_closed() {
            return Err(OrdersServiceError::Closed);
        }

        stored.revision = self
            .repository
            .write_items(self.store.as_ref(), order, expected_revision, &items)
            .await?;
        stored.items = items;

        Ok(stored)
    }

    #[tracing::instrument(name = "orders.service.submit_order", skip(self), fields(user = %user), err)]
    async fn submit_order(&self, user: &UserId) -> Result<Order, OrdersServiceError> {
        let order = self
            .current_order(user)
            .await?
            .ok_or(OrdersServiceError::NoCurrentOrder)?;

        self.advance_order(order.uuid, OrderStage::Submitted).await
    }

    #[tracing::instrument(
        name = "orders.service.advance_order",
        skip(self),
        fields(order_uuid = %order, stage = ?stage),
        err
    )]
    async fn advance_order(
        &self,
        order: OrderUuid,
        stage: OrderStage,
    ) -> Result<Order, OrdersServiceError> {
        let mut stored = self.get_order(order).await?;

        if stored.has_reached(stage) {
            return Ok(stored);
        }

        stored.revision = self
            .repository
            .write_stage(self.store.as_ref(), order, stored.revision, stage)
            .await?;

        match stage {
            OrderStage::Submitted => stored.submitted = true,
            OrderStage::Paid => stored.paid = true,
            OrderStage::Fulfilled => stored.fulfilled = true,
            OrderStage::Delivered => stored.delivered = true,
        }

        stored.current = false;

        info!(order_uuid = %order, stage = stage.field(), "advanced order");

        Ok(stored)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The user's current order, if any.
    ///
    /// Orders with a lifecycle flag set are never current. Should more than one order still
    /// be current, the most recently created one is returned.
    async fn current_order(&self, user: &UserId) -> Result<Option<Order>, OrdersServiceError>;

    /// Order history for a user, newest first.
    async fn user_orders(&self, user: &UserId) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Create a new current order.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Replace the item list of an open order written at `expected_revision`.
    async fn replace_items(
        &self,
        order: OrderUuid,
        expected_revision: u64,
        items: Vec<CartItem>,
    ) -> Result<Order, OrdersServiceError>;

    /// Submit the user's current order.
    async fn submit_order(&self, user: &UserId) -> Result<Order, OrdersServiceError>;

    /// Mark an order as having reached `stage`. The order stops being current.
    async fn advance_order(
        &self,
        order: OrderUuid,
        stage: OrderStage,
    ) -> Result<Order, OrdersServiceError>;
}
