//! Orders Repository

use serde_json::Value;

use crate::{
    documents::{DocumentStore, Precondition, StoreError, decode, encode, fields},
    domain::{
        carts::models::CartItem,
        orders::models::{Order, OrderStage, OrderUuid},
    },
    identity::UserId,
};

const ORDERS_COLLECTION: &str = "orders";

fn order_path(order: OrderUuid) -> String {
    format!("{ORDERS_COLLECTION}/{order}")
}

fn revision_is(revision: u64) -> Precondition {
    Precondition::field_equals("revision", revision)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct OrdersRepository;

impl OrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order(
        &self,
        store: &dyn DocumentStore,
        order: OrderUuid,
    ) -> Result<Order, StoreError> {
        let path = order_path(order);

        let document = store
            .get(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;

        decode(&path, document)
    }

    /// Every order belonging to `user`, as stored.
    pub(crate) async fn list_user_orders(
        &self,
        store: &dyn DocumentStore,
        user: &UserId,
    ) -> Result<Vec<Order>, StoreError> {
        let mut orders = Vec::new();

        for (id, document) in store.list(ORDERS_COLLECTION).await? {
            if document.get("user").and_then(Value::as_str) != Some(user.as_str()) {
                continue;
            }

            orders.push(decode(&format!("{ORDERS_COLLECTION}/{id}"), document)?);
        }

        Ok(orders)
    }

    pub(crate) async fn create_order(
        &self,
        store: &dyn DocumentStore,
        order: &Order,
    ) -> Result<(), StoreError> {
        store.create(&order_path(order.uuid), encode(order)?).await
    }

    /// Replace the item list if the stored revision is still `expected_revision`.
    ///
    /// Returns the new revision.
    pub(crate) async fn write_items(
        &self,
        store: &dyn DocumentStore,
        order: OrderUuid,
        expected_revision: u64,
        items: &[CartItem],
    ) -> Result<u64, StoreError> {
        let revision = expected_revision + 1;
        let items = serde_json::to_value(items).map_err(StoreError::Encode)?;

        store
            .update(
                &order_path(order),
                fields([("items", items), ("revision", Value::from(revision))]),
                Some(revision_is(expected_revision)),
            )
            .await?;

        Ok(revision)
    }

    /// Set a lifecycle flag and clear `current` if the stored revision is still
    /// `expected_revision`.
    ///
    /// Returns the new revision.
    pub(crate) async fn write_stage(
        &self,
        store: &dyn DocumentStore,
        order: OrderUuid,
        expected_revision: u64,
        stage: OrderStage,
    ) -> Result<u64, StoreError> {
        let revision = expected_revision + 1;

        store
            .update(
                &order_path(order),
                fields([
                    (stage.field(), Value::Bool(true)),
                    ("current", Value::Bool(false)),
                    ("revision", Value::from(revision)),
                ]),
                Some(revision_is(expected_revision)),
            )
            .await?;

        Ok(revision)
    }
}
