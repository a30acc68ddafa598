//! Cart Items Repository

use serde_json::Value;

use crate::{
    documents::{DocumentStore, Precondition, StoreError, decode, encode, fields},
    domain::carts::{
        models::{CartItem, CartItemUuid},
        records::CartItemRecord,
    },
    identity::UserId,
};

fn items_collection(user: &UserId) -> String {
    format!("carts/{user}/items")
}

fn item_path(user: &UserId, item: CartItemUuid) -> String {
    format!("carts/{user}/items/{item}")
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CartItemsRepository;

impl CartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Live items, skipping tombstoned records.
    pub(crate) async fn list_items(
        &self,
        store: &dyn DocumentStore,
        user: &UserId,
    ) -> Result<Vec<CartItem>, StoreError> {
        let collection = items_collection(user);

        store
            .list(&collection)
            .await?
            .into_iter()
            .map(|(id, document)| decode::<CartItemRecord>(&format!("{collection}/{id}"), document))
            .filter(|record| !matches!(record, Ok(CartItemRecord { deleted: true, .. })))
            .map(|record| record.map(CartItem::from))
            .collect()
    }

    /// Create a new record; an existing record at the same id is an error.
    pub(crate) async fn create_item(
        &self,
        store: &dyn DocumentStore,
        user: &UserId,
        item: &CartItem,
    ) -> Result<(), StoreError> {
        store
            .create(
                &item_path(user, item.cart_item_id),
                encode(&CartItemRecord::from(item))?,
            )
            .await
    }

    /// Overwrite a record with the given line.
    pub(crate) async fn write_item(
        &self,
        store: &dyn DocumentStore,
        user: &UserId,
        item: &CartItem,
    ) -> Result<(), StoreError> {
        store
            .set(
                &item_path(user, item.cart_item_id),
                encode(&CartItemRecord::from(item))?,
            )
            .await
    }

    /// Set the quantity of a live record. A missing or tombstoned record is
    /// [`StoreError::NotFound`].
    pub(crate) async fn update_quantity(
        &self,
        store: &dyn DocumentStore,
        user: &UserId,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<(), StoreError> {
        store
            .update(
                &item_path(user, item),
                fields([("quantity", Value::from(quantity))]),
                Some(Precondition::field_equals("deleted", false)),
            )
            .await
            .map_err(|error| match error {
                StoreError::Conflict { path, .. } => StoreError::NotFound(path),
                other => other,
            })
    }

    /// Mark a record deleted. A missing record is [`StoreError::NotFound`].
    pub(crate) async fn tombstone(
        &self,
        store: &dyn DocumentStore,
        user: &UserId,
        item: CartItemUuid,
    ) -> Result<(), StoreError> {
        store
            .update(
                &item_path(user, item),
                fields([("deleted", Value::Bool(true))]),
                None,
            )
            .await
    }
}
