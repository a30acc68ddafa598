//! Cart State

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::domain::{
    carts::{errors::CartsServiceError, models::CartItem},
    orders::models::{Order, OrderUuid},
};

/// Progress of the last cart mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Error,
}

/// Local, session-scoped view of a shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub order: Option<OrderUuid>,
    pub status: SyncStatus,
    pub error: Option<String>,
}

impl CartState {
    /// State mirroring a persisted order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            items: order.items.clone(),
            order: Some(order.uuid),
            status: SyncStatus::Idle,
            error: None,
        }
    }
}

/// Shared handle to one session's cart state.
///
/// Clones refer to the same state. Mutations through a handle run one at a time.
#[derive(Debug, Clone, Default)]
pub struct CartHandle {
    state: Arc<RwLock<CartState>>,
    mutations: Arc<Mutex<()>>,
}

impl CartHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> CartState {
        self.state.read().await.clone()
    }

    /// Copy of the current lines.
    pub async fn items(&self) -> Vec<CartItem> {
        self.state.read().await.items.clone()
    }

    pub(crate) async fn lock_mutations(&self) -> MutexGuard<'_, ()> {
        self.mutations.lock().await
    }

    pub(crate) async fn begin_sync(&self) {
        self.state.write().await.status = SyncStatus::Syncing;
    }

    /// Apply a persisted change and return to idle.
    pub(crate) async fn commit(&self, apply: impl FnOnce(&mut CartState)) {
        let mut state = self.state.write().await;

        apply(&mut state);

        state.status = SyncStatus::Idle;
        state.error = None;
    }

    /// Record a failure on the state, leaving the lines untouched.
    pub(crate) async fn settle<T>(
        &self,
        result: Result<T, CartsServiceError>,
    ) -> Result<T, CartsServiceError> {
        if let Err(error) = &result {
            let mut state = self.state.write().await;

            state.status = SyncStatus::Error;
            state.error = Some(error.to_string());
        }

        result
    }

    pub(crate) async fn replace(&self, next: CartState) {
        *self.state.write().await = next;
    }
}
