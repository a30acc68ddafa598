//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{domain::carts::models::CartItem, identity::UserId, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user: UserId,
    pub created_at: Timestamp,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub fulfilled: bool,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub current: bool,

    /// Bumped by every write, checked by every conditional write
    #[serde(default)]
    pub revision: u64,
}

impl Order {
    /// Whether any lifecycle flag is set.
    pub fn is_closed(&self) -> bool {
        self.submitted || self.paid || self.fulfilled || self.delivered
    }

    /// Clear `current` on a closed order. Returns whether the stored flags were inconsistent.
    pub fn repair(&mut self) -> bool {
        let inconsistent = self.current && self.is_closed();

        if inconsistent {
            self.current = false;
        }

        inconsistent
    }

    pub fn has_reached(&self, stage: OrderStage) -> bool {
        match stage {
            OrderStage::Submitted => self.submitted,
            OrderStage::Paid => self.paid,
            OrderStage::Fulfilled => self.fulfilled,
            OrderStage::Delivered => self.delivered,
        }
    }
}

/// Lifecycle milestones of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Submitted,
    Paid,
    Fulfilled,
    Delivered,
}

impl OrderStage {
    /// Stored flag for the stage.
    pub fn field(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Paid => "paid",
            Self::Fulfilled => "fulfilled",
            Self::Delivered => "delivered",
        }
    }
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user: UserId,
    pub items: Vec<CartItem>,
}
