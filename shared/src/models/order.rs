//! Order Model
//!
//! The central mutable entity. Status transitions are validated through
//! [`OrderStatus::can_advance`]; nothing outside the order manager should
//! flip a status field by hand.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Dine-in orders open as `Active` and stay there until completion.
/// Takeaway orders walk `Preparing` → `Ready` → `Completed`, forward only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Dine-in, open at a table
    #[default]
    Active,
    /// Takeaway, in the kitchen
    Preparing,
    /// Takeaway, staged for pickup
    Ready,
    /// Billed, terminal
    Completed,
}

impl OrderStatus {
    /// Whether the order is in a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Validate a staff-driven status advance.
    ///
    /// Only the monotonic takeaway moves are legal; everything else
    /// (backward moves, dine-in moves, self moves) is rejected.
    pub fn can_advance(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Preparing, OrderStatus::Completed)
                | (OrderStatus::Ready, OrderStatus::Completed)
        )
    }
}

/// Order channel, immutable after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeaway,
}

/// Payment method, recorded at completion only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

/// One order line. `total` is fixed at write time as `price × quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub total: f64,
}

/// Order entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    /// Real table label for dine-in, synthesized `TAKEAWAY-<number>` otherwise
    pub table_label: String,
    pub order_type: OrderType,
    /// `TO-NNN`, per restaurant per business day; takeaway only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Stamped when status becomes `Completed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}
