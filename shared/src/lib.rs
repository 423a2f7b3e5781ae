//! Shared types for the Dhaba POS
//!
//! Domain models exchanged between the server and its clients:
//! restaurants (with embedded tables, menu and expenses), orders and
//! daily summaries, plus the status enums the order state machine runs on.

pub mod models;
pub mod util;

// Re-exports
pub use models::{
    DailySummary, Expense, ExpenseCreate, MenuItem, Order, OrderItem, OrderStatus, OrderType,
    PaymentMethod, PeriodSummary, Restaurant, RestaurantCreate, Table, TableCreate, TableStatus,
};
pub use serde::{Deserialize, Serialize};
