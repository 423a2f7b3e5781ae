//! Order domain
//!
//! `manager` owns the order lifecycle and table reconciliation;
//! `money` owns decimal validation of item lists and totals.

pub mod manager;
pub mod money;

pub use manager::{
    DineInOrderInput, ManagerError, ManagerResult, OrderManager, TakeawayOrderInput,
};
