//! Restaurant Model
//!
//! Aggregate root for a tenant: embeds the table registry, the menu and
//! the expense log. Table `status` is owned by the order manager and must
//! never be written directly by API callers.

use serde::{Deserialize, Serialize};

/// Physical table occupancy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Free,
    Occupied,
}

/// A physical table. `label` is unique within one restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub label: String,
    pub seats: i32,
    pub area_name: String,
    pub status: TableStatus,
}

/// Menu entry, soft-deleted so past orders keep their names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Expense line, dated in Unix millis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub description: String,
    pub amount: f64,
    pub date: i64,
    #[serde(default)]
    pub category: String,
}

/// Restaurant aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    /// Find a table by label.
    pub fn table(&self, label: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.label == label)
    }

    /// Find a table by label, mutable.
    pub fn table_mut(&mut self, label: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.label == label)
    }
}

/// Register restaurant payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableCreate>,
}

/// Create table payload. New tables always start `Free`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub label: String,
    pub seats: i32,
    #[serde(default)]
    pub area_name: String,
}

/// Record expense payload. `date` defaults to now when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
}
