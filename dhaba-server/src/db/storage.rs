//! redb-based storage for the POS document model
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `restaurants` | `restaurant_id` | `Restaurant` | Aggregate root (tables, menu, expenses) |
//! | `orders` | `order_id` | `Order` | Live and completed orders |
//! | `table_orders` | `(restaurant_id, table_label)` | `order_id` | Active dine-in index |
//! | `takeaway_counters` | `(restaurant_id, date)` | `u64` | Daily takeaway numbering |
//! | `summaries` | `(restaurant_id, date)` | `DailySummary` | Daily rollups |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: copy-on-write
//! with an atomic pointer swap, so the file is always in a consistent
//! state even across power loss. The `table_orders` index and the order
//! row commit in the same transaction, which is the uniqueness guarantee
//! for "one active order per table".

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{DailySummary, Order, Restaurant};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Restaurant documents: key = restaurant_id, value = JSON-serialized Restaurant
const RESTAURANTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("restaurants");

/// Order documents: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Active dine-in index: key = (restaurant_id, table_label), value = order_id
const TABLE_ORDERS_TABLE: TableDefinition<(&str, &str), &str> = TableDefinition::new("table_orders");

/// Takeaway numbering: key = (restaurant_id, YYYY-MM-DD), value = last number handed out
const TAKEAWAY_COUNTERS_TABLE: TableDefinition<(&str, &str), u64> =
    TableDefinition::new("takeaway_counters");

/// Daily summaries: key = (restaurant_id, YYYY-MM-DD), value = JSON-serialized DailySummary
const SUMMARIES_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("summaries");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// POS storage backed by redb
#[derive(Clone)]
pub struct PosStorage {
    db: Arc<Database>,
}

impl PosStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Create all tables so later read transactions never hit a missing table
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(RESTAURANTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(TABLE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(TAKEAWAY_COUNTERS_TABLE)?;
            let _ = write_txn.open_table(SUMMARIES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Commit a write transaction
    pub fn commit(&self, txn: WriteTransaction) -> StorageResult<()> {
        Ok(txn.commit()?)
    }

    // ========== Restaurant Operations ==========

    pub fn get_restaurant(&self, id: &str) -> StorageResult<Option<Restaurant>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESTAURANTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_restaurant_txn(
        &self,
        txn: &WriteTransaction,
        id: &str,
    ) -> StorageResult<Option<Restaurant>> {
        let table = txn.open_table(RESTAURANTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_restaurant_txn(
        &self,
        txn: &WriteTransaction,
        restaurant: &Restaurant,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(RESTAURANTS_TABLE)?;
        let value = serde_json::to_vec(restaurant)?;
        table.insert(restaurant.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Store a restaurant in its own transaction
    pub fn put_restaurant(&self, restaurant: &Restaurant) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.put_restaurant_txn(&txn, restaurant)?;
        txn.commit()?;
        Ok(())
    }

    // ========== Order Operations ==========

    pub fn get_order(&self, id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_order_txn(&self, txn: &WriteTransaction, id: &str) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn remove_order_txn(&self, txn: &WriteTransaction, id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.remove(id)?;
        Ok(())
    }

    /// All orders belonging to a restaurant (full scan)
    pub fn orders_for_restaurant(&self, restaurant_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.restaurant_id == restaurant_id {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    /// All orders belonging to a restaurant, inside a write transaction.
    /// Used by the table-freeing guard so the "any other active order on
    /// this label" check and the status write see the same state.
    pub fn orders_for_restaurant_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
    ) -> StorageResult<Vec<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.restaurant_id == restaurant_id {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    // ========== Active Dine-In Index ==========

    /// Order currently claiming a table, if any (within transaction)
    pub fn active_order_for_table_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
        table_label: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(TABLE_ORDERS_TABLE)?;
        Ok(table
            .get((restaurant_id, table_label))?
            .map(|guard| guard.value().to_string()))
    }

    /// Order currently claiming a table, if any (read-only)
    pub fn active_order_for_table(
        &self,
        restaurant_id: &str,
        table_label: &str,
    ) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_ORDERS_TABLE)?;
        Ok(table
            .get((restaurant_id, table_label))?
            .map(|guard| guard.value().to_string()))
    }

    /// Point the table index at an order
    pub fn claim_table_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
        table_label: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TABLE_ORDERS_TABLE)?;
        table.insert((restaurant_id, table_label), order_id)?;
        Ok(())
    }

    /// Drop the index entry, but only if it still points at `order_id`.
    /// A concurrent re-claim by another order must not be clobbered.
    pub fn release_table_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
        table_label: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TABLE_ORDERS_TABLE)?;
        let current = table
            .get((restaurant_id, table_label))?
            .map(|guard| guard.value().to_string());
        if current.as_deref() == Some(order_id) {
            table.remove((restaurant_id, table_label))?;
        }
        Ok(())
    }

    // ========== Takeaway Numbering ==========

    /// Allocate the next takeaway number for (restaurant, business date).
    /// Must be called inside the same transaction that stores the order,
    /// so a failed create never burns a persisted duplicate.
    pub fn next_takeaway_number_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
        date: &str,
    ) -> StorageResult<u64> {
        let mut table = txn.open_table(TAKEAWAY_COUNTERS_TABLE)?;
        let current = table
            .get((restaurant_id, date))?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert((restaurant_id, date), next)?;
        Ok(next)
    }

    // ========== Daily Summaries ==========

    /// Upsert a summary (full replace)
    pub fn put_summary(&self, summary: &DailySummary) -> StorageResult<()> {
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(SUMMARIES_TABLE)?;
            let value = serde_json::to_vec(summary)?;
            table.insert(
                (summary.restaurant_id.as_str(), summary.date.as_str()),
                value.as_slice(),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_summary(
        &self,
        restaurant_id: &str,
        date: &str,
    ) -> StorageResult<Option<DailySummary>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SUMMARIES_TABLE)?;
        match table.get((restaurant_id, date))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All stored summaries for a restaurant, ascending by date key
    pub fn summaries_for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> StorageResult<Vec<DailySummary>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SUMMARIES_TABLE)?;

        let mut summaries = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            if key.value().0 == restaurant_id {
                summaries.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(summaries)
    }
}
