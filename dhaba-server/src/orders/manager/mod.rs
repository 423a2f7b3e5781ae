//! Order lifecycle manager
//!
//! Single write path for orders, the active dine-in table index, and
//! table status. Every mutation runs inside one redb write transaction,
//! so "one active order per table", takeaway numbering, and table
//! occupancy can never be observed half-applied.
//!
//! Dine-in orders are created `Active` and stay there until completion.
//! Takeaway orders are created `Preparing` and advance forward only:
//! `Preparing -> Ready -> Completed` (skipping `Ready` is allowed).
//! Completed orders are immutable history.

mod error;

#[cfg(test)]
mod tests;

pub use error::{ManagerError, ManagerResult};

use chrono_tz::Tz;
use redb::WriteTransaction;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use shared::models::{
    MenuItem, Order, OrderItem, OrderStatus, OrderType, PaymentMethod, Restaurant, Table,
    TableCreate, TableStatus,
};
use shared::util::now_millis;

use crate::db::PosStorage;
use crate::orders::money;
use crate::utils::time::{current_business_date, day_end_millis, day_start_millis, format_date};

/// Payload for opening (or amending) a dine-in order on a table
#[derive(Debug, Clone)]
pub struct DineInOrderInput {
    pub table_label: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
}

/// Payload for creating a takeaway order
#[derive(Debug, Clone)]
pub struct TakeawayOrderInput {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    /// When set, amend this order instead of allocating a new number
    pub existing_order_id: Option<String>,
}

/// Compact per-order row for the all-orders digest
#[derive(Debug, Serialize)]
pub struct OrderBrief {
    pub id: String,
    pub table_label: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Diagnostic digest of every stored order for a restaurant
#[derive(Debug, Serialize)]
pub struct OrdersDigest {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub orders: Vec<OrderBrief>,
}

pub struct OrderManager {
    storage: PosStorage,
    tz: Tz,
}

impl OrderManager {
    pub fn new(storage: PosStorage, tz: Tz) -> Self {
        Self { storage, tz }
    }

    pub fn storage(&self) -> &PosStorage {
        &self.storage
    }

    // ========== Create / Amend ==========

    /// Open a dine-in order on a table, or amend the one already open.
    ///
    /// If the table index holds an active order, its items and total are
    /// replaced. Otherwise a new order claims the table and the table
    /// flips to occupied, all in one transaction.
    pub fn open_dine_in(
        &self,
        restaurant_id: &str,
        input: DineInOrderInput,
    ) -> ManagerResult<Order> {
        money::validate_items(&input.items, input.total_amount)?;

        let txn = self.storage.begin_write()?;
        let mut restaurant = self.require_restaurant_txn(&txn, restaurant_id)?;
        if restaurant.table(&input.table_label).is_none() {
            return Err(ManagerError::NotFound(format!(
                "table '{}' not found in restaurant {}",
                input.table_label, restaurant_id
            )));
        }

        let now = now_millis();
        let existing =
            self.storage
                .active_order_for_table_txn(&txn, restaurant_id, &input.table_label)?;

        let order = match existing {
            Some(order_id) => {
                let mut order =
                    self.storage
                        .get_order_txn(&txn, &order_id)?
                        .ok_or_else(|| {
                            ManagerError::Conflict(format!(
                                "table index points at missing order {}",
                                order_id
                            ))
                        })?;
                order.items = input.items;
                order.total_amount = input.total_amount;
                order.updated_at = now;
                self.storage.put_order_txn(&txn, &order)?;

                // An occupied index entry with a free table means an
                // earlier write was interrupted; heal it here.
                if let Some(table) = restaurant.table_mut(&input.table_label)
                    && table.status != TableStatus::Occupied
                {
                    warn!(
                        restaurant_id,
                        table_label = %input.table_label,
                        "table had an active order but read free, repairing status"
                    );
                    table.status = TableStatus::Occupied;
                    restaurant.updated_at = now;
                    self.storage.put_restaurant_txn(&txn, &restaurant)?;
                }
                info!(order_id = %order.id, table_label = %order.table_label, "dine-in order amended");
                order
            }
            None => {
                let order = Order {
                    id: Uuid::new_v4().to_string(),
                    restaurant_id: restaurant_id.to_string(),
                    table_label: input.table_label.clone(),
                    order_type: OrderType::DineIn,
                    order_number: None,
                    customer_name: None,
                    customer_phone: None,
                    items: input.items,
                    total_amount: input.total_amount,
                    status: OrderStatus::Active,
                    payment_method: None,
                    created_at: now,
                    updated_at: now,
                    completed_at: None,
                };
                self.storage.put_order_txn(&txn, &order)?;
                self.storage
                    .claim_table_txn(&txn, restaurant_id, &input.table_label, &order.id)?;

                if let Some(table) = restaurant.table_mut(&input.table_label) {
                    table.status = TableStatus::Occupied;
                }
                restaurant.updated_at = now;
                self.storage.put_restaurant_txn(&txn, &restaurant)?;

                info!(order_id = %order.id, table_label = %order.table_label, "dine-in order opened");
                order
            }
        };

        self.storage.commit(txn)?;
        Ok(order)
    }

    /// Create a takeaway order with a daily sequential number, or amend
    /// an existing one when `existing_order_id` is set.
    ///
    /// Numbers are `TO-001`, `TO-002`, ... per restaurant per business
    /// date. The counter bump and the order insert commit together, so a
    /// failed create never burns a number.
    pub fn open_takeaway(
        &self,
        restaurant_id: &str,
        input: TakeawayOrderInput,
    ) -> ManagerResult<Order> {
        if let Some(order_id) = &input.existing_order_id {
            return self.amend_takeaway(restaurant_id, order_id, input.items, input.total_amount);
        }
        money::validate_items(&input.items, input.total_amount)?;

        let txn = self.storage.begin_write()?;
        // Existence check only; takeaway does not touch the table registry
        self.require_restaurant_txn(&txn, restaurant_id)?;

        let now = now_millis();
        let date = format_date(current_business_date(self.tz));
        let seq = self
            .storage
            .next_takeaway_number_txn(&txn, restaurant_id, &date)?;
        let order_number = format!("TO-{:03}", seq);

        let order = Order {
            id: Uuid::new_v4().to_string(),
            restaurant_id: restaurant_id.to_string(),
            table_label: format!("TAKEAWAY-{}", order_number),
            order_type: OrderType::Takeaway,
            order_number: Some(order_number),
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            items: input.items,
            total_amount: input.total_amount,
            status: OrderStatus::Preparing,
            payment_method: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.storage.put_order_txn(&txn, &order)?;
        self.storage.commit(txn)?;

        info!(
            order_id = %order.id,
            order_number = order.order_number.as_deref().unwrap_or(""),
            "takeaway order created"
        );
        Ok(order)
    }

    /// Amend an existing takeaway order. The order must belong to the
    /// requesting restaurant and actually be a takeaway; the number is
    /// never reallocated.
    fn amend_takeaway(
        &self,
        restaurant_id: &str,
        order_id: &str,
        items: Vec<OrderItem>,
        total_amount: f64,
    ) -> ManagerResult<Order> {
        money::validate_items(&items, total_amount)?;

        let txn = self.storage.begin_write()?;
        let mut order = self.require_order_txn(&txn, order_id)?;
        if order.restaurant_id != restaurant_id {
            return Err(ManagerError::NotFound(format!(
                "order {} not found in restaurant {}",
                order_id, restaurant_id
            )));
        }
        if order.order_type != OrderType::Takeaway {
            return Err(ManagerError::Conflict(format!(
                "order {} is not a takeaway order",
                order_id
            )));
        }
        if order.status.is_terminal() {
            return Err(ManagerError::InvalidTransition(format!(
                "order {} is completed and cannot be edited",
                order_id
            )));
        }
        order.items = items;
        order.total_amount = total_amount;
        order.updated_at = now_millis();
        self.storage.put_order_txn(&txn, &order)?;
        self.storage.commit(txn)?;

        info!(order_id, "takeaway order amended");
        Ok(order)
    }

    /// Replace the item list and total of a non-completed order
    pub fn update_items(
        &self,
        order_id: &str,
        items: Vec<OrderItem>,
        total_amount: f64,
    ) -> ManagerResult<Order> {
        money::validate_items(&items, total_amount)?;

        let txn = self.storage.begin_write()?;
        let mut order = self.require_order_txn(&txn, order_id)?;
        if order.status.is_terminal() {
            return Err(ManagerError::InvalidTransition(format!(
                "order {} is completed and cannot be edited",
                order_id
            )));
        }
        order.items = items;
        order.total_amount = total_amount;
        order.updated_at = now_millis();
        self.storage.put_order_txn(&txn, &order)?;
        self.storage.commit(txn)?;

        info!(order_id, "order items updated");
        Ok(order)
    }

    // ========== Lifecycle ==========

    /// Advance a takeaway order's preparation status.
    ///
    /// Forward-only; advancing to `Completed` finalizes the order with no
    /// payment method recorded.
    pub fn advance_status(&self, order_id: &str, next: OrderStatus) -> ManagerResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self.require_order_txn(&txn, order_id)?;

        if order.status == OrderStatus::Completed {
            return Err(ManagerError::AlreadyCompleted(order_id.to_string()));
        }
        if !order.status.can_advance(next) {
            return Err(ManagerError::InvalidTransition(format!(
                "cannot move order {} from {:?} to {:?}",
                order_id, order.status, next
            )));
        }

        if next == OrderStatus::Completed {
            self.finalize_txn(&txn, &mut order, None)?;
        } else {
            order.status = next;
            order.updated_at = now_millis();
            self.storage.put_order_txn(&txn, &order)?;
        }
        self.storage.commit(txn)?;

        info!(order_id, status = ?order.status, "order status advanced");
        Ok(order)
    }

    /// Complete an order, recording the payment method.
    ///
    /// For dine-in this releases the table claim and frees the table,
    /// unless some other non-completed order still sits on the same label.
    pub fn complete(
        &self,
        order_id: &str,
        payment_method: Option<PaymentMethod>,
    ) -> ManagerResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self.require_order_txn(&txn, order_id)?;
        if order.status == OrderStatus::Completed {
            return Err(ManagerError::AlreadyCompleted(order_id.to_string()));
        }
        self.finalize_txn(&txn, &mut order, payment_method)?;
        self.storage.commit(txn)?;

        info!(order_id, total_amount = order.total_amount, "order completed");
        Ok(order)
    }

    /// Delete a non-completed order. Completed orders are history and
    /// cannot be deleted.
    pub fn delete(&self, order_id: &str) -> ManagerResult<()> {
        let txn = self.storage.begin_write()?;
        let order = self.require_order_txn(&txn, order_id)?;
        if order.status == OrderStatus::Completed {
            return Err(ManagerError::InvalidTransition(format!(
                "order {} is completed and cannot be deleted",
                order_id
            )));
        }
        self.storage.remove_order_txn(&txn, order_id)?;
        if order.order_type == OrderType::DineIn {
            self.free_table_if_unreferenced_txn(&txn, &order)?;
        }
        self.storage.commit(txn)?;

        info!(order_id, "order deleted");
        Ok(())
    }

    fn finalize_txn(
        &self,
        txn: &WriteTransaction,
        order: &mut Order,
        payment_method: Option<PaymentMethod>,
    ) -> ManagerResult<()> {
        let now = now_millis();
        order.status = OrderStatus::Completed;
        order.payment_method = payment_method;
        order.completed_at = Some(now);
        order.updated_at = now;
        self.storage.put_order_txn(txn, order)?;

        if order.order_type == OrderType::DineIn {
            self.free_table_if_unreferenced_txn(txn, order)?;
        }
        Ok(())
    }

    /// Release the table index entry held by `order` and flip the table
    /// back to free, but only when no other live order references the
    /// same label.
    fn free_table_if_unreferenced_txn(
        &self,
        txn: &WriteTransaction,
        order: &Order,
    ) -> ManagerResult<()> {
        self.storage
            .release_table_txn(txn, &order.restaurant_id, &order.table_label, &order.id)?;

        let still_referenced = self
            .storage
            .orders_for_restaurant_txn(txn, &order.restaurant_id)?
            .iter()
            .any(|other| {
                other.id != order.id
                    && other.order_type == OrderType::DineIn
                    && other.table_label == order.table_label
                    && !other.status.is_terminal()
            });
        if still_referenced {
            warn!(
                table_label = %order.table_label,
                "table still referenced by another live order, leaving occupied"
            );
            return Ok(());
        }

        if let Some(mut restaurant) = self
            .storage
            .get_restaurant_txn(txn, &order.restaurant_id)?
            && let Some(table) = restaurant.table_mut(&order.table_label)
        {
            table.status = TableStatus::Free;
            restaurant.updated_at = now_millis();
            self.storage.put_restaurant_txn(txn, &restaurant)?;
        }
        Ok(())
    }

    // ========== Table Registry ==========

    /// Add a table to a restaurant. Labels are unique per restaurant.
    pub fn add_table(&self, restaurant_id: &str, input: TableCreate) -> ManagerResult<Restaurant> {
        let label = input.label.trim().to_string();
        if label.is_empty() {
            return Err(ManagerError::Validation(
                "table label must not be empty".to_string(),
            ));
        }
        if input.seats <= 0 {
            return Err(ManagerError::Validation(format!(
                "seats must be positive, got {}",
                input.seats
            )));
        }

        let txn = self.storage.begin_write()?;
        let mut restaurant = self.require_restaurant_txn(&txn, restaurant_id)?;
        if restaurant.table(&label).is_some() {
            return Err(ManagerError::Conflict(format!(
                "table '{}' already exists",
                label
            )));
        }
        restaurant.tables.push(Table {
            label: label.clone(),
            seats: input.seats,
            area_name: input.area_name,
            status: TableStatus::Free,
        });
        restaurant.updated_at = now_millis();
        self.storage.put_restaurant_txn(&txn, &restaurant)?;
        self.storage.commit(txn)?;

        info!(restaurant_id, table_label = %label, "table added");
        Ok(restaurant)
    }

    /// Remove a table. Refused while an active order claims it; the
    /// server-side check is authoritative regardless of what the client
    /// believes the table status to be.
    pub fn remove_table(&self, restaurant_id: &str, label: &str) -> ManagerResult<Restaurant> {
        let txn = self.storage.begin_write()?;
        let mut restaurant = self.require_restaurant_txn(&txn, restaurant_id)?;
        if restaurant.table(label).is_none() {
            return Err(ManagerError::NotFound(format!(
                "table '{}' not found in restaurant {}",
                label, restaurant_id
            )));
        }
        if self
            .storage
            .active_order_for_table_txn(&txn, restaurant_id, label)?
            .is_some()
        {
            return Err(ManagerError::Conflict(format!(
                "table '{}' has an active order",
                label
            )));
        }
        restaurant.tables.retain(|t| t.label != label);
        restaurant.updated_at = now_millis();
        self.storage.put_restaurant_txn(&txn, &restaurant)?;
        self.storage.commit(txn)?;

        info!(restaurant_id, table_label = %label, "table removed");
        Ok(restaurant)
    }

    /// Replace the menu wholesale. Completed orders keep their item
    /// names, so dropping a dish never rewrites history.
    pub fn replace_menu(
        &self,
        restaurant_id: &str,
        menu_items: Vec<MenuItem>,
    ) -> ManagerResult<Restaurant> {
        let mut seen = std::collections::HashSet::new();
        for item in &menu_items {
            if item.name.trim().is_empty() {
                return Err(ManagerError::Validation(
                    "menu item name must not be empty".to_string(),
                ));
            }
            if !item.price.is_finite() || item.price <= 0.0 {
                return Err(ManagerError::Validation(format!(
                    "price must be positive for menu item '{}', got {}",
                    item.name, item.price
                )));
            }
            if !seen.insert(item.name.trim().to_string()) {
                return Err(ManagerError::Conflict(format!(
                    "duplicate menu item '{}'",
                    item.name
                )));
            }
        }

        let txn = self.storage.begin_write()?;
        let mut restaurant = self.require_restaurant_txn(&txn, restaurant_id)?;
        restaurant.menu_items = menu_items;
        restaurant.updated_at = now_millis();
        self.storage.put_restaurant_txn(&txn, &restaurant)?;
        self.storage.commit(txn)?;

        info!(
            restaurant_id,
            items = restaurant.menu_items.len(),
            "menu replaced"
        );
        Ok(restaurant)
    }

    /// Recompute every table's status from the live orders on record.
    /// Self-healing path for state left behind by interrupted writes.
    pub fn rederive_table_status(&self, restaurant_id: &str) -> ManagerResult<Restaurant> {
        let txn = self.storage.begin_write()?;
        let mut restaurant = self.require_restaurant_txn(&txn, restaurant_id)?;
        let orders = self.storage.orders_for_restaurant_txn(&txn, restaurant_id)?;

        let mut repaired = 0;
        for table in &mut restaurant.tables {
            let occupied = orders.iter().any(|o| {
                o.order_type == OrderType::DineIn
                    && o.table_label == table.label
                    && !o.status.is_terminal()
            });
            let derived = if occupied {
                TableStatus::Occupied
            } else {
                TableStatus::Free
            };
            if table.status != derived {
                repaired += 1;
                table.status = derived;
            }
        }
        if repaired > 0 {
            warn!(restaurant_id, repaired, "table statuses rederived from live orders");
            restaurant.updated_at = now_millis();
            self.storage.put_restaurant_txn(&txn, &restaurant)?;
        }
        self.storage.commit(txn)?;
        Ok(restaurant)
    }

    // ========== Reads ==========

    /// Dine-in orders still open (status `active`)
    pub fn active_orders(&self, restaurant_id: &str) -> ManagerResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .storage
            .orders_for_restaurant(restaurant_id)?
            .into_iter()
            .filter(|o| o.status == OrderStatus::Active)
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Takeaway orders created on the current business date, newest first
    pub fn takeaway_orders_today(&self, restaurant_id: &str) -> ManagerResult<Vec<Order>> {
        let date = current_business_date(self.tz);
        let start = day_start_millis(date, self.tz);
        let end = day_end_millis(date, self.tz);

        let mut orders: Vec<Order> = self
            .storage
            .orders_for_restaurant(restaurant_id)?
            .into_iter()
            .filter(|o| {
                o.order_type == OrderType::Takeaway && o.created_at >= start && o.created_at < end
            })
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Compact digest of every stored order, for diagnostics
    pub fn orders_digest(&self, restaurant_id: &str) -> ManagerResult<OrdersDigest> {
        let mut orders = self.storage.orders_for_restaurant(restaurant_id)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = orders.len();
        let completed = orders.iter().filter(|o| o.status.is_terminal()).count();
        let briefs = orders
            .into_iter()
            .map(|o| OrderBrief {
                id: o.id,
                table_label: o.table_label,
                order_type: o.order_type,
                status: o.status,
                total_amount: o.total_amount,
                created_at: o.created_at,
                updated_at: o.updated_at,
            })
            .collect();

        Ok(OrdersDigest {
            total,
            active: total - completed,
            completed,
            orders: briefs,
        })
    }

    // ========== Helpers ==========

    fn require_restaurant_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
    ) -> ManagerResult<Restaurant> {
        self.storage
            .get_restaurant_txn(txn, restaurant_id)?
            .ok_or_else(|| {
                ManagerError::NotFound(format!("restaurant {} not found", restaurant_id))
            })
    }

    fn require_order_txn(&self, txn: &WriteTransaction, order_id: &str) -> ManagerResult<Order> {
        self.storage
            .get_order_txn(txn, order_id)?
            .ok_or_else(|| ManagerError::NotFound(format!("order {} not found", order_id)))
    }
}
