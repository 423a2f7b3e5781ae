//! Lifecycle manager tests against an in-memory database

mod test_concurrency;
mod test_dine_in;
mod test_lifecycle;

use chrono_tz::Asia::Kolkata;

use shared::models::{OrderItem, Restaurant, Table, TableStatus};
use shared::util::now_millis;

use super::*;
use crate::db::PosStorage;

pub(super) fn test_manager() -> OrderManager {
    OrderManager::new(PosStorage::open_in_memory().unwrap(), Kolkata)
}

pub(super) fn seed_restaurant(manager: &OrderManager, id: &str, labels: &[&str]) {
    let now = now_millis();
    let restaurant = Restaurant {
        id: id.to_string(),
        name: "Sharma Dhaba".to_string(),
        tables: labels
            .iter()
            .map(|label| Table {
                label: label.to_string(),
                seats: 4,
                area_name: "Main Hall".to_string(),
                status: TableStatus::Free,
            })
            .collect(),
        menu_items: vec![],
        expenses: vec![],
        created_at: now,
        updated_at: now,
    };
    manager.storage().put_restaurant(&restaurant).unwrap();
}

pub(super) fn item(name: &str, price: f64, quantity: i32) -> OrderItem {
    OrderItem {
        name: name.to_string(),
        price,
        quantity,
        total: price * quantity as f64,
    }
}

pub(super) fn dine_in(table_label: &str, items: Vec<OrderItem>) -> DineInOrderInput {
    let total_amount = items.iter().map(|i| i.total).sum();
    DineInOrderInput {
        table_label: table_label.to_string(),
        items,
        total_amount,
    }
}

pub(super) fn takeaway(items: Vec<OrderItem>) -> TakeawayOrderInput {
    let total_amount = items.iter().map(|i| i.total).sum();
    TakeawayOrderInput {
        items,
        total_amount,
        customer_name: None,
        customer_phone: None,
        existing_order_id: None,
    }
}

pub(super) fn table_status(manager: &OrderManager, restaurant_id: &str, label: &str) -> TableStatus {
    manager
        .storage()
        .get_restaurant(restaurant_id)
        .unwrap()
        .unwrap()
        .table(label)
        .unwrap()
        .status
}
