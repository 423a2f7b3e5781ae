use super::*;

#[test]
fn opening_a_table_creates_active_order_and_occupies_it() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1", "T2"]);

    let order = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Paneer Tikka", 250.0, 2)]))
        .unwrap();

    assert_eq!(order.status, OrderStatus::Active);
    assert_eq!(order.order_type, OrderType::DineIn);
    assert_eq!(order.table_label, "T1");
    assert_eq!(order.total_amount, 500.0);
    assert!(order.order_number.is_none());
    assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Occupied);
    assert_eq!(table_status(&manager, "r1", "T2"), TableStatus::Free);
    assert_eq!(
        manager.storage().active_order_for_table("r1", "T1").unwrap(),
        Some(order.id)
    );
}

#[test]
fn second_open_on_same_table_amends_instead_of_duplicating() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);

    let first = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Dal Fry", 120.0, 1)]))
        .unwrap();
    let second = manager
        .open_dine_in(
            "r1",
            dine_in(
                "T1",
                vec![item("Dal Fry", 120.0, 1), item("Butter Naan", 40.0, 4)],
            ),
        )
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.total_amount, 280.0);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(manager.storage().orders_for_restaurant("r1").unwrap().len(), 1);
}

#[test]
fn same_label_on_another_restaurant_is_independent() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);
    seed_restaurant(&manager, "r2", &["T1"]);

    let a = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Chai", 20.0, 2)]))
        .unwrap();
    let b = manager
        .open_dine_in("r2", dine_in("T1", vec![item("Chai", 20.0, 2)]))
        .unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Occupied);
    assert_eq!(table_status(&manager, "r2", "T1"), TableStatus::Occupied);
}

#[test]
fn unknown_restaurant_or_table_is_rejected() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);

    let err = manager
        .open_dine_in("ghost", dine_in("T1", vec![item("Chai", 20.0, 1)]))
        .unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));

    let err = manager
        .open_dine_in("r1", dine_in("T9", vec![item("Chai", 20.0, 1)]))
        .unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));
}

#[test]
fn inconsistent_totals_are_rejected_before_any_write() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);

    let mut input = dine_in("T1", vec![item("Thali", 180.0, 2)]);
    input.total_amount = 999.0;
    let err = manager.open_dine_in("r1", input).unwrap_err();
    assert!(matches!(err, ManagerError::Validation(_)));

    // Nothing persisted, table untouched
    assert!(manager.storage().orders_for_restaurant("r1").unwrap().is_empty());
    assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Free);
}

#[test]
fn amending_heals_a_stale_free_table() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);
    manager
        .open_dine_in("r1", dine_in("T1", vec![item("Chai", 20.0, 1)]))
        .unwrap();

    // Simulate an interrupted write that left the table free
    let mut restaurant = manager.storage().get_restaurant("r1").unwrap().unwrap();
    restaurant.table_mut("T1").unwrap().status = TableStatus::Free;
    manager.storage().put_restaurant(&restaurant).unwrap();

    manager
        .open_dine_in("r1", dine_in("T1", vec![item("Chai", 20.0, 3)]))
        .unwrap();
    assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Occupied);
}
