use super::*;
use shared::models::PaymentMethod;

#[test]
fn completing_a_dine_in_order_frees_the_table() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);
    let order = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 2)]))
        .unwrap();

    let completed = manager
        .complete(&order.id, Some(PaymentMethod::Cash))
        .unwrap();

    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(completed.payment_method, Some(PaymentMethod::Cash));
    assert!(completed.completed_at.is_some());
    assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Free);
    assert_eq!(manager.storage().active_order_for_table("r1", "T1").unwrap(), None);
}

#[test]
fn completing_twice_is_rejected() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);
    let order = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
        .unwrap();
    manager.complete(&order.id, Some(PaymentMethod::Card)).unwrap();

    let err = manager
        .complete(&order.id, Some(PaymentMethod::Cash))
        .unwrap_err();
    assert!(matches!(err, ManagerError::AlreadyCompleted(_)));

    // First payment method survives
    let stored = manager.storage().get_order(&order.id).unwrap().unwrap();
    assert_eq!(stored.payment_method, Some(PaymentMethod::Card));
}

#[test]
fn takeaway_status_moves_forward_only() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &[]);
    let order = manager
        .open_takeaway("r1", takeaway(vec![item("Samosa", 15.0, 2)]))
        .unwrap();

    let ready = manager
        .advance_status(&order.id, OrderStatus::Ready)
        .unwrap();
    assert_eq!(ready.status, OrderStatus::Ready);

    let err = manager
        .advance_status(&order.id, OrderStatus::Preparing)
        .unwrap_err();
    assert!(matches!(err, ManagerError::InvalidTransition(_)));

    let done = manager
        .advance_status(&order.id, OrderStatus::Completed)
        .unwrap();
    assert_eq!(done.status, OrderStatus::Completed);
    assert!(done.completed_at.is_some());

    let err = manager
        .advance_status(&order.id, OrderStatus::Ready)
        .unwrap_err();
    assert!(matches!(err, ManagerError::AlreadyCompleted(_)));
}

#[test]
fn preparing_can_skip_straight_to_completed() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &[]);
    let order = manager
        .open_takeaway("r1", takeaway(vec![item("Samosa", 15.0, 2)]))
        .unwrap();

    let done = manager
        .advance_status(&order.id, OrderStatus::Completed)
        .unwrap();
    assert_eq!(done.status, OrderStatus::Completed);
}

#[test]
fn dine_in_orders_cannot_use_the_preparation_ladder() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);
    let order = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
        .unwrap();

    let err = manager
        .advance_status(&order.id, OrderStatus::Ready)
        .unwrap_err();
    assert!(matches!(err, ManagerError::InvalidTransition(_)));
}

#[test]
fn deleting_a_live_order_frees_its_table() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);
    let order = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
        .unwrap();

    manager.delete(&order.id).unwrap();

    assert!(manager.storage().get_order(&order.id).unwrap().is_none());
    assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Free);
}

#[test]
fn completed_orders_cannot_be_deleted_or_edited() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);
    let order = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
        .unwrap();
    manager.complete(&order.id, None).unwrap();

    assert!(matches!(
        manager.delete(&order.id),
        Err(ManagerError::InvalidTransition(_))
    ));
    assert!(matches!(
        manager.update_items(&order.id, vec![item("Chai", 20.0, 1)], 20.0),
        Err(ManagerError::InvalidTransition(_))
    ));
}

#[test]
fn unknown_order_is_not_found() {
    let manager = test_manager();
    assert!(matches!(
        manager.complete("ghost", None),
        Err(ManagerError::NotFound(_))
    ));
    assert!(matches!(
        manager.advance_status("ghost", OrderStatus::Ready),
        Err(ManagerError::NotFound(_))
    ));
    assert!(matches!(manager.delete("ghost"), Err(ManagerError::NotFound(_))));
}

#[test]
fn active_listing_excludes_completed_and_takeaway() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1", "T2"]);

    let open = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
        .unwrap();
    let closed = manager
        .open_dine_in("r1", dine_in("T2", vec![item("Thali", 180.0, 1)]))
        .unwrap();
    manager.complete(&closed.id, Some(PaymentMethod::Cash)).unwrap();
    manager
        .open_takeaway("r1", takeaway(vec![item("Samosa", 15.0, 1)]))
        .unwrap();

    let active = manager.active_orders("r1").unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, open.id);
}

#[test]
fn digest_counts_all_stored_orders() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1"]);

    let order = manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
        .unwrap();
    manager.complete(&order.id, None).unwrap();
    manager
        .open_takeaway("r1", takeaway(vec![item("Samosa", 15.0, 1)]))
        .unwrap();

    let digest = manager.orders_digest("r1").unwrap();
    assert_eq!(digest.total, 2);
    assert_eq!(digest.completed, 1);
    assert_eq!(digest.active, 1);
    assert_eq!(digest.orders.len(), 2);
}

#[test]
fn rederive_repairs_drifted_table_status() {
    let manager = test_manager();
    seed_restaurant(&manager, "r1", &["T1", "T2"]);
    manager
        .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
        .unwrap();

    // Corrupt both directions
    let mut restaurant = manager.storage().get_restaurant("r1").unwrap().unwrap();
    restaurant.table_mut("T1").unwrap().status = TableStatus::Free;
    restaurant.table_mut("T2").unwrap().status = TableStatus::Occupied;
    manager.storage().put_restaurant(&restaurant).unwrap();

    let repaired = manager.rederive_table_status("r1").unwrap();
    assert_eq!(repaired.table("T1").unwrap().status, TableStatus::Occupied);
    assert_eq!(repaired.table("T2").unwrap().status, TableStatus::Free);
}
