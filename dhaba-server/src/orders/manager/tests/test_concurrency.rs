use std::sync::Arc;
use std::thread;

use super::*;

#[test]
fn concurrent_opens_on_one_table_yield_one_order() {
    let manager = Arc::new(test_manager());
    seed_restaurant(&manager, "r1", &["T1"]);

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                manager.open_dine_in("r1", dine_in("T1", vec![item("Chai", 20.0, n + 1)]))
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Every attempt lands on the same order
    assert!(results.iter().all(|r| r.is_ok()));
    let ids: Vec<_> = results.iter().map(|r| r.as_ref().unwrap().id.clone()).collect();
    assert!(ids.iter().all(|id| id == &ids[0]));
    assert_eq!(manager.storage().orders_for_restaurant("r1").unwrap().len(), 1);
    assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Occupied);
}

#[test]
fn concurrent_takeaway_creation_never_duplicates_numbers() {
    let manager = Arc::new(test_manager());
    seed_restaurant(&manager, "r1", &[]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                (0..5)
                    .map(|_| {
                        manager
                            .open_takeaway("r1", takeaway(vec![item("Samosa", 15.0, 1)]))
                            .unwrap()
                            .order_number
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut numbers: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 20);
    assert_eq!(numbers.first().map(String::as_str), Some("TO-001"));
    assert_eq!(numbers.last().map(String::as_str), Some("TO-020"));
}

#[test]
fn concurrent_complete_and_reopen_keep_index_consistent() {
    let manager = Arc::new(test_manager());
    seed_restaurant(&manager, "r1", &["T1"]);

    for _ in 0..10 {
        let order = manager
            .open_dine_in("r1", dine_in("T1", vec![item("Thali", 180.0, 1)]))
            .unwrap();
        let completer = {
            let manager = Arc::clone(&manager);
            let id = order.id.clone();
            thread::spawn(move || manager.complete(&id, None))
        };
        let opener = {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                manager.open_dine_in("r1", dine_in("T1", vec![item("Chai", 20.0, 1)]))
            })
        };
        completer.join().unwrap().unwrap();
        let reopened = opener.join().unwrap().unwrap();

        // Whatever the interleaving, the index and table status agree
        let index = manager.storage().active_order_for_table("r1", "T1").unwrap();
        match index {
            Some(ref id) => {
                assert_eq!(id, &reopened.id);
                assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Occupied);
                manager.complete(id, None).unwrap();
            }
            None => {
                assert_eq!(table_status(&manager, "r1", "T1"), TableStatus::Free);
            }
        }
    }
}
