// SymTable integration suite.
//
// Each test documents the behavior verified. Invariants exercised:
// - Uniqueness: duplicate inserts are no-ops that keep the first value.
// - Absence: get/contains/replace/remove on a missing key change nothing.
// - Growth: the tier advances one step when the binding count reaches the
//   bucket count, and never past the last tier.
// - Traversal: every live binding is visited exactly once.
mod common;

use std::collections::BTreeMap;
use symtable::{InsertError, SymTable, Tier, CAPACITY_TIERS};

// Test: the worked scenario over a four-key table.
// Verifies: get returns the bound index; remove returns the value and the
// key becomes absent.
#[test]
fn four_key_scenario() {
    common::init_test_logger();
    let mut t: SymTable<usize> = SymTable::new();
    for (i, k) in ["2", "7", "11", "15"].iter().enumerate() {
        t.insert(k, i).unwrap();
    }
    assert_eq!(t.get("11"), Some(&2));
    assert!(!t.contains("9"));
    assert_eq!(t.remove("7"), Some(1));
    assert!(!t.contains("7"));
    assert_eq!(t.len(), 3);
}

// Test: distinct inserts are all counted; repeats are not.
#[test]
fn len_counts_distinct_inserts() {
    common::init_test_logger();
    let mut t: SymTable<u32> = SymTable::new();
    let mut created = 0;
    for round in 0..3u32 {
        for i in 0..200u32 {
            match t.insert(&format!("k{}", i), round) {
                Ok(_) => created += 1,
                Err(InsertError::DuplicateKey) => assert!(round > 0),
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
    }
    assert_eq!(created, 200);
    assert_eq!(t.len(), 200);
    assert!(t.iter().all(|(_, v)| *v == 0));
}

// Test: operations on absent keys leave the table unchanged.
#[test]
fn absent_key_operations_are_no_ops() {
    common::init_test_logger();
    let mut t: SymTable<i32> = SymTable::new();
    t.insert("present", 1).unwrap();
    let before: Vec<(String, i32)> = t.iter().map(|(k, v)| (k.to_string(), *v)).collect();

    assert_eq!(t.get("absent"), None);
    assert_eq!(t.get_mut("absent"), None);
    assert_eq!(t.replace("absent", 5), None);
    assert_eq!(t.remove("absent"), None);
    assert!(t.find("absent").is_none());

    let after: Vec<(String, i32)> = t.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    assert_eq!(before, after);
    assert_eq!(t.len(), 1);
}

// Test: filling the first tier and inserting one more key.
// Verifies: tier moves 509 -> 1021 exactly once and all 510 keys resolve.
#[test]
fn first_growth_keeps_all_keys() {
    common::init_test_logger();
    let mut t: SymTable<usize> = SymTable::new();
    for i in 0..509 {
        t.insert(&i.to_string(), i).unwrap();
    }
    assert_eq!(t.bucket_count(), 509);

    t.insert("509", 509).unwrap();
    assert_eq!(t.bucket_count(), 1021);
    assert_eq!(t.tier(), Tier::FIRST.next().unwrap());
    for i in 0..510 {
        let k = i.to_string();
        assert!(t.contains(&k));
        assert_eq!(t.get(&k), Some(&i));
    }
}

// Test: growth through the whole schedule and past its end.
// Verifies: each tier is visited in order, the last tier is terminal and
// the table keeps accepting keys in longer chains.
#[test]
fn growth_saturates_at_last_tier() {
    common::init_test_logger();
    let mut t: SymTable<usize> = SymTable::new();
    let mut seen = vec![t.bucket_count()];
    let total = Tier::LAST.bucket_count() + 1000;
    for i in 0..total {
        t.insert(&format!("key{}", i), i).unwrap();
        if *seen.last().unwrap() != t.bucket_count() {
            seen.push(t.bucket_count());
        }
    }
    assert_eq!(seen, CAPACITY_TIERS.to_vec());
    assert_eq!(t.tier(), Tier::LAST);
    assert_eq!(t.len(), total);

    let stats = t.chain_stats();
    assert_eq!(stats.bucket_count, Tier::LAST.bucket_count());
    assert!(stats.longest_chain >= 2);

    for i in (0..total).step_by(97) {
        assert_eq!(t.get(&format!("key{}", i)), Some(&i));
    }
}

// Test: traversal after a growth and interleaved removals.
// Verifies: the visited pairs equal the live bindings, each seen once.
#[test]
fn traverse_visits_live_bindings_once() {
    common::init_test_logger();
    let mut t: SymTable<usize> = SymTable::new();
    let mut model = BTreeMap::new();
    for i in 0..1500 {
        let k = format!("t{}", i);
        t.insert(&k, i).unwrap();
        model.insert(k, i);
    }
    for i in (0..1500).step_by(3) {
        let k = format!("t{}", i);
        assert_eq!(t.remove(&k), model.remove(&k));
    }

    let mut visited = BTreeMap::new();
    t.traverse(|k, v| {
        let first = visited.insert(k.to_string(), *v).is_none();
        assert!(first, "visited twice: {}", k);
    });
    assert_eq!(visited, model);
}

// Test: replace keeps length and chain placement.
#[test]
fn replace_keeps_binding_in_place() {
    common::init_test_logger();
    let mut t: SymTable<&str> = SymTable::new();
    for k in ["a", "b", "c"] {
        t.insert(k, k).unwrap();
    }
    let order_before: Vec<String> = t.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(t.replace("b", "B"), Some("b"));
    let order_after: Vec<String> = t.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(order_before, order_after);
    assert_eq!(t.len(), 3);
    assert_eq!(t.get("b"), Some(&"B"));
}

// Test: removed keys can be bound again with a fresh value.
#[test]
fn remove_then_reinsert() {
    common::init_test_logger();
    let mut t: SymTable<i32> = SymTable::new();
    let h1 = t.insert("k", 1).unwrap();
    assert_eq!(t.remove("k"), Some(1));
    assert!(h1.value(&t).is_none());
    let h2 = t.insert("k", 2).unwrap();
    assert_ne!(h1, h2);
    assert_eq!(t.get("k"), Some(&2));
}

// Test: the table is not internally synchronized but can move across
// threads or sit behind an external lock when its values allow it.
#[test]
fn external_lock_serializes_access() {
    use std::sync::{Arc, Mutex};
    use std::thread;

    common::init_test_logger();
    let shared = Arc::new(Mutex::new(SymTable::<usize>::new()));
    let workers: Vec<_> = (0..4)
        .map(|w| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..250 {
                    let mut t = shared.lock().unwrap();
                    t.insert(&format!("w{}-{}", w, i), i).unwrap();
                }
            })
        })
        .collect();
    for h in workers {
        h.join().unwrap();
    }
    let t = shared.lock().unwrap();
    assert_eq!(t.len(), 1000);
    assert_eq!(t.bucket_count(), 1021);
}
