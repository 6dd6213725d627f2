#![cfg(test)]

// Property tests for SymTable kept inside the crate so they can reach the
// hash helpers alongside the public surface.

use crate::error::InsertError;
use crate::hash::bucket_index;
use crate::sym_table::{Handle, SymTable};
use crate::tiers::Tier;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    InsertWith(usize, i32),
    Replace(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Traverse,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z0-9]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertWith(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z0-9]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Traverse),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_insert(
    model: &mut HashMap<String, i32>,
    live: &mut HashMap<String, Handle>,
    k: &str,
    v: i32,
    res: Result<Handle, InsertError>,
) -> Result<(), TestCaseError> {
    let already = model.contains_key(k);
    match res {
        Ok(h) => {
            prop_assert!(!already, "insert must fail on duplicate");
            prop_assert!(live.insert(k.to_string(), h).is_none());
            model.insert(k.to_string(), v);
        }
        Err(InsertError::DuplicateKey) => {
            prop_assert!(already, "duplicate error only when key exists");
        }
        Err(e) => prop_assert!(false, "unexpected error: {}", e),
    }
    Ok(())
}

// Runs `ops` against `sut` and a std HashMap model, checking after every op:
// - duplicate inserts are rejected and keep the first value;
// - replace/remove/get agree with the model, including on absent keys;
// - traversal visits each live binding exactly once;
// - stale handles never resolve; len/is_empty parity with the model;
// - the bucket count never shrinks and stays on the schedule.
fn run_against_model(
    sut: &mut SymTable<i32>,
    model: &mut HashMap<String, i32>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut live: HashMap<String, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();
    let mut last_buckets = sut.bucket_count();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let res = sut.insert(k, v);
                check_insert(model, &mut live, k, v, res)?;
            }
            OpI::InsertWith(i, v) => {
                let k = &pool[i];
                let res = sut.insert_with(k, || v);
                check_insert(model, &mut live, k, v, res)?;
            }
            OpI::Replace(i, v) => {
                let k = &pool[i];
                let prev = sut.replace(k, v);
                match model.get_mut(k) {
                    Some(mv) => {
                        prop_assert_eq!(prev, Some(*mv));
                        *mv = v;
                    }
                    None => prop_assert_eq!(prev, None),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k));
                if let Some(h) = live.remove(k) {
                    stale.push(h);
                }
                prop_assert!(!sut.contains(k));
                prop_assert!(sut.get(k).is_none());
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.find(k), live.get(k).copied());
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&h) = live.get(k) {
                    match h.value_mut(sut) {
                        Some(vr) => {
                            *vr = vr.saturating_add(d);
                            if let Some(mv) = model.get_mut(k) {
                                *mv = mv.saturating_add(d);
                            }
                        }
                        None => prop_assert!(false, "live handle should resolve"),
                    }
                }
            }
            OpI::Traverse => {
                let mut visited: BTreeMap<String, i32> = BTreeMap::new();
                let mut visits = 0usize;
                sut.traverse(|k, v| {
                    visits += 1;
                    visited.insert(k.to_string(), *v);
                });
                prop_assert_eq!(visits, model.len());
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(visited, expected);
            }
        }

        for &h in &stale {
            prop_assert!(h.value(sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.bucket_count() >= last_buckets);
        prop_assert_eq!(sut.bucket_count(), sut.tier().bucket_count());
        last_buckets = sut.bucket_count();
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: SymTable<i32> = SymTable::new();
        let mut model: HashMap<String, i32> = HashMap::new();
        run_against_model(&mut sut, &mut model, &pool, ops)?;
    }
}

// Same state machine, starting from a table one binding short of its resize
// trigger so that inserts in the op list cross the first tier boundary.
// Filler keys carry a `#` so they never clash with pool keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_across_growth((pool, ops) in arb_scenario()) {
        let mut sut: SymTable<i32> = SymTable::new();
        let mut model: HashMap<String, i32> = HashMap::new();
        for i in 0..(Tier::FIRST.bucket_count() - 1) {
            let k = format!("#{}", i);
            sut.insert(&k, i as i32).unwrap();
            model.insert(k, i as i32);
        }
        run_against_model(&mut sut, &mut model, &pool, ops)?;
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
}

// Property: iteration order is ascending bucket index, and the set of
// yielded keys equals the inserted set, for any resize history.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_iter_order_and_coverage(n in 0usize..1500, removals in proptest::collection::vec(0usize..1500, 0..50)) {
        let mut sut: SymTable<usize> = SymTable::new();
        let mut expected: BTreeSet<String> = BTreeSet::new();
        for i in 0..n {
            let k = format!("key-{}", i);
            sut.insert(&k, i).unwrap();
            expected.insert(k);
        }
        for r in removals {
            let k = format!("key-{}", r);
            prop_assert_eq!(sut.remove(&k).is_some(), expected.remove(&k));
        }

        let buckets = sut.bucket_count();
        let idxs: Vec<usize> = sut.iter().map(|(k, _)| bucket_index(k, buckets)).collect();
        prop_assert!(idxs.windows(2).all(|w| w[0] <= w[1]));

        let seen: BTreeSet<String> = sut.iter().map(|(k, _)| k.to_string()).collect();
        prop_assert_eq!(seen.len(), sut.len());
        prop_assert_eq!(seen, expected);
    }
}
