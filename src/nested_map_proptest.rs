#![cfg(test)]

// Property tests for NestedMap kept inside the crate so they can reach the
// bucket-level helpers.

use crate::error::MapError;
use crate::nested_map::NestedMap;
use crate::str_list::StrList;
use crate::value::Value;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// Tree model built on BTreeMap.
#[derive(Clone, Debug, PartialEq)]
enum Model {
    Str(String),
    Map(BTreeMap<String, Model>),
    List(Vec<String>),
}

#[derive(Clone, Debug)]
enum Op {
    InsertStr(Vec<usize>, String),
    InsertMap(Vec<usize>),
    InsertList(Vec<usize>, Vec<String>),
    Search(Vec<usize>),
    Resize(usize, f64),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{1,4}", 1..=6).prop_flat_map(|pool| {
        let n = pool.len();
        let path = proptest::collection::vec(0..n, 1..=3);
        let op = prop_oneof![
            4 => (path.clone(), "[a-z]{0,3}").prop_map(|(p, v)| Op::InsertStr(p, v)),
            1 => path.clone().prop_map(Op::InsertMap),
            1 => (path.clone(), proptest::collection::vec("[a-z]{0,2}", 0..4))
                .prop_map(|(p, l)| Op::InsertList(p, l)),
            3 => path.prop_map(Op::Search),
            1 => (0..n, 1.1f64..4.0).prop_map(|(i, f)| Op::Resize(i, f)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn keys_of<'a>(pool: &'a [String], idx: &[usize]) -> Vec<&'a str> {
    idx.iter().map(|&i| pool[i].as_str()).collect()
}

fn to_model(v: &Value) -> Model {
    match v {
        Value::Str(s) => Model::Str(s.clone()),
        Value::List(l) => Model::List(l.iter().map(str::to_owned).collect()),
        Value::Map(m) => Model::Map(m.iter().map(|(k, v)| (k.to_owned(), to_model(v))).collect()),
    }
}

fn model_of(m: &NestedMap) -> BTreeMap<String, Model> {
    m.iter().map(|(k, v)| (k.to_owned(), to_model(v))).collect()
}

/// Apply an insert to the model; `false` means a type conflict.
fn model_insert(root: &mut BTreeMap<String, Model>, path: &[&str], value: Model) -> bool {
    let (last, parents) = path.split_last().expect("non-empty path");
    let mut cur = root;
    for k in parents {
        let entry = cur
            .entry((*k).to_owned())
            .or_insert_with(|| Model::Map(BTreeMap::new()));
        cur = match entry {
            Model::Map(m) => m,
            _ => return false,
        };
    }
    cur.insert((*last).to_owned(), value);
    true
}

fn model_search<'a>(root: &'a BTreeMap<String, Model>, path: &[&str]) -> Option<&'a Model> {
    let (last, parents) = path.split_last()?;
    let mut cur = root;
    for k in parents {
        cur = match cur.get(*k)? {
            Model::Map(m) => m,
            _ => return None,
        };
    }
    cur.get(*last)
}

/// Structural checks on every level: unique keys, each key reachable through
/// its own bucket, entry count equal to what iteration yields.
fn check_structure(m: &NestedMap) -> Result<(), TestCaseError> {
    let keys: Vec<&str> = m.iter().map(|(k, _)| k).collect();
    prop_assert_eq!(keys.len(), m.len());
    let unique: BTreeSet<&str> = keys.iter().copied().collect();
    prop_assert_eq!(unique.len(), keys.len(), "duplicate key within one map");
    for (k, v) in m.iter() {
        let b = m.bucket_of(k).expect("map with entries has buckets");
        prop_assert!(m.find_in_bucket(b, k).is_some(), "key {} not in its bucket", k);
        if let Value::Map(child) = v {
            check_structure(child)?;
        }
    }
    Ok(())
}

// Property: state-machine equivalence against a BTreeMap tree model.
// Invariants exercised across random operation sequences:
// - insert creates intermediate maps, rejects descent through non-maps with
//   TypeConflict and otherwise stores/replaces the terminal value;
// - search agrees with the model, NotFound exactly when the model misses;
// - explicit resizes never lose or duplicate entries;
// - every level keeps unique keys, each reachable via its own bucket.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut = NestedMap::new();
        let mut model: BTreeMap<String, Model> = BTreeMap::new();

        for op in ops {
            match op {
                Op::InsertStr(p, v) => {
                    let path = keys_of(&pool, &p);
                    let ok = model_insert(&mut model, &path, Model::Str(v.clone()));
                    match sut.insert_str(&path, v) {
                        Ok(()) => prop_assert!(ok),
                        Err(MapError::TypeConflict { .. }) => prop_assert!(!ok),
                        Err(e) => prop_assert!(false, "unexpected error: {}", e),
                    }
                }
                Op::InsertMap(p) => {
                    let path = keys_of(&pool, &p);
                    let ok = model_insert(&mut model, &path, Model::Map(BTreeMap::new()));
                    prop_assert_eq!(sut.insert_map(&path).is_ok(), ok);
                }
                Op::InsertList(p, items) => {
                    let path = keys_of(&pool, &p);
                    let ok = model_insert(&mut model, &path, Model::List(items.clone()));
                    let list: StrList = items.into_iter().collect();
                    prop_assert_eq!(sut.insert_list(&path, list).is_ok(), ok);
                }
                Op::Search(p) => {
                    let path = keys_of(&pool, &p);
                    match (sut.search(&path), model_search(&model, &path)) {
                        (Ok(v), Some(mv)) => prop_assert_eq!(&to_model(v), mv),
                        (Err(e), None) => prop_assert!(e.is_not_found()),
                        (got, want) => prop_assert!(false, "search mismatch: {:?} vs {:?}", got, want),
                    }
                }
                Op::Resize(i, f) => {
                    // Resize the map at `pool[i]` if there is one, else the root.
                    let key = [pool[i].as_str()];
                    let nested = matches!(sut.search(&key), Ok(Value::Map(_)));
                    let target = if nested {
                        sut.search_mut(&key).unwrap().as_map_mut().unwrap()
                    } else {
                        &mut sut
                    };
                    let before = target.capacity();
                    target.resize(f).unwrap();
                    prop_assert!(target.capacity() >= before);
                }
                Op::Iterate => {
                    prop_assert_eq!(model_of(&sut), model.clone());
                }
            }

            check_structure(&sut)?;
            prop_assert_eq!(sut.len(), model.len());
        }
        prop_assert_eq!(model_of(&sut), model);
    }
}
