use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;
use pathwatch::registry::SubscriptionTable;
use pathwatch::{Observer, observer_fn};

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
}

fn op_strategy(paths: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..paths).prop_map(Op::Add),
        1 => (0..paths).prop_map(Op::Remove),
    ]
}

fn path(idx: usize) -> PathBuf {
    PathBuf::from(format!("/watched/{idx}"))
}

fn noop() -> Arc<dyn Observer> {
    observer_fn(|_, _| {})
}

proptest! {
    // Drive the table the way the event loop does (append, else insert) and
    // compare against a plain count per path.
    #[test]
    fn table_matches_counting_model(ops in proptest::collection::vec(op_strategy(6), 0..64)) {
        let mut table = SubscriptionTable::new();
        let mut model: HashMap<PathBuf, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(idx) => {
                    let path = path(idx);
                    if let Err(observer) = table.append(&path, noop()) {
                        prop_assert!(!model.contains_key(&path));
                        table.insert(path.clone(), observer);
                    }
                    *model.entry(path).or_default() += 1;
                }
                Op::Remove(idx) => {
                    let path = path(idx);
                    let removed = table.remove(&path).map(|list| list.len());
                    prop_assert_eq!(removed, model.remove(&path));
                }
            }

            prop_assert_eq!(table.len(), model.len());
            prop_assert_eq!(table.is_empty(), model.is_empty());
            for (path, count) in &model {
                prop_assert!(table.contains(path));
                // Entries never exist without at least one observer.
                prop_assert!(*count >= 1);
                prop_assert_eq!(table.observer_count(path), *count);
            }
            for path in table.paths() {
                prop_assert!(model.contains_key(path));
            }
        }
    }
}
