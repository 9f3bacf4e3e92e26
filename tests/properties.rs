use std::collections::BTreeSet;

use proptest::prelude::*;
use sint::{InsertOutcome, Record, Tree};

/// Small key and label ranges so that operations collide often.
fn record_strategy() -> impl Strategy<Value = Record> {
    (-50i32..50, "[a-c]{1,2}").prop_map(|(key, label)| Record::try_new(key, &label).unwrap())
}

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(Record),
    Erase(Record),
    Contains(Record),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => record_strategy().prop_map(TreeOp::Insert),
        3 => record_strategy().prop_map(TreeOp::Erase),
        2 => record_strategy().prop_map(TreeOp::Contains),
    ]
}

fn assert_strictly_ascending(tree: &Tree) {
    let records: Vec<&Record> = tree.iter().collect();
    for pair in records.windows(2) {
        assert!(pair[0] < pair[1], "{} not before {}", pair[0], pair[1]);
    }
    assert_eq!(records.len(), tree.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Replays random operations on the tree and on a `BTreeSet` and checks
    /// that both agree after every step.
    #[test]
    fn ops_match_btreeset(ops in proptest::collection::vec(tree_op_strategy(), 1..400)) {
        let mut tree = Tree::new();
        let mut model: BTreeSet<Record> = BTreeSet::new();

        for op in ops {
            match op {
                TreeOp::Insert(record) => {
                    let expected = if model.insert(record.clone()) {
                        InsertOutcome::Inserted
                    } else {
                        InsertOutcome::Duplicate
                    };
                    prop_assert_eq!(tree.insert(record), expected);
                }
                TreeOp::Erase(record) => {
                    prop_assert_eq!(tree.erase(&record), model.remove(&record));
                    // the lookup key is still usable afterwards
                    prop_assert!(!tree.contains(&record));
                }
                TreeOp::Contains(record) => {
                    prop_assert_eq!(tree.contains(&record), model.contains(&record));
                }
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        assert_strictly_ascending(&tree);
        let in_order: Vec<Record> = tree.iter().cloned().collect();
        let expected: Vec<Record> = model.into_iter().collect();
        prop_assert_eq!(in_order, expected);
    }

    /// Inserting the same records twice leaves the contents unchanged.
    #[test]
    fn reinsert_is_idempotent(records in proptest::collection::vec(record_strategy(), 0..100)) {
        let mut tree = Tree::new();
        for record in &records {
            tree.insert(record.clone());
        }
        let before: Vec<Record> = tree.iter().cloned().collect();

        for record in records {
            prop_assert_eq!(tree.insert(record), InsertOutcome::Duplicate);
        }
        let after: Vec<Record> = tree.iter().cloned().collect();
        prop_assert_eq!(before, after);
    }

    /// insert → contains, erase → gone, erase again → not found.
    #[test]
    fn insert_erase_round_trip(
        existing in proptest::collection::vec(record_strategy(), 0..60),
        record in record_strategy(),
    ) {
        let mut tree = Tree::new();
        for r in existing {
            tree.insert(r);
        }

        tree.insert(record.clone());
        prop_assert!(tree.contains(&record));
        prop_assert!(tree.erase(&record));
        prop_assert!(!tree.contains(&record));
        prop_assert!(!tree.erase(&record));
        assert_strictly_ascending(&tree);
    }
}
