use std::collections::BTreeSet;

use osavl_tree::{Cardinality, Error, NaturalOrder, Rank, Relation, Reversed, SortedList};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 400;

fn value_strategy() -> impl Strategy<Value = i64> {
    -500i64..500
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum ListOp {
    Insert(i64),
    Remove(i64),
    RemoveAt(usize),
    Snapshot,
}

fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        5 => value_strategy().prop_map(ListOp::Insert),
        3 => value_strategy().prop_map(ListOp::Remove),
        1 => any::<usize>().prop_map(ListOp::RemoveAt),
        2 => Just(ListOp::Snapshot),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random edits on a duplicate-admitting list and a sorted `Vec`,
    /// reading the snapshot in between to catch stale caches.
    #[test]
    fn list_ops_match_sorted_vec(ops in proptest::collection::vec(list_op_strategy(), TEST_SIZE)) {
        let mut list: SortedList<i64> = SortedList::with_cardinality(Cardinality::Duplicate);
        let mut model: Vec<i64> = Vec::new();

        for op in &ops {
            match *op {
                ListOp::Insert(value) => {
                    prop_assert!(list.insert(value));
                    let position = model.partition_point(|&v| v <= value);
                    model.insert(position, value);
                }
                ListOp::Remove(value) => {
                    let expected = model.iter().position(|&v| v == value).map(|position| model.remove(position));
                    prop_assert_eq!(list.remove(&value), expected);
                }
                ListOp::RemoveAt(which) => {
                    if model.is_empty() {
                        prop_assert_eq!(list.remove_at(which), Err(Error::OutOfBounds { index: which, len: 0 }));
                        continue;
                    }
                    let index = which % model.len();
                    prop_assert_eq!(list.remove_at(index), Ok(model.remove(index)));
                }
                ListOp::Snapshot => {
                    prop_assert_eq!(list.as_slice(), model.as_slice());
                }
            }
            prop_assert_eq!(list.len(), model.len());
        }

        prop_assert_eq!(list.as_slice(), model.as_slice());
        prop_assert!(list.iter().eq(model.iter()));
        prop_assert!(list.iter().rev().eq(model.iter().rev()));
    }

    #[test]
    fn neighbors_match_btreeset(
        values in proptest::collection::btree_set(value_strategy(), 1..200),
        target in value_strategy(),
    ) {
        let list: SortedList<i64> = values.iter().copied().collect();
        let model: &BTreeSet<i64> = &values;

        prop_assert_eq!(list.higher(&target).ok(), model.range(target + 1..).next());
        prop_assert_eq!(list.ceiling(&target).ok(), model.range(target..).next());
        prop_assert_eq!(list.lower(&target).ok(), model.range(..target).next_back());
        prop_assert_eq!(list.floor(&target).ok(), model.range(..=target).next_back());
    }

    #[test]
    fn index_by_rank_matches_vec(values in proptest::collection::vec(value_strategy(), 1..300)) {
        let mut list = SortedList::with_cardinality(Cardinality::Duplicate);
        list.extend(values.iter().copied());
        let mut sorted = values.clone();
        sorted.sort_unstable();

        for (rank, value) in sorted.iter().enumerate() {
            prop_assert_eq!(&list[Rank(rank)], value);
            let first = list.first_index_of(value).unwrap();
            let last = list.last_index_of(value).unwrap();
            prop_assert!(first <= rank && rank <= last);
        }
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn distinct_list_behaves_as_a_set() {
    let mut list = SortedList::new();
    assert!(list.insert(3));
    assert!(list.insert(1));
    assert!(!list.insert(3));
    assert_eq!(list.as_slice(), [1, 3]);
    assert!(list.contains(&1));
    assert!(!list.contains(&2));
    assert_eq!(list.count(&3), 1);
}

#[test]
fn snapshot_reflects_every_mutation() {
    let mut list = SortedList::from([5, 1, 3]);
    assert_eq!(list.as_slice(), [1, 3, 5]);
    list.insert(2);
    assert_eq!(list.as_slice(), [1, 2, 3, 5]);
    list.remove(&5);
    assert_eq!(list.as_slice(), [1, 2, 3]);
    list.remove_at(0).unwrap();
    assert_eq!(list.as_slice(), [2, 3]);
    list.clear();
    assert!(list.as_slice().is_empty());
}

#[test]
fn reversed_comparator_sorts_descending() {
    let mut list = SortedList::with_policy(Reversed(NaturalOrder), Cardinality::Duplicate);
    list.extend(["pear", "apple", "fig", "apple"]);
    assert_eq!(list.as_slice(), ["pear", "fig", "apple", "apple"]);
    assert_eq!(list.higher(&"fig"), Ok(&"apple"));
    assert_eq!(list.first(), Some(&"pear"));
    assert_eq!(list.last(), Some(&"apple"));
}

#[test]
fn empty_list_queries() {
    let list: SortedList<u8> = SortedList::default();
    assert!(list.is_empty());
    assert_eq!(list.first(), None);
    assert_eq!(list.get(0), Err(Error::OutOfBounds { index: 0, len: 0 }));
    assert_eq!(list.floor(&1), Err(Error::OutOfBounds { index: 0, len: 0 }));
    assert_eq!(list.index_of(&1), None);
}

#[test]
fn missing_neighbor_names_the_relation() {
    let list = SortedList::from([1, 2, 3]);
    assert_eq!(list.ceiling(&4), Err(Error::AbsentKey { relation: Relation::GreaterThanOrEqualTo }));
    assert_eq!(list.floor(&0), Err(Error::AbsentKey { relation: Relation::LessThanOrEqualTo }));
}

#[test]
fn clone_and_equality() {
    let list = SortedList::from(['c', 'a', 'b']);
    let copy = list.clone();
    assert_eq!(list, copy);
    assert_eq!(format!("{copy:?}"), "['a', 'b', 'c']");
    assert_eq!((&copy).into_iter().collect::<String>(), "abc");
}
