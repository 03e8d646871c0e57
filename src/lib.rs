//! AVL order-statistic trees for Rust.
//!
//! This crate provides a height-balanced binary search tree engine,
//! [`SortedTree`], together with the containers built on it:
//!
//! - [`SortedList`] - a sorted collection with optional duplicate elements
//! - [`SortedMap`] - a sorted map with independent key and value cardinality
//! - [`HashBucketMap`] - a chained hash map sharing the same error and
//!   cardinality vocabulary
//!
//! Beyond membership and ordered iteration, the tree answers positional
//! queries ([`get_at`](SortedTree::get_at), [`index_of`](SortedTree::index_of))
//! and ordered-neighbor queries ([`greater_than`](SortedTree::greater_than),
//! [`less_than_or_equal`](SortedTree::less_than_or_equal), ...).
//!
//! # Example
//!
//! ```
//! use osavl_tree::{Cardinality, Error, Rank, Relation, SortedList};
//!
//! let mut scores = SortedList::with_cardinality(Cardinality::Duplicate);
//! scores.extend([85, 100, 92, 85]);
//!
//! // Positional access
//! assert_eq!(scores.get(1), Ok(&85));
//! assert_eq!(scores[Rank(3)], 100);
//! assert_eq!(scores.first_index_of(&85), Some(0));
//! assert_eq!(scores.last_index_of(&85), Some(1));
//!
//! // Ordered-neighbor queries
//! assert_eq!(scores.higher(&85), Ok(&92));
//! assert_eq!(scores.higher(&100), Err(Error::AbsentKey { relation: Relation::GreaterThan }));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Pluggable ordering** - Any [`Comparator`], including closures
//! - **`tracing`** - Optional feature that emits `trace!` events for rotations
//!
//! # Implementation
//!
//! Nodes own their children through `Box`, cache their height, and compute
//! their subtree size on demand. Insertions and removals rebalance on the way
//! back up with single and double rotations.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod node;
mod order_statistic;
mod ordering;
mod raw;

pub mod hash_bucket_map;
pub mod sorted_list;
pub mod sorted_map;
pub mod sorted_tree;

pub use error::{Error, Relation, Result};
pub use hash_bucket_map::HashBucketMap;
pub use node::{ElementNode, Node, TreeNode};
pub use order_statistic::Rank;
pub use ordering::{Cardinality, Comparator, NaturalOrder, Reversed};
pub use sorted_list::SortedList;
pub use sorted_map::SortedMap;
pub use sorted_tree::SortedTree;
