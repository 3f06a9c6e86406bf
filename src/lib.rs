//! An arena-backed AVL tree map for Rust.
//!
//! This crate provides [`AvlTreeMap`], an ordered map with the same shape as the standard
//! library's `BTreeMap`, stored as a self-balancing binary search tree. Every node tracks its
//! balance factor (the height of its right subtree minus the height of its left subtree), and
//! insertions and removals restore `-1 <= balance <= 1` with single and double rotations, so the
//! tree height never exceeds roughly `1.44 * log2(n + 2)`.
//!
//! # Example
//!
//! ```
//! use avl_tree::{AvlTreeMap, KeyNotFound};
//!
//! let mut scores = AvlTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard BTreeMap operations work as expected
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Strict lookups report a missing key as an error
//! assert_eq!(scores.try_get(&"Dave"), Err(KeyNotFound));
//!
//! // Three keys always fit in two levels
//! assert_eq!(scores.height(), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeMap`
//! - **Guaranteed O(log n)** - Insert, remove and lookup never degrade, even for sorted input
//! - **No `unsafe`** - Nodes live in an arena and link to each other by index
//!
//! # Implementation
//!
//! Nodes are kept in a slot arena owned by the map and refer to their parent and children by
//! compact handles. Insertion attaches a leaf and walks back up through parent links, stopping
//! as soon as a subtree's height is unchanged. Removal of a node with two children first trades
//! places with the in-order predecessor, then unlinks and walks up the same way, continuing past
//! a rotation whenever that rotation shortened the subtree.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
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
mod raw;

pub mod avl_tree_map;

pub use avl_tree_map::AvlTreeMap;
pub use error::KeyNotFound;
