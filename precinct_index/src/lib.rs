// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=precinct_index --heading-base-level=0

//! Precinct Index: a 3D AABB containment index for zones.
//!
//! Precinct Index answers "which items contain this point" for a set of keyed
//! volumes.
//!
//! - Insert, replace, and remove keyed [`Region`]s; every mutation rebuilds the tree.
//! - Query by point ([`PartitionTree::query_point`]) or by integer cell ([`PartitionTree::query_cell`]).
//! - Memoize cell queries with a bounded [`QueryCache`], or use [`CachedIndex`] to get the
//!   tree and cache as one unit that clears itself on mutation.
//!
//! It does not depend on any geometry crate: items only need to produce an [`Aabb3D`]
//! and, optionally, an exact containment test.
//!
//! ## Partitioning
//!
//! [`PartitionTree`] splits alternately on the x and z axes, comparing first the
//! minimum and then the maximum faces of the boxes. The vertical axis is never
//! split; it is assumed to be short compared to the horizontal ones, and it is
//! checked by the exact test in the leaves. Boxes spanning a divider go to both
//! sides. A branch that fails to shrink for [`TreeConfig::stable_depth`]
//! consecutive levels becomes a leaf, as does a branch whose share of the
//! [`TreeConfig::duplication`] slot budget is spent. The budget keeps nested
//! regions, which land on both sides of most dividers, from growing the
//! arena quadratically.
//!
//! # Example
//!
//! ```rust
//! use precinct_index::{Aabb3D, CacheConfig, CachedIndex, PartitionTree};
//!
//! // Index two overlapping boxes.
//! let mut tree = PartitionTree::new();
//! tree.insert("spawn", Aabb3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
//! tree.insert("arena", Aabb3D::new(5.0, 0.0, 5.0, 15.0, 10.0, 15.0));
//!
//! let mut hits: Vec<_> = tree.query_point(6.0, 1.0, 6.0).map(|(k, _)| *k).collect();
//! hits.sort();
//! assert_eq!(hits, ["arena", "spawn"]);
//!
//! // Memoize cell queries in front of the same tree.
//! let mut cached = CachedIndex::with_tree(tree, CacheConfig::default());
//! assert_eq!(&*cached.query(1, 1, 1), &["spawn"]);
//! assert_eq!(&*cached.query(1, 1, 1), &["spawn"]);
//! assert_eq!(cached.stats().hits, 1);
//! ```
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in bounds or query points. Debug builds assert on NaN bounds.
//! Infinite bounds are fine and are how unbounded volumes (for example horizontal slabs)
//! are expressed.

#![no_std]

extern crate alloc;

pub mod cache;
pub mod region;
pub mod tree;
pub mod types;

pub use cache::{CacheConfig, CacheStats, CachedIndex, Cell, QueryCache};
pub use region::Region;
pub use tree::{PartitionTree, TreeConfig, TreeStats};
pub use types::{Aabb3D, Axis, Bound};
