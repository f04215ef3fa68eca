// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alternating-axis partition tree over keyed regions.
//!
//! The tree is tuned for worlds whose vertical extent is much smaller than
//! their horizontal extent: dividers only ever split on x and z, cycling
//! through `X/Min → Z/Min → X/Max → Z/Max`, and y is checked by the exact
//! containment test inside leaves.
//!
//! Any mutation rebuilds the whole tree. Rebuilds are `O(n log n)` and
//! assumed rare compared to point queries.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;

use log::debug;

use crate::cache::Cell;
use crate::region::Region;
use crate::types::{Aabb3D, Axis, Bound};

/// Build parameters for [`PartitionTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Number of consecutive levels a branch may fail to shrink before it
    /// becomes a leaf.
    pub stable_depth: u8,
    /// Hard cap on tree depth; deeper branches become leaves.
    pub max_depth: usize,
    /// Cap on the candidate slots held across all nodes, as a multiple of
    /// `n * (log2(n) + 1)` for `n` items.
    ///
    /// Regions that span many dividers, such as nested or concentric zones,
    /// are copied into both sides of each split. Once a branch's share of
    /// the cap is spent it becomes a leaf, which bounds both the arena size
    /// and the rebuild time.
    pub duplication: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            stable_depth: 4,
            max_depth: 64,
            duplication: 4,
        }
    }
}

impl TreeConfig {
    /// Total slot budget for a tree over `n` items.
    pub fn slot_budget(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let levels = n.ilog2() as usize + 1;
        self.duplication.saturating_mul(n).saturating_mul(levels)
    }
}

/// Summary of a built tree, for logging and tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total nodes in the arena.
    pub nodes: usize,
    /// Leaf nodes.
    pub leaves: usize,
    /// Empty nodes.
    pub empties: usize,
    /// Length of the longest root-to-node path (root is depth 0).
    pub depth: usize,
    /// Largest candidate set held by a single leaf.
    pub largest_leaf: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct Level {
    axis: Axis,
    bound: Bound,
}

impl Level {
    const FIRST: Self = Self {
        axis: Axis::X,
        bound: Bound::Min,
    };

    const fn next(self) -> Self {
        let (axis, bound) = match (self.axis, self.bound) {
            (Axis::X, Bound::Min) => (Axis::Z, Bound::Min),
            (Axis::Z, Bound::Min) => (Axis::X, Bound::Max),
            (Axis::X, Bound::Max) => (Axis::Z, Bound::Max),
            (Axis::Z, Bound::Max) => (Axis::X, Bound::Min),
        };
        Self { axis, bound }
    }

    /// Whether a query coordinate on this level's axis descends to the left.
    #[inline]
    fn goes_left(self, v: f64, threshold: f64) -> bool {
        match self.bound {
            Bound::Min => v < threshold,
            Bound::Max => v <= threshold,
        }
    }
}

#[derive(Clone, Debug)]
enum Node {
    Empty,
    /// Candidate slots. A leaf is a pruning hint: every candidate still goes
    /// through the exact containment test.
    Leaf(Vec<usize>),
    Divider {
        level: Level,
        threshold: f64,
        left: NodeIdx,
        right: NodeIdx,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

/// Point-containment index over keyed [`Region`]s.
///
/// Items are kept sorted by key; keys are unique. Each mutation rebuilds the
/// partitioning from scratch, so a built tree never carries stale structure.
#[derive(Clone)]
pub struct PartitionTree<K, R> {
    config: TreeConfig,
    items: Vec<(K, R)>,
    bounds: Vec<Aabb3D<f64>>,
    arena: Vec<Node>,
    root: Option<NodeIdx>,
}

impl<K, R> Debug for PartitionTree<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PartitionTree")
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("arena_nodes", &self.arena.len())
            .field("has_root", &self.root.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: Ord, R: Region> Default for PartitionTree<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, R: Region> PartitionTree<K, R> {
    /// Create an empty tree with the default [`TreeConfig`].
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree with explicit build parameters.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            bounds: Vec::new(),
            arena: Vec::new(),
            root: None,
        }
    }

    /// Build a tree in one pass. On duplicate keys the last item wins.
    pub fn bulk<I: IntoIterator<Item = (K, R)>>(config: TreeConfig, items: I) -> Self {
        let mut tree = Self::with_config(config);
        tree.replace_all(items);
        tree
    }

    /// Build parameters in use.
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the region stored under `key`.
    pub fn get(&self, key: &K) -> Option<&R> {
        let pos = self.items.binary_search_by(|(k, _)| k.cmp(key)).ok()?;
        Some(&self.items[pos].1)
    }

    /// Whether `key` is indexed.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Iterate items in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &R)> + '_ {
        self.items.iter().map(|(k, r)| (k, r))
    }

    /// Insert or replace the region under `key`, then rebuild.
    ///
    /// Returns the previous region if the key was already present.
    pub fn insert(&mut self, key: K, region: R) -> Option<R> {
        let prev = match self.items.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(pos) => Some(core::mem::replace(&mut self.items[pos].1, region)),
            Err(pos) => {
                self.items.insert(pos, (key, region));
                None
            }
        };
        self.rebuild();
        prev
    }

    /// Remove the region under `key`, then rebuild if anything changed.
    pub fn remove(&mut self, key: &K) -> Option<R> {
        let pos = self.items.binary_search_by(|(k, _)| k.cmp(key)).ok()?;
        let (_, region) = self.items.remove(pos);
        self.rebuild();
        Some(region)
    }

    /// Replace the whole item set, then rebuild. On duplicate keys the last item wins.
    pub fn replace_all<I: IntoIterator<Item = (K, R)>>(&mut self, items: I) {
        let mut items: Vec<(K, R)> = items.into_iter().collect();
        // Stable sort after reversing keeps the last occurrence first; dedup keeps the first.
        items.reverse();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items.dedup_by(|later, kept| later.0 == kept.0);
        self.items = items;
        self.rebuild();
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.items.clear();
        self.bounds.clear();
        self.arena.clear();
        self.root = None;
    }

    /// Query items whose region contains the point.
    pub fn query_point(&self, x: f64, y: f64, z: f64) -> impl Iterator<Item = (&K, &R)> + '_ {
        self.candidates(x, z).iter().filter_map(move |&slot| {
            let (k, r) = &self.items[slot];
            r.contains_point(x, y, z).then_some((k, r))
        })
    }

    /// Keys of the items containing the integer point `cell`, in key order.
    pub fn query_cell(&self, cell: Cell) -> Arc<[K]>
    where
        K: Clone,
    {
        let (x, y, z) = cell;
        let (x, y, z) = (x as f64, y as f64, z as f64);
        let mut hits: Vec<(&K, &R)> = self.query_point(x, y, z).collect();
        hits.sort_by(|a, b| a.0.cmp(b.0));
        hits.into_iter().map(|(k, _)| k.clone()).collect()
    }

    /// Walk the arena and summarize its shape.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: self.arena.len(),
            ..TreeStats::default()
        };
        let Some(root) = self.root else {
            return stats;
        };
        let mut stack = alloc::vec![(root, 0_usize)];
        while let Some((idx, depth)) = stack.pop() {
            stats.depth = stats.depth.max(depth);
            match &self.arena[idx.get()] {
                Node::Empty => stats.empties += 1,
                Node::Leaf(slots) => {
                    stats.leaves += 1;
                    stats.largest_leaf = stats.largest_leaf.max(slots.len());
                }
                Node::Divider { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        stats
    }

    // --- internals ---

    fn candidates(&self, x: f64, z: f64) -> &[usize] {
        let Some(mut idx) = self.root else {
            return &[];
        };
        loop {
            match &self.arena[idx.get()] {
                Node::Empty => return &[],
                Node::Leaf(slots) => return slots,
                Node::Divider {
                    level,
                    threshold,
                    left,
                    right,
                } => {
                    let v = match level.axis {
                        Axis::X => x,
                        Axis::Z => z,
                    };
                    idx = if level.goes_left(v, *threshold) {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn rebuild(&mut self) {
        self.arena.clear();
        self.bounds = self.items.iter().map(|(_, r)| r.aabb()).collect();
        debug_assert!(
            self.bounds.iter().all(|b| !b.has_nan()),
            "indexed regions must not have NaN bounds"
        );
        let slots: Vec<usize> = (0..self.items.len()).collect();
        let budget = self.config.slot_budget(slots.len());
        let root = self.build_level(Level::FIRST, slots, 0, 0, budget);
        self.root = Some(root);
        let stats = self.stats();
        debug!(
            "partition tree rebuilt: items={} nodes={} leaves={} depth={}",
            self.items.len(),
            stats.nodes,
            stats.leaves,
            stats.depth
        );
    }

    fn push(&mut self, node: Node) -> NodeIdx {
        self.arena.push(node);
        NodeIdx::new(self.arena.len() - 1)
    }

    /// Build the subtree over `slots`.
    ///
    /// `budget` is the number of slots this subtree may still hand to its
    /// descendants. A split spends `left.len() + right.len()` of it and the
    /// remainder is shared between the two sides in proportion to their size,
    /// so the whole arena never holds more than the root budget.
    fn build_level(
        &mut self,
        level: Level,
        slots: Vec<usize>,
        stable: u8,
        depth: usize,
        budget: usize,
    ) -> NodeIdx {
        if slots.is_empty() {
            return self.push(Node::Empty);
        }
        if slots.len() == 1 || stable >= self.config.stable_depth || depth >= self.config.max_depth
        {
            return self.push(Node::Leaf(slots));
        }

        let threshold = split_threshold(&self.bounds, level, &slots);
        let (left, right) = partition(&self.bounds, level, threshold, &slots);
        let cost = left.len() + right.len();
        if cost > budget {
            return self.push(Node::Leaf(slots));
        }
        let remaining = budget - cost;
        let left_budget = remaining / cost * left.len() + remaining % cost * left.len() / cost;
        let right_budget = remaining - left_budget;

        let n = slots.len();
        let next_stable = |side: &[usize]| {
            if side.len() < n {
                0
            } else {
                stable.saturating_add(1)
            }
        };
        let (left_stable, right_stable) = (next_stable(&left), next_stable(&right));

        let next = level.next();
        let left = self.build_level(next, left, left_stable, depth + 1, left_budget);
        let right = self.build_level(next, right, right_stable, depth + 1, right_budget);
        self.push(Node::Divider {
            level,
            threshold,
            left,
            right,
        })
    }
}

/// Median of the relevant faces, moved off ties so that the shrinking side is non-empty
/// whenever the faces are not all equal.
fn split_threshold(bounds: &[Aabb3D<f64>], level: Level, slots: &[usize]) -> f64 {
    let mut values: Vec<f64> = slots
        .iter()
        .map(|&s| bounds[s].face(level.axis, level.bound))
        .collect();
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let lowest = values[0];
    let highest = values[n - 1];
    match level.bound {
        // Left keeps `min < t`: t must exceed the smallest min.
        Bound::Min => values[n / 2..]
            .iter()
            .copied()
            .find(|v| *v > lowest)
            .unwrap_or(lowest),
        // Right keeps `max > t`: t must stay below the largest max.
        Bound::Max => values[..=(n - 1) / 2]
            .iter()
            .rev()
            .copied()
            .find(|v| *v < highest)
            .unwrap_or(highest),
    }
}

/// Split `slots` around `threshold`.
///
/// The side selected by the level's own face is a strict filter; the other side
/// is a rescan of the full slot list on the opposite face, so boxes spanning the
/// threshold land on both sides.
fn partition(
    bounds: &[Aabb3D<f64>],
    level: Level,
    threshold: f64,
    slots: &[usize],
) -> (Vec<usize>, Vec<usize>) {
    let face = |s: usize, bound: Bound| bounds[s].face(level.axis, bound);
    let keep = |pred: fn(f64, f64) -> bool, bound: Bound| -> Vec<usize> {
        slots
            .iter()
            .copied()
            .filter(|&s| pred(face(s, bound), threshold))
            .collect()
    };
    match level.bound {
        Bound::Min => (keep(|v, t| v < t, Bound::Min), keep(|v, t| v >= t, Bound::Max)),
        Bound::Max => (keep(|v, t| v <= t, Bound::Min), keep(|v, t| v > t, Bound::Max)),
    }
}
