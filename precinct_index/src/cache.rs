// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-query memoization keyed by integer cell.
//!
//! Entries are evicted first-in first-out once the configured capacity is
//! exceeded, and dropped en masse whenever the underlying tree is rebuilt.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::fmt::Debug;
use core::mem::size_of;

use hashbrown::HashMap;
use log::trace;

use crate::region::Region;
use crate::tree::PartitionTree;

/// Integer `(x, y, z)` coordinate used as a cache key.
pub type Cell = (i64, i64, i64);

/// Capacity settings for [`QueryCache`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached cells. Zero disables caching.
    pub capacity: usize,
}

impl CacheConfig {
    /// Footprint budget used by [`CacheConfig::default`], in bytes.
    pub const DEFAULT_BUDGET: usize = 256 * 1024;

    /// Estimated bytes per cached cell: the map slot, the eviction record slot
    /// and the shared hit-list header.
    pub const ENTRY_FOOTPRINT: usize =
        2 * size_of::<Cell>() + size_of::<Arc<[u64]>>() + 2 * size_of::<usize>();

    /// Size the cache so its estimated footprint stays under `bytes`.
    pub const fn for_budget(bytes: usize) -> Self {
        Self {
            capacity: bytes / Self::ENTRY_FOOTPRINT,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::for_budget(Self::DEFAULT_BUDGET)
    }
}

/// Bounded map from cell to the keys hit at that cell.
///
/// This is the bare memo table; [`CachedIndex`] pairs it with a tree.
pub struct QueryCache<K> {
    capacity: usize,
    entries: HashMap<Cell, Arc<[K]>>,
    order: VecDeque<Cell>,
}

impl<K> Debug for QueryCache<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QueryCache")
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<K> Default for QueryCache<K> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<K> QueryCache<K> {
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            capacity: config.capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Maximum number of cells kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached cells.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached hits for `cell`, if any.
    pub fn get(&self, cell: Cell) -> Option<Arc<[K]>> {
        self.entries.get(&cell).cloned()
    }

    /// Record the hits for `cell` and evict down to capacity.
    pub fn insert(&mut self, cell: Cell, hits: Arc<[K]>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(cell, hits).is_none() {
            self.order.push_back(cell);
        }
        self.trim();
    }

    /// Evict the oldest cells until the eviction record fits the capacity.
    pub fn trim(&mut self) {
        let mut evicted = 0_usize;
        while self.order.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted += 1;
        }
        if evicted > 0 {
            trace!("query cache evicted {evicted} cells");
        }
    }

    /// Drop every entry and the eviction record.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Hit/miss counters kept by [`CachedIndex`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Queries answered from the cache.
    pub hits: u64,
    /// Queries that went to the tree.
    pub misses: u64,
}

/// A [`PartitionTree`] fronted by a [`QueryCache`].
///
/// Every mutation rebuilds the tree and clears the cache before returning, so a
/// cached answer never outlives the item set it was computed from.
pub struct CachedIndex<K, R> {
    tree: PartitionTree<K, R>,
    cache: QueryCache<K>,
    stats: CacheStats,
}

impl<K, R> Debug for CachedIndex<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachedIndex")
            .field("tree", &self.tree)
            .field("cache", &self.cache)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K: Ord + Clone, R: Region> CachedIndex<K, R> {
    /// Wrap an empty tree.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_tree(PartitionTree::new(), config)
    }

    /// Wrap an existing tree.
    pub fn with_tree(tree: PartitionTree<K, R>, config: CacheConfig) -> Self {
        Self {
            tree,
            cache: QueryCache::new(config),
            stats: CacheStats::default(),
        }
    }

    /// Cached keys for the integer point, without consulting the tree.
    ///
    /// Takes `&self` so callers sharing the index behind a read lock can try
    /// the cache before taking the write lock [`query`](Self::query) needs.
    /// Peeks are not counted in [`stats`](Self::stats).
    pub fn peek(&self, x: i64, y: i64, z: i64) -> Option<Arc<[K]>> {
        self.cache.get((x, y, z))
    }

    /// Keys of the items containing the integer point, memoized.
    pub fn query(&mut self, x: i64, y: i64, z: i64) -> Arc<[K]> {
        let cell = (x, y, z);
        if let Some(hits) = self.cache.get(cell) {
            self.stats.hits += 1;
            return hits;
        }
        self.stats.misses += 1;
        let hits = self.tree.query_cell(cell);
        self.cache.insert(cell, hits.clone());
        hits
    }

    /// Insert or replace an item. See [`PartitionTree::insert`].
    pub fn insert(&mut self, key: K, region: R) -> Option<R> {
        let prev = self.tree.insert(key, region);
        self.cache.clear();
        prev
    }

    /// Remove an item. See [`PartitionTree::remove`].
    pub fn remove(&mut self, key: &K) -> Option<R> {
        let prev = self.tree.remove(key);
        if prev.is_some() {
            self.cache.clear();
        }
        prev
    }

    /// Replace every item. See [`PartitionTree::replace_all`].
    pub fn replace_all<I: IntoIterator<Item = (K, R)>>(&mut self, items: I) {
        self.tree.replace_all(items);
        self.cache.clear();
    }

    /// The underlying tree.
    pub fn tree(&self) -> &PartitionTree<K, R> {
        &self.tree
    }

    /// The memo table.
    pub fn cache(&self) -> &QueryCache<K> {
        &self.cache
    }

    /// Hit/miss counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
