// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition tree basics.
//!
//! Index a few boxes, query points and cells, and watch the cache fill.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p precinct_demos --example index_basics`

use precinct_index::{Aabb3D, CacheConfig, CachedIndex, PartitionTree, TreeConfig};

fn main() {
    env_logger::init();

    let mut tree = PartitionTree::with_config(TreeConfig::default());
    tree.insert("market", Aabb3D::new(0.0, 60.0, 0.0, 32.0, 90.0, 32.0));
    tree.insert("stall", Aabb3D::new(8.0, 60.0, 8.0, 12.0, 70.0, 12.0));
    tree.insert("harbor", Aabb3D::new(40.0, 50.0, -20.0, 120.0, 80.0, 10.0));
    // Unbounded horizontally: everything below sea level.
    tree.insert(
        "deep",
        Aabb3D::new(f64::NEG_INFINITY, -64.0, f64::NEG_INFINITY, f64::INFINITY, 40.0, f64::INFINITY),
    );
    println!("stats: {:?}", tree.stats());

    let mut hits: Vec<_> = tree.query_point(10.0, 65.0, 10.0).map(|(k, _)| *k).collect();
    hits.sort();
    println!("hits at (10, 65, 10): {hits:?}");
    assert_eq!(hits, ["market", "stall"]);

    // A tiny cache so eviction is visible in the trace log.
    let mut cached = CachedIndex::with_tree(tree, CacheConfig { capacity: 4 });
    for x in 0..8 {
        let hits = cached.query(x * 10, 65, 0);
        println!("cell ({}, 65, 0): {:?}", x * 10, &*hits);
    }
    for x in 4..8 {
        let _ = cached.query(x * 10, 65, 0);
    }
    println!("cache stats: {:?}", cached.stats());
    assert_eq!(cached.stats().hits, 4);

    // Mutation clears the cache.
    cached.remove(&"harbor");
    assert!(cached.cache().is_empty());
    assert!(cached.query(50, 65, 0).is_empty());
}
