// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use precinct_index::{CacheConfig, TreeConfig};

/// Tuning for the per-world index generations of a
/// [`RegionSystem`](crate::RegionSystem).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemConfig {
    /// Partition tree settings used on every rebuild.
    pub tree: TreeConfig,
    /// Capacity of each world's query cache.
    pub cache: CacheConfig,
}
