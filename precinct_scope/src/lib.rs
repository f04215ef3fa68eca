// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=precinct_scope --heading-base-level=0

//! Precinct Scope: priority-resolved configuration for overlapping zones.
//!
//! A [`RegionSystem`] holds one global scope, one scope per world, and any
//! number of named zones. Each scope carries its own key → value settings.
//! [`RegionSystem::lookup`] collects every scope enclosing a location that
//! assigns the key and returns the value of the highest-ranked one:
//!
//! 1. zones, by priority (higher wins);
//! 2. then the location's world;
//! 3. then the global scope;
//! 4. then the key's default.
//!
//! Two zones in the same world that intersect may not share a priority, so the
//! winner is always unambiguous. The check runs when a zone is added or
//! updated.
//!
//! Zone enclosure is answered per world by a
//! [`CachedIndex`](precinct_index::CachedIndex): a partition tree over the zone
//! shapes with a bounded query cache in front of it.
//!
//! # Example
//!
//! ```rust
//! use precinct_scope::{ConfigKey, Location, RegionSystem, ScopeRef};
//! use precinct_shape::Shape;
//!
//! # fn main() -> Result<(), precinct_scope::RegionError> {
//! let build = ConfigKey::new("build", true);
//! let zones = RegionSystem::new();
//!
//! zones.add_zone("spawn", "overworld", Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)?, 2)?;
//! zones.add_zone("arena", "overworld", Shape::cuboid(5.0, 0.0, 5.0, 15.0, 10.0, 15.0)?, 3)?;
//! zones.assign(&ScopeRef::zone("spawn"), &build, false)?;
//! zones.assign(&ScopeRef::zone("arena"), &build, true)?;
//!
//! // Both zones enclose this point; the arena has the higher priority.
//! assert!(zones.lookup(&build, &Location::new("overworld", 6.0, 1.0, 6.0)));
//! // Only spawn encloses this one.
//! assert!(!zones.lookup(&build, &Location::new("overworld", 1.0, 1.0, 1.0)));
//! // Nothing does; the key's default applies.
//! assert!(zones.lookup(&build, &Location::new("overworld", 20.0, 1.0, 20.0)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Every method takes `&self`. Reads work on immutable per-world snapshots and
//! only take short locks to clone them or to consult the cache; writers
//! serialize among themselves and publish a complete new snapshot when done.

mod config;
mod error;
pub mod scope;
mod system;
mod types;

pub use config::SystemConfig;
pub use error::RegionError;
pub use scope::{GlobalScope, Rank, Scope, Settings, Tier, WorldScope, Zone};
pub use system::{RegionSystem, Resolution};
pub use types::{ConfigKey, Location, ScopeRef, WorldId};
