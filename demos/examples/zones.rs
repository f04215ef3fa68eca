// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zones end to end.
//!
//! Create overlapping zones, assign settings at every scope, and resolve
//! values at a few locations.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p precinct_demos --example zones`

use precinct_scope::{ConfigKey, Location, RegionError, RegionSystem, ScopeRef};
use precinct_shape::Shape;

fn main() -> Result<(), RegionError> {
    env_logger::init();

    let build = ConfigKey::new("build", true);
    let zones = RegionSystem::new();

    zones.add_zone("spawn", "overworld", Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)?, 2)?;
    zones.add_zone("arena", "overworld", Shape::cuboid(5.0, 0.0, 5.0, 15.0, 10.0, 15.0)?, 3)?;
    zones.assign(&ScopeRef::zone("spawn"), &build, false)?;
    zones.assign(&ScopeRef::zone("arena"), &build, true)?;

    let points = [
        Location::new("overworld", 6.0, 1.0, 6.0),
        Location::new("overworld", 1.0, 1.0, 1.0),
        Location::new("overworld", 20.0, 1.0, 20.0),
    ];
    for p in &points {
        let source = zones
            .resolve(&build, p)
            .map_or_else(|| String::from("default"), |r| r.scope.to_string());
        println!(
            "build at ({}, {}, {}) = {} from {source}",
            p.x,
            p.y,
            p.z,
            zones.lookup(&build, p)
        );
    }
    assert!(zones.lookup(&build, &points[0]));
    assert!(!zones.lookup(&build, &points[1]));
    assert!(zones.lookup(&build, &points[2]));

    // A world-wide setting sits between zones and the global scope.
    zones.assign(&ScopeRef::world("overworld"), &build, false)?;
    assert!(!zones.lookup(&build, &points[2]));

    // Same priority as the arena and overlapping it: rejected.
    let clash = zones.add_zone("pit", "overworld", Shape::sphere(12.0, 2.0, 12.0, 2.0)?, 3);
    println!("adding pit: {clash:?}");
    assert!(matches!(clash, Err(RegionError::PriorityConflict { .. })));

    // Built-in scopes cannot be removed, only cleared.
    println!("removing _global: {:?}", zones.remove_zone("_global"));
    zones.clear(&ScopeRef::world("overworld"))?;

    for zone in zones.list_zones(&"overworld".into()) {
        println!("{zone:?}");
    }
    Ok(())
}
