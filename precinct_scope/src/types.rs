// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers and value types shared by every scope.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use precinct_index::Cell;

/// Identifier of a world. Two locations are in the same world iff their ids
/// compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(Arc<str>);

impl WorldId {
    /// Create an id from a world name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The world name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorldId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for WorldId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A position in a world.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// World the position belongs to.
    pub world: WorldId,
    /// East-west coordinate.
    pub x: f64,
    /// Height.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl Location {
    /// Create a location.
    pub fn new(world: impl Into<WorldId>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Integer block coordinates, rounding toward negative infinity.
    ///
    /// Zone enclosure is decided at these coordinates. Returns `None` if any
    /// coordinate is NaN; such a location lies in no zone, though its world
    /// and the global scope still apply.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "World coordinates fit in i64; float-to-int casts saturate."
    )]
    pub fn block(&self) -> Option<Cell> {
        if self.x.is_nan() || self.y.is_nan() || self.z.is_nan() {
            return None;
        }
        Some((
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.z.floor() as i64,
        ))
    }
}

/// A configuration key with its fallback value.
///
/// Keys compare and hash by id only; the default does not take part.
#[derive(Clone)]
pub struct ConfigKey<V> {
    id: Arc<str>,
    default: V,
}

impl<V> ConfigKey<V> {
    /// Create a key.
    pub fn new(id: impl Into<Arc<str>>, default: V) -> Self {
        Self {
            id: id.into(),
            default,
        }
    }

    /// Key id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Shared key id.
    pub(crate) fn shared_id(&self) -> Arc<str> {
        self.id.clone()
    }

    /// Value used when no enclosing scope assigns this key.
    pub fn default(&self) -> &V {
        &self.default
    }
}

impl<V> PartialEq for ConfigKey<V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<V> Eq for ConfigKey<V> {}

impl<V> Hash for ConfigKey<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<V: fmt::Debug> fmt::Debug for ConfigKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigKey")
            .field("id", &self.id)
            .field("default", &self.default)
            .finish()
    }
}

/// Address of a scope inside a [`RegionSystem`](crate::RegionSystem).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeRef {
    /// The single global scope.
    Global,
    /// The scope of one world.
    World(WorldId),
    /// A named zone.
    Zone(Arc<str>),
}

impl ScopeRef {
    /// Address a zone by name.
    pub fn zone(name: impl Into<Arc<str>>) -> Self {
        Self::Zone(name.into())
    }

    /// Address a world by id.
    pub fn world(id: impl Into<WorldId>) -> Self {
        Self::World(id.into())
    }
}

impl fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::World(id) => write!(f, "world {id}"),
            Self::Zone(name) => write!(f, "zone {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn block_floors_negative_coordinates() {
        let loc = Location::new("overworld", -0.5, 64.99, -10.0);
        assert_eq!(loc.block(), Some((-1, 64, -10)));
        assert_eq!(Location::new("overworld", 1.0, 1.5, 1.999).block(), Some((1, 1, 1)));
    }

    #[test]
    fn nan_coordinates_have_no_block() {
        assert_eq!(Location::new("overworld", f64::NAN, 0.0, 0.0).block(), None);
        assert_eq!(Location::new("overworld", 0.0, 0.0, f64::NAN).block(), None);
        assert_eq!(
            Location::new("overworld", f64::NEG_INFINITY, 0.0, 0.0).block(),
            Some((i64::MIN, 0, 0))
        );
    }

    #[test]
    fn keys_compare_by_id() {
        let a = ConfigKey::new("build", true);
        let b = ConfigKey::new("build", false);
        let c = ConfigKey::new("pvp", true);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn world_ids_compare_by_name() {
        assert_eq!(WorldId::from("nether"), WorldId::new(String::from("nether")));
        assert_ne!(WorldId::from("nether"), WorldId::from("Nether"));
        assert_eq!(ScopeRef::world("end").to_string(), "world end");
    }
}
