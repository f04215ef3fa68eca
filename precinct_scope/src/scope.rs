// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration scopes and their ranking.
//!
//! There are three kinds of scope. The [`GlobalScope`] encloses every
//! location, a [`WorldScope`] encloses every location in its world, and a
//! [`Zone`] encloses the blocks its [`Shape`] contains. When several enclosing
//! scopes assign the same key, the one with the highest [`Rank`] wins.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use precinct_shape::Shape;

use crate::types::{ConfigKey, Location, ScopeRef, WorldId};

/// Coarse ordering of scope kinds. Later variants outrank earlier ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// The global scope.
    Global,
    /// A world scope.
    World,
    /// A zone.
    Zone,
}

/// Ranking key of a scope: tier first, then priority.
///
/// Any zone outranks its world and any world outranks the global scope,
/// whatever priorities the zones carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank {
    /// Scope kind.
    pub tier: Tier,
    /// Priority within the tier.
    pub priority: i32,
}

/// Priority reported by the global scope.
pub const GLOBAL_PRIORITY: i32 = 0;

/// Priority reported by every world scope.
pub const WORLD_PRIORITY: i32 = 1;

/// Key → value assignments of one scope.
pub struct Settings<V> {
    values: HashMap<Arc<str>, V>,
}

impl<V> Default for Settings<V> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<V: Clone> Clone for Settings<V> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Settings<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

impl<V> Settings<V> {
    /// Value assigned to the key id, if any.
    pub fn get(&self, id: &str) -> Option<&V> {
        self.values.get(id)
    }

    /// Whether the key id is assigned.
    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Number of assigned keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(key id, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.values.iter().map(|(k, v)| (&**k, v))
    }
}

impl<V: Clone> Settings<V> {
    /// Copy with `id` set to `value`, plus the value it replaced.
    pub(crate) fn with(&self, id: Arc<str>, value: V) -> (Self, Option<V>) {
        let mut next = self.clone();
        let prev = next.values.insert(id, value);
        (next, prev)
    }

    /// Copy with `id` unset, plus the value it held.
    pub(crate) fn without(&self, id: &str) -> (Self, Option<V>) {
        let mut next = self.clone();
        let prev = next.values.remove(id);
        (next, prev)
    }
}

/// Shared contract of global, world and zone scopes.
pub trait Scope<V> {
    /// Address of this scope.
    fn scope_ref(&self) -> ScopeRef;

    /// Priority within the scope's tier.
    fn priority(&self) -> i32;

    /// Scope kind.
    fn tier(&self) -> Tier;

    /// Whether the location falls inside this scope.
    fn encloses(&self, location: &Location) -> bool;

    /// Every assignment made in this scope.
    fn settings(&self) -> &Settings<V>;

    /// Ranking key used to resolve conflicts.
    fn rank(&self) -> Rank {
        Rank {
            tier: self.tier(),
            priority: self.priority(),
        }
    }

    /// Value this scope assigns to `key`, if any.
    fn get(&self, key: &ConfigKey<V>) -> Option<&V> {
        self.settings().get(key.id())
    }
}

/// The scope enclosing everything.
pub struct GlobalScope<V> {
    pub(crate) settings: Settings<V>,
}

impl<V> Default for GlobalScope<V> {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
        }
    }
}

impl<V> fmt::Debug for GlobalScope<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalScope")
            .field("keys", &self.settings.len())
            .finish_non_exhaustive()
    }
}

impl<V> Scope<V> for GlobalScope<V> {
    fn scope_ref(&self) -> ScopeRef {
        ScopeRef::Global
    }

    fn priority(&self) -> i32 {
        GLOBAL_PRIORITY
    }

    fn tier(&self) -> Tier {
        Tier::Global
    }

    fn encloses(&self, _location: &Location) -> bool {
        true
    }

    fn settings(&self) -> &Settings<V> {
        &self.settings
    }
}

/// The scope of one world.
pub struct WorldScope<V> {
    pub(crate) id: WorldId,
    pub(crate) settings: Settings<V>,
}

impl<V> WorldScope<V> {
    pub(crate) fn new(id: WorldId) -> Self {
        Self {
            id,
            settings: Settings::default(),
        }
    }

    /// World this scope covers.
    pub fn id(&self) -> &WorldId {
        &self.id
    }
}

impl<V> fmt::Debug for WorldScope<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldScope")
            .field("id", &self.id)
            .field("keys", &self.settings.len())
            .finish_non_exhaustive()
    }
}

impl<V> Scope<V> for WorldScope<V> {
    fn scope_ref(&self) -> ScopeRef {
        ScopeRef::World(self.id.clone())
    }

    fn priority(&self) -> i32 {
        WORLD_PRIORITY
    }

    fn tier(&self) -> Tier {
        Tier::World
    }

    fn encloses(&self, location: &Location) -> bool {
        location.world == self.id
    }

    fn settings(&self) -> &Settings<V> {
        &self.settings
    }
}

/// A named volume inside one world.
pub struct Zone<V> {
    pub(crate) name: Arc<str>,
    pub(crate) world: WorldId,
    pub(crate) shape: Shape,
    pub(crate) priority: i32,
    pub(crate) settings: Settings<V>,
}

impl<V> Zone<V> {
    /// Zone name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World the zone belongs to.
    pub fn world(&self) -> &WorldId {
        &self.world
    }

    /// Zone volume.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Whether this zone and `other` would conflict if they shared a world:
    /// same priority and intersecting shapes.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.priority == other.priority && self.shape.intersects(&other.shape)
    }
}

impl<V: Clone> Zone<V> {
    /// Copy with a new shape and priority, keeping name, world and settings.
    pub(crate) fn reshaped(&self, shape: Shape, priority: i32) -> Self {
        Self {
            name: self.name.clone(),
            world: self.world.clone(),
            shape,
            priority,
            settings: self.settings.clone(),
        }
    }

    /// Copy with new settings.
    pub(crate) fn with_settings(&self, settings: Settings<V>) -> Self {
        Self {
            name: self.name.clone(),
            world: self.world.clone(),
            shape: self.shape,
            priority: self.priority,
            settings,
        }
    }
}

impl<V> fmt::Debug for Zone<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("name", &self.name)
            .field("world", &self.world)
            .field("shape", &self.shape)
            .field("priority", &self.priority)
            .field("keys", &self.settings.len())
            .finish_non_exhaustive()
    }
}

impl<V> Scope<V> for Zone<V> {
    fn scope_ref(&self) -> ScopeRef {
        ScopeRef::Zone(self.name.clone())
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn tier(&self) -> Tier {
        Tier::Zone
    }

    /// True iff the location is in the zone's world and its block
    /// coordinates lie inside the shape.
    ///
    /// This tests the shape directly. [`RegionSystem::encloses`] answers the
    /// same question through the world's cached index and always agrees.
    ///
    /// [`RegionSystem::encloses`]: crate::RegionSystem::encloses
    fn encloses(&self, location: &Location) -> bool {
        if location.world != self.world {
            return false;
        }
        let Some((x, y, z)) = location.block() else {
            return false;
        };
        self.shape.contains_point(x as f64, y as f64, z as f64)
    }

    fn settings(&self) -> &Settings<V> {
        &self.settings
    }
}
