// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zone registry and resolver.
//!
//! Every world is held as an immutable snapshot behind an `Arc`. Writers
//! serialize on one registry mutex, build the next state, and swap it into the
//! world map; readers clone the current `Arc` and work on that generation
//! without holding the map lock. Changing a world's zone set builds a new
//! partition tree with an empty cache. Changing only settings reuses both.

use core::cmp::Ordering;
use core::fmt;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;
use log::{debug, info};
use precinct_index::{CachedIndex, Cell, PartitionTree};
use precinct_shape::Shape;

use crate::config::SystemConfig;
use crate::error::{RegionError, check_name, is_reserved};
use crate::scope::{GlobalScope, Scope, Settings, WorldScope, Zone};
use crate::types::{ConfigKey, Location, ScopeRef, WorldId};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One generation of a world's zone index: the tree and its memo table.
struct Spatial {
    index: RwLock<CachedIndex<Arc<str>, Shape>>,
}

impl Spatial {
    fn build<V>(config: &SystemConfig, zones: &BTreeMap<Arc<str>, Arc<Zone<V>>>) -> Self {
        let items = zones.values().map(|z| (z.name.clone(), z.shape));
        let tree = PartitionTree::bulk(config.tree, items);
        Self {
            index: RwLock::new(CachedIndex::with_tree(tree, config.cache)),
        }
    }

    /// Names of the zones containing the cell, sorted.
    fn query(&self, cell: Cell) -> Arc<[Arc<str>]> {
        let (x, y, z) = cell;
        if let Some(hits) = read(&self.index).peek(x, y, z) {
            return hits;
        }
        write(&self.index).query(x, y, z)
    }
}

/// Immutable snapshot of one world.
struct WorldState<V> {
    scope: Arc<WorldScope<V>>,
    zones: BTreeMap<Arc<str>, Arc<Zone<V>>>,
    spatial: Arc<Spatial>,
}

impl<V> WorldState<V> {
    fn empty(id: WorldId, config: &SystemConfig) -> Self {
        let zones = BTreeMap::new();
        let spatial = Arc::new(Spatial::build(config, &zones));
        Self {
            scope: Arc::new(WorldScope::new(id)),
            zones,
            spatial,
        }
    }

    /// Next generation with a changed zone set.
    fn with_zones(&self, zones: BTreeMap<Arc<str>, Arc<Zone<V>>>, config: &SystemConfig) -> Self {
        let spatial = Arc::new(Spatial::build(config, &zones));
        Self {
            scope: self.scope.clone(),
            zones,
            spatial,
        }
    }

    /// Reject `zone` if it conflicts with any other zone of this world.
    fn check_conflicts(&self, zone: &Zone<V>) -> Result<(), RegionError> {
        match self
            .zones
            .values()
            .find(|other| other.name != zone.name && zone.conflicts_with(other))
        {
            Some(other) => Err(RegionError::PriorityConflict {
                name: zone.name.clone(),
                other: other.name.clone(),
                priority: zone.priority,
            }),
            None => Ok(()),
        }
    }
}

/// Zone-name bookkeeping, guarded by the writer mutex.
#[derive(Default)]
struct Registry {
    zones: HashMap<Arc<str>, WorldId>,
}

/// A value resolved by [`RegionSystem::resolve`].
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<V> {
    /// Winning value.
    pub value: V,
    /// Scope that assigned it.
    pub scope: ScopeRef,
}

/// Whether `a` beats `b` when both assign the key.
///
/// Higher rank wins; among equal ranks the lexicographically smaller zone
/// name wins.
fn outranks<V>(a: &dyn Scope<V>, b: &dyn Scope<V>) -> bool {
    match a.rank().cmp(&b.rank()) {
        Ordering::Equal => match (a.scope_ref(), b.scope_ref()) {
            (ScopeRef::Zone(x), ScopeRef::Zone(y)) => x < y,
            _ => false,
        },
        ord => ord == Ordering::Greater,
    }
}

fn consider<'a, V>(
    best: &mut Option<(&'a dyn Scope<V>, &'a V)>,
    scope: &'a dyn Scope<V>,
    key: &ConfigKey<V>,
) {
    let Some(value) = scope.get(key) else {
        return;
    };
    if best.is_none_or(|(current, _)| outranks(scope, current)) {
        *best = Some((scope, value));
    }
}

/// Zones, worlds, and a global scope, with priority-resolved lookups.
///
/// All methods take `&self`; share the system between threads with an `Arc`
/// or a scoped borrow. Lookups that hit the cache only share a read lock; a
/// miss briefly takes its world's cache for writing.
pub struct RegionSystem<V> {
    config: SystemConfig,
    global: RwLock<Arc<GlobalScope<V>>>,
    worlds: RwLock<HashMap<WorldId, Arc<WorldState<V>>>>,
    registry: Mutex<Registry>,
}

impl<V> fmt::Debug for RegionSystem<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionSystem")
            .field("config", &self.config)
            .field("worlds", &read(&self.worlds).len())
            .field("zones", &lock(&self.registry).zones.len())
            .finish_non_exhaustive()
    }
}

impl<V: Clone> Default for RegionSystem<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> RegionSystem<V> {
    /// Create an empty system with default tuning.
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    /// Create an empty system.
    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            config,
            global: RwLock::new(Arc::new(GlobalScope::default())),
            worlds: RwLock::new(HashMap::new()),
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Tuning in use.
    pub fn config(&self) -> SystemConfig {
        self.config
    }

    fn world_state(&self, id: &WorldId) -> Option<Arc<WorldState<V>>> {
        read(&self.worlds).get(id).cloned()
    }

    fn commit(&self, state: WorldState<V>) {
        let id = state.scope.id.clone();
        write(&self.worlds).insert(id, Arc::new(state));
    }

    // --- Lookup ---

    /// Value of `key` at `location`, or the key's default if no enclosing
    /// scope assigns it.
    pub fn lookup(&self, key: &ConfigKey<V>, location: &Location) -> V {
        self.resolve(key, location)
            .map_or_else(|| key.default().clone(), |r| r.value)
    }

    /// Winning value of `key` at `location` and the scope that assigned it.
    ///
    /// Candidates are the global scope, the location's world, and every zone
    /// enclosing the location's block, each only if it assigns the key. Zones
    /// outrank worlds, worlds outrank the global scope, and zones compare by
    /// priority.
    pub fn resolve(&self, key: &ConfigKey<V>, location: &Location) -> Option<Resolution<V>> {
        let global = read(&self.global).clone();
        let world = self.world_state(&location.world);

        let mut best = None;
        consider(&mut best, &*global, key);
        if let Some(world) = &world {
            consider(&mut best, &*world.scope, key);
            if let Some(cell) = location.block() {
                for name in world.spatial.query(cell).iter() {
                    if let Some(zone) = world.zones.get(name) {
                        consider(&mut best, &**zone, key);
                    }
                }
            }
        }
        best.map(|(scope, value)| Resolution {
            value: value.clone(),
            scope: scope.scope_ref(),
        })
    }

    /// Zones enclosing `location`, sorted by name.
    pub fn zones_at(&self, location: &Location) -> Vec<Arc<Zone<V>>> {
        let (Some(world), Some(cell)) = (self.world_state(&location.world), location.block())
        else {
            return Vec::new();
        };
        world
            .spatial
            .query(cell)
            .iter()
            .filter_map(|name| world.zones.get(name).cloned())
            .collect()
    }

    /// Whether the addressed scope encloses `location`.
    ///
    /// Unknown zones enclose nothing.
    pub fn encloses(&self, scope: &ScopeRef, location: &Location) -> bool {
        match scope {
            ScopeRef::Global => true,
            ScopeRef::World(id) => *id == location.world,
            ScopeRef::Zone(name) => {
                let (Some(world), Some(cell)) = (self.world_state(&location.world), location.block())
                else {
                    return false;
                };
                world.zones.contains_key(name) && world.spatial.query(cell).contains(name)
            }
        }
    }

    // --- Inspection ---

    /// Zones of one world, sorted by name.
    pub fn list_zones(&self, world: &WorldId) -> Vec<Arc<Zone<V>>> {
        self.world_state(world)
            .map(|w| w.zones.values().cloned().collect())
            .unwrap_or_default()
    }

    /// The zone with this name, in any world.
    pub fn zone(&self, name: &str) -> Option<Arc<Zone<V>>> {
        read(&self.worlds)
            .values()
            .find_map(|w| w.zones.get(name).cloned())
    }

    /// Every world that has zones or settings, sorted.
    pub fn worlds(&self) -> Vec<WorldId> {
        let mut ids: Vec<WorldId> = read(&self.worlds).keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Current global scope.
    pub fn global(&self) -> Arc<GlobalScope<V>> {
        read(&self.global).clone()
    }

    /// Current scope of a world, if it is known.
    pub fn world(&self, id: &WorldId) -> Option<Arc<WorldScope<V>>> {
        self.world_state(id).map(|w| w.scope.clone())
    }

    // --- Zone lifecycle ---

    /// Create a zone with no settings.
    ///
    /// Fails if the name is empty, reserved, or taken, or if an intersecting
    /// zone in the same world already has this priority. The world is created
    /// on first use.
    pub fn add_zone(
        &self,
        name: impl Into<Arc<str>>,
        world: impl Into<WorldId>,
        shape: impl Into<Shape>,
        priority: i32,
    ) -> Result<Arc<Zone<V>>, RegionError> {
        let name = name.into();
        self.try_add_zone(name.clone(), world.into(), shape.into(), priority)
            .inspect_err(|e| debug!("rejected zone {name:?}: {e}"))
    }

    fn try_add_zone(
        &self,
        name: Arc<str>,
        world: WorldId,
        shape: Shape,
        priority: i32,
    ) -> Result<Arc<Zone<V>>, RegionError> {
        check_name(&name)?;
        let mut registry = lock(&self.registry);
        if registry.zones.contains_key(&name) {
            return Err(RegionError::DuplicateName(name));
        }
        let state = self
            .world_state(&world)
            .unwrap_or_else(|| Arc::new(WorldState::empty(world.clone(), &self.config)));
        let zone = Arc::new(Zone {
            name: name.clone(),
            world: world.clone(),
            shape,
            priority,
            settings: Settings::default(),
        });
        state.check_conflicts(&zone)?;

        let mut zones = state.zones.clone();
        zones.insert(name.clone(), zone.clone());
        self.commit(state.with_zones(zones, &self.config));
        registry.zones.insert(name.clone(), world.clone());
        info!(
            "added zone {name:?} to {world}: {} with priority {priority}",
            shape.kind()
        );
        Ok(zone)
    }

    /// Delete a zone and its settings.
    pub fn remove_zone(&self, name: &str) -> Result<Arc<Zone<V>>, RegionError> {
        self.try_remove_zone(name)
            .inspect_err(|e| debug!("rejected removal of {name:?}: {e}"))
    }

    fn try_remove_zone(&self, name: &str) -> Result<Arc<Zone<V>>, RegionError> {
        if is_reserved(name) {
            return Err(RegionError::NotRemovable(name.into()));
        }
        let mut registry = lock(&self.registry);
        let (state, zone) = self.locate(&registry, name)?;

        let mut zones = state.zones.clone();
        zones.remove(name);
        self.commit(state.with_zones(zones, &self.config));
        registry.zones.remove(name);
        info!("removed zone {name:?} from {}", zone.world);
        Ok(zone)
    }

    /// Replace a zone's shape and priority, keeping its world and settings.
    ///
    /// Validated like [`add_zone`](Self::add_zone), ignoring the zone's own
    /// previous shape. On error the zone is unchanged.
    pub fn update_zone(
        &self,
        name: &str,
        shape: impl Into<Shape>,
        priority: i32,
    ) -> Result<Arc<Zone<V>>, RegionError> {
        let shape = shape.into();
        self.modify_zone(name, |_| (shape, priority))
    }

    /// Change only a zone's priority.
    pub fn set_priority(&self, name: &str, priority: i32) -> Result<Arc<Zone<V>>, RegionError> {
        self.modify_zone(name, |zone| (zone.shape, priority))
    }

    /// Change only a zone's shape.
    pub fn set_shape(
        &self,
        name: &str,
        shape: impl Into<Shape>,
    ) -> Result<Arc<Zone<V>>, RegionError> {
        let shape = shape.into();
        self.modify_zone(name, |zone| (shape, zone.priority))
    }

    fn modify_zone(
        &self,
        name: &str,
        change: impl FnOnce(&Zone<V>) -> (Shape, i32),
    ) -> Result<Arc<Zone<V>>, RegionError> {
        let registry = lock(&self.registry);
        let result = self.locate(&registry, name).and_then(|(state, zone)| {
            let (shape, priority) = change(zone.as_ref());
            let next = Arc::new(zone.reshaped(shape, priority));
            state.check_conflicts(&next)?;
            let mut zones = state.zones.clone();
            zones.insert(next.name.clone(), next.clone());
            self.commit(state.with_zones(zones, &self.config));
            info!(
                "updated zone {name:?} in {}: {} with priority {priority}",
                next.world,
                shape.kind()
            );
            Ok(next)
        });
        result.inspect_err(|e| debug!("rejected update of {name:?}: {e}"))
    }

    /// World snapshot and zone for a registered name.
    fn locate(
        &self,
        registry: &Registry,
        name: &str,
    ) -> Result<(Arc<WorldState<V>>, Arc<Zone<V>>), RegionError> {
        let not_found = || RegionError::ZoneNotFound(name.into());
        let world = registry.zones.get(name).ok_or_else(not_found)?;
        let state = self.world_state(world).ok_or_else(not_found)?;
        let zone = state.zones.get(name).cloned().ok_or_else(not_found)?;
        Ok((state, zone))
    }

    // --- Settings ---

    /// Assign `value` to `key` in a scope, returning the value it replaced.
    ///
    /// Assigning to an unknown world creates it. Assigning to an unknown zone
    /// fails with [`RegionError::ZoneNotFound`].
    pub fn assign(
        &self,
        scope: &ScopeRef,
        key: &ConfigKey<V>,
        value: V,
    ) -> Result<Option<V>, RegionError> {
        let id = key.shared_id();
        let prev = self.edit_settings(scope, true, |s| s.with(id, value))?;
        debug!("assigned {:?} in {scope}", key.id());
        Ok(prev)
    }

    /// Remove the assignment of `key` from a scope, returning it.
    pub fn unassign(
        &self,
        scope: &ScopeRef,
        key: &ConfigKey<V>,
    ) -> Result<Option<V>, RegionError> {
        let prev = self.edit_settings(scope, false, |s| s.without(key.id()))?;
        if prev.is_some() {
            debug!("unassigned {:?} in {scope}", key.id());
        }
        Ok(prev)
    }

    /// Remove every assignment from a scope.
    ///
    /// This is the only way to empty the global and world scopes, which
    /// cannot be removed.
    pub fn clear(&self, scope: &ScopeRef) -> Result<(), RegionError> {
        self.edit_settings(scope, false, |_| (Settings::default(), None))?;
        debug!("cleared {scope}");
        Ok(())
    }

    /// Value a scope assigns to `key`, ignoring every other scope.
    pub fn get(&self, scope: &ScopeRef, key: &ConfigKey<V>) -> Option<V> {
        match scope {
            ScopeRef::Global => read(&self.global).get(key).cloned(),
            ScopeRef::World(id) => self.world_state(id)?.scope.get(key).cloned(),
            ScopeRef::Zone(name) => self.zone(name)?.get(key).cloned(),
        }
    }

    /// Swap in new settings for one scope. Zone sets and indexes are reused.
    fn edit_settings(
        &self,
        scope: &ScopeRef,
        create_world: bool,
        edit: impl FnOnce(&Settings<V>) -> (Settings<V>, Option<V>),
    ) -> Result<Option<V>, RegionError> {
        let registry = lock(&self.registry);
        match scope {
            ScopeRef::Global => {
                let current = read(&self.global).clone();
                let (settings, prev) = edit(&current.settings);
                *write(&self.global) = Arc::new(GlobalScope { settings });
                Ok(prev)
            }
            ScopeRef::World(id) => {
                let state = match self.world_state(id) {
                    Some(state) => state,
                    None if create_world => Arc::new(WorldState::empty(id.clone(), &self.config)),
                    None => return Err(RegionError::UnknownWorld(id.clone())),
                };
                let (settings, prev) = edit(&state.scope.settings);
                self.commit(WorldState {
                    scope: Arc::new(WorldScope {
                        id: id.clone(),
                        settings,
                    }),
                    zones: state.zones.clone(),
                    spatial: state.spatial.clone(),
                });
                Ok(prev)
            }
            ScopeRef::Zone(name) => {
                let (state, zone) = self.locate(&registry, name)?;
                let (settings, prev) = edit(&zone.settings);
                let mut zones = state.zones.clone();
                zones.insert(zone.name.clone(), Arc::new(zone.with_settings(settings)));
                self.commit(WorldState {
                    scope: state.scope.clone(),
                    zones,
                    spatial: state.spatial.clone(),
                });
                Ok(prev)
            }
        }
    }
}
