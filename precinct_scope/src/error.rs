// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use precinct_shape::ShapeError;

use crate::types::WorldId;

/// Why a [`RegionSystem`](crate::RegionSystem) mutation was rejected.
///
/// A rejected mutation leaves the system unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// The zone's shape could not be built.
    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),
    /// The name is empty or only whitespace.
    #[error("zone name {0:?} is empty")]
    InvalidName(Arc<str>),
    /// The name collides with a built-in scope name.
    #[error("zone name {0:?} is reserved")]
    ReservedName(Arc<str>),
    /// A zone with this name already exists.
    #[error("zone {0:?} already exists")]
    DuplicateName(Arc<str>),
    /// Another intersecting zone in the same world has the same priority.
    #[error("zone {name:?} intersects zone {other:?} with the same priority {priority}")]
    PriorityConflict {
        /// Zone being added or updated.
        name: Arc<str>,
        /// Existing zone it conflicts with.
        other: Arc<str>,
        /// Shared priority.
        priority: i32,
    },
    /// No zone has this name.
    #[error("no zone named {0:?}")]
    ZoneNotFound(Arc<str>),
    /// Global and world scopes cannot be removed.
    #[error("scope {0:?} cannot be removed")]
    NotRemovable(Arc<str>),
    /// The world has never been configured.
    #[error("unknown world {0}")]
    UnknownWorld(WorldId),
}

/// Name of the global scope, reserved for zone names.
pub(crate) const GLOBAL_NAME: &str = "_global";

/// Prefix reserved for world scope names.
pub(crate) const WORLD_PREFIX: &str = "_world";

/// Whether `name` is reserved for a built-in scope (case-insensitive).
pub(crate) fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == GLOBAL_NAME || lower.starts_with(WORLD_PREFIX)
}

/// Check a new zone name.
pub(crate) fn check_name(name: &Arc<str>) -> Result<(), RegionError> {
    if name.trim().is_empty() {
        return Err(RegionError::InvalidName(name.clone()));
    }
    if is_reserved(name) {
        return Err(RegionError::ReservedName(name.clone()));
    }
    Ok(())
}
