// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;

/// Horizontal axis used by partition dividers.
///
/// The vertical axis is never partitioned; it is only checked by the exact
/// containment test at the leaves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    X,
    /// The z axis.
    Z,
}

/// Which side of an AABB a divider compares against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Bound {
    /// The low (minimum) face.
    Min,
    /// The high (maximum) face.
    Max,
}

/// Axis-aligned bounding box in 3D.
///
/// Both faces are inclusive: this is the coarse, conservative representation
/// that every indexed region must be able to produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb3D<T> {
    /// Minimum x
    pub min_x: T,
    /// Minimum y (bottom)
    pub min_y: T,
    /// Minimum z
    pub min_z: T,
    /// Maximum x
    pub max_x: T,
    /// Maximum y (top)
    pub max_y: T,
    /// Maximum z
    pub max_z: T,
}

impl<T> Aabb3D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, min_z: T, max_x: T, max_y: T, max_z: T) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb3D<T> {
    /// Whether this AABB contains the point (faces inclusive).
    pub fn contains_point(&self, x: T, y: T, z: T) -> bool {
        le(self.min_x, x)
            && le(self.min_y, y)
            && le(self.min_z, z)
            && le(x, self.max_x)
            && le(y, self.max_y)
            && le(z, self.max_z)
    }
}

impl Aabb3D<f64> {
    /// Create an AABB from an origin corner and a size.
    pub const fn from_origin_size(x: f64, y: f64, z: f64, w: f64, h: f64, d: f64) -> Self {
        Self::new(x, y, z, x + w, y + h, z + d)
    }

    /// The coordinate of the given face on a horizontal axis.
    #[inline]
    pub fn face(&self, axis: Axis, bound: Bound) -> f64 {
        match (axis, bound) {
            (Axis::X, Bound::Min) => self.min_x,
            (Axis::X, Bound::Max) => self.max_x,
            (Axis::Z, Bound::Min) => self.min_z,
            (Axis::Z, Bound::Max) => self.max_z,
        }
    }

    /// Whether any coordinate is NaN.
    pub fn has_nan(&self) -> bool {
        [
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ]
        .iter()
        .any(|v| v.is_nan())
    }
}

fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}
