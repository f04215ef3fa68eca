// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region trait: what the partition tree needs to know about an indexed item.

use crate::types::Aabb3D;

/// An indexable volume.
///
/// The tree partitions on [`Region::aabb`] and uses [`Region::contains_point`]
/// as the final, exact test inside leaves. For correct results the exact test
/// must never accept a point outside the AABB.
pub trait Region {
    /// Conservative bounding box of the volume.
    fn aabb(&self) -> Aabb3D<f64>;

    /// Exact containment test. Defaults to the bounding box.
    fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        self.aabb().contains_point(x, y, z)
    }
}

impl Region for Aabb3D<f64> {
    fn aabb(&self) -> Self {
        *self
    }
}

impl<R: Region + ?Sized> Region for &R {
    fn aabb(&self) -> Aabb3D<f64> {
        (**self).aabb()
    }

    fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        (**self).contains_point(x, y, z)
    }
}
