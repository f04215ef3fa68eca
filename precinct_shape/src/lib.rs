// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=precinct_shape --heading-base-level=0

//! Precinct Shape: zone volumes with exact containment and intersection tests.
//!
//! A [`Shape`] is one of four validated variants:
//!
//! - [`Cuboid`]: an axis-aligned box, half-open on its maximum faces.
//! - [`Cylinder`]: a vertical cylinder.
//! - [`Sphere`]: a ball.
//! - [`Slab`]: a horizontal layer, unbounded on x and z.
//!
//! Shapes implement [`precinct_index::Region`], so they can be stored directly
//! in a [`PartitionTree`](precinct_index::PartitionTree).
//! [`Shape::intersects`] is exact and symmetric for every pair of variants;
//! planar parts of the math (footprints and disks) go through `kurbo`.
//!
//! # Example
//!
//! ```rust
//! use precinct_index::PartitionTree;
//! use precinct_shape::Shape;
//!
//! let spawn = Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0).unwrap();
//! let tower = Shape::cylinder(20.0, 20.0, 0.0, 64.0, 4.0).unwrap();
//! assert!(!spawn.intersects(&tower));
//!
//! let mut tree = PartitionTree::new();
//! tree.insert("spawn", spawn);
//! tree.insert("tower", tower);
//! assert_eq!(&*tree.query_cell((21, 40, 19)), &["tower"]);
//! assert!(tree.query_cell((10, 5, 5)).is_empty());
//! ```
//!
//! ## Features
//!
//! - `std` (default): use the standard library's float routines.
//! - `libm`: use `libm` instead, for `no_std` targets.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod error;
mod intersect;
mod shape;

pub use error::{Axis3, ShapeError};
pub use intersect::Outcode;
pub use shape::{Cuboid, Cylinder, Shape, Slab, Sphere};
