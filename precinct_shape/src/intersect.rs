// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pairwise intersection tests.
//!
//! Two shapes intersect iff some point is contained in both, using each
//! shape's own containment rule. A box never contains its maximum faces, so a
//! shape touching only those faces does not intersect it.

use bitflags::bitflags;
use kurbo::{Point, Rect};

use crate::shape::{Cuboid, Cylinder, Shape, Slab, Sphere};

bitflags! {
    /// Position of a point relative to a half-open box, one bit pair per axis.
    ///
    /// No bits set means the point is inside. One pair set places it beside a
    /// face, two beside an edge, three beside a corner.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Outcode: u8 {
        /// Below the minimum x face.
        const BELOW_X = 1 << 0;
        /// At or above the maximum x face.
        const ABOVE_X = 1 << 1;
        /// Below the minimum y face.
        const BELOW_Y = 1 << 2;
        /// At or above the maximum y face.
        const ABOVE_Y = 1 << 3;
        /// Below the minimum z face.
        const BELOW_Z = 1 << 4;
        /// At or above the maximum z face.
        const ABOVE_Z = 1 << 5;
        /// Any maximum face.
        const ABOVE = Self::ABOVE_X.bits() | Self::ABOVE_Y.bits() | Self::ABOVE_Z.bits();
    }
}

/// Classify `p` against `[min, max)` on one axis.
///
/// Returns the flag to set and the distance to the interval.
fn classify(p: f64, min: f64, max: f64, below: Outcode, above: Outcode) -> (Outcode, f64) {
    if p < min {
        (below, min - p)
    } else if p >= max {
        (above, p - max)
    } else {
        (Outcode::empty(), 0.0)
    }
}

/// Whether a closed ball reaches a half-open region, given the outcode of its
/// center and the squared distance to the region's closure.
///
/// At exactly `r` the only touching point lies on the closure. That point is
/// part of the region unless it sits on a maximum face.
fn reaches(code: Outcode, dist2: f64, radius: f64) -> bool {
    let r2 = radius * radius;
    dist2 < r2 || (dist2 == r2 && !code.intersects(Outcode::ABOVE))
}

impl Cuboid {
    /// Outcode of a point against this box, with its squared distance to the
    /// box's closure.
    pub fn outcode(&self, x: f64, y: f64, z: f64) -> (Outcode, f64) {
        let b = self.bounds();
        let (cx, dx) = classify(x, b.min_x, b.max_x, Outcode::BELOW_X, Outcode::ABOVE_X);
        let (cy, dy) = classify(y, b.min_y, b.max_y, Outcode::BELOW_Y, Outcode::ABOVE_Y);
        let (cz, dz) = classify(z, b.min_z, b.max_z, Outcode::BELOW_Z, Outcode::ABOVE_Z);
        (cx | cy | cz, dx * dx + dy * dy + dz * dz)
    }
}

/// Closed `[a0, a1]` against closed `[b0, b1]`.
fn closed_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 <= b1 && b0 <= a1
}

/// Half-open `[h0, h1)` against closed `[c0, c1]`.
fn half_open_overlap(h0: f64, h1: f64, c0: f64, c1: f64) -> bool {
    c0 < h1 && h0 <= c1
}

fn box_box(a: &Cuboid, b: &Cuboid) -> bool {
    let (a, b) = (a.bounds(), b.bounds());
    a.min_x < b.max_x
        && b.min_x < a.max_x
        && a.min_y < b.max_y
        && b.min_y < a.max_y
        && a.min_z < b.max_z
        && b.min_z < a.max_z
}

fn box_cylinder(b: &Cuboid, c: &Cylinder) -> bool {
    let bb = b.bounds();
    if !half_open_overlap(bb.min_y, bb.max_y, c.min_y(), c.max_y()) {
        return false;
    }
    let rect: Rect = b.footprint();
    let disk = c.disk();
    let (cx, dx) = classify(disk.center.x, rect.x0, rect.x1, Outcode::BELOW_X, Outcode::ABOVE_X);
    let (cz, dz) = classify(disk.center.y, rect.y0, rect.y1, Outcode::BELOW_Z, Outcode::ABOVE_Z);
    reaches(cx | cz, dx * dx + dz * dz, disk.radius)
}

fn box_sphere(b: &Cuboid, s: &Sphere) -> bool {
    let [x, y, z] = s.center();
    let (code, dist2) = b.outcode(x, y, z);
    reaches(code, dist2, s.radius())
}

fn box_slab(b: &Cuboid, s: &Slab) -> bool {
    let bb = b.bounds();
    half_open_overlap(bb.min_y, bb.max_y, s.min_y(), s.max_y())
}

fn cylinder_cylinder(a: &Cylinder, b: &Cylinder) -> bool {
    if !closed_overlap(a.min_y(), a.max_y(), b.min_y(), b.max_y()) {
        return false;
    }
    let reach = a.radius() + b.radius();
    (a.center() - b.center()).hypot2() <= reach * reach
}

fn cylinder_sphere(c: &Cylinder, s: &Sphere) -> bool {
    let [sx, sy, sz] = s.center();
    let (rc, rs) = (c.radius(), s.radius());
    let axis_dist = (Point::new(sx, sz) - c.center()).hypot();
    let dy = if sy < c.min_y() {
        c.min_y() - sy
    } else if sy > c.max_y() {
        sy - c.max_y()
    } else {
        0.0
    };
    if dy == 0.0 {
        // Center level with the side wall.
        axis_dist <= rc + rs
    } else if axis_dist <= rc {
        // Center over a cap.
        dy <= rs
    } else {
        // Nearest feature is the rim circle.
        let ds = axis_dist - rc;
        ds * ds + dy * dy <= rs * rs
    }
}

fn cylinder_slab(c: &Cylinder, s: &Slab) -> bool {
    closed_overlap(c.min_y(), c.max_y(), s.min_y(), s.max_y())
}

fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let ([ax, ay, az], [bx, by, bz]) = (a.center(), b.center());
    let (dx, dy, dz) = (ax - bx, ay - by, az - bz);
    let reach = a.radius() + b.radius();
    dx * dx + dy * dy + dz * dz <= reach * reach
}

fn sphere_slab(s: &Sphere, l: &Slab) -> bool {
    let [_, y, _] = s.center();
    let r = s.radius();
    l.min_y() - r <= y && y <= l.max_y() + r
}

fn slab_slab(a: &Slab, b: &Slab) -> bool {
    closed_overlap(a.min_y(), a.max_y(), b.min_y(), b.max_y())
}

impl Shape {
    /// Whether the two shapes share at least one point.
    ///
    /// Symmetric: `a.intersects(&b) == b.intersects(&a)`.
    ///
    /// ```
    /// use precinct_shape::Shape;
    ///
    /// let a = Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0).unwrap();
    /// let b = Shape::sphere(12.0, 5.0, 5.0, 2.0).unwrap();
    /// // The sphere only touches the box's excluded max-x face.
    /// assert!(!a.intersects(&b));
    /// assert!(!b.intersects(&a));
    /// ```
    pub fn intersects(&self, other: &Self) -> bool {
        use Shape::{Cuboid as B, Cylinder as C, Slab as L, Sphere as S};
        match (self, other) {
            (B(a), B(b)) => box_box(a, b),
            (B(a), C(b)) => box_cylinder(a, b),
            (B(a), S(b)) => box_sphere(a, b),
            (B(a), L(b)) => box_slab(a, b),
            (C(a), C(b)) => cylinder_cylinder(a, b),
            (C(a), S(b)) => cylinder_sphere(a, b),
            (C(a), L(b)) => cylinder_slab(a, b),
            (S(a), S(b)) => sphere_sphere(a, b),
            (S(a), L(b)) => sphere_slab(a, b),
            (L(a), L(b)) => slab_slab(a, b),
            (C(_), B(_)) | (S(_), B(_) | C(_)) | (L(_), B(_) | C(_) | S(_)) => {
                other.intersects(self)
            }
        }
    }
}
