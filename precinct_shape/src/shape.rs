// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape variants and their containment semantics.
//!
//! | Variant | Containment |
//! |---|---|
//! | [`Cuboid`] | half-open `[min, max)` on every axis |
//! | [`Cylinder`] | closed: XZ distance to the axis `<= radius`, y in `[min_y, max_y]` |
//! | [`Sphere`] | closed: distance to the center `<= radius` |
//! | [`Slab`] | closed on y, unbounded on x and z |
//!
//! The half-open box lets adjacent boxes tile space without sharing a block.

use kurbo::{Circle, Point, Rect};
use precinct_index::{Aabb3D, Region};

use crate::error::{Axis3, ShapeError, check_finite, check_radius, check_range};

/// `sqrt(3) / 3`: half-width of the cube inscribed in a unit sphere.
const FRAC_1_SQRT_3: f64 = 0.577_350_269_189_625_8;

/// Axis-aligned box, half-open on its maximum faces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cuboid {
    bounds: Aabb3D<f64>,
}

impl Cuboid {
    /// Create a box from its minimum and maximum corners.
    ///
    /// Every edge must have positive length.
    pub fn new(
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
    ) -> Result<Self, ShapeError> {
        Self::from_aabb(Aabb3D::new(min_x, min_y, min_z, max_x, max_y, max_z))
    }

    /// Create a box covering exactly `bounds`.
    pub fn from_aabb(bounds: Aabb3D<f64>) -> Result<Self, ShapeError> {
        let shape = Self { bounds };
        shape.validate()?;
        Ok(shape)
    }

    /// Create a box from two opposite corners given in any order.
    pub fn from_corners(a: [f64; 3], b: [f64; 3]) -> Result<Self, ShapeError> {
        Self::new(
            a[0].min(b[0]),
            a[1].min(b[1]),
            a[2].min(b[2]),
            a[0].max(b[0]),
            a[1].max(b[1]),
            a[2].max(b[2]),
        )
    }

    /// The box's bounds. The maximum faces are not part of the box.
    pub fn bounds(&self) -> Aabb3D<f64> {
        self.bounds
    }

    /// Projection onto the XZ plane (x → x, z → y).
    pub fn footprint(&self) -> Rect {
        let b = self.bounds;
        Rect::new(b.min_x, b.min_z, b.max_x, b.max_z)
    }

    /// Whether the point lies in `[min, max)` on every axis.
    pub fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        let b = &self.bounds;
        b.min_x <= x && x < b.max_x && b.min_y <= y && y < b.max_y && b.min_z <= z && z < b.max_z
    }

    fn validate(&self) -> Result<(), ShapeError> {
        let b = &self.bounds;
        check_range(Axis3::X, b.min_x, b.max_x, true)?;
        check_range(Axis3::Y, b.min_y, b.max_y, true)?;
        check_range(Axis3::Z, b.min_z, b.max_z, true)
    }
}

/// Vertical cylinder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cylinder {
    center: Point,
    min_y: f64,
    max_y: f64,
    radius: f64,
}

impl Cylinder {
    /// Create a cylinder around the vertical axis through `(center_x, center_z)`.
    ///
    /// `min_y == max_y` is allowed and describes a single disk.
    pub fn new(
        center_x: f64,
        center_z: f64,
        min_y: f64,
        max_y: f64,
        radius: f64,
    ) -> Result<Self, ShapeError> {
        let shape = Self {
            center: Point::new(center_x, center_z),
            min_y,
            max_y,
            radius,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Axis position in the XZ plane (x → x, z → y).
    pub fn center(&self) -> Point {
        self.center
    }

    /// Bottom of the cylinder (inclusive).
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    /// Top of the cylinder (inclusive).
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Cross-section in the XZ plane.
    pub fn disk(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Closed containment test.
    pub fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        if y < self.min_y || y > self.max_y {
            return false;
        }
        (Point::new(x, z) - self.center).hypot2() <= self.radius * self.radius
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_finite(&[self.center.x, self.center.y])?;
        check_range(Axis3::Y, self.min_y, self.max_y, false)?;
        check_radius(self.radius)
    }
}

/// Ball.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    center: [f64; 3],
    radius: f64,
}

impl Sphere {
    /// Create a sphere.
    pub fn new(x: f64, y: f64, z: f64, radius: f64) -> Result<Self, ShapeError> {
        let shape = Self {
            center: [x, y, z],
            radius,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Center as `[x, y, z]`.
    pub fn center(&self) -> [f64; 3] {
        self.center
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Closed containment test.
    pub fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        let [cx, cy, cz] = self.center;
        let (dx, dy, dz) = (x - cx, y - cy, z - cz);
        dx * dx + dy * dy + dz * dz <= self.radius * self.radius
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_finite(&self.center)?;
        check_radius(self.radius)
    }
}

/// Horizontal layer, unbounded on x and z.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slab {
    min_y: f64,
    max_y: f64,
}

impl Slab {
    /// Create a slab spanning `[min_y, max_y]`.
    pub fn new(min_y: f64, max_y: f64) -> Result<Self, ShapeError> {
        let shape = Self { min_y, max_y };
        shape.validate()?;
        Ok(shape)
    }

    /// Bottom of the slab (inclusive).
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    /// Top of the slab (inclusive).
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Closed containment test on y only.
    pub fn contains_point(&self, _x: f64, y: f64, _z: f64) -> bool {
        self.min_y <= y && y <= self.max_y
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_range(Axis3::Y, self.min_y, self.max_y, false)
    }
}

/// A zone's volume.
///
/// Shapes are immutable once built; every constructor validates its
/// parameters, so a `Shape` value is always valid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box.
    Cuboid(Cuboid),
    /// Vertical cylinder.
    Cylinder(Cylinder),
    /// Ball.
    Sphere(Sphere),
    /// Horizontal layer.
    Slab(Slab),
}

impl From<Cuboid> for Shape {
    fn from(v: Cuboid) -> Self {
        Self::Cuboid(v)
    }
}

impl From<Cylinder> for Shape {
    fn from(v: Cylinder) -> Self {
        Self::Cylinder(v)
    }
}

impl From<Sphere> for Shape {
    fn from(v: Sphere) -> Self {
        Self::Sphere(v)
    }
}

impl From<Slab> for Shape {
    fn from(v: Slab) -> Self {
        Self::Slab(v)
    }
}

impl Shape {
    /// Shorthand for [`Cuboid::new`].
    pub fn cuboid(
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
    ) -> Result<Self, ShapeError> {
        Cuboid::new(min_x, min_y, min_z, max_x, max_y, max_z).map(Self::from)
    }

    /// Shorthand for [`Cylinder::new`].
    pub fn cylinder(
        center_x: f64,
        center_z: f64,
        min_y: f64,
        max_y: f64,
        radius: f64,
    ) -> Result<Self, ShapeError> {
        Cylinder::new(center_x, center_z, min_y, max_y, radius).map(Self::from)
    }

    /// Shorthand for [`Sphere::new`].
    pub fn sphere(x: f64, y: f64, z: f64, radius: f64) -> Result<Self, ShapeError> {
        Sphere::new(x, y, z, radius).map(Self::from)
    }

    /// Shorthand for [`Slab::new`].
    pub fn slab(min_y: f64, max_y: f64) -> Result<Self, ShapeError> {
        Slab::new(min_y, max_y).map(Self::from)
    }

    /// Lowercase variant name, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cuboid(_) => "box",
            Self::Cylinder(_) => "cylinder",
            Self::Sphere(_) => "sphere",
            Self::Slab(_) => "slab",
        }
    }

    /// Exact containment test; see the module docs for per-variant semantics.
    pub fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        match self {
            Self::Cuboid(s) => s.contains_point(x, y, z),
            Self::Cylinder(s) => s.contains_point(x, y, z),
            Self::Sphere(s) => s.contains_point(x, y, z),
            Self::Slab(s) => s.contains_point(x, y, z),
        }
    }

    /// Whether any corner of the unit cell at `(bx, by, bz)` is inside.
    pub fn contains_block(&self, bx: i64, by: i64, bz: i64) -> bool {
        (0..8_i64).any(|corner| {
            let (x, y, z) = (
                (bx + (corner & 1)) as f64,
                (by + ((corner >> 1) & 1)) as f64,
                (bz + ((corner >> 2) & 1)) as f64,
            );
            self.contains_point(x, y, z)
        })
    }

    /// Smallest axis-aligned box enclosing the shape.
    ///
    /// Slabs extend to infinity on x and z.
    pub fn bounding_box(&self) -> Aabb3D<f64> {
        match self {
            Self::Cuboid(s) => s.bounds,
            Self::Cylinder(s) => {
                let r = s.radius;
                Aabb3D::new(
                    s.center.x - r,
                    s.min_y,
                    s.center.y - r,
                    s.center.x + r,
                    s.max_y,
                    s.center.y + r,
                )
            }
            Self::Sphere(s) => {
                let [x, y, z] = s.center;
                let r = s.radius;
                Aabb3D::new(x - r, y - r, z - r, x + r, y + r, z + r)
            }
            Self::Slab(s) => Aabb3D::new(
                f64::NEG_INFINITY,
                s.min_y,
                f64::NEG_INFINITY,
                f64::INFINITY,
                s.max_y,
                f64::INFINITY,
            ),
        }
    }

    /// A box guaranteed to lie inside the shape, if one is defined.
    ///
    /// The returned box is closed. A slab is its own inscribed box. A box's
    /// maximum faces are excluded from it, so they step down to the next
    /// representable value.
    pub fn inscribed_box(&self) -> Option<Aabb3D<f64>> {
        match self {
            Self::Cuboid(s) => {
                let b = s.bounds;
                Some(Aabb3D::new(
                    b.min_x,
                    b.min_y,
                    b.min_z,
                    b.max_x.next_down(),
                    b.max_y.next_down(),
                    b.max_z.next_down(),
                ))
            }
            Self::Slab(_) => Some(self.bounding_box()),
            Self::Cylinder(s) => {
                let h = s.radius * core::f64::consts::FRAC_1_SQRT_2;
                Some(Aabb3D::new(
                    s.center.x - h,
                    s.min_y,
                    s.center.y - h,
                    s.center.x + h,
                    s.max_y,
                    s.center.y + h,
                ))
            }
            Self::Sphere(s) => {
                let [x, y, z] = s.center;
                let h = s.radius * FRAC_1_SQRT_3;
                Some(Aabb3D::new(x - h, y - h, z - h, x + h, y + h, z + h))
            }
        }
    }

    /// Re-check the construction invariants.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Cuboid(s) => s.validate(),
            Self::Cylinder(s) => s.validate(),
            Self::Sphere(s) => s.validate(),
            Self::Slab(s) => s.validate(),
        }
        .is_ok()
    }
}

impl Region for Shape {
    fn aabb(&self) -> Aabb3D<f64> {
        self.bounding_box()
    }

    fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        Self::contains_point(self, x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference predicates written independently of the shape code.
    fn in_box(b: [f64; 6], p: [f64; 3]) -> bool {
        (0..3).all(|i| b[i] <= p[i] && p[i] < b[i + 3])
    }

    fn sq(v: f64) -> f64 {
        v * v
    }

    fn in_cylinder(c: [f64; 5], p: [f64; 3]) -> bool {
        let [cx, cz, y0, y1, r] = c;
        let d2 = sq(p[0] - cx) + sq(p[2] - cz);
        p[1] >= y0 && p[1] <= y1 && d2 <= r * r
    }

    fn in_sphere(s: [f64; 4], p: [f64; 3]) -> bool {
        let d2 = sq(p[0] - s[0]) + sq(p[1] - s[1]) + sq(p[2] - s[2]);
        d2 <= s[3] * s[3]
    }

    fn grid() -> impl Iterator<Item = [f64; 3]> {
        (-12..=12).flat_map(|x| {
            (-12..=12).flat_map(move |y| {
                (-12..=12).map(move |z| [f64::from(x) * 0.5, f64::from(y) * 0.5, f64::from(z) * 0.5])
            })
        })
    }

    #[test]
    fn box_containment_matches_reference() {
        let b = [-3.0, -1.0, 0.0, 4.0, 2.5, 5.0];
        let shape = Shape::cuboid(b[0], b[1], b[2], b[3], b[4], b[5]).unwrap();
        for p in grid() {
            assert_eq!(shape.contains_point(p[0], p[1], p[2]), in_box(b, p), "{p:?}");
        }
    }

    #[test]
    fn cylinder_containment_matches_reference() {
        let c = [1.0, -2.0, -3.0, 3.0, 4.5];
        let shape = Shape::cylinder(c[0], c[1], c[2], c[3], c[4]).unwrap();
        for p in grid() {
            assert_eq!(shape.contains_point(p[0], p[1], p[2]), in_cylinder(c, p), "{p:?}");
        }
    }

    #[test]
    fn sphere_containment_matches_reference() {
        let s = [0.5, -1.0, 2.0, 3.5];
        let shape = Shape::sphere(s[0], s[1], s[2], s[3]).unwrap();
        for p in grid() {
            assert_eq!(shape.contains_point(p[0], p[1], p[2]), in_sphere(s, p), "{p:?}");
        }
    }

    #[test]
    fn slab_ignores_x_and_z() {
        let shape = Shape::slab(-1.0, 2.0).unwrap();
        for p in grid() {
            assert_eq!(shape.contains_point(p[0], p[1], p[2]), (-1.0..=2.0).contains(&p[1]));
        }
        assert!(shape.contains_point(1.0e12, 0.0, -1.0e12));
    }

    #[test]
    fn box_max_faces_are_excluded() {
        let shape = Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0).unwrap();
        assert!(shape.contains_point(0.0, 0.0, 0.0));
        assert!(shape.contains_point(9.999, 9.999, 9.999));
        assert!(!shape.contains_point(10.0, 5.0, 5.0));
        assert!(!shape.contains_point(5.0, 10.0, 5.0));
        assert!(!shape.contains_point(5.0, 5.0, 10.0));
    }

    #[test]
    fn bounding_box_encloses_every_contained_point() {
        let shapes = [
            Shape::cuboid(-3.0, -1.0, 0.0, 4.0, 2.5, 5.0).unwrap(),
            Shape::cylinder(1.0, -2.0, -3.0, 3.0, 4.5).unwrap(),
            Shape::sphere(0.5, -1.0, 2.0, 3.5).unwrap(),
            Shape::slab(-1.0, 2.0).unwrap(),
        ];
        for shape in shapes {
            let bb = shape.bounding_box();
            for p in grid() {
                if shape.contains_point(p[0], p[1], p[2]) {
                    assert!(bb.contains_point(p[0], p[1], p[2]), "{} at {p:?}", shape.kind());
                }
            }
        }
    }

    #[test]
    fn inscribed_box_lies_inside() {
        let shapes = [
            Shape::cuboid(-3.0, -1.0, 0.0, 4.0, 2.5, 5.0).unwrap(),
            Shape::cylinder(1.0, -2.0, -3.0, 3.0, 4.5).unwrap(),
            Shape::sphere(0.5, -1.0, 2.0, 3.5).unwrap(),
            Shape::slab(-1.0, 2.0).unwrap(),
        ];
        for shape in shapes {
            let inner = shape.inscribed_box().unwrap();
            for p in grid() {
                if inner.contains_point(p[0], p[1], p[2]) {
                    assert!(shape.contains_point(p[0], p[1], p[2]), "{} at {p:?}", shape.kind());
                }
            }
        }
        let sphere = Shape::sphere(0.0, 0.0, 0.0, 3.0).unwrap();
        let inner = sphere.inscribed_box().unwrap();
        // Corner of the inscribed cube sits on the surface: 3 * h^2 == r^2.
        assert!((3.0 * sq(inner.max_x) - 9.0).abs() < 1e-9);

        let cube = Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0).unwrap();
        let inner = cube.inscribed_box().unwrap();
        assert!(!inner.contains_point(10.0, 10.0, 10.0));
        assert!(!inner.contains_point(10.0, 5.0, 5.0));
        assert!(inner.contains_point(0.0, 0.0, 0.0));
        assert!(inner.contains_point(inner.max_x, inner.max_y, inner.max_z));
        assert!(cube.contains_point(inner.max_x, inner.max_y, inner.max_z));
        assert!(inner.max_x < 10.0 && inner.max_x > 9.999_999);
    }

    #[test]
    fn block_containment_checks_corners() {
        let sphere = Shape::sphere(0.0, 0.0, 0.0, 1.0).unwrap();
        // Corner (0, 0, 0) of cell (-1, -1, -1) is the center.
        assert!(sphere.contains_block(-1, -1, -1));
        assert!(sphere.contains_block(0, 0, 0));
        // Nearest corner (1, 1, 1) is sqrt(3) away.
        assert!(!sphere.contains_block(1, 1, 1));

        let cuboid = Shape::cuboid(0.0, 0.0, 0.0, 2.0, 2.0, 2.0).unwrap();
        assert!(cuboid.contains_block(-1, -1, -1));
        assert!(!cuboid.contains_block(2, 0, 0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(
            Shape::cuboid(0.0, 0.0, 0.0, 0.0, 1.0, 1.0),
            Err(ShapeError::ZeroExtent { axis: Axis3::X })
        );
        assert_eq!(
            Shape::cuboid(0.0, 5.0, 0.0, 1.0, 1.0, 1.0),
            Err(ShapeError::InvertedRange { axis: Axis3::Y })
        );
        assert_eq!(
            Shape::cylinder(0.0, 0.0, 0.0, 1.0, 0.0),
            Err(ShapeError::NonPositiveRadius)
        );
        assert_eq!(
            Shape::cylinder(f64::NAN, 0.0, 0.0, 1.0, 1.0),
            Err(ShapeError::NonFinite)
        );
        assert_eq!(
            Shape::sphere(0.0, f64::INFINITY, 0.0, 1.0),
            Err(ShapeError::NonFinite)
        );
        assert_eq!(Shape::slab(3.0, 2.0), Err(ShapeError::InvertedRange { axis: Axis3::Y }));
        assert!(Shape::slab(2.0, 2.0).unwrap().is_valid());
    }

    #[test]
    fn corners_in_any_order() {
        let a = Cuboid::from_corners([10.0, 0.0, 10.0], [0.0, 10.0, 0.0]).unwrap();
        assert_eq!(a.bounds(), Aabb3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
        assert_eq!(a.footprint(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }
}
