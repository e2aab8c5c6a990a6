// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry primitives shared by every stage of the pipeline.
//!
//! Points and vectors are plain serializable `f64` triples; conversions to
//! nalgebra are provided for the places that need matrix math.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A location in 3D space (Z is up)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn from_nalgebra(p: &Point3<f64>) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }

    pub fn distance_to(&self, other: &Point3D) -> f64 {
        (*other - *self).length()
    }

    /// Distance measured in the floor (XY) plane only
    pub fn horizontal_distance_to(&self, other: &Point3D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position vector from the origin
    pub fn coords(&self) -> Vector3D {
        Vector3D::new(self.x, self.y, self.z)
    }

    /// Componentwise minimum
    pub fn inf(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Componentwise maximum
    pub fn sup(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A displacement or direction in 3D space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vector3D = Vector3D { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_nalgebra(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_nalgebra(v: &Vector3<f64>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector
    pub fn normalize(&self) -> Option<Vector3D> {
        let len = self.length();
        if len < 1e-12 || !len.is_finite() {
            return None;
        }
        Some(*self * (1.0 / len))
    }

    /// Smallest component
    pub fn min_component(&self) -> f64 {
        self.x.min(self.y).min(self.z)
    }

    /// Largest component
    pub fn max_component(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }
}

impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, rhs: Point3D) -> Vector3D {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Vector3D) -> Point3D {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vector3D> for Point3D {
    type Output = Point3D;

    fn sub(self, rhs: Vector3D) -> Point3D {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f64) -> Vector3D {
        Vector3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Vector3D {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}

/// Axis-aligned bounding box
///
/// Invariant: `min <= max` componentwise. Constructors that take arbitrary
/// corners ([`BoundingBox::from_corners`]) re-sort them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min: Point3D,
    pub max: Point3D,
}

impl BoundingBox {
    pub fn new(min: Point3D, max: Point3D) -> Self {
        Self { min, max }
    }

    /// Box spanned by two arbitrary corners
    pub fn from_corners(a: Point3D, b: Point3D) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Box from a center point and a full-extent size
    pub fn from_center_size(center: Point3D, size: Vector3D) -> Self {
        let half = size * 0.5;
        Self::from_corners(center - half, center + half)
    }

    /// Tight box around a set of points, `None` if the set is empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| acc.expanded_to(p)))
    }

    /// Componentwise extent (`max - min`)
    pub fn size(&self) -> Vector3D {
        self.max - self.min
    }

    pub fn center(&self) -> Point3D {
        Point3D::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    pub fn volume(&self) -> f64 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Area of the XY footprint
    pub fn footprint_area(&self) -> f64 {
        let size = self.size();
        size.x * size.y
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Copy of this box grown to include `point`
    pub fn expanded_to(&self, point: &Point3D) -> BoundingBox {
        BoundingBox::new(self.min.inf(point), self.max.sup(point))
    }

    pub fn contains_point(&self, p: &Point3D) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Re-sort min/max componentwise (needed after rotating the corners)
    pub fn normalized(&self) -> BoundingBox {
        Self::from_corners(self.min, self.max)
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Line segment in the floor (XY) plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment2D {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Segment2D {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self { start, end }
    }

    /// XY projection of a 3D segment
    pub fn from_points(start: &Point3D, end: &Point3D) -> Self {
        Self::new((start.x, start.y), (end.x, end.y))
    }

    pub fn length(&self) -> f64 {
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Intersection point of two segments.
    ///
    /// Parallel and collinear segments report no intersection.
    pub fn intersection(&self, other: &Segment2D) -> Option<(f64, f64)> {
        let (x1, y1) = self.start;
        let (x2, y2) = self.end;
        let (x3, y3) = other.start;
        let (x4, y4) = other.end;

        let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if denom.abs() < 1e-12 {
            return None;
        }

        let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
        let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / denom;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some((x1 + t * (x2 - x1), y1 + t * (y2 - y1)))
        } else {
            None
        }
    }

    /// Shortest distance from a point to this segment
    pub fn distance_to_point(&self, point: (f64, f64)) -> f64 {
        let (x1, y1) = self.start;
        let dx = self.end.0 - x1;
        let dy = self.end.1 - y1;
        let length_sq = dx * dx + dy * dy;

        if length_sq < 1e-12 {
            return ((point.0 - x1).powi(2) + (point.1 - y1).powi(2)).sqrt();
        }

        let t = (((point.0 - x1) * dx + (point.1 - y1) * dy) / length_sq).clamp(0.0, 1.0);
        let px = x1 + t * dx;
        let py = y1 + t * dy;
        ((point.0 - px).powi(2) + (point.1 - py).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_vector_arithmetic() {
        let a = Point3D::new(1.0, 2.0, 3.0);
        let b = Point3D::new(4.0, 6.0, 3.0);

        let d = b - a;
        assert_eq!(d, Vector3D::new(3.0, 4.0, 0.0));
        assert_relative_eq!(a.distance_to(&b), 5.0);
        assert_eq!(a + d, b);
        assert_eq!(b - d, a);
    }

    #[test]
    fn cross_product_follows_right_hand_rule() {
        let x = Vector3D::new(1.0, 0.0, 0.0);
        let y = Vector3D::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3D::UP);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(Vector3D::ZERO.normalize().is_none());
        let n = Vector3D::new(0.0, 0.0, 4.0).normalize().unwrap();
        assert_relative_eq!(n.length(), 1.0);
    }

    #[test]
    fn bounding_box_derived_values() {
        let b = BoundingBox::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(6.0, 5.0, 2.5));
        assert_eq!(b.size(), Vector3D::new(6.0, 5.0, 2.5));
        assert_eq!(b.center(), Point3D::new(3.0, 2.5, 1.25));
        assert_relative_eq!(b.volume(), 75.0);
        assert_relative_eq!(b.footprint_area(), 30.0);
    }

    #[test]
    fn from_corners_sorts_components() {
        let b = BoundingBox::from_corners(Point3D::new(2.0, -1.0, 3.0), Point3D::new(-2.0, 1.0, 0.0));
        assert_eq!(b.min, Point3D::new(-2.0, -1.0, 0.0));
        assert_eq!(b.max, Point3D::new(2.0, 1.0, 3.0));
    }

    #[test]
    fn union_and_from_points() {
        let a = BoundingBox::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 1.0, 1.0));
        let b = BoundingBox::new(Point3D::new(2.0, -1.0, 0.5), Point3D::new(3.0, 0.5, 2.0));
        let u = a.union(&b);
        assert_eq!(u.min, Point3D::new(0.0, -1.0, 0.0));
        assert_eq!(u.max, Point3D::new(3.0, 1.0, 2.0));

        let pts = [Point3D::new(1.0, 5.0, 0.0), Point3D::new(-1.0, 2.0, 4.0)];
        let tight = BoundingBox::from_points(&pts).unwrap();
        assert_eq!(tight.min, Point3D::new(-1.0, 2.0, 0.0));
        assert_eq!(tight.max, Point3D::new(1.0, 5.0, 4.0));
        assert!(BoundingBox::from_points(std::iter::empty::<&Point3D>()).is_none());
    }

    #[test]
    fn containment_and_overlap() {
        let room = BoundingBox::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(4.0, 4.0, 3.0));
        let inside = BoundingBox::new(Point3D::new(1.0, 1.0, 0.0), Point3D::new(2.0, 2.0, 1.0));
        let outside = BoundingBox::new(Point3D::new(5.0, 5.0, 0.0), Point3D::new(6.0, 6.0, 1.0));

        assert!(room.contains_point(&inside.center()));
        assert!(room.intersects(&inside));
        assert!(!room.intersects(&outside));
    }

    #[test]
    fn crossing_segments_intersect() {
        let a = Segment2D::new((0.0, 0.0), (4.0, 4.0));
        let b = Segment2D::new((0.0, 4.0), (4.0, 0.0));
        let (x, y) = a.intersection(&b).unwrap();
        assert_relative_eq!(x, 2.0);
        assert_relative_eq!(y, 2.0);
    }

    #[test]
    fn disjoint_and_parallel_segments_do_not_intersect() {
        let a = Segment2D::new((0.0, 0.0), (1.0, 0.0));
        let parallel = Segment2D::new((0.0, 1.0), (1.0, 1.0));
        let short = Segment2D::new((2.0, -1.0), (2.0, 1.0));
        assert!(a.intersection(&parallel).is_none());
        assert!(a.intersection(&short).is_none());
    }

    #[test]
    fn segment_point_distance() {
        let wall = Segment2D::new((0.0, 0.0), (10.0, 0.0));
        assert_relative_eq!(wall.distance_to_point((5.0, 3.0)), 3.0);
        // Beyond the end, distance is to the endpoint
        assert_relative_eq!(wall.distance_to_point((13.0, 4.0)), 5.0);
    }
}
