// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate normalization for captured scenes
//!
//! A [`TransformState`] is an immutable value: configuring produces a new
//! state and every transform operation takes the state explicitly. The
//! default state is the identity, so code that never configures a transform
//! gets coordinates back unchanged.
//!
//! Forward transform order is fixed: scale, then rotate, then translate by
//! the origin. Rotations are restricted to the axis-aligned matrices returned
//! by [`create_rotation_matrix`], which are orthonormal, so the inverse uses
//! the transpose.

use crate::analysis::{analyze_coordinate_system, CoordinateSystemInfo, Orientation};
use nalgebra::Matrix3;
use roomscan_core::{BoundingBox, Point3D, RoomModel, Vector3D};

/// Scale used when the largest room dimension is below 1.0 (millimeters)
pub const MILLIMETER_SCALE: f64 = 0.001;
/// Scale used when the largest room dimension is above 100.0 (centimeters)
pub const CENTIMETER_SCALE: f64 = 0.01;
/// Scale used for meters
pub const METER_SCALE: f64 = 1.0;

/// Immutable origin/scale/rotation triple
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    origin: Point3D,
    scale: f64,
    rotation: Matrix3<f64>,
    configured: bool,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformState {
    /// Unconfigured state; every transform is the identity
    pub fn identity() -> Self {
        Self {
            origin: Point3D::ORIGIN,
            scale: 1.0,
            rotation: Matrix3::identity(),
            configured: false,
        }
    }

    /// Configured state with the given parameters, taken as-is
    pub fn configure(origin: Point3D, scale: f64, rotation: Matrix3<f64>) -> Self {
        Self {
            origin,
            scale,
            rotation,
            configured: true,
        }
    }

    /// Heuristic configuration from a room's bounds.
    ///
    /// Origin is the room's minimum corner, the scale is inferred from the
    /// largest bounding dimension and the rotation is left as identity.
    pub fn auto_configure(room: &RoomModel) -> Self {
        let bounds = room.bounds();
        let max_dimension = bounds.size().max_component();
        Self::configure(bounds.min, scale_for_extent(max_dimension), Matrix3::identity())
    }

    /// Configuration derived from [`analyze_coordinate_system`].
    ///
    /// Returns the analysis alongside the state so callers can report it.
    pub fn auto_configure_from_analysis(room: &RoomModel) -> (Self, CoordinateSystemInfo) {
        let info = analyze_coordinate_system(room);
        let rotation = create_rotation_matrix(info.orientation);
        let state = Self::configure(room.bounds().min, info.recommended_scale, rotation);
        (state, info)
    }

    pub fn origin(&self) -> Point3D {
        self.origin
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Scale, rotate, then translate by the origin
    pub fn transform_point(&self, p: &Point3D) -> Point3D {
        let scaled = p.to_nalgebra().coords * self.scale;
        let rotated = self.rotation * scaled;
        Point3D::from_nalgebra(&(self.origin.to_nalgebra() + rotated))
    }

    /// Scale and rotate; vectors carry no position so no translation applies
    pub fn transform_vector(&self, v: &Vector3D) -> Vector3D {
        let rotated = self.rotation * (v.to_nalgebra() * self.scale);
        Vector3D::from_nalgebra(&rotated)
    }

    /// Transform both corners and re-sort them so `min <= max` still holds
    pub fn transform_bounding_box(&self, b: &BoundingBox) -> BoundingBox {
        BoundingBox::from_corners(self.transform_point(&b.min), self.transform_point(&b.max))
    }

    /// Exact inverse of [`TransformState::transform_point`]
    pub fn inverse_transform_point(&self, p: &Point3D) -> Point3D {
        let translated = p.to_nalgebra() - self.origin.to_nalgebra();
        let unrotated = self.rotation.transpose() * translated;
        Point3D::from_nalgebra(&nalgebra::Point3::from(unrotated / self.scale))
    }
}

/// Scale inferred from the largest room dimension
pub fn scale_for_extent(max_dimension: f64) -> f64 {
    if max_dimension < 1.0 {
        MILLIMETER_SCALE
    } else if max_dimension > 100.0 {
        CENTIMETER_SCALE
    } else {
        METER_SCALE
    }
}

/// Fixed rotation matrix for an orientation.
///
/// Rotations are about the vertical (Z) axis. `Custom` has no matrix of its
/// own and currently maps to identity.
pub fn create_rotation_matrix(orientation: Orientation) -> Matrix3<f64> {
    match orientation {
        Orientation::Standard => Matrix3::identity(),
        Orientation::Rotated90 => Matrix3::new(
            0.0, -1.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0,
        ),
        Orientation::Rotated180 => Matrix3::new(
            -1.0, 0.0, 0.0, //
            0.0, -1.0, 0.0, //
            0.0, 0.0, 1.0,
        ),
        Orientation::Rotated270 => Matrix3::new(
            0.0, 1.0, 0.0, //
            -1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0,
        ),
        Orientation::Flipped => Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, -1.0, 0.0, //
            0.0, 0.0, 1.0,
        ),
        // TODO: derive a matrix once orientation detection can report custom angles
        Orientation::Custom => Matrix3::identity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roomscan_core::FloorPlan;

    const ORIENTATIONS: [Orientation; 6] = [
        Orientation::Standard,
        Orientation::Rotated90,
        Orientation::Rotated180,
        Orientation::Rotated270,
        Orientation::Flipped,
        Orientation::Custom,
    ];

    fn room_with_bounds(min: Point3D, max: Point3D) -> RoomModel {
        let bounds = BoundingBox::new(min, max);
        RoomModel::new(
            "room",
            bounds,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            FloorPlan::from_bounds(bounds),
        )
    }

    fn sample_points() -> Vec<Point3D> {
        let mut points = Vec::new();
        for x in [-250.0, -1.5, 0.0, 0.37, 12.0, 4800.0] {
            for y in [-33.3, 0.0, 2.5, 999.0] {
                for z in [-0.2, 0.0, 1.75, 310.0] {
                    points.push(Point3D::new(x, y, z));
                }
            }
        }
        points
    }

    fn assert_points_close(a: &Point3D, b: &Point3D) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-4);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-4);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-4);
    }

    #[test]
    fn unconfigured_state_is_identity() {
        let state = TransformState::default();
        assert!(!state.is_configured());

        let p = Point3D::new(1.5, -2.0, 3.25);
        assert_eq!(state.transform_point(&p), p);
        assert_eq!(state.inverse_transform_point(&p), p);

        let v = Vector3D::new(0.0, 2.0, -1.0);
        assert_eq!(state.transform_vector(&v), v);
    }

    #[test]
    fn forward_order_is_scale_rotate_translate() {
        let state = TransformState::configure(
            Point3D::new(10.0, 20.0, 0.0),
            2.0,
            create_rotation_matrix(Orientation::Rotated90),
        );

        // (1, 0, 1) -> scaled (2, 0, 2) -> rotated (0, 2, 2) -> translated (10, 22, 2)
        let p = state.transform_point(&Point3D::new(1.0, 0.0, 1.0));
        assert_points_close(&p, &Point3D::new(10.0, 22.0, 2.0));
    }

    #[test]
    fn vectors_ignore_origin() {
        let state = TransformState::configure(
            Point3D::new(100.0, 100.0, 100.0),
            0.5,
            create_rotation_matrix(Orientation::Rotated180),
        );

        let v = state.transform_vector(&Vector3D::new(2.0, 4.0, 6.0));
        assert_relative_eq!(v.x, -1.0);
        assert_relative_eq!(v.y, -2.0);
        assert_relative_eq!(v.z, 3.0);
    }

    #[test]
    fn inverse_round_trips_for_every_orientation() {
        let scales = [0.001, 0.01, 1.0, 2.54];
        let origins = [Point3D::ORIGIN, Point3D::new(-3.0, 7.5, 0.25), Point3D::new(1200.0, -40.0, 3.0)];

        for orientation in ORIENTATIONS {
            for &scale in &scales {
                for origin in &origins {
                    let state =
                        TransformState::configure(*origin, scale, create_rotation_matrix(orientation));
                    for p in sample_points() {
                        let back = state.inverse_transform_point(&state.transform_point(&p));
                        assert_points_close(&back, &p);
                    }
                }
            }
        }
    }

    #[test]
    fn transformed_boxes_keep_min_below_max() {
        let b = BoundingBox::new(Point3D::new(-1.0, 2.0, 0.0), Point3D::new(3.0, 5.0, 2.5));

        for orientation in ORIENTATIONS {
            let state = TransformState::configure(
                Point3D::new(0.5, -0.5, 0.0),
                1.0,
                create_rotation_matrix(orientation),
            );
            let t = state.transform_bounding_box(&b);
            assert!(t.min.x <= t.max.x, "{:?}", orientation);
            assert!(t.min.y <= t.max.y, "{:?}", orientation);
            assert!(t.min.z <= t.max.z, "{:?}", orientation);
        }
    }

    #[test]
    fn rotated_box_swaps_extent() {
        let b = BoundingBox::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(4.0, 2.0, 1.0));
        let state =
            TransformState::configure(Point3D::ORIGIN, 1.0, create_rotation_matrix(Orientation::Rotated90));
        let size = state.transform_bounding_box(&b).size();
        assert_relative_eq!(size.x, 2.0);
        assert_relative_eq!(size.y, 4.0);
        assert_relative_eq!(size.z, 1.0);
    }

    #[test]
    fn rotation_matrices_are_orthonormal() {
        for orientation in ORIENTATIONS {
            let m = create_rotation_matrix(orientation);
            let product = m * m.transpose();
            assert_relative_eq!(product, Matrix3::identity(), epsilon = 1e-12);
        }
    }

    #[test]
    fn auto_configure_infers_scale_from_largest_dimension() {
        let metric = room_with_bounds(Point3D::new(1.0, 2.0, 0.0), Point3D::new(7.0, 7.0, 2.5));
        let state = TransformState::auto_configure(&metric);
        assert!(state.is_configured());
        assert_eq!(state.origin(), Point3D::new(1.0, 2.0, 0.0));
        assert_relative_eq!(state.scale(), METER_SCALE);

        let large = room_with_bounds(Point3D::ORIGIN, Point3D::new(600.0, 500.0, 250.0));
        assert_relative_eq!(TransformState::auto_configure(&large).scale(), CENTIMETER_SCALE);

        let tiny = room_with_bounds(Point3D::ORIGIN, Point3D::new(0.6, 0.5, 0.25));
        assert_relative_eq!(TransformState::auto_configure(&tiny).scale(), MILLIMETER_SCALE);
    }

    #[test]
    fn auto_configure_from_analysis_uses_recommended_scale() {
        let room = room_with_bounds(Point3D::new(5.0, 5.0, 0.0), Point3D::new(455.0, 405.0, 250.0));
        let (state, info) = TransformState::auto_configure_from_analysis(&room);

        assert_relative_eq!(state.scale(), info.recommended_scale);
        assert_relative_eq!(state.scale(), 0.01);
        assert_eq!(state.origin(), Point3D::new(5.0, 5.0, 0.0));
        assert_eq!(state.rotation(), &Matrix3::identity());
    }
}
