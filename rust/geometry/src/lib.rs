// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roomscan Geometry
//!
//! Coordinate normalization for captured rooms: an immutable
//! [`TransformState`] (scale, axis-aligned rotation, origin) and the
//! heuristics that infer a room's unit system and consistency.

pub mod analysis;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::Matrix3;

pub use analysis::{
    analyze_coordinate_system, count_anomalies, detect_unit, ConsistencyLevel,
    CoordinateSystemInfo, DetectedUnit, Orientation,
};
pub use transform::{create_rotation_matrix, scale_for_extent, TransformState};
