// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate-system analysis of an extracted room
//!
//! Infers the unit system the scanner used from the room extent and rates
//! the internal geometric plausibility of the model by counting anomalies.
//! Orientation detection is not implemented: every room is reported as
//! [`Orientation::Standard`].

use crate::transform::{CENTIMETER_SCALE, METER_SCALE, MILLIMETER_SCALE};
use roomscan_core::{RoomModel, Vector3D};
use serde::{Deserialize, Serialize};

/// Unit system inferred from the room extent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DetectedUnit {
    Millimeters,
    Centimeters,
    Meters,
    Unknown,
}

impl DetectedUnit {
    /// Scale that converts this unit to meters
    pub fn recommended_scale(self) -> f64 {
        match self {
            DetectedUnit::Millimeters => MILLIMETER_SCALE,
            DetectedUnit::Centimeters => CENTIMETER_SCALE,
            DetectedUnit::Meters | DetectedUnit::Unknown => METER_SCALE,
        }
    }
}

/// Orientation of the scan relative to the target frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Standard,
    Rotated90,
    Rotated180,
    Rotated270,
    Flipped,
    Custom,
}

/// Confidence in the model's internal geometric plausibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    High,
    Medium,
    Low,
}

impl ConsistencyLevel {
    pub fn from_anomaly_count(anomalies: usize) -> Self {
        match anomalies {
            0 => ConsistencyLevel::High,
            1 | 2 => ConsistencyLevel::Medium,
            _ => ConsistencyLevel::Low,
        }
    }
}

/// Result of [`analyze_coordinate_system`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoordinateSystemInfo {
    pub unit: DetectedUnit,
    pub orientation: Orientation,
    pub consistency: ConsistencyLevel,
    pub recommended_scale: f64,
    pub anomaly_count: usize,
}

impl CoordinateSystemInfo {
    pub fn requires_transformation(&self) -> bool {
        (self.recommended_scale - 1.0).abs() > f64::EPSILON
            || self.orientation != Orientation::Standard
    }
}

/// Extent above which a room cannot plausibly be in meters. Shared with
/// `TransformState::auto_configure` so both paths agree on centimeter scans.
const CENTIMETER_MAGNITUDE: f64 = 100.0;

/// `(unit, max dimension below, min dimension above)`, checked in order
const UNIT_THRESHOLDS: [(DetectedUnit, f64, f64); 3] = [
    (DetectedUnit::Meters, 1000.0, 1.0),
    (DetectedUnit::Centimeters, 10.0, 0.1),
    (DetectedUnit::Millimeters, 0.1, 0.001),
];

/// Infer the unit system from a room extent
pub fn detect_unit(extent: &Vector3D) -> DetectedUnit {
    let max_dimension = extent.max_component();
    let min_dimension = extent.min_component();

    if !max_dimension.is_finite() || !min_dimension.is_finite() {
        return DetectedUnit::Unknown;
    }
    if max_dimension > CENTIMETER_MAGNITUDE {
        return DetectedUnit::Centimeters;
    }

    UNIT_THRESHOLDS
        .iter()
        .find(|(_, max_below, min_above)| max_dimension < *max_below && min_dimension > *min_above)
        .map(|(unit, _, _)| *unit)
        .unwrap_or(DetectedUnit::Unknown)
}

/// Count structural anomalies in a room model.
///
/// One anomaly each for: a non-positive room dimension, every furniture item
/// larger than the room along any axis, and no walls despite a room with
/// volume.
pub fn count_anomalies(room: &RoomModel) -> usize {
    let room_size = room.bounds().size();
    let mut anomalies = 0;

    if room_size.x <= 0.0 || room_size.y <= 0.0 || room_size.z <= 0.0 {
        anomalies += 1;
    }

    anomalies += room
        .furniture()
        .iter()
        .filter(|item| {
            let size = item.bounds.size();
            size.x > room_size.x || size.y > room_size.y || size.z > room_size.z
        })
        .count();

    if room.walls().is_empty() && room.bounds().volume() > 0.0 {
        anomalies += 1;
    }

    anomalies
}

/// Analyze the coordinate system of an extracted room
pub fn analyze_coordinate_system(room: &RoomModel) -> CoordinateSystemInfo {
    let unit = detect_unit(&room.bounds().size());
    let anomaly_count = count_anomalies(room);

    CoordinateSystemInfo {
        unit,
        // Orientation detection is not implemented
        orientation: Orientation::Standard,
        consistency: ConsistencyLevel::from_anomaly_count(anomaly_count),
        recommended_scale: unit.recommended_scale(),
        anomaly_count,
    }
}
