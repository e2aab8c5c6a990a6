// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan quality assessment
//!
//! The parser depends only on the [`QualityAssessor`] trait so callers can
//! plug in their own scoring. [`HeuristicQualityAssessor`] is the default.

use roomscan_core::RoomModel;
use roomscan_geometry::{analyze_coordinate_system, ConsistencyLevel};
use serde::{Deserialize, Serialize};

/// Quality report for an extracted room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanQuality {
    /// Weighted overall score in [0, 1]
    pub overall_quality: f64,
    /// Mean detection confidence in [0, 1]
    pub accuracy: f64,
    /// Detected furniture relative to what the floor area suggests, in [0, 1]
    pub furniture_detection_rate: f64,
    /// Internal geometric plausibility in [0, 1]
    pub geometry_consistency: f64,
    pub is_acceptable_for_analysis: bool,
}

/// Rates how usable an extracted room is for downstream analysis
pub trait QualityAssessor {
    fn assess_scan_quality(&self, room: &RoomModel) -> ScanQuality;
}

impl<T: QualityAssessor + ?Sized> QualityAssessor for &T {
    fn assess_scan_quality(&self, room: &RoomModel) -> ScanQuality {
        (**self).assess_scan_quality(room)
    }
}

/// Floor area (m²) per furniture item a well-furnished room is expected to have
const FLOOR_AREA_PER_ITEM: f64 = 10.0;

const CONSISTENCY_WEIGHT: f64 = 0.4;
const WALL_WEIGHT: f64 = 0.3;
const DETECTION_WEIGHT: f64 = 0.15;
const ACCURACY_WEIGHT: f64 = 0.15;

/// Default assessor built on coordinate-system analysis and simple counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicQualityAssessor {
    pub min_acceptable_quality: f64,
}

impl Default for HeuristicQualityAssessor {
    fn default() -> Self {
        Self {
            min_acceptable_quality: 0.5,
        }
    }
}

impl HeuristicQualityAssessor {
    pub fn new(min_acceptable_quality: f64) -> Self {
        Self {
            min_acceptable_quality,
        }
    }
}

fn consistency_score(level: ConsistencyLevel) -> f64 {
    match level {
        ConsistencyLevel::High => 1.0,
        ConsistencyLevel::Medium => 0.7,
        ConsistencyLevel::Low => 0.3,
    }
}

fn wall_score(wall_count: usize) -> f64 {
    match wall_count {
        0 => 0.0,
        1 | 2 => 0.5,
        _ => 1.0,
    }
}

impl QualityAssessor for HeuristicQualityAssessor {
    fn assess_scan_quality(&self, room: &RoomModel) -> ScanQuality {
        let info = analyze_coordinate_system(room);
        let geometry_consistency = consistency_score(info.consistency);

        let expected_items = (room.floor().area / FLOOR_AREA_PER_ITEM).max(1.0);
        let furniture_detection_rate = (room.furniture().len() as f64 / expected_items).min(1.0);

        let accuracy = if room.furniture().is_empty() {
            0.5
        } else {
            room.furniture().iter().map(|f| f.confidence).sum::<f64>() / room.furniture().len() as f64
        };

        let overall_quality = CONSISTENCY_WEIGHT * geometry_consistency
            + WALL_WEIGHT * wall_score(room.walls().len())
            + DETECTION_WEIGHT * furniture_detection_rate
            + ACCURACY_WEIGHT * accuracy;

        ScanQuality {
            overall_quality,
            accuracy,
            furniture_detection_rate,
            geometry_consistency,
            is_acceptable_for_analysis: !room.walls().is_empty()
                && overall_quality >= self.min_acceptable_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roomscan_core::{
        BoundingBox, FloorPlan, FurnitureItem, FurnitureType, Point3D, WallElement, WallMaterial,
    };

    fn room(walls: usize, furniture: Vec<FurnitureItem>) -> RoomModel {
        let bounds = BoundingBox::new(Point3D::ORIGIN, Point3D::new(6.0, 5.0, 2.5));
        let walls = (0..walls)
            .map(|i| {
                WallElement::new(
                    format!("w{i}"),
                    Point3D::ORIGIN,
                    Point3D::new(6.0, 0.0, 0.0),
                    2.5,
                    0.1,
                    WallMaterial::Drywall,
                )
            })
            .collect();
        RoomModel::new("r", bounds, walls, furniture, Vec::new(), FloorPlan::from_bounds(bounds))
    }

    fn table(confidence: f64) -> FurnitureItem {
        let bounds = BoundingBox::new(Point3D::new(2.0, 2.0, 0.0), Point3D::new(3.2, 2.8, 0.75));
        FurnitureItem::new("t", FurnitureType::Table, bounds, Vec::new(), confidence)
    }

    #[test]
    fn furnished_room_scores_high() {
        let quality = HeuristicQualityAssessor::default()
            .assess_scan_quality(&room(4, vec![table(0.9), table(0.9), table(0.9)]));

        assert_relative_eq!(quality.geometry_consistency, 1.0);
        assert_relative_eq!(quality.furniture_detection_rate, 1.0);
        assert_relative_eq!(quality.accuracy, 0.9, epsilon = 1e-9);
        assert_relative_eq!(quality.overall_quality, 0.4 + 0.3 + 0.15 + 0.135, epsilon = 1e-9);
        assert!(quality.is_acceptable_for_analysis);
    }

    #[test]
    fn empty_room_uses_neutral_accuracy() {
        let quality = HeuristicQualityAssessor::default().assess_scan_quality(&room(4, Vec::new()));
        assert_relative_eq!(quality.accuracy, 0.5);
        assert_relative_eq!(quality.furniture_detection_rate, 0.0);
        assert_relative_eq!(quality.overall_quality, 0.4 + 0.3 + 0.075, epsilon = 1e-9);
    }

    #[test]
    fn wallless_room_is_never_acceptable() {
        let lenient = HeuristicQualityAssessor::new(0.0);
        let quality = lenient.assess_scan_quality(&room(0, vec![table(0.9)]));
        assert!(!quality.is_acceptable_for_analysis);
    }

    #[test]
    fn partial_walls_score_half() {
        let quality = HeuristicQualityAssessor::default().assess_scan_quality(&room(2, Vec::new()));
        assert_relative_eq!(quality.overall_quality, 0.4 + 0.15 + 0.075, epsilon = 1e-9);
    }

    #[test]
    fn references_are_assessors() {
        fn assess<Q: QualityAssessor>(q: Q, room: &RoomModel) -> ScanQuality {
            q.assess_scan_quality(room)
        }
        let assessor = HeuristicQualityAssessor::default();
        let r = room(4, Vec::new());
        assert_eq!(assess(&assessor, &r), assessor.assess_scan_quality(&r));
    }
}
