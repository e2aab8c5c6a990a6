// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunable parameters for room model extraction

use serde::{Deserialize, Serialize};

/// Configuration for the extraction and repair pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionConfig {
    /// Minimum room width (X extent) in meters
    pub min_room_width: f64,
    /// Minimum room depth (Y extent) in meters
    pub min_room_depth: f64,
    /// Minimum room height (Z extent) in meters
    pub min_room_height: f64,
    /// Vertices within this distance of a wall's lowest point count as floor contact
    pub wall_floor_tolerance: f64,
    /// Plausible furniture bounding volume range (m³) for confidence scoring
    pub furniture_volume_range: (f64, f64),
    /// Floor area (m²) above which repair synthesizes a table
    pub repair_min_floor_area: f64,
    /// Repair synthesizes a table only when fewer furniture items were found
    pub repair_max_furniture: usize,
    /// Overall quality below which a low-quality warning is emitted
    pub low_quality_threshold: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_room_width: 0.5,
            min_room_depth: 0.5,
            min_room_height: 1.0,
            wall_floor_tolerance: 0.1, // 10cm
            furniture_volume_range: (0.1, 100.0),
            repair_min_floor_area: 15.0,
            repair_max_furniture: 2,
            low_quality_threshold: 0.7,
        }
    }
}
