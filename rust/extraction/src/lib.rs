// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room model extraction from captured 3D scenes
//!
//! This crate provides the extraction pipeline:
//! 1. Classifying scene objects as furniture from names and dimensions
//! 2. Extracting placement surfaces and rating their accessibility
//! 3. Extracting walls, openings and the floor plan
//! 4. Assessing scan quality and repairing weak models once
//!
//! # Usage
//!
//! ```rust,ignore
//! use roomscan_extraction::{RoomModelParser, ExtractionConfig};
//! use roomscan_core::SceneAsset;
//!
//! let asset = SceneAsset::from_json(&json)?;
//! let parsed = RoomModelParser::new()
//!     .with_config(ExtractionConfig::default())
//!     .parse(&asset)?;
//!
//! for (item, surface) in parsed.model.all_surfaces() {
//!     println!("{} {}: {:?}", item.furniture_type, surface.id, surface.accessibility);
//! }
//! ```

pub mod config;
pub mod furniture;
pub mod parser;
pub mod quality;
pub mod surfaces;
pub mod walls;

// Re-export commonly used types and functions
pub use config::ExtractionConfig;
pub use furniture::{
    detect, detect_furniture_type, dimension_rule, is_placement_suitable, match_name,
    DimensionRule, FurnitureDimensions,
};
pub use parser::{ParseWarning, ParsedRoom, RoomModelParser};
pub use quality::{HeuristicQualityAssessor, QualityAssessor, ScanQuality};
pub use surfaces::{
    calculate_optimal_placement, can_accommodate_device, estimate_power_proximity,
    evaluate_accessibility, extract_placement_surfaces, score_accessibility, shelf_levels,
    AccessibilityScore, DevicePlacement, ShelfLevel,
};
pub use walls::{extract_wall, infer_walls, DEFAULT_WALL_THICKNESS};
