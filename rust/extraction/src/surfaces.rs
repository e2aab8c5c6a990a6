// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement surface extraction and accessibility scoring
//!
//! Flat-top furniture (tables, desks, counters) contributes its top face.
//! Dressers, cabinets and nightstands contribute a top face only when it sits
//! at a reachable height. Shelves contribute one surface per estimated level.
//!
//! Heights are measured from the room floor elevation, so scans whose origin
//! is not on the floor score the same as floor-anchored ones.
//!
//! Accessibility is the mean of three scores in [0, 1]:
//! - height of the surface above the floor
//! - how suited the furniture type is to hosting a device
//! - how much room the surface leaves for a device footprint

use roomscan_core::{
    BoundingBox, FurnitureType, PlacementSurface, Point3D, SurfaceAccessibility, Vector3D,
    WallElement,
};
use serde::{Deserialize, Serialize};

/// Surfaces smaller than this (m²) are never reported
pub const MIN_USABLE_AREA: f64 = 0.01;

/// Side length of the smallest device footprint a surface must hold (m)
pub const DEVICE_FOOTPRINT_SIDE: f64 = 0.15;

/// Margin lost along each edge of a top face when sizing the device footprint (m)
pub const EDGE_CLEARANCE: f64 = 0.15;

/// Vertical spacing assumed between shelf boards (m)
pub const SHELF_SPACING: f64 = 0.35;

pub const MAX_SHELF_LEVELS: usize = 6;

/// Height of the lowest board above the shelf base (m)
pub const SHELF_BOARD_OFFSET: f64 = 0.02;

/// Usable depth of a single shelf board (m)
pub const SHELF_MAX_DEPTH: f64 = 0.4;

/// Shelf levels outside this height band are unreachable
pub const SHELF_HEIGHT_RANGE: (f64, f64) = (0.3, 2.2);

/// Top faces of storage furniture outside this band are not offered
pub const STORAGE_TOP_HEIGHT_RANGE: (f64, f64) = (0.5, 1.8);

/// Extra room a device needs beyond its own footprint
pub const DEVICE_AREA_MARGIN: f64 = 1.2;

#[inline]
fn device_footprint_area() -> f64 {
    DEVICE_FOOTPRINT_SIDE * DEVICE_FOOTPRINT_SIDE
}

/// Component scores behind a [`SurfaceAccessibility`] rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityScore {
    pub height: f64,
    pub furniture_type: f64,
    pub size: f64,
}

impl AccessibilityScore {
    pub fn overall(&self) -> f64 {
        (self.height + self.furniture_type + self.size) / 3.0
    }

    pub fn accessibility(&self) -> SurfaceAccessibility {
        SurfaceAccessibility::from_score(self.overall())
    }
}

/// Score a surface height above the floor (m)
pub fn height_score(height: f64) -> f64 {
    if (0.6..1.2).contains(&height) {
        1.0
    } else if (0.4..0.6).contains(&height) || (1.2..1.8).contains(&height) {
        0.7
    } else if (0.2..0.4).contains(&height) || (1.8..2.2).contains(&height) {
        0.4
    } else {
        0.1
    }
}

/// Score how well a furniture type hosts a device
pub fn type_score(furniture_type: FurnitureType) -> f64 {
    match furniture_type {
        FurnitureType::Table | FurnitureType::Desk => 1.0,
        FurnitureType::Counter => 0.8,
        FurnitureType::Dresser | FurnitureType::Nightstand => 0.7,
        FurnitureType::Cabinet => 0.6,
        _ => 0.5,
    }
}

/// Score the free area (m²) available to a device
pub fn size_score(area: f64) -> f64 {
    if area >= 0.5 {
        1.0
    } else if area >= 0.2 {
        0.8
    } else if area >= 0.05 {
        0.6
    } else {
        0.4
    }
}

/// Fraction of a top face that is usable once edges are excluded
pub fn edge_usability(furniture_type: FurnitureType) -> f64 {
    match furniture_type {
        FurnitureType::Table => 0.85,
        FurnitureType::Desk => 0.75,
        FurnitureType::Counter => 0.60,
        FurnitureType::Nightstand => 0.80,
        FurnitureType::Dresser | FurnitureType::Cabinet => 0.70,
        _ => 0.70,
    }
}

/// Score a surface at `height` on `furniture_type` with `footprint_area` m² of free space
pub fn score_accessibility(
    height: f64,
    furniture_type: FurnitureType,
    footprint_area: f64,
) -> AccessibilityScore {
    AccessibilityScore {
        height: height_score(height),
        furniture_type: type_score(furniture_type),
        size: size_score(footprint_area),
    }
}

pub fn evaluate_accessibility(
    height: f64,
    furniture_type: FurnitureType,
    footprint_area: f64,
) -> SurfaceAccessibility {
    score_accessibility(height, furniture_type, footprint_area).accessibility()
}

/// Area of a top face left for a device after edge clearance on every side
fn interior_area(bounds: &BoundingBox) -> f64 {
    let size = bounds.size();
    let width = (size.x - 2.0 * EDGE_CLEARANCE).max(0.0);
    let depth = (size.y - 2.0 * EDGE_CLEARANCE).max(0.0);
    width * depth
}

fn top_surface(
    id: String,
    furniture_type: FurnitureType,
    bounds: &BoundingBox,
    floor_elevation: f64,
) -> Option<PlacementSurface> {
    let area = bounds.footprint_area() * edge_usability(furniture_type);
    if area < MIN_USABLE_AREA || area < device_footprint_area() {
        return None;
    }

    let top = bounds.max.z;
    let accessibility =
        evaluate_accessibility(top - floor_elevation, furniture_type, interior_area(bounds));
    let center = bounds.center();
    PlacementSurface::new(
        id,
        Point3D::new(center.x, center.y, top),
        Vector3D::UP,
        area,
        accessibility,
    )
}

/// One estimated board of a shelf unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShelfLevel {
    pub index: usize,
    pub count: usize,
    /// Board height above the floor (m)
    pub height: f64,
    /// Usable board area (m²)
    pub area: f64,
    pub position_score: f64,
}

impl ShelfLevel {
    pub fn score(&self) -> f64 {
        (height_score(self.height) + self.position_score) / 2.0
    }

    pub fn accessibility(&self) -> SurfaceAccessibility {
        SurfaceAccessibility::from_score(self.score())
    }

    /// Whether the level is reachable and large enough to report
    pub fn is_usable(&self) -> bool {
        let (low, high) = SHELF_HEIGHT_RANGE;
        self.height >= low
            && self.height <= high
            && self.area >= MIN_USABLE_AREA
            && self.area >= device_footprint_area()
    }
}

fn shelf_position_score(index: usize, count: usize) -> f64 {
    if index == 0 || index + 1 == count {
        return 0.5;
    }
    let relative = index as f64 / count as f64;
    if (1.0 / 3.0..2.0 / 3.0).contains(&relative) {
        1.0
    } else {
        0.8
    }
}

/// Estimate every board of a shelf unit, reachable or not. Level heights
/// are relative to `floor_elevation`.
pub fn shelf_levels(bounds: &BoundingBox, floor_elevation: f64) -> Vec<ShelfLevel> {
    let size = bounds.size();
    if !(size.z > 0.0) {
        return Vec::new();
    }

    let count = ((size.z / SHELF_SPACING).floor() as usize).clamp(1, MAX_SHELF_LEVELS);
    let spacing = size.z / count as f64;
    let area = size.x * size.y.min(SHELF_MAX_DEPTH);
    let base = bounds.min.z - floor_elevation;

    (0..count)
        .map(|index| ShelfLevel {
            index,
            count,
            height: base + SHELF_BOARD_OFFSET + index as f64 * spacing,
            area,
            position_score: shelf_position_score(index, count),
        })
        .collect()
}

/// Extract the placement surfaces of one furniture item.
///
/// Surface ids are `{id_prefix}_surface_{n}`. Unsuitable furniture types
/// yield no surfaces. `floor_elevation` is the Z of the room floor; surface
/// centers stay in scene coordinates.
pub fn extract_placement_surfaces(
    id_prefix: &str,
    furniture_type: FurnitureType,
    bounds: &BoundingBox,
    floor_elevation: f64,
) -> Vec<PlacementSurface> {
    let surface_id = |n: usize| format!("{id_prefix}_surface_{n}");

    match furniture_type {
        FurnitureType::Table | FurnitureType::Desk | FurnitureType::Counter => {
            top_surface(surface_id(0), furniture_type, bounds, floor_elevation)
                .into_iter()
                .collect()
        }
        FurnitureType::Dresser | FurnitureType::Cabinet | FurnitureType::Nightstand => {
            let (low, high) = STORAGE_TOP_HEIGHT_RANGE;
            let height = bounds.size().z;
            if height < low || height > high {
                return Vec::new();
            }
            top_surface(surface_id(0), furniture_type, bounds, floor_elevation)
                .into_iter()
                .collect()
        }
        FurnitureType::Shelf => {
            let center = bounds.center();
            shelf_levels(bounds, floor_elevation)
                .into_iter()
                .filter(ShelfLevel::is_usable)
                .filter_map(|level| {
                    PlacementSurface::new(
                        surface_id(level.index),
                        Point3D::new(center.x, center.y, floor_elevation + level.height),
                        Vector3D::UP,
                        level.area,
                        level.accessibility(),
                    )
                })
                .collect()
        }
        FurnitureType::Sofa | FurnitureType::Chair | FurnitureType::Bed | FurnitureType::Stool => {
            Vec::new()
        }
    }
}

/// Whether `surface` has room for a device of the given `(x, y, z)` dimensions
pub fn can_accommodate_device(surface: &PlacementSurface, device: &Vector3D) -> bool {
    surface.area >= device.x * device.y * DEVICE_AREA_MARGIN
}

/// Where a device should rest on a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePlacement {
    pub surface_id: String,
    /// Device center
    pub position: Point3D,
    /// Rotation about the vertical axis in radians
    pub rotation: f64,
}

/// Center the device on the surface, resting on it
pub fn calculate_optimal_placement(
    surface: &PlacementSurface,
    device: &Vector3D,
) -> Option<DevicePlacement> {
    if !can_accommodate_device(surface, device) {
        return None;
    }
    Some(DevicePlacement {
        surface_id: surface.id.clone(),
        position: surface.center + Vector3D::new(0.0, 0.0, device.z / 2.0),
        rotation: 0.0,
    })
}

/// Horizontal distance from `point` to the nearest wall, used as a proxy
/// for the distance to a power outlet
pub fn estimate_power_proximity(point: &Point3D, walls: &[WallElement]) -> Option<f64> {
    walls
        .iter()
        .map(|wall| wall.segment().distance_to_point((point.x, point.y)))
        .fold(None, |nearest: Option<f64>, d| {
            Some(nearest.map_or(d, |n| n.min(d)))
        })
}
