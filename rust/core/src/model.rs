// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Semantically labeled room model produced by the extraction pipeline.
//!
//! Every entity is an immutable value. A repaired model is a new
//! [`RoomModel`] built from the original plus the synthesized entities.

use crate::primitives::{BoundingBox, Point3D, Segment2D, Vector3D};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wall construction material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WallMaterial {
    #[default]
    Drywall,
    Concrete,
    Brick,
    Wood,
    Glass,
    Metal,
}

impl WallMaterial {
    /// Typical 2.4 GHz penetration loss through one wall, in dB
    pub fn attenuation_db(self) -> f64 {
        match self {
            WallMaterial::Drywall => 3.0,
            WallMaterial::Concrete => 12.0,
            WallMaterial::Brick => 8.0,
            WallMaterial::Wood => 4.0,
            WallMaterial::Glass => 2.0,
            WallMaterial::Metal => 26.0,
        }
    }

    /// Guess the material from an object name, defaulting to drywall
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("concrete") {
            WallMaterial::Concrete
        } else if lower.contains("brick") {
            WallMaterial::Brick
        } else if lower.contains("wood") || lower.contains("timber") {
            WallMaterial::Wood
        } else if lower.contains("glass") {
            WallMaterial::Glass
        } else if lower.contains("metal") || lower.contains("steel") {
            WallMaterial::Metal
        } else {
            WallMaterial::Drywall
        }
    }
}

/// A wall segment running along the floor plane
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallElement {
    pub id: String,
    pub start: Point3D,
    pub end: Point3D,
    pub height: f64,
    pub thickness: f64,
    pub material: WallMaterial,
}

impl WallElement {
    pub fn new(
        id: impl Into<String>,
        start: Point3D,
        end: Point3D,
        height: f64,
        thickness: f64,
        material: WallMaterial,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            height,
            thickness,
            material,
        }
    }

    /// Horizontal run length
    pub fn length(&self) -> f64 {
        self.start.horizontal_distance_to(&self.end)
    }

    /// Floor-plane footprint of the wall run
    pub fn segment(&self) -> Segment2D {
        Segment2D::from_points(&self.start, &self.end)
    }
}

/// Furniture categories recognized by the detector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureType {
    Table,
    Desk,
    Dresser,
    Shelf,
    Cabinet,
    Counter,
    Nightstand,
    Sofa,
    Chair,
    Bed,
    Stool,
}

impl FurnitureType {
    pub const ALL: [FurnitureType; 11] = [
        FurnitureType::Table,
        FurnitureType::Desk,
        FurnitureType::Dresser,
        FurnitureType::Shelf,
        FurnitureType::Cabinet,
        FurnitureType::Counter,
        FurnitureType::Nightstand,
        FurnitureType::Sofa,
        FurnitureType::Chair,
        FurnitureType::Bed,
        FurnitureType::Stool,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FurnitureType::Table => "table",
            FurnitureType::Desk => "desk",
            FurnitureType::Dresser => "dresser",
            FurnitureType::Shelf => "shelf",
            FurnitureType::Cabinet => "cabinet",
            FurnitureType::Counter => "counter",
            FurnitureType::Nightstand => "nightstand",
            FurnitureType::Sofa => "sofa",
            FurnitureType::Chair => "chair",
            FurnitureType::Bed => "bed",
            FurnitureType::Stool => "stool",
        }
    }

    /// Whether equipment can be placed on this kind of furniture at all
    pub fn is_placement_suitable(self) -> bool {
        match self {
            FurnitureType::Table
            | FurnitureType::Desk
            | FurnitureType::Dresser
            | FurnitureType::Shelf
            | FurnitureType::Cabinet
            | FurnitureType::Counter
            | FurnitureType::Nightstand => true,
            FurnitureType::Sofa | FurnitureType::Chair | FurnitureType::Bed | FurnitureType::Stool => {
                false
            }
        }
    }
}

impl std::fmt::Display for FurnitureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How convenient a placement surface is to use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceAccessibility {
    Poor,
    Good,
    Excellent,
}

impl SurfaceAccessibility {
    /// Bucket an overall score in [0, 1]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            SurfaceAccessibility::Excellent
        } else if score >= 0.6 {
            SurfaceAccessibility::Good
        } else {
            SurfaceAccessibility::Poor
        }
    }
}

/// Flat region of a furniture item where a device could rest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementSurface {
    pub id: String,
    pub center: Point3D,
    /// Outward unit normal
    pub normal: Vector3D,
    /// Usable area in m²
    pub area: f64,
    pub accessibility: SurfaceAccessibility,
    /// Estimated horizontal distance to the nearest power outlet, in m
    pub power_proximity: Option<f64>,
}

impl PlacementSurface {
    /// Returns `None` for a non-positive area or a zero normal
    pub fn new(
        id: impl Into<String>,
        center: Point3D,
        normal: Vector3D,
        area: f64,
        accessibility: SurfaceAccessibility,
    ) -> Option<Self> {
        if !(area > 0.0) {
            return None;
        }
        Some(Self {
            id: id.into(),
            center,
            normal: normal.normalize()?,
            area,
            accessibility,
            power_proximity: None,
        })
    }

    pub fn with_power_proximity(mut self, distance: f64) -> Self {
        self.power_proximity = Some(distance);
        self
    }
}

/// A classified piece of furniture
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FurnitureItem {
    pub id: String,
    pub furniture_type: FurnitureType,
    pub bounds: BoundingBox,
    pub surfaces: Vec<PlacementSurface>,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

impl FurnitureItem {
    pub fn new(
        id: impl Into<String>,
        furniture_type: FurnitureType,
        bounds: BoundingBox,
        surfaces: Vec<PlacementSurface>,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            furniture_type,
            bounds,
            surfaces,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Opening kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OpeningType {
    Door,
    Window,
    Opening,
}

/// Door, window or open passage in the room envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Opening {
    pub id: String,
    pub opening_type: OpeningType,
    pub bounds: BoundingBox,
    pub is_passable: bool,
}

impl Opening {
    pub fn new(id: impl Into<String>, opening_type: OpeningType, bounds: BoundingBox) -> Self {
        Self {
            id: id.into(),
            opening_type,
            bounds,
            is_passable: !matches!(opening_type, OpeningType::Window),
        }
    }
}

/// Floor footprint of the room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloorPlan {
    pub bounds: BoundingBox,
    /// Floor area in m²
    pub area: f64,
}

impl FloorPlan {
    pub fn from_bounds(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            area: bounds.footprint_area(),
        }
    }
}

/// Assembled room model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomModel {
    id: String,
    name: String,
    bounds: BoundingBox,
    walls: Vec<WallElement>,
    furniture: Vec<FurnitureItem>,
    openings: Vec<Opening>,
    floor: FloorPlan,
}

impl RoomModel {
    /// Assemble a model with a freshly generated identifier
    pub fn new(
        name: impl Into<String>,
        bounds: BoundingBox,
        walls: Vec<WallElement>,
        furniture: Vec<FurnitureItem>,
        openings: Vec<Opening>,
        floor: FloorPlan,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            bounds,
            walls,
            furniture,
            openings,
            floor,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn walls(&self) -> &[WallElement] {
        &self.walls
    }

    pub fn furniture(&self) -> &[FurnitureItem] {
        &self.furniture
    }

    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    pub fn floor(&self) -> &FloorPlan {
        &self.floor
    }

    /// New model with `walls` appended; identity is preserved
    pub fn with_additional_walls(&self, walls: Vec<WallElement>) -> RoomModel {
        let mut extended = self.clone();
        extended.walls.extend(walls);
        extended
    }

    /// New model with `furniture` appended; identity is preserved
    pub fn with_additional_furniture(&self, furniture: Vec<FurnitureItem>) -> RoomModel {
        let mut extended = self.clone();
        extended.furniture.extend(furniture);
        extended
    }

    /// Total number of placement surfaces across all furniture
    pub fn surface_count(&self) -> usize {
        self.furniture.iter().map(|f| f.surfaces.len()).sum()
    }

    /// Every placement surface paired with its furniture item
    pub fn all_surfaces(&self) -> impl Iterator<Item = (&FurnitureItem, &PlacementSurface)> {
        self.furniture
            .iter()
            .flat_map(|item| item.surfaces.iter().map(move |s| (item, s)))
    }

    /// Walls whose floor footprint crosses the straight path `from -> to`.
    ///
    /// Heights are ignored; the path is projected onto the floor plane.
    pub fn walls_crossed(&self, from: &Point3D, to: &Point3D) -> Vec<&WallElement> {
        let path = Segment2D::from_points(from, to);
        self.walls
            .iter()
            .filter(|wall| wall.segment().intersection(&path).is_some())
            .collect()
    }
}
