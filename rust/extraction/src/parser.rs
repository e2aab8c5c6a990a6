// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room model parser
//!
//! Turns a captured [`SceneAsset`] into a [`RoomModel`]:
//! 1. Room bounds from the union of all mesh bounds
//! 2. Walls from wall-named meshes, or four perimeter walls if none exist
//! 3. Furniture and placement surfaces from the remaining meshes
//! 4. Openings and the floor plan
//! 5. Quality assessment, with at most one repair pass when the scan is
//!    not acceptable
//!
//! Per-object failures are recorded as [`ParseWarning`]s; only room-level
//! failures abort the parse.

use crate::config::ExtractionConfig;
use crate::furniture;
use crate::quality::{HeuristicQualityAssessor, QualityAssessor, ScanQuality};
use crate::surfaces::{estimate_power_proximity, extract_placement_surfaces};
use crate::walls::{extract_wall, infer_walls, is_wall_name};
use roomscan_core::{
    BoundingBox, Error, FloorPlan, FurnitureItem, FurnitureType, Opening, OpeningType,
    PlacementSurface, Point3D, Result, RoomModel, SceneAsset, SceneObject, Vector3D, WallElement,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the table synthesized by repair (m)
const REPAIR_TABLE_SIZE: (f64, f64, f64) = (1.2, 0.8, 0.75);
const REPAIR_TABLE_CONFIDENCE: f64 = 0.3;

const BASE_CONFIDENCE: f64 = 0.5;
const NAME_CONFIDENCE_BONUS: f64 = 0.2;
const VOLUME_CONFIDENCE_BONUS: f64 = 0.2;
const MAX_DETECTED_CONFIDENCE: f64 = 0.9;

/// Non-fatal issue found while parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// Object ignored during extraction
    SkippedObject { name: String, reason: String },
    /// Wall-named object whose mesh could not produce a wall
    CorruptedWall { name: String, reason: String },
    /// No wall-named objects; perimeter walls were synthesized
    InferredWalls { count: usize },
    /// The first model was not acceptable and was repaired
    RepairApplied {
        walls_added: usize,
        furniture_added: usize,
    },
    /// The accepted model scored below the low-quality threshold
    LowScanQuality { overall_quality: f64 },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::SkippedObject { name, reason } => {
                write!(f, "skipped object '{name}': {reason}")
            }
            ParseWarning::CorruptedWall { name, reason } => {
                write!(f, "could not extract wall '{name}': {reason}")
            }
            ParseWarning::InferredWalls { count } => {
                write!(f, "no walls found, inferred {count} from room bounds")
            }
            ParseWarning::RepairApplied {
                walls_added,
                furniture_added,
            } => write!(
                f,
                "model repaired: {walls_added} walls and {furniture_added} furniture items added"
            ),
            ParseWarning::LowScanQuality { overall_quality } => {
                write!(f, "low scan quality ({overall_quality:.2})")
            }
        }
    }
}

/// Outcome of a successful parse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRoom {
    pub model: RoomModel,
    pub quality: ScanQuality,
    /// Whether the repair pass ran
    pub repaired: bool,
    pub warnings: Vec<ParseWarning>,
}

/// What an object in the scene represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectRole {
    Wall,
    Opening(OpeningType),
    Floor,
    Other,
}

const DOOR_WORDS: &[&str] = &["door", "doors", "doorway", "doorways"];
const WINDOW_WORDS: &[&str] = &["window", "windows"];
const OPENING_WORDS: &[&str] = &["opening", "openings", "arch", "archway", "passage"];
const FLOOR_WORDS: &[&str] = &["floor", "ground"];

/// Words that may follow a floor word without changing what the object is
const FLOOR_QUALIFIERS: &[&str] = &["floor", "plane", "main", "mesh", "surface", "slab", "level", "area"];

/// Split a name into lowercase words at separators, case changes and
/// letter/digit boundaries: `FrontDoor_2` → `front`, `door`, `2`
fn name_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = prev.is_some_and(|p| {
            (p.is_lowercase() && c.is_uppercase()) || (p.is_numeric() != c.is_numeric())
        });
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn has_word(words: &[String], vocabulary: &[&str]) -> bool {
    words.iter().any(|w| vocabulary.contains(&w.as_str()))
}

fn is_floor_name(words: &[String]) -> bool {
    let Some((first, rest)) = words.split_first() else {
        return false;
    };
    FLOOR_WORDS.contains(&first.as_str())
        && rest
            .iter()
            .all(|w| w.chars().all(|c| c.is_ascii_digit()) || FLOOR_QUALIFIERS.contains(&w.as_str()))
}

/// Role of an object by name. Opening and floor names match whole words so
/// that `archive_cabinet` or `floor_lamp` stay furniture candidates.
fn classify_object(name: &str) -> ObjectRole {
    if is_wall_name(name) {
        return ObjectRole::Wall;
    }
    let words = name_words(name);

    if has_word(&words, DOOR_WORDS) {
        ObjectRole::Opening(OpeningType::Door)
    } else if has_word(&words, WINDOW_WORDS) {
        ObjectRole::Opening(OpeningType::Window)
    } else if has_word(&words, OPENING_WORDS) {
        ObjectRole::Opening(OpeningType::Opening)
    } else if is_floor_name(&words) {
        ObjectRole::Floor
    } else {
        ObjectRole::Other
    }
}

/// Parses captured scenes into room models
#[derive(Debug, Clone, Default)]
pub struct RoomModelParser<Q = HeuristicQualityAssessor> {
    config: ExtractionConfig,
    assessor: Q,
}

impl RoomModelParser {
    /// Parser with the default configuration and heuristic assessor
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Q: QualityAssessor> RoomModelParser<Q> {
    pub fn with_assessor(assessor: Q) -> Self {
        Self {
            config: ExtractionConfig::default(),
            assessor,
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn assessor(&self) -> &Q {
        &self.assessor
    }

    /// Parse a scene into an assessed room model.
    ///
    /// # Errors
    /// - [`Error::MissingGeometryData`] if the scene has no children
    /// - [`Error::InsufficientRoomData`] if the room is too small, has no
    ///   mesh geometry, or is still unacceptable after repair
    pub fn parse(&self, asset: &SceneAsset) -> Result<ParsedRoom> {
        if asset.is_empty() {
            return Err(Error::MissingGeometryData);
        }

        let mut warnings = Vec::new();
        let model = self.extract(asset, &mut warnings)?;
        let quality = self.assessor.assess_scan_quality(&model);

        tracing::info!(
            room = %model.name(),
            walls = model.walls().len(),
            furniture = model.furniture().len(),
            surfaces = model.surface_count(),
            overall_quality = quality.overall_quality,
            "Extracted room model"
        );

        if quality.is_acceptable_for_analysis {
            return Ok(self.finish(model, quality, false, warnings));
        }

        tracing::warn!(
            overall_quality = quality.overall_quality,
            "Scan quality not acceptable, attempting repair"
        );
        let (repaired, walls_added, furniture_added) = self.repair(&model);
        warnings.push(ParseWarning::RepairApplied {
            walls_added,
            furniture_added,
        });

        let quality = self.assessor.assess_scan_quality(&repaired);
        if !quality.is_acceptable_for_analysis {
            return Err(Error::insufficient(format!(
                "scan quality {:.2} not acceptable after repair",
                quality.overall_quality
            )));
        }

        tracing::info!(overall_quality = quality.overall_quality, "Repaired model accepted");
        Ok(self.finish(repaired, quality, true, warnings))
    }

    fn finish(
        &self,
        model: RoomModel,
        quality: ScanQuality,
        repaired: bool,
        mut warnings: Vec<ParseWarning>,
    ) -> ParsedRoom {
        if quality.overall_quality < self.config.low_quality_threshold {
            warnings.push(ParseWarning::LowScanQuality {
                overall_quality: quality.overall_quality,
            });
        }
        ParsedRoom {
            model,
            quality,
            repaired,
            warnings,
        }
    }

    /// Build the unassessed model
    fn extract(&self, asset: &SceneAsset, warnings: &mut Vec<ParseWarning>) -> Result<RoomModel> {
        let bounds = self.room_bounds(asset)?;

        let mut wall_objects = Vec::new();
        let mut openings = Vec::new();
        let mut floor = None;
        let mut candidates = Vec::new();

        for object in asset.objects() {
            match classify_object(&object.name) {
                ObjectRole::Wall => wall_objects.push(object),
                ObjectRole::Opening(opening_type) => match object.bounds() {
                    Some(b) => openings.push(Opening::new(
                        format!("opening_{}", openings.len()),
                        opening_type,
                        b.normalized(),
                    )),
                    None => warnings.push(skipped(object, "opening without mesh")),
                },
                ObjectRole::Floor => {
                    if floor.is_none() {
                        floor = object.bounds().map(|b| FloorPlan::from_bounds(b.normalized()));
                    }
                }
                ObjectRole::Other if object.mesh.is_some() => candidates.push(object),
                ObjectRole::Other if object.children.is_empty() => {
                    warnings.push(skipped(object, "no mesh"))
                }
                ObjectRole::Other => {}
            }
        }

        let walls = self.extract_walls(&wall_objects, &bounds, warnings);
        let furniture = self.extract_furniture(&candidates, &walls, bounds.min.z, warnings);
        let floor = floor.unwrap_or_else(|| FloorPlan::from_bounds(bounds));

        let name = if asset.name.trim().is_empty() {
            "Room".to_string()
        } else {
            asset.name.clone()
        };

        Ok(RoomModel::new(name, bounds, walls, furniture, openings, floor))
    }

    /// Union of all mesh bounds, validated against the minimum room size
    fn room_bounds(&self, asset: &SceneAsset) -> Result<BoundingBox> {
        let bounds = asset
            .objects()
            .filter_map(SceneObject::bounds)
            .filter(BoundingBox::is_finite)
            .map(|b| b.normalized())
            .reduce(|acc, b| acc.union(&b))
            .ok_or_else(|| Error::insufficient("scene contains no mesh geometry"))?;

        let size = bounds.size();
        if size.x < self.config.min_room_width
            || size.y < self.config.min_room_depth
            || size.z < self.config.min_room_height
        {
            return Err(Error::insufficient(format!(
                "room extent {:.2} x {:.2} x {:.2} m below minimum",
                size.x, size.y, size.z
            )));
        }
        Ok(bounds)
    }

    fn extract_walls(
        &self,
        objects: &[&SceneObject],
        bounds: &BoundingBox,
        warnings: &mut Vec<ParseWarning>,
    ) -> Vec<WallElement> {
        if objects.is_empty() {
            let walls = infer_walls(bounds, "inferred_wall");
            tracing::debug!(count = walls.len(), "No wall objects, inferring walls from bounds");
            warnings.push(ParseWarning::InferredWalls { count: walls.len() });
            return walls;
        }

        let mut walls = Vec::with_capacity(objects.len());
        for object in objects {
            match extract_wall(
                format!("wall_{}", walls.len()),
                object,
                self.config.wall_floor_tolerance,
            ) {
                Ok(wall) => walls.push(wall),
                Err(err) => {
                    tracing::warn!(name = %object.name, error = %err, "Skipping corrupted wall");
                    warnings.push(ParseWarning::CorruptedWall {
                        name: object.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        walls
    }

    fn extract_furniture(
        &self,
        objects: &[&SceneObject],
        walls: &[WallElement],
        floor_elevation: f64,
        warnings: &mut Vec<ParseWarning>,
    ) -> Vec<FurnitureItem> {
        let mut furniture = Vec::new();
        for object in objects {
            let Some(bounds) = object.bounds().map(|b| b.normalized()) else {
                continue;
            };
            let Some(furniture_type) = furniture::detect_furniture_type(&object.name, &bounds) else {
                tracing::debug!(name = %object.name, "Object not recognized as furniture");
                warnings.push(skipped(object, "not recognized as furniture"));
                continue;
            };

            let id = format!("furniture_{}", furniture.len());
            let surfaces = surfaces_with_power(&id, furniture_type, &bounds, floor_elevation, walls);
            let confidence = self.detection_confidence(&object.name, &bounds);
            tracing::debug!(
                name = %object.name,
                furniture_type = %furniture_type,
                surfaces = surfaces.len(),
                confidence,
                "Detected furniture"
            );
            furniture.push(FurnitureItem::new(id, furniture_type, bounds, surfaces, confidence));
        }
        furniture
    }

    fn detection_confidence(&self, name: &str, bounds: &BoundingBox) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        let trimmed = name.trim();
        if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("unknown") {
            confidence += NAME_CONFIDENCE_BONUS;
        }
        let (min_volume, max_volume) = self.config.furniture_volume_range;
        let volume = bounds.volume();
        if volume >= min_volume && volume <= max_volume {
            confidence += VOLUME_CONFIDENCE_BONUS;
        }
        confidence.min(MAX_DETECTED_CONFIDENCE)
    }

    /// Synthesize missing walls and furniture. Returns the new model and
    /// the number of walls and furniture items added.
    fn repair(&self, model: &RoomModel) -> (RoomModel, usize, usize) {
        let mut repaired = model.clone();
        let mut walls_added = 0;
        let mut furniture_added = 0;

        if repaired.walls().is_empty() {
            let walls = infer_walls(repaired.bounds(), "repair_wall");
            walls_added = walls.len();
            repaired = repaired.with_additional_walls(walls);
        }

        if repaired.floor().area > self.config.repair_min_floor_area
            && repaired.furniture().len() < self.config.repair_max_furniture
        {
            let table = repair_table(&repaired);
            furniture_added = 1;
            repaired = repaired.with_additional_furniture(vec![table]);
        }

        tracing::debug!(walls_added, furniture_added, "Repair pass complete");
        (repaired, walls_added, furniture_added)
    }
}

fn skipped(object: &SceneObject, reason: &str) -> ParseWarning {
    ParseWarning::SkippedObject {
        name: object.name.clone(),
        reason: reason.to_string(),
    }
}

fn surfaces_with_power(
    id: &str,
    furniture_type: FurnitureType,
    bounds: &BoundingBox,
    floor_elevation: f64,
    walls: &[WallElement],
) -> Vec<PlacementSurface> {
    extract_placement_surfaces(id, furniture_type, bounds, floor_elevation)
        .into_iter()
        .map(|surface| match estimate_power_proximity(&surface.center, walls) {
            Some(distance) => surface.with_power_proximity(distance),
            None => surface,
        })
        .collect()
}

/// Standard table centered on the floor
fn repair_table(model: &RoomModel) -> FurnitureItem {
    let (w, d, h) = REPAIR_TABLE_SIZE;
    let floor_z = model.bounds().min.z;
    let floor_center = model.floor().bounds.center();
    let center = Point3D::new(floor_center.x, floor_center.y, floor_z + h / 2.0);
    let bounds = BoundingBox::from_center_size(center, Vector3D::new(w, d, h));

    let id = "repair_table";
    let surfaces = surfaces_with_power(id, FurnitureType::Table, &bounds, floor_z, model.walls());
    FurnitureItem::new(id, FurnitureType::Table, bounds, surfaces, REPAIR_TABLE_CONFIDENCE)
}
