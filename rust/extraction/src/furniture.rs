// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture classification from object names and bounding dimensions
//!
//! Classification is an ordered chain, evaluated in fixed priority:
//! 1. Name match against [`NAME_PATTERNS`] yields a candidate type
//! 2. The candidate is accepted if its [`DimensionRule`] matches the bounds
//! 3. Otherwise every rule is tried in [`DIMENSION_FALLBACK_ORDER`]
//!
//! All tables are immutable statics, so classification is a pure function of
//! the name and the bounds.

use roomscan_core::{BoundingBox, FurnitureType, SceneObject};

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One axis of a furniture bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// X extent
    Width,
    /// Y extent
    Depth,
    /// Z extent
    Height,
}

/// Constraint on the ratio between two dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AspectConstraint {
    AtLeast {
        numerator: Dimension,
        denominator: Dimension,
        ratio: f64,
    },
    AtMost {
        numerator: Dimension,
        denominator: Dimension,
        ratio: f64,
    },
}

impl AspectConstraint {
    pub fn is_satisfied(&self, dims: &FurnitureDimensions) -> bool {
        let (numerator, denominator, bound, at_least) = match *self {
            AspectConstraint::AtLeast {
                numerator,
                denominator,
                ratio,
            } => (numerator, denominator, ratio, true),
            AspectConstraint::AtMost {
                numerator,
                denominator,
                ratio,
            } => (numerator, denominator, ratio, false),
        };

        let den = dims.get(denominator);
        if den <= 0.0 {
            return false;
        }
        let actual = dims.get(numerator) / den;
        if at_least {
            actual >= bound
        } else {
            actual <= bound
        }
    }
}

/// Measured furniture extent in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FurnitureDimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl FurnitureDimensions {
    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        let size = bounds.size();
        Self {
            width: size.x,
            depth: size.y,
            height: size.z,
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Depth => self.depth,
            Dimension::Height => self.height,
        }
    }
}

/// Plausible dimensions for one furniture type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionRule {
    pub width: Range,
    pub depth: Range,
    pub height: Range,
    pub aspect: &'static [AspectConstraint],
}

impl DimensionRule {
    pub fn matches(&self, dims: &FurnitureDimensions) -> bool {
        self.width.contains(dims.width)
            && self.depth.contains(dims.depth)
            && self.height.contains(dims.height)
            && self.aspect.iter().all(|c| c.is_satisfied(dims))
    }
}

use AspectConstraint::{AtLeast, AtMost};
use Dimension::{Depth, Height, Width};

static TABLE_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.4, 3.0),
    depth: Range::new(0.4, 1.8),
    height: Range::new(0.35, 0.85),
    aspect: &[AtMost { numerator: Width, denominator: Depth, ratio: 4.0 }],
};

static DESK_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.8, 2.2),
    depth: Range::new(0.45, 1.0),
    height: Range::new(0.65, 0.85),
    aspect: &[AtLeast { numerator: Width, denominator: Depth, ratio: 1.3 }],
};

static DRESSER_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.6, 2.0),
    depth: Range::new(0.35, 0.65),
    height: Range::new(0.6, 1.5),
    aspect: &[AtLeast { numerator: Width, denominator: Depth, ratio: 1.5 }],
};

static SHELF_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.3, 2.5),
    depth: Range::new(0.2, 0.5),
    height: Range::new(0.6, 2.5),
    aspect: &[AtLeast { numerator: Height, denominator: Depth, ratio: 2.0 }],
};

static CABINET_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.3, 2.5),
    depth: Range::new(0.3, 0.8),
    height: Range::new(0.5, 2.2),
    aspect: &[],
};

static COUNTER_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.6, 4.0),
    depth: Range::new(0.5, 1.0),
    height: Range::new(0.85, 1.1),
    aspect: &[AtLeast { numerator: Width, denominator: Depth, ratio: 1.2 }],
};

static NIGHTSTAND_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.3, 0.7),
    depth: Range::new(0.3, 0.6),
    height: Range::new(0.4, 0.8),
    aspect: &[AtMost { numerator: Width, denominator: Depth, ratio: 1.8 }],
};

static SOFA_RULE: DimensionRule = DimensionRule {
    width: Range::new(1.2, 3.5),
    depth: Range::new(0.7, 1.2),
    height: Range::new(0.6, 1.1),
    aspect: &[AtLeast { numerator: Width, denominator: Depth, ratio: 1.3 }],
};

static CHAIR_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.35, 0.9),
    depth: Range::new(0.35, 0.9),
    height: Range::new(0.7, 1.2),
    aspect: &[AtLeast { numerator: Height, denominator: Width, ratio: 0.9 }],
};

static BED_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.9, 2.3),
    depth: Range::new(0.9, 2.3),
    height: Range::new(0.25, 1.4),
    aspect: &[],
};

static STOOL_RULE: DimensionRule = DimensionRule {
    width: Range::new(0.25, 0.55),
    depth: Range::new(0.25, 0.55),
    height: Range::new(0.4, 0.9),
    aspect: &[],
};

/// Dimension rule for a furniture type
pub fn dimension_rule(furniture_type: FurnitureType) -> &'static DimensionRule {
    match furniture_type {
        FurnitureType::Table => &TABLE_RULE,
        FurnitureType::Desk => &DESK_RULE,
        FurnitureType::Dresser => &DRESSER_RULE,
        FurnitureType::Shelf => &SHELF_RULE,
        FurnitureType::Cabinet => &CABINET_RULE,
        FurnitureType::Counter => &COUNTER_RULE,
        FurnitureType::Nightstand => &NIGHTSTAND_RULE,
        FurnitureType::Sofa => &SOFA_RULE,
        FurnitureType::Chair => &CHAIR_RULE,
        FurnitureType::Bed => &BED_RULE,
        FurnitureType::Stool => &STOOL_RULE,
    }
}

/// Name substrings per type, scanned in order.
///
/// Types whose patterns contain another type's pattern come first, so
/// "bedside_table" is a nightstand and "barstool" a stool.
pub static NAME_PATTERNS: [(FurnitureType, &[&str]); 11] = [
    (
        FurnitureType::Nightstand,
        &["nightstand", "night_stand", "nighttable", "night_table", "bedside"],
    ),
    (FurnitureType::Stool, &["stool", "ottoman", "footrest"]),
    (FurnitureType::Sofa, &["sofa", "couch", "loveseat", "sectional", "settee"]),
    (FurnitureType::Chair, &["chair", "armchair", "recliner", "seat"]),
    (FurnitureType::Bed, &["bed", "mattress", "bunk"]),
    (FurnitureType::Desk, &["desk", "workstation", "writing_table"]),
    (
        FurnitureType::Counter,
        &["counter", "countertop", "kitchen_island", "island", "bar_top"],
    ),
    (FurnitureType::Dresser, &["dresser", "chest_of_drawers", "drawers", "bureau"]),
    (
        FurnitureType::Cabinet,
        &["cabinet", "cupboard", "sideboard", "credenza", "wardrobe", "storage"],
    ),
    (FurnitureType::Shelf, &["shelf", "shelves", "bookcase", "shelving", "bookshelf"]),
    (
        FurnitureType::Table,
        &["table", "dining_table", "coffee_table", "side_table", "end_table", "console"],
    ),
];

/// Order in which rules are tried when the name gives no usable candidate
pub const DIMENSION_FALLBACK_ORDER: [FurnitureType; 11] = [
    FurnitureType::Counter,
    FurnitureType::Desk,
    FurnitureType::Table,
    FurnitureType::Dresser,
    FurnitureType::Cabinet,
    FurnitureType::Shelf,
    FurnitureType::Nightstand,
    FurnitureType::Bed,
    FurnitureType::Sofa,
    FurnitureType::Chair,
    FurnitureType::Stool,
];

/// Candidate type from the object name alone
pub fn match_name(name: &str) -> Option<FurnitureType> {
    let lower = name.to_lowercase();
    NAME_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(furniture_type, _)| *furniture_type)
}

/// First type in [`DIMENSION_FALLBACK_ORDER`] whose rule matches
pub fn match_dimensions(dims: &FurnitureDimensions) -> Option<FurnitureType> {
    DIMENSION_FALLBACK_ORDER
        .iter()
        .copied()
        .find(|t| dimension_rule(*t).matches(dims))
}

/// Classify an object from its name and bounds.
///
/// `None` means "not furniture", which is a normal outcome.
pub fn detect_furniture_type(name: &str, bounds: &BoundingBox) -> Option<FurnitureType> {
    let dims = FurnitureDimensions::from_bounds(bounds);

    if let Some(candidate) = match_name(name) {
        if dimension_rule(candidate).matches(&dims) {
            return Some(candidate);
        }
        tracing::trace!(
            name,
            candidate = %candidate,
            width = dims.width,
            depth = dims.depth,
            height = dims.height,
            "Name candidate rejected by dimensions"
        );
    }

    match_dimensions(&dims)
}

/// Classify a scene object; objects without a mesh are never furniture
pub fn detect(object: &SceneObject) -> Option<FurnitureType> {
    let bounds = object.bounds()?;
    detect_furniture_type(&object.name, &bounds)
}

/// Whether a device may be placed on this furniture type
#[inline]
pub fn is_placement_suitable(furniture_type: FurnitureType) -> bool {
    furniture_type.is_placement_suitable()
}
