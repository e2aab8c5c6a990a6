// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Roomscan Core
//!
//! Value types shared by the room extraction pipeline:
//!
//! - **Primitives**: [`Point3D`], [`Vector3D`], [`BoundingBox`], [`Segment2D`]
//! - **Input**: the captured [`SceneAsset`] tree
//! - **Output**: the immutable [`RoomModel`] and its entities
//! - **Errors**: the closed [`Error`] taxonomy
//!
//! Nothing in this crate holds mutable shared state; all types are `Send + Sync`
//! and can be processed on any thread.

pub mod error;
pub mod model;
pub mod primitives;
pub mod scene;

pub use error::{Error, Result};
pub use model::{
    FloorPlan, FurnitureItem, FurnitureType, Opening, OpeningType, PlacementSurface, RoomModel,
    SurfaceAccessibility, WallElement, WallMaterial,
};
pub use primitives::{BoundingBox, Point3D, Segment2D, Vector3D};
pub use scene::{SceneAsset, SceneMesh, SceneObject};
