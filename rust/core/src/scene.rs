// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Captured scene asset: the input tree handed over by the scanner.
//!
//! The tree is opaque to the pipeline apart from object names, mesh bounds
//! and vertex positions. Assets are usually exchanged as JSON:
//!
//! ```json
//! {
//!   "name": "Living Room",
//!   "children": [
//!     { "name": "wall_0", "mesh": { "bounds": { "min": {...}, "max": {...} },
//!                                   "positions": [0.0, 0.0, 0.0, 4.0, 0.0, 0.0] } }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::primitives::{BoundingBox, Point3D};
use serde::{Deserialize, Serialize};

/// Root of a captured scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneAsset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<SceneObject>,
}

/// Named node of the scene tree, optionally backed by a mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mesh: Option<SceneMesh>,
    #[serde(default)]
    pub children: Vec<SceneObject>,
}

/// Mesh data attached to a scene object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMesh {
    /// Axis-aligned bounds reported by the scanner
    pub bounds: BoundingBox,
    /// Vertex positions (x, y, z), may be empty when only bounds were captured
    #[serde(default)]
    pub positions: Vec<f32>,
}

impl SceneAsset {
    pub fn new(name: impl Into<String>, children: Vec<SceneObject>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Decode an asset from its JSON representation
    pub fn from_json(content: &str) -> Result<Self> {
        let asset: SceneAsset = serde_json::from_str(content)?;
        Ok(asset)
    }

    /// Decode an asset from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidInputAsset("empty input".to_string()));
        }
        let asset: SceneAsset = serde_json::from_slice(bytes)?;
        Ok(asset)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first iterator over every object in the tree (root excluded)
    pub fn objects(&self) -> SceneObjects<'_> {
        SceneObjects {
            stack: self.children.iter().rev().collect(),
        }
    }
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Object backed by a mesh with the given bounds and no vertex data
    pub fn with_bounds(name: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            name: name.into(),
            mesh: Some(SceneMesh::new(bounds, Vec::new())),
            children: Vec::new(),
        }
    }

    /// Object backed by a mesh built from vertex positions
    pub fn with_vertices(name: impl Into<String>, vertices: &[Point3D]) -> Self {
        Self {
            name: name.into(),
            mesh: SceneMesh::from_vertices(vertices),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SceneObject>) -> Self {
        self.children = children;
        self
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.mesh.as_ref().map(|m| m.bounds)
    }
}

impl SceneMesh {
    pub fn new(bounds: BoundingBox, positions: Vec<f32>) -> Self {
        Self { bounds, positions }
    }

    /// Build a mesh whose bounds are derived from its vertices
    pub fn from_vertices(vertices: &[Point3D]) -> Option<Self> {
        let bounds = BoundingBox::from_points(vertices)?;
        let positions = vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect();
        Some(Self { bounds, positions })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Iterate vertex positions as points (a trailing partial triple is ignored)
    pub fn vertices(&self) -> impl Iterator<Item = Point3D> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Point3D::new(c[0] as f64, c[1] as f64, c[2] as f64))
    }
}

/// Depth-first iterator returned by [`SceneAsset::objects`]
pub struct SceneObjects<'a> {
    stack: Vec<&'a SceneObject>,
}

impl<'a> Iterator for SceneObjects<'a> {
    type Item = &'a SceneObject;

    fn next(&mut self) -> Option<Self::Item> {
        let object = self.stack.pop()?;
        self.stack.extend(object.children.iter().rev());
        Some(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn objects_are_visited_depth_first() {
        let asset = SceneAsset::new(
            "room",
            vec![
                SceneObject::new("group").with_children(vec![
                    SceneObject::with_bounds("table", unit_box()),
                    SceneObject::with_bounds("chair", unit_box()),
                ]),
                SceneObject::with_bounds("sofa", unit_box()),
            ],
        );

        let names: Vec<_> = asset.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["group", "table", "chair", "sofa"]);
    }

    #[test]
    fn decode_from_json() {
        let json = r#"{
            "name": "Office",
            "children": [
                { "name": "desk_1",
                  "mesh": { "bounds": { "min": { "x": 0.0, "y": 0.0, "z": 0.0 },
                                        "max": { "x": 1.4, "y": 0.7, "z": 0.75 } } } },
                { "name": "empty" }
            ]
        }"#;

        let asset = SceneAsset::from_json(json).unwrap();
        assert_eq!(asset.name, "Office");
        assert_eq!(asset.children.len(), 2);
        assert!(asset.children[0].mesh.as_ref().unwrap().positions.is_empty());
        assert!(asset.children[1].mesh.is_none());
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        let err = SceneAsset::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::InvalidInputAsset(_)));
        assert!(matches!(SceneAsset::from_slice(b""), Err(Error::InvalidInputAsset(_))));
    }

    #[test]
    fn mesh_from_vertices_derives_bounds() {
        let mesh = SceneMesh::from_vertices(&[
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(4.0, 0.1, 2.5),
        ])
        .unwrap();

        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.bounds.max, Point3D::new(4.0, 0.1, 2.5));
        assert_eq!(mesh.vertices().count(), 2);
    }
}
