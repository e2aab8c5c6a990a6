// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall extraction from wall-named scene meshes

use roomscan_core::{BoundingBox, Error, Point3D, Result, SceneObject, WallElement, WallMaterial};
use rustc_hash::FxHashSet;

/// Thickness assigned to every extracted wall (m). Scans do not resolve
/// wall thickness reliably.
pub const DEFAULT_WALL_THICKNESS: f64 = 0.1;

/// Grid used to merge near-duplicate floor vertices (1 mm)
const VERTEX_QUANTUM: f64 = 1000.0;

/// Whether an object name denotes a wall
pub fn is_wall_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with("wall_") || lower.contains("wall") || lower.contains("partition")
}

/// Extract a wall from a mesh object.
///
/// The run is the farthest-apart pair of vertices touching the floor, i.e.
/// within `floor_tolerance` of the mesh's lowest point. Height is the
/// vertical extent of the vertices; the reported mesh bounds are not trusted.
pub fn extract_wall(id: impl Into<String>, object: &SceneObject, floor_tolerance: f64) -> Result<WallElement> {
    let mesh = object
        .mesh
        .as_ref()
        .ok_or_else(|| Error::corrupted(format!("wall '{}' has no mesh", object.name)))?;

    let (floor_z, top_z) = mesh
        .vertices()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v.z), hi.max(v.z)));
    if !floor_z.is_finite() {
        return Err(Error::corrupted(format!("wall '{}' has no vertex data", object.name)));
    }

    let mut seen = FxHashSet::default();
    let floor_points: Vec<Point3D> = mesh
        .vertices()
        .filter(|v| v.is_finite() && v.z - floor_z <= floor_tolerance)
        .filter(|v| {
            seen.insert((
                (v.x * VERTEX_QUANTUM).round() as i64,
                (v.y * VERTEX_QUANTUM).round() as i64,
            ))
        })
        .collect();

    let (start, end) = farthest_pair(&floor_points).ok_or_else(|| {
        Error::corrupted(format!(
            "wall '{}' has fewer than two distinct floor vertices",
            object.name
        ))
    })?;

    Ok(WallElement::new(
        id,
        Point3D::new(start.0, start.1, floor_z),
        Point3D::new(end.0, end.1, floor_z),
        top_z - floor_z,
        DEFAULT_WALL_THICKNESS,
        WallMaterial::from_name(&object.name),
    ))
}

/// Farthest-apart pair by horizontal distance, `None` if all points coincide.
/// The pair always lies on the convex hull, so only hull vertices are compared.
fn farthest_pair(points: &[Point3D]) -> Option<((f64, f64), (f64, f64))> {
    let hull = convex_hull(points);
    let mut best: Option<(f64, (f64, f64), (f64, f64))> = None;
    for (i, a) in hull.iter().enumerate() {
        for b in &hull[i + 1..] {
            let d = (b.0 - a.0).hypot(b.1 - a.1);
            if d > 0.0 && best.map_or(true, |(max, _, _)| d > max) {
                best = Some((d, *a, *b));
            }
        }
    }
    best.map(|(_, a, b)| (a, b))
}

/// Andrew's monotone chain over the XY projection, counter-clockwise,
/// collinear points dropped
fn convex_hull(points: &[Point3D]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let cross = |o: (f64, f64), a: (f64, f64), b: (f64, f64)| {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };

    let mut hull: Vec<(f64, f64)> = Vec::with_capacity(sorted.len() + 1);
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Four drywall walls along the floor perimeter of `bounds`
pub fn infer_walls(bounds: &BoundingBox, id_prefix: &str) -> Vec<WallElement> {
    let z = bounds.min.z;
    let height = bounds.size().z;
    let corners = [
        Point3D::new(bounds.min.x, bounds.min.y, z),
        Point3D::new(bounds.max.x, bounds.min.y, z),
        Point3D::new(bounds.max.x, bounds.max.y, z),
        Point3D::new(bounds.min.x, bounds.max.y, z),
    ];

    (0..corners.len())
        .map(|i| {
            WallElement::new(
                format!("{id_prefix}_{i}"),
                corners[i],
                corners[(i + 1) % corners.len()],
                height,
                DEFAULT_WALL_THICKNESS,
                WallMaterial::Drywall,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roomscan_core::SceneMesh;

    fn wall_mesh(name: &str) -> SceneObject {
        SceneObject::with_vertices(
            name,
            &[
                Point3D::new(0.0, 0.0, 0.0),
                Point3D::new(4.0, 0.0, 0.0),
                Point3D::new(4.0, 0.1, 0.05),
                Point3D::new(0.0, 0.1, 0.0),
                Point3D::new(0.0, 0.0, 2.5),
                Point3D::new(4.0, 0.0, 2.5),
                Point3D::new(4.0, 0.1, 2.5),
                Point3D::new(0.0, 0.1, 2.5),
            ],
        )
    }

    #[test]
    fn wall_names() {
        assert!(is_wall_name("wall_0"));
        assert!(is_wall_name("North Wall"));
        assert!(is_wall_name("glass_partition"));
        assert!(!is_wall_name("dining_table"));
    }

    #[test]
    fn extracts_run_from_floor_vertices() {
        let wall = extract_wall("wall_0", &wall_mesh("Wall_Brick"), 0.1).unwrap();
        assert_relative_eq!(wall.length(), (16.0_f64 + 0.01).sqrt(), epsilon = 1e-6);
        assert_relative_eq!(wall.height, 2.5, epsilon = 1e-6);
        assert_relative_eq!(wall.thickness, DEFAULT_WALL_THICKNESS);
        assert_relative_eq!(wall.start.z, 0.0);
        assert_eq!(wall.material, WallMaterial::Brick);
    }

    #[test]
    fn height_comes_from_vertices_not_reported_bounds() {
        let vertices = [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(4.0, 0.0, 0.0),
            Point3D::new(0.0, 0.0, 2.5),
            Point3D::new(4.0, 0.0, 2.5),
        ];
        let positions = vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect();
        let unsorted = BoundingBox::new(Point3D::new(0.0, 0.0, 3.0), Point3D::new(4.0, 0.1, 0.0));
        let object = SceneObject {
            mesh: Some(SceneMesh::new(unsorted, positions)),
            ..SceneObject::new("wall_0")
        };

        let wall = extract_wall("wall_0", &object, 0.1).unwrap();
        assert_relative_eq!(wall.height, 2.5, epsilon = 1e-6);
        assert_relative_eq!(wall.length(), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn dense_mesh_run_spans_the_extremes() {
        let mut vertices = Vec::new();
        for i in 0..=400 {
            let x = i as f64 * 0.01;
            vertices.push(Point3D::new(x, 0.0, 0.0));
            vertices.push(Point3D::new(x, 0.1, 0.0));
            vertices.push(Point3D::new(x, 0.05, 2.4));
        }
        let wall = extract_wall("wall_0", &SceneObject::with_vertices("wall_0", &vertices), 0.1).unwrap();

        assert_relative_eq!(wall.length(), (16.0_f64 + 0.01).sqrt(), epsilon = 1e-6);
        assert_relative_eq!(wall.start.x.min(wall.end.x), 0.0, epsilon = 1e-6);
        assert_relative_eq!(wall.start.x.max(wall.end.x), 4.0, epsilon = 1e-6);
        assert_relative_eq!(wall.height, 2.4, epsilon = 1e-6);
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let points = [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
            Point3D::new(2.0, 1.0, 0.0),
            Point3D::new(1.0, 0.5, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull, vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);

        let line = [Point3D::new(3.0, 0.0, 0.0), Point3D::new(1.0, 0.0, 0.0), Point3D::new(2.0, 0.0, 0.0)];
        assert_eq!(convex_hull(&line), vec![(1.0, 0.0), (3.0, 0.0)]);
    }

    #[test]
    fn missing_vertices_is_corrupted() {
        let bounds = BoundingBox::new(Point3D::ORIGIN, Point3D::new(4.0, 0.1, 2.5));
        let err = extract_wall("w", &SceneObject::with_bounds("wall_0", bounds), 0.1).unwrap_err();
        assert!(matches!(err, Error::CorruptedMeshData(_)));

        let err = extract_wall("w", &SceneObject::new("wall_1"), 0.1).unwrap_err();
        assert!(matches!(err, Error::CorruptedMeshData(_)));
    }

    #[test]
    fn single_floor_point_is_corrupted() {
        let object = SceneObject::with_vertices(
            "wall_0",
            &[Point3D::new(1.0, 1.0, 0.0), Point3D::new(1.0, 1.0, 2.5)],
        );
        assert!(matches!(
            extract_wall("w", &object, 0.1),
            Err(Error::CorruptedMeshData(_))
        ));
    }

    #[test]
    fn inferred_walls_close_the_perimeter() {
        let bounds = BoundingBox::new(Point3D::ORIGIN, Point3D::new(6.0, 5.0, 2.5));
        let walls = infer_walls(&bounds, "inferred_wall");
        assert_eq!(walls.len(), 4);

        let perimeter: f64 = walls.iter().map(|w| w.length()).sum();
        assert_relative_eq!(perimeter, 22.0);
        for pair in walls.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(walls[3].end, walls[0].start);
        assert!(walls.iter().all(|w| w.material == WallMaterial::Drywall));
        assert_eq!(walls[0].id, "inferred_wall_0");
    }
}
