//! Mesh generation for Terrain
//!
//! Stitches the final area graph into three engine-agnostic triangle batches:
//! fans over every area interior, corner triangles where three shrunk areas
//! meet, and bridges across every shared edge.

use glam::Vec3;
use std::collections::BTreeMap;

use crate::area::Area;
use crate::geometry::{Polygon, PolygonPoint};
use crate::subdivision::{Edge, Subdivision};

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// Positions are `(x, elevation, y)`. Triangles do not share vertices, so
/// every face keeps its own flat normal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Face normals, repeated per vertex and always pointing up (+Y)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append one triangle, flipping its winding if needed so it faces up
    pub fn push_triangle(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
        let (pa, mut pb, mut pc) = (Vec3::from(a), Vec3::from(b), Vec3::from(c));
        let mut normal = (pb - pa).cross(pc - pa).try_normalize().unwrap_or(Vec3::Y);
        if normal.y < 0.0 {
            std::mem::swap(&mut pb, &mut pc);
            normal = -normal;
        }

        let base_idx = self.positions.len() as u32;
        for position in [pa, pb, pc] {
            self.positions.push(position.to_array());
            self.normals.push(normal.to_array());
        }
        self.indices.extend([base_idx, base_idx + 1, base_idx + 2]);
    }

    /// Append every triangle of `other`
    pub fn append(&mut self, other: &MeshData) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Append a triangle after rewinding its planar footprint counter-clockwise
    fn push_rewound(&mut self, points: [PolygonPoint; 3]) {
        let mut polygon = Polygon::new(points.to_vec());
        polygon.rewind();
        if let [a, b, c] = polygon.points() {
            self.push_triangle(a.to_world(), b.to_world(), c.to_world());
        }
    }
}

/// The three triangle batches of a stitched terrain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    /// Fan triangulation of every area
    pub interior: MeshData,
    /// One triangle per vertex shared by exactly three areas
    pub corners: MeshData,
    /// Two triangles per shared edge
    pub borders: MeshData,
}

impl TerrainMesh {
    pub fn triangle_count(&self) -> usize {
        self.interior.triangle_count() + self.corners.triangle_count() + self.borders.triangle_count()
    }

    /// All three batches in one buffer
    pub fn merged(&self) -> MeshData {
        let mut mesh = self.interior.clone();
        mesh.append(&self.corners);
        mesh.append(&self.borders);
        mesh
    }
}

/// Stitch the final area graph into a gap-free surface
///
/// Lookups that fail (a missing area, an unstamped vertex, a corner the area
/// does not carry) skip only the affected triangles.
pub fn stitch(subdivision: &Subdivision, areas: &BTreeMap<usize, Area>) -> TerrainMesh {
    let mesh = TerrainMesh {
        interior: interior_fans(areas),
        corners: corner_triangles(subdivision, areas),
        borders: border_bridges(subdivision, areas),
    };

    log::debug!(
        "stitched {} interior, {} corner and {} border triangles",
        mesh.interior.triangle_count(),
        mesh.corners.triangle_count(),
        mesh.borders.triangle_count()
    );

    mesh
}

/// Fan-triangulate every area polygon from its first point
pub fn interior_fans(areas: &BTreeMap<usize, Area>) -> MeshData {
    let mut mesh = MeshData::default();

    for area in areas.values() {
        let points = area.polygon().points();
        if points.len() < 3 {
            continue;
        }

        let anchor = points[0].to_world();
        for pair in points[1..].windows(2) {
            mesh.push_triangle(anchor, pair[0].to_world(), pair[1].to_world());
        }
    }

    mesh
}

/// Fill the gap where exactly three areas meet at one vertex
///
/// Border vertices (one or two areas) and vertices joining four or more
/// areas are skipped.
pub fn corner_triangles(subdivision: &Subdivision, areas: &BTreeMap<usize, Area>) -> MeshData {
    let mut groups: BTreeMap<usize, Vec<PolygonPoint>> = BTreeMap::new();
    for area in areas.values() {
        for point in area.polygon().points() {
            groups.entry(point.id).or_default().push(*point);
        }
    }

    let mut mesh = MeshData::default();
    let mut skipped = 0;

    for id in subdivision.vertices.iter().filter_map(|v| v.id) {
        match groups.get(&id).map(Vec::as_slice) {
            Some(&[a, b, c]) => mesh.push_rewound([a, b, c]),
            Some(group) if group.len() > 3 => skipped += 1,
            _ => {}
        }
    }

    if skipped > 0 {
        log::trace!("skipped {} corners joining more than three areas", skipped);
    }

    mesh
}

/// Bridge the shrink gap along every edge with an area on both sides
pub fn border_bridges(subdivision: &Subdivision, areas: &BTreeMap<usize, Area>) -> MeshData {
    let mut mesh = MeshData::default();
    let mut skipped = 0;

    for edge in &subdivision.edges {
        if !edge.is_shared() {
            continue;
        }

        let Some((left_a, left_b, right_a, right_b)) = bridge_corners(subdivision, areas, edge) else {
            skipped += 1;
            continue;
        };

        mesh.push_rewound([left_a, right_a, left_b]);
        mesh.push_rewound([right_a, right_b, left_b]);
    }

    if skipped > 0 {
        log::debug!("skipped {} border bridges with unresolved corners", skipped);
    }

    mesh
}

/// Both endpoints of an edge as seen from the areas on each side
fn bridge_corners(
    subdivision: &Subdivision,
    areas: &BTreeMap<usize, Area>,
    edge: &Edge,
) -> Option<(PolygonPoint, PolygonPoint, PolygonPoint, PolygonPoint)> {
    let id_a = subdivision.vertices.get(edge.va)?.id?;
    let id_b = subdivision.vertices.get(edge.vb)?.id?;
    let left = areas.get(&edge.left_site)?.polygon();
    let right = areas.get(&edge.right_site?)?.polygon();

    Some((
        *left.point_with_id(id_a)?,
        *left.point_with_id(id_b)?,
        *right.point_with_id(id_a)?,
        *right.point_with_id(id_b)?,
    ))
}
