//! Area graph construction
//!
//! Turns every cell of the final subdivision into an [`Area`] and wires up
//! adjacency from the edges the cells share.

use rand::Rng;
use std::collections::BTreeMap;

use crate::area::Area;
use crate::config::ShrinkRange;
use crate::error::{Result, TerrainError};
use crate::geometry::{Polygon, PolygonPoint};
use crate::height::HeightSampler;
use crate::subdivision::Subdivision;

/// Register `a` and `b` as neighbors of each other
///
/// Returns `false` (and changes nothing) if either id is missing or `a == b`.
pub fn link(areas: &mut BTreeMap<usize, Area>, a: usize, b: usize) -> bool {
    if a == b || !areas.contains_key(&a) || !areas.contains_key(&b) {
        return false;
    }
    if let Some(area) = areas.get_mut(&a) {
        area.add_neighbor(b);
    }
    if let Some(area) = areas.get_mut(&b) {
        area.add_neighbor(a);
    }
    true
}

/// Build one area per cell of a stamped subdivision
///
/// For each cell with at least 3 boundary points:
/// 1. Collect the boundary in half-edge order, copying each vertex identity
/// 2. Rewind the ring counter-clockwise
/// 3. Shrink toward the centroid by `1 - u`, `u` drawn from `shrink`
/// 4. Assign the base height sampled at the site (corners follow)
///
/// Then every edge with a cell on both sides links its two areas.
///
/// # Errors
///
/// Returns `UnstampedVertex` if a cell references a vertex without identity,
/// and `GenerationFailed` if it references a vertex that does not exist.
/// Half-edges pointing at missing edges are ignored when linking.
pub fn build_areas<H, R>(
    subdivision: &Subdivision,
    sampler: &H,
    shrink: ShrinkRange,
    rng: &mut R,
) -> Result<BTreeMap<usize, Area>>
where
    H: HeightSampler + ?Sized,
    R: Rng + ?Sized,
{
    let mut areas = BTreeMap::new();

    for cell in &subdivision.cells {
        if cell.halfedges.len() < 3 {
            log::debug!("skipping degenerate cell {}", cell.site_id);
            continue;
        }

        let points = cell
            .halfedges
            .iter()
            .map(|halfedge| {
                let vertex = subdivision.vertices.get(halfedge.start).ok_or_else(|| {
                    TerrainError::GenerationFailed(format!(
                        "cell {} references missing vertex {}",
                        cell.site_id, halfedge.start
                    ))
                })?;
                vertex
                    .id
                    .map(|id| PolygonPoint::new(vertex.position, id))
                    .ok_or(TerrainError::UnstampedVertex(halfedge.start))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut polygon = Polygon::new(points);
        polygon.rewind();

        let amount = if shrink.max > shrink.min {
            rng.gen_range(shrink.min..shrink.max)
        } else {
            shrink.min
        };
        polygon.scale(1.0 - amount);

        let mut area = Area::new(cell.site_id, cell.site, polygon);
        area.set_height(sampler.base_height(cell.site), sampler);
        areas.insert(area.id(), area);
    }

    for cell in &subdivision.cells {
        for halfedge in &cell.halfedges {
            let Some(edge) = subdivision.edges.get(halfedge.edge) else {
                log::debug!("cell {} references missing edge {}", cell.site_id, halfedge.edge);
                continue;
            };
            if let Some(right) = edge.right_site {
                link(&mut areas, edge.left_site, right);
            }
        }
    }

    Ok(areas)
}
