//! Terrain Area Structure
//!
//! One generated terrain cell: a shrunk boundary polygon, an elevation and the
//! ids of adjacent areas.

use glam::DVec2;
use std::collections::BTreeSet;

use crate::geometry::{Polygon, PolygonPoint};
use crate::height::HeightSampler;

/// A single terrain area
///
/// Each area represents one cell of the final subdivision with:
/// - The id of its generating site, stable for the terrain's lifetime
/// - A counter-clockwise boundary polygon whose corners keep the identity of
///   the subdivision vertex they came from
/// - A base height, mirrored into every corner's elevation
/// - Neighbor ids resolved against the owning terrain's area map
///
/// # Design Notes
///
/// Height and corner elevations are kept consistent by [`Area::set_height`];
/// there is no way to change one without the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    id: usize,
    site: DVec2,
    polygon: Polygon,
    height: f64,
    neighbors: BTreeSet<usize>,
}

impl Area {
    /// Create an area at height 0 with no neighbors
    ///
    /// This is typically called during terrain generation, not by user code.
    pub fn new(id: usize, site: DVec2, polygon: Polygon) -> Self {
        Self {
            id,
            site,
            polygon,
            height: 0.0,
            neighbors: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Site the area was generated from
    #[inline]
    pub fn site(&self) -> DVec2 {
        self.site
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Ids of adjacent areas, in ascending order
    #[inline]
    pub fn neighbors(&self) -> &BTreeSet<usize> {
        &self.neighbors
    }

    /// Centroid of the boundary polygon
    pub fn center(&self) -> DVec2 {
        self.polygon.center()
    }

    /// Set the base height and recompute every corner's elevation from it
    pub fn set_height<H>(&mut self, height: f64, sampler: &H)
    where
        H: HeightSampler + ?Sized,
    {
        self.height = height;
        self.polygon
            .set_elevations(|point| sampler.point_elevation(height, point));
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_neighbor_of(&self, other_area_id: usize) -> bool {
        self.neighbors.contains(&other_area_id)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// Planar area of the (shrunk) polygon
    pub fn area(&self) -> f64 {
        self.polygon.signed_area().abs()
    }

    /// Corner carrying the given vertex identity, if this area touches it
    #[inline]
    pub fn point_with_id(&self, vertex_id: usize) -> Option<&PolygonPoint> {
        self.polygon.point_with_id(vertex_id)
    }

    pub(crate) fn add_neighbor(&mut self, id: usize) -> bool {
        self.neighbors.insert(id)
    }
}
