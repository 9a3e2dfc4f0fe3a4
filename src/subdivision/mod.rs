//! Planar subdivision of a rectangular domain
//!
//! A [`Subdivision`] is the bounded Voronoi diagram of a site set: cells (one
//! per site) with ordered half-edge loops, edges with left/right incident
//! sites, and welded vertices shared by every cell touching the same corner.
//! Any [`PlanarSubdivider`] can produce one; [`ClippedVoronoi`] is the default.

mod clipped;

pub use clipped::ClippedVoronoi;

use glam::DVec2;

/// Axis-aligned domain rectangle
///
/// `yt` is the low y bound and `yb` the high one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xl: f64,
    pub xr: f64,
    pub yt: f64,
    pub yb: f64,
}

impl Bounds {
    /// Rectangle of the given size centered on the origin
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            xl: -width / 2.0,
            xr: width / 2.0,
            yt: -height / 2.0,
            yb: height / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xr - self.xl
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.yb - self.yt
    }

    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        (self.xl..=self.xr).contains(&point.x) && (self.yt..=self.yb).contains(&point.y)
    }

    /// Corners in counter-clockwise order
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.xl, self.yt),
            DVec2::new(self.xr, self.yt),
            DVec2::new(self.xr, self.yb),
            DVec2::new(self.xl, self.yb),
        ]
    }
}

/// A shared corner of the subdivision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: DVec2,
    /// Identity stamped by [`Subdivision::assign_vertex_ids`]
    pub id: Option<usize>,
}

/// A boundary segment between two cells (or a cell and the domain border)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Site on one side
    pub left_site: usize,
    /// Site on the other side, `None` along the domain border
    pub right_site: Option<usize>,
    /// First endpoint (vertex index)
    pub va: usize,
    /// Second endpoint (vertex index)
    pub vb: usize,
}

impl Edge {
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.right_site.is_some()
    }
}

/// One step of a cell's boundary loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Owning edge (index into [`Subdivision::edges`])
    pub edge: usize,
    /// Vertex this half-edge starts at
    pub start: usize,
}

/// The region of the domain closest to one site
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Index of the generating site
    pub site_id: usize,
    pub site: DVec2,
    /// Closed boundary loop, counter-clockwise for [`ClippedVoronoi`]
    pub halfedges: Vec<HalfEdge>,
}

/// Cells, edges and shared vertices of a bounded Voronoi diagram
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subdivision {
    pub cells: Vec<Cell>,
    pub edges: Vec<Edge>,
    pub vertices: Vec<Vertex>,
}

impl Subdivision {
    /// Start point of a half-edge, `None` if its vertex does not exist
    #[inline]
    pub fn start_point(&self, halfedge: &HalfEdge) -> Option<DVec2> {
        self.vertices.get(halfedge.start).map(|v| v.position)
    }

    /// Boundary ring of a cell in half-edge order
    ///
    /// Half-edges starting at a missing vertex are left out.
    pub fn cell_ring(&self, cell: &Cell) -> Vec<DVec2> {
        cell.halfedges.iter().filter_map(|h| self.start_point(h)).collect()
    }

    /// Stamp a sequential identity on every vertex, in enumeration order
    ///
    /// Must run once on the final subdivision. Identities, once assigned, are
    /// never changed: returns `false` and leaves the subdivision untouched if
    /// any vertex is already stamped.
    pub fn assign_vertex_ids(&mut self) -> bool {
        if self.vertices.iter().any(|v| v.id.is_some()) {
            log::warn!("vertex identities already assigned; keeping existing ids");
            return false;
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.id = Some(i);
        }
        true
    }

    /// Whether every vertex carries an identity
    pub fn is_stamped(&self) -> bool {
        self.vertices.iter().all(|v| v.id.is_some())
    }

    /// Number of edges with a cell on both sides
    pub fn shared_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_shared()).count()
    }

    /// Release all contents, keeping allocations
    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.edges.clear();
        self.vertices.clear();
    }
}

/// Source of planar subdivisions
///
/// `recycle` hands a subdivision that is no longer needed back to the service
/// so the next `compute` can reuse its allocations.
pub trait PlanarSubdivider {
    fn compute(&mut self, sites: &[DVec2], bounds: Bounds) -> Subdivision;

    fn recycle(&mut self, subdivision: Subdivision);
}
