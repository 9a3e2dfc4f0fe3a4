//! Bounded Voronoi construction on top of `voronoice`
//!
//! `voronoice` builds the diagram and clips it to the domain. Cells touching
//! the border carry their own copies of clipped corners, and co-circular sites
//! repeat a circumcenter, so corners are welded into shared vertices before
//! boundary segments are paired into edges by vertex pair.

use glam::DVec2;
use std::collections::HashMap;
use voronoice::{BoundingBox, ClipBehavior, Point, VoronoiBuilder};

use super::{Bounds, Cell, Edge, HalfEdge, PlanarSubdivider, Subdivision, Vertex};
use crate::geometry::signed_area;

/// Weld tolerance relative to the domain extent
const WELD_TOLERANCE: f64 = 1e-8;

/// Hash-grid lookup that merges corners closer than a tolerance
#[derive(Debug, Default)]
struct VertexWelder {
    tolerance: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl VertexWelder {
    fn reset(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
        self.buckets.clear();
    }

    fn bucket(&self, position: DVec2) -> (i64, i64) {
        (
            (position.x / self.tolerance).floor() as i64,
            (position.y / self.tolerance).floor() as i64,
        )
    }

    /// Index of the vertex at `position`, creating it if no vertex is within tolerance
    fn weld(&mut self, position: DVec2, vertices: &mut Vec<Vertex>) -> usize {
        let (bx, by) = self.bucket(position);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = self.buckets.get(&(bx + dx, by + dy)) else {
                    continue;
                };
                if let Some(&found) = candidates.iter().find(|&&i| {
                    vertices
                        .get(i)
                        .is_some_and(|v| v.position.distance(position) <= self.tolerance)
                }) {
                    return found;
                }
            }
        }

        let index = vertices.len();
        vertices.push(Vertex { position, id: None });
        self.buckets.entry((bx, by)).or_default().push(index);
        index
    }
}

/// Default [`PlanarSubdivider`], backed by `voronoice`
///
/// Output rings are counter-clockwise and vertices are numbered in first-seen
/// order (cells in site order, corners in ring order), so identical input
/// gives identical output. Sites that `voronoice` cannot place get a cell with
/// no half-edges: repeats of an earlier site, sites outside the domain, and
/// every site of an input it cannot triangulate (two sites, or all collinear).
/// A lone site owns the whole domain.
///
/// # Example
///
/// ```
/// use voronoi_terrain::subdivision::{Bounds, ClippedVoronoi, PlanarSubdivider};
/// use glam::DVec2;
///
/// let mut voronoi = ClippedVoronoi::new();
/// let sites = [DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.5)];
/// let subdivision = voronoi.compute(&sites, Bounds::centered(4.0, 4.0));
///
/// assert_eq!(subdivision.cells.len(), 3);
/// assert_eq!(subdivision.shared_edge_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ClippedVoronoi {
    welder: VertexWelder,
    site_welder: VertexWelder,
    site_slots: Vec<Vertex>,
    unique_sites: Vec<usize>,
    edge_lookup: HashMap<(usize, usize), usize>,
    rings: Vec<Vec<DVec2>>,
    corners: Vec<usize>,
    spare: Option<Subdivision>,
}

impl ClippedVoronoi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill `self.rings` with the clipped cell of every site, in site order
    fn trace_cells(&mut self, sites: &[DVec2], bounds: &Bounds, tolerance: f64) {
        for ring in &mut self.rings {
            ring.clear();
        }
        self.rings.resize_with(sites.len(), Vec::new);

        // Coincident sites would share one cell; only the first keeps it
        self.site_welder.reset(tolerance);
        self.site_slots.clear();
        self.unique_sites.clear();
        for (site_id, &site) in sites.iter().enumerate() {
            let known = self.site_slots.len();
            if self.site_welder.weld(site, &mut self.site_slots) == known {
                self.unique_sites.push(site_id);
            } else {
                log::trace!("site {} at {:?} repeats an earlier site", site_id, site);
            }
        }

        match self.unique_sites[..] {
            [] => return,
            [only] => {
                if bounds.contains(sites[only]) {
                    self.rings[only].extend(bounds.corners());
                }
                return;
            }
            _ => {}
        }

        let center = Point {
            x: (bounds.xl + bounds.xr) / 2.0,
            y: (bounds.yt + bounds.yb) / 2.0,
        };
        let points: Vec<Point> = self
            .unique_sites
            .iter()
            .map(|&i| Point {
                x: sites[i].x,
                y: sites[i].y,
            })
            .collect();

        let Some(diagram) = VoronoiBuilder::default()
            .set_sites(points)
            .set_bounding_box(BoundingBox::new(center, bounds.width(), bounds.height()))
            .set_clip_behavior(ClipBehavior::Clip)
            .build()
        else {
            log::warn!(
                "voronoice could not build a diagram from {} distinct sites",
                self.unique_sites.len()
            );
            return;
        };

        // Sites outside the box are dropped by voronoice; the rest keep their order
        let mut candidates = self.unique_sites.iter().copied();
        for (cell, placed) in diagram.cells().iter().zip(diagram.sites()) {
            let Some(site_id) = candidates.find(|&i| sites[i].x == placed.x && sites[i].y == placed.y)
            else {
                break;
            };
            self.rings[site_id].extend(
                cell.iter()
                    .filter_map(|&v| diagram.vertices().get(v))
                    .map(|p| DVec2::new(p.x, p.y)),
            );
        }
    }

    /// Weld a traced ring into `vertices`, leaving its distinct corners in `self.corners`
    ///
    /// Zero-length segments collapse and the result is rewound to
    /// counter-clockwise. Fewer than 3 corners leave `self.corners` empty.
    fn weld_ring(&mut self, site_id: usize, vertices: &mut Vec<Vertex>) {
        self.corners.clear();
        let Some(ring) = self.rings.get(site_id) else {
            return;
        };

        for &position in ring {
            let vertex = self.welder.weld(position, vertices);
            if self.corners.last() != Some(&vertex) {
                self.corners.push(vertex);
            }
        }
        while self.corners.len() > 1 && self.corners.first() == self.corners.last() {
            self.corners.pop();
        }
        if self.corners.len() < 3 {
            self.corners.clear();
            return;
        }

        let positions: Vec<DVec2> = self
            .corners
            .iter()
            .filter_map(|&v| vertices.get(v))
            .map(|v| v.position)
            .collect();
        if signed_area(&positions) < 0.0 {
            self.corners.reverse();
        }
    }
}

impl PlanarSubdivider for ClippedVoronoi {
    fn compute(&mut self, sites: &[DVec2], bounds: Bounds) -> Subdivision {
        let mut subdivision = self.spare.take().unwrap_or_default();
        subdivision.clear();

        let tolerance = WELD_TOLERANCE * bounds.width().max(bounds.height());
        self.welder.reset(tolerance);
        self.edge_lookup.clear();
        self.trace_cells(sites, &bounds, tolerance);

        let Subdivision {
            cells,
            edges,
            vertices,
        } = &mut subdivision;

        for (site_id, &site) in sites.iter().enumerate() {
            self.weld_ring(site_id, vertices);
            if self.corners.is_empty() {
                log::trace!("site {} at {:?} has a degenerate cell", site_id, site);
            }

            let mut halfedges = Vec::with_capacity(self.corners.len());
            for (k, &start) in self.corners.iter().enumerate() {
                let end = self.corners[(k + 1) % self.corners.len()];
                let key = (start.min(end), start.max(end));

                // The first cell to trace a segment owns its left side
                let edge_index = match self.edge_lookup.get(&key) {
                    Some(&existing) => {
                        if let Some(edge) = edges.get_mut(existing) {
                            if edge.right_site.is_none() && edge.left_site != site_id {
                                edge.right_site = Some(site_id);
                            }
                        }
                        existing
                    }
                    None => {
                        edges.push(Edge {
                            left_site: site_id,
                            right_site: None,
                            va: start,
                            vb: end,
                        });
                        self.edge_lookup.insert(key, edges.len() - 1);
                        edges.len() - 1
                    }
                };

                halfedges.push(HalfEdge {
                    edge: edge_index,
                    start,
                });
            }

            cells.push(Cell {
                site_id,
                site,
                halfedges,
            });
        }

        subdivision
    }

    fn recycle(&mut self, mut subdivision: Subdivision) {
        subdivision.clear();
        self.spare = Some(subdivision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_area;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn grid_sites(width: f64) -> Vec<DVec2> {
        let step = width / 3.0;
        let mut sites = Vec::new();
        for row in -1..=1 {
            for col in -1..=1 {
                sites.push(DVec2::new(col as f64 * step, row as f64 * step));
            }
        }
        sites
    }

    fn random_sites(count: usize, bounds: &Bounds, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                DVec2::new(
                    rng.gen_range(bounds.xl..bounds.xr),
                    rng.gen_range(bounds.yt..bounds.yb),
                )
            })
            .collect()
    }

    fn cells_per_vertex(subdivision: &Subdivision) -> Vec<usize> {
        let mut counts = vec![0; subdivision.vertices.len()];
        for cell in &subdivision.cells {
            for halfedge in &cell.halfedges {
                counts[halfedge.start] += 1;
            }
        }
        counts
    }

    fn on_border(position: DVec2, bounds: &Bounds) -> bool {
        let tolerance = 1e-6;
        (position.x - bounds.xl).abs() < tolerance
            || (position.x - bounds.xr).abs() < tolerance
            || (position.y - bounds.yt).abs() < tolerance
            || (position.y - bounds.yb).abs() < tolerance
    }

    #[test]
    fn test_three_sites() {
        let mut voronoi = ClippedVoronoi::new();
        let sites: Vec<DVec2> = [90.0_f64, 210.0, 330.0]
            .iter()
            .map(|deg| DVec2::from_angle(deg.to_radians()) * 10.0)
            .collect();
        let subdivision = voronoi.compute(&sites, Bounds::centered(100.0, 100.0));

        assert_eq!(subdivision.cells.len(), 3);
        // One circumcenter, three border crossings, four domain corners
        assert_eq!(subdivision.vertices.len(), 8);
        assert_eq!(subdivision.edges.len(), 10);
        assert_eq!(subdivision.shared_edge_count(), 3);

        let center = subdivision
            .vertices
            .iter()
            .filter(|v| v.position.length() < 1e-9)
            .count();
        assert_eq!(center, 1);
        for edge in subdivision.edges.iter().filter(|e| e.is_shared()) {
            assert_ne!(Some(edge.left_site), edge.right_site);
        }
    }

    #[test]
    fn test_single_site_covers_domain() {
        let mut voronoi = ClippedVoronoi::new();
        let subdivision = voronoi.compute(&[DVec2::new(3.0, -2.0)], Bounds::centered(40.0, 20.0));

        assert_eq!(subdivision.cells.len(), 1);
        assert_eq!(subdivision.cells[0].halfedges.len(), 4);
        assert_eq!(subdivision.vertices.len(), 4);
        assert_eq!(subdivision.shared_edge_count(), 0);
        assert!((signed_area(&subdivision.cell_ring(&subdivision.cells[0])) - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_sites_keep_one_cell_each() {
        let mut voronoi = ClippedVoronoi::new();
        let sites = [DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0)];
        let subdivision = voronoi.compute(&sites, Bounds::centered(4.0, 2.0));

        assert_eq!(subdivision.cells.len(), 2);
        for cell in &subdivision.cells {
            assert!(cell.halfedges.is_empty() || cell.halfedges.len() >= 3);
        }
    }

    #[test]
    fn test_grid_topology() {
        let mut voronoi = ClippedVoronoi::new();
        let sites = grid_sites(512.0);
        let subdivision = voronoi.compute(&sites, Bounds::centered(512.0, 512.0));

        assert_eq!(subdivision.cells.len(), 9);
        for cell in &subdivision.cells {
            assert_eq!(cell.halfedges.len(), 4, "grid cells are rectangles");
        }

        // 4 interior corners, 8 edge splits on the border, 4 domain corners
        assert_eq!(subdivision.vertices.len(), 16);
        assert_eq!(subdivision.edges.len(), 24);
        assert_eq!(subdivision.shared_edge_count(), 12);

        let counts = cells_per_vertex(&subdivision);
        assert_eq!(counts.iter().filter(|&&c| c == 4).count(), 4);
        assert_eq!(counts.iter().filter(|&&c| c == 2).count(), 8);
        assert_eq!(counts.iter().filter(|&&c| c == 1).count(), 4);
    }

    #[test]
    fn test_rings_are_counter_clockwise_and_tile_domain() {
        let bounds = Bounds::centered(512.0, 384.0);
        let sites = random_sites(60, &bounds, 7);
        let mut voronoi = ClippedVoronoi::new();
        let subdivision = voronoi.compute(&sites, bounds);

        let mut total = 0.0;
        for cell in &subdivision.cells {
            let ring = subdivision.cell_ring(cell);
            assert!(ring.len() >= 3);
            let area = signed_area(&ring);
            assert!(area > 0.0, "cell {} is not counter-clockwise", cell.site_id);
            total += area;
        }
        assert!((total - 512.0 * 384.0).abs() < 1e-3);
    }

    #[test]
    fn test_shared_edges_appear_in_both_cells() {
        let bounds = Bounds::centered(300.0, 300.0);
        let sites = random_sites(40, &bounds, 99);
        let mut voronoi = ClippedVoronoi::new();
        let subdivision = voronoi.compute(&sites, bounds);

        assert!(subdivision.shared_edge_count() > 0);
        for (index, edge) in subdivision.edges.iter().enumerate() {
            let owners: Vec<usize> = subdivision
                .cells
                .iter()
                .filter(|c| c.halfedges.iter().any(|h| h.edge == index))
                .map(|c| c.site_id)
                .collect();
            match edge.right_site {
                Some(right) => {
                    assert_eq!(owners.len(), 2);
                    assert!(owners.contains(&edge.left_site));
                    assert!(owners.contains(&right));
                }
                None => assert_eq!(owners, vec![edge.left_site]),
            }
        }
    }

    #[test]
    fn test_recycle_reproduces_output() {
        let bounds = Bounds::centered(200.0, 200.0);
        let sites = random_sites(25, &bounds, 3);
        let mut voronoi = ClippedVoronoi::new();

        let first = voronoi.compute(&sites, bounds);
        let copy = first.clone();
        voronoi.recycle(first);
        let second = voronoi.compute(&sites, bounds);

        assert_eq!(copy, second);
    }

    #[test]
    fn test_unshared_edges_lie_on_border() {
        let bounds = Bounds::centered(400.0, 300.0);
        let sites = random_sites(80, &bounds, 21);
        let mut voronoi = ClippedVoronoi::new();
        let subdivision = voronoi.compute(&sites, bounds);

        for edge in subdivision.edges.iter().filter(|e| !e.is_shared()) {
            let a = subdivision.vertices[edge.va].position;
            let b = subdivision.vertices[edge.vb].position;
            assert!(
                on_border(a, &bounds) && on_border(b, &bounds),
                "unpaired interior edge {:?} -> {:?}",
                a,
                b
            );
        }

        let halfedges: usize = subdivision.cells.iter().map(|c| c.halfedges.len()).sum();
        let shared = subdivision.shared_edge_count();
        assert_eq!(halfedges, 2 * shared + (subdivision.edges.len() - shared));
    }

    #[test]
    fn test_duplicate_sites_do_not_panic() {
        let mut voronoi = ClippedVoronoi::new();
        let sites = [DVec2::ZERO, DVec2::ZERO, DVec2::new(5.0, 5.0), DVec2::new(-5.0, 5.0)];
        let subdivision = voronoi.compute(&sites, Bounds::centered(20.0, 20.0));

        assert_eq!(subdivision.cells.len(), 4);
        assert!(subdivision.cells[1].halfedges.is_empty());
        for index in [0, 2, 3] {
            assert!(subdivision.cells[index].halfedges.len() >= 3);
        }
    }

    #[test]
    fn test_site_outside_domain_gets_no_cell() {
        let mut voronoi = ClippedVoronoi::new();
        let sites = [
            DVec2::new(-10.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(1000.0, 1000.0),
        ];
        let subdivision = voronoi.compute(&sites, Bounds::centered(50.0, 50.0));

        assert_eq!(subdivision.cells.len(), 4);
        assert!(subdivision.cells[3].halfedges.is_empty());
        assert_eq!(subdivision.shared_edge_count(), 3);
    }
}
