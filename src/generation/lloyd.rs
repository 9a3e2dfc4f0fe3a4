//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation evens out cell sizes by repeatedly moving each site to
//! the centroid of its cell and recomputing the subdivision.

use glam::DVec2;
use std::time::Instant;

use crate::geometry::centroid;
use crate::subdivision::{Bounds, PlanarSubdivider, Subdivision};

/// Compute the subdivision of `sites` and relax it for a fixed number of rounds
///
/// # Algorithm
///
/// 1. Compute the subdivision of the current sites
/// 2. Replace every site with the centroid of its cell (half-edge order ring)
/// 3. Recycle the old subdivision and recompute
///
/// Every round runs, even if the sites barely moved. `rounds = 0` returns the
/// subdivision of the input sites unchanged.
///
/// # Arguments
///
/// * `subdivider` - Subdivision service, reused across rounds
/// * `sites` - Initial site distribution
/// * `bounds` - Domain rectangle
/// * `rounds` - Number of relaxation rounds (typically 2-4)
///
/// # Returns
///
/// The subdivision of the relaxed sites
pub fn relax<S>(subdivider: &mut S, sites: &[DVec2], bounds: Bounds, rounds: usize) -> Subdivision
where
    S: PlanarSubdivider + ?Sized,
{
    let total_start = Instant::now();
    let mut subdivision = subdivider.compute(sites, bounds);

    for round in 0..rounds {
        let round_start = Instant::now();

        let (next_sites, max_displacement) = relax_sites(&subdivision);
        subdivider.recycle(subdivision);
        subdivision = subdivider.compute(&next_sites, bounds);

        log::debug!(
            "[Lloyd] Round {}: {} sites, max_disp={:.4}, took {:?}",
            round + 1,
            next_sites.len(),
            max_displacement,
            round_start.elapsed()
        );
    }

    log::debug!(
        "[Lloyd] Finished: {} rounds over {} sites in {:?}",
        rounds,
        sites.len(),
        total_start.elapsed()
    );

    subdivision
}

/// Centroids of every cell, plus the largest distance any site moved
///
/// A cell with fewer than 3 boundary points keeps its previous site.
pub fn relax_sites(subdivision: &Subdivision) -> (Vec<DVec2>, f64) {
    let mut max_displacement: f64 = 0.0;

    let sites = subdivision
        .cells
        .iter()
        .map(|cell| {
            let ring = subdivision.cell_ring(cell);
            if ring.len() < 3 {
                log::trace!("keeping site {} of degenerate cell", cell.site_id);
                return cell.site;
            }

            let next = centroid(&ring).unwrap_or(cell.site);
            max_displacement = max_displacement.max(next.distance(cell.site));
            next
        })
        .collect();

    (sites, max_displacement)
}
