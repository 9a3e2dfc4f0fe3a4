//! Random site distribution
//!
//! Sites are scattered uniformly over the domain; Lloyd's relaxation evens
//! them out afterwards.

use glam::DVec2;
use rand::Rng;

use crate::subdivision::Bounds;

/// Scatter `count` sites uniformly inside `bounds`
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::generation::scatter_sites;
/// use voronoi_terrain::subdivision::Bounds;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let sites = scatter_sites(100, &Bounds::centered(512.0, 512.0), &mut rng);
/// assert_eq!(sites.len(), 100);
/// ```
pub fn scatter_sites<R>(count: usize, bounds: &Bounds, rng: &mut R) -> Vec<DVec2>
where
    R: Rng + ?Sized,
{
    (0..count)
        .map(|_| {
            DVec2::new(
                bounds.xl + rng.gen::<f64>() * bounds.width(),
                bounds.yt + rng.gen::<f64>() * bounds.height(),
            )
        })
        .collect()
}
