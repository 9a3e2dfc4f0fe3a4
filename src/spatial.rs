//! Spatial indexing for fast position-to-area lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for planar queries
///
/// Maps a position in the domain to the area whose site is nearest, which is
/// the area whose unshrunk cell contains the position.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    ids: Vec<usize>,
}

impl SpatialIndex {
    /// Build spatial index from `(area id, site)` pairs
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_terrain::SpatialIndex;
    /// use glam::DVec2;
    ///
    /// let index = SpatialIndex::new(&[
    ///     (4, DVec2::new(-10.0, 0.0)),
    ///     (9, DVec2::new(10.0, 0.0)),
    /// ]);
    ///
    /// assert_eq!(index.find_nearest(DVec2::new(8.0, 3.0)), Some(9));
    /// ```
    pub fn new(sites: &[(usize, DVec2)]) -> Self {
        let points: Vec<[f64; 2]> = sites.iter().map(|(_, site)| site.to_array()).collect();
        let tree = (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points));

        Self {
            tree,
            ids: sites.iter().map(|(id, _)| *id).collect(),
        }
    }

    /// Id of the area whose site is closest to `position`
    ///
    /// Returns `None` only for an empty index.
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        self.ids.get(result.item).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
