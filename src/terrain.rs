//! Terrain main structure

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::area::Area;
use crate::config::TerrainConfig;
use crate::error::{Result, TerrainError};
use crate::generation::{build_areas, carve_river, relax, scatter_sites};
use crate::height::{HeightSampler, NoiseHeightSampler};
use crate::mesh::{stitch, TerrainMesh};
use crate::subdivision::{ClippedVoronoi, PlanarSubdivider, Subdivision};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A complete generated terrain
///
/// Owns everything the pipeline produces: the relaxed sites, the final
/// subdivision, the area graph (with the carved river already applied) and
/// the stitched mesh. Nothing is regenerated after construction.
///
/// # Examples
///
/// ```
/// use voronoi_terrain::*;
///
/// let config = TerrainConfigBuilder::new()
///     .seed(42)
///     .site_count(50)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let terrain = Terrain::generate(config).unwrap();
/// println!("Generated {} areas", terrain.area_count());
///
/// if let Some(area) = terrain.area(0) {
///     println!("Area 0 height: {}", area.height());
/// }
/// ```
#[derive(Clone)]
pub struct Terrain {
    /// Configuration used to generate this terrain
    config: TerrainConfig,

    /// Sites after relaxation, indexed by area id
    sites: Vec<DVec2>,

    /// Final stamped subdivision
    subdivision: Subdivision,

    /// All areas keyed by id
    areas: BTreeMap<usize, Area>,

    /// Area ids visited by the river, in walk order
    river: Vec<usize>,

    mesh: TerrainMesh,

    /// Spatial index for fast position-to-area lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Terrain {
    /// Generate a terrain from scattered sites and simplex noise
    ///
    /// This is the most common way to create a terrain. One generator seeded
    /// from `config.seed` scatters the sites, then drives shrinking and the
    /// river walk.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_terrain::*;
    ///
    /// let config = TerrainConfigBuilder::new()
    ///     .seed(12345)
    ///     .site_count(40)
    ///     .unwrap()
    ///     .relax_rounds(2)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let terrain = Terrain::generate(config).unwrap();
    /// assert_eq!(terrain.area_count(), 40);
    /// ```
    pub fn generate(config: TerrainConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = rng_for(&config);
        let sites = scatter_sites(config.site_count, &config.bounds(), &mut rng);
        let sampler = NoiseHeightSampler::from_config(&config);

        Self::build(config, &sites, &sampler, &mut ClippedVoronoi::new(), &mut rng)
    }

    /// Generate a terrain from caller-provided sites
    ///
    /// `config.site_count` is ignored; there is one area per site.
    pub fn from_sites(config: TerrainConfig, sites: &[DVec2]) -> Result<Self> {
        let sampler = NoiseHeightSampler::from_config(&config);
        Self::generate_with(config, sites, &sampler, &mut ClippedVoronoi::new())
    }

    /// Generate a terrain with a custom height sampler and subdivision service
    ///
    /// # Type Parameters
    ///
    /// * `H` - Elevation source for area heights and corner roughness
    /// * `S` - Planar subdivision service driven by the relaxer
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an invalid configuration and
    /// `GenerationFailed` if no site produced an area.
    pub fn generate_with<H, S>(
        config: TerrainConfig,
        sites: &[DVec2],
        sampler: &H,
        subdivider: &mut S,
    ) -> Result<Self>
    where
        H: HeightSampler + ?Sized,
        S: PlanarSubdivider + ?Sized,
    {
        config.validate()?;
        let mut rng = rng_for(&config);
        Self::build(config, sites, sampler, subdivider, &mut rng)
    }

    fn build<H, S>(
        config: TerrainConfig,
        sites: &[DVec2],
        sampler: &H,
        subdivider: &mut S,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self>
    where
        H: HeightSampler + ?Sized,
        S: PlanarSubdivider + ?Sized,
    {
        let start = Instant::now();
        let bounds = config.bounds();

        let mut subdivision = relax(subdivider, sites, bounds, config.relax_rounds);
        subdivision.assign_vertex_ids();

        let mut areas = build_areas(&subdivision, sampler, config.shrink, rng)?;
        if areas.is_empty() {
            return Err(TerrainError::GenerationFailed(format!(
                "no area could be built from {} sites",
                sites.len()
            )));
        }
        log::debug!(
            "built {} areas over {} shared edges",
            areas.len(),
            subdivision.shared_edge_count()
        );

        let river = match &config.river {
            Some(river_config) => carve_river(&mut areas, bounds.height(), river_config, sampler, rng),
            None => Vec::new(),
        };

        let mesh = stitch(&subdivision, &areas);
        let relaxed_sites = subdivision.cells.iter().map(|cell| cell.site).collect();

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let entries: Vec<(usize, DVec2)> = areas.values().map(|a| (a.id(), a.site())).collect();
            SpatialIndex::new(&entries)
        };

        log::info!(
            "generated terrain: {} areas, river of {} steps, {} triangles in {:?}",
            areas.len(),
            river.len(),
            mesh.triangle_count(),
            start.elapsed()
        );

        Ok(Self {
            config,
            sites: relaxed_sites,
            subdivision,
            areas,
            river,
            mesh,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this terrain
    #[inline]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Relaxed sites, indexed by area id
    #[inline]
    pub fn sites(&self) -> &[DVec2] {
        &self.sites
    }

    /// The final subdivision, with vertex identities assigned
    #[inline]
    pub fn subdivision(&self) -> &Subdivision {
        &self.subdivision
    }

    #[inline]
    pub fn areas(&self) -> &BTreeMap<usize, Area> {
        &self.areas
    }

    /// Get an area by ID
    ///
    /// Returns `None` if no area has this id.
    #[inline]
    pub fn area(&self, id: usize) -> Option<&Area> {
        self.areas.get(&id)
    }

    #[inline]
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Get neighbor IDs for an area
    ///
    /// # Errors
    ///
    /// Returns `AreaNotFound` if no area has this id.
    pub fn neighbors(&self, id: usize) -> Result<&BTreeSet<usize>> {
        self.areas
            .get(&id)
            .map(Area::neighbors)
            .ok_or(TerrainError::AreaNotFound(id))
    }

    /// Area ids visited by the river in walk order (empty when carving is disabled)
    #[inline]
    pub fn river(&self) -> &[usize] {
        &self.river
    }

    /// Interior, corner and border triangle batches
    #[inline]
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// Find the area whose unshrunk cell contains a position
    ///
    /// Returns the area with the nearest site, or `None` for an empty terrain.
    /// Uses the KD-tree when the `spatial-index` feature is enabled.
    ///
    /// # Example
    ///
    /// ```
    /// # use voronoi_terrain::*;
    /// # let config = TerrainConfigBuilder::new().seed(1).site_count(20).unwrap().build().unwrap();
    /// # let terrain = Terrain::generate(config).unwrap();
    /// let site = terrain.area(3).unwrap().site();
    /// assert_eq!(terrain.find_area_at(site), Some(3));
    /// ```
    pub fn find_area_at(&self, position: DVec2) -> Option<usize> {
        #[cfg(feature = "spatial-index")]
        let nearest = self.spatial_index.find_nearest(position);

        #[cfg(not(feature = "spatial-index"))]
        let nearest = self
            .areas
            .values()
            .min_by(|a, b| {
                a.site()
                    .distance_squared(position)
                    .total_cmp(&b.site().distance_squared(position))
            })
            .map(Area::id);

        nearest
    }

    /// Find areas within a given hop count from a center area (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting area ID
    /// * `hops` - Maximum number of hops (0 = just the center area)
    ///
    /// # Returns
    ///
    /// Sorted area IDs within range, including the center.
    /// Returns an empty vec if `center_id` is unknown.
    pub fn find_areas_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if !self.areas.contains_key(&center_id) {
            return vec![];
        }

        let mut visited = BTreeSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for id in &current {
                let Some(area) = self.areas.get(id) else {
                    continue;
                };
                for &neighbor in area.neighbors() {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            current = next;
        }

        visited.into_iter().collect()
    }
}

fn rng_for(config: &TerrainConfig) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(u64::from(config.seed))
}
