//! Terrain Configuration and Builder
//!
//! This module provides configuration types for deterministic terrain generation.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::subdivision::Bounds;

/// Upper bound on relaxation rounds
const MAX_RELAX_ROUNDS: usize = 20;

/// One layer of 2D coherent noise
///
/// A sample at `(x, y)` is `noise2D(x / scale.x, y / scale.y) * amplitude`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseLayer {
    /// Divisor applied to each planar coordinate before sampling (larger = smoother)
    pub scale: DVec2,
    /// Output multiplier (0 disables the layer)
    pub amplitude: f64,
}

impl NoiseLayer {
    pub const fn new(scale_x: f64, scale_y: f64, amplitude: f64) -> Self {
        Self {
            scale: DVec2::new(scale_x, scale_y),
            amplitude,
        }
    }

    /// Coarse per-area elevation
    pub const BASE: NoiseLayer = NoiseLayer::new(400.0, 400.0, 24.0);

    /// Fine per-corner roughness
    pub const ROUGHNESS: NoiseLayer = NoiseLayer::new(2048.0, 1024.0, 96.0);

    /// A layer that always contributes zero
    pub const FLAT: NoiseLayer = NoiseLayer::new(1.0, 1.0, 0.0);

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.scale.x > 0.0 && self.scale.y > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "{} noise scale must be positive (got {:?})",
                name, self.scale
            )));
        }
        if !self.amplitude.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "{} noise amplitude must be finite (got {})",
                name, self.amplitude
            )));
        }
        Ok(())
    }
}

/// Range of the per-area shrink amount `u`
///
/// Each area is scaled toward its centroid by `1 - u`, with `u` drawn
/// uniformly from `[min, max)`. Equal bounds give a fixed shrink.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrinkRange {
    pub min: f64,
    pub max: f64,
}

impl ShrinkRange {
    /// No shrink at all: neighbouring areas touch and the stitch triangles collapse
    pub const NONE: ShrinkRange = ShrinkRange { min: 0.0, max: 0.0 };

    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&min) || !(min..1.0).contains(&max) {
            return Err(TerrainError::InvalidConfig(format!(
                "shrink range must satisfy 0 <= min <= max < 1 (got {}..{})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }
}

impl Default for ShrinkRange {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 0.1 + 1.0 / 1.5,
        }
    }
}

/// Parameters of the river walk
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiverConfig {
    /// Height assigned to every area on the river path (below sea level)
    pub depth: f64,
    /// Areas with `|center.y| > h/2 - h/start_band_divisor` are preferred as the source
    pub start_band_divisor: f64,
    /// Neighbours with `|center.y| > h/2 - h/walk_band_divisor` are never entered
    pub walk_band_divisor: f64,
    /// Chance of stepping to a neighbour that does not lie further along +x
    pub wander_chance: f64,
    /// Hard cap on walk steps; `None` derives one from the area count
    pub max_steps: Option<usize>,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            depth: -32.0,
            start_band_divisor: 2.5,
            walk_band_divisor: 5.0,
            wander_chance: 0.9,
            max_steps: None,
        }
    }
}

impl RiverConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.wander_chance) {
            return Err(TerrainError::InvalidConfig(format!(
                "river wander chance must be within [0, 1] (got {})",
                self.wander_chance
            )));
        }
        if !(self.start_band_divisor > 0.0 && self.walk_band_divisor > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "river band divisors must be positive (got {} and {})",
                self.start_band_divisor, self.walk_band_divisor
            )));
        }
        if !self.depth.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "river depth must be finite (got {})",
                self.depth
            )));
        }
        Ok(())
    }
}

/// Configuration for deterministic terrain generation
///
/// The same configuration will always produce the identical terrain: one
/// seeded generator drives site scattering, area shrinking and the river walk,
/// and the noise field is seeded separately through `noise_seed`.
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::*;
///
/// let config = TerrainConfigBuilder::new()
///     .seed(42)
///     .size(512.0, 512.0)
///     .unwrap()
///     .site_count(100)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.noise_seed, 42);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainConfig {
    /// Random seed for sites, shrink factors and river branching
    pub seed: u32,

    /// Seed for the coherent noise field (separate from the layout seed)
    pub noise_seed: u32,

    /// Domain width (x extent, centered on the origin)
    pub width: f64,

    /// Domain height (y extent, centered on the origin)
    pub height: f64,

    /// Number of scattered sites (one area per site)
    pub site_count: usize,

    /// Number of Lloyd relaxation rounds
    ///
    /// Every round runs; there is no convergence check.
    pub relax_rounds: usize,

    /// Per-area base elevation noise
    pub base_noise: NoiseLayer,

    /// Per-corner roughness noise
    pub roughness_noise: NoiseLayer,

    /// Constant added to every base elevation
    pub base_elevation: f64,

    /// Per-area shrink range
    pub shrink: ShrinkRange,

    /// River carving parameters (`None` leaves heights untouched)
    pub river: Option<RiverConfig>,
}

impl TerrainConfig {
    /// Bounding rectangle of the domain, centered on the origin
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.width, self.height)
    }

    /// Check every field, including the ones the builder cannot reject early
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first offending field
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) || !(self.width.is_finite() && self.height.is_finite()) {
            return Err(TerrainError::InvalidConfig(format!(
                "domain size must be positive and finite (got {} x {})",
                self.width, self.height
            )));
        }
        if self.relax_rounds > MAX_RELAX_ROUNDS {
            return Err(TerrainError::InvalidConfig(format!(
                "relaxation rounds must be <= {} (got {})",
                MAX_RELAX_ROUNDS, self.relax_rounds
            )));
        }
        self.base_noise.validate("base")?;
        self.roughness_noise.validate("roughness")?;
        ShrinkRange::new(self.shrink.min, self.shrink.max)?;
        if let Some(river) = &self.river {
            river.validate()?;
        }
        Ok(())
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            noise_seed: 0,
            width: 512.0,
            height: 512.0,
            site_count: 100,
            relax_rounds: 4,
            base_noise: NoiseLayer::BASE,
            roughness_noise: NoiseLayer::ROUGHNESS,
            base_elevation: 0.0,
            shrink: ShrinkRange::default(),
            river: Some(RiverConfig::default()),
        }
    }
}

/// Builder for creating TerrainConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::*;
///
/// let config = TerrainConfigBuilder::new()
///     .seed(7)
///     .relax_rounds(2)
///     .unwrap()
///     .shrink(ShrinkRange::new(0.2, 0.4).unwrap())
///     .without_river()
///     .build()
///     .unwrap();
///
/// assert!(config.river.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TerrainConfigBuilder {
    seed: Option<u32>,
    noise_seed: Option<u32>,
    config: TerrainConfig,
}

impl TerrainConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - noise_seed: Same as seed
    /// - domain: 512 x 512, 100 sites, 4 relaxation rounds
    /// - noise: base `(400, 400) * 24`, roughness `(2048, 1024) * 96`
    /// - shrink: `[0.1, 0.767)`
    /// - river: enabled with depth -32
    pub fn new() -> Self {
        Self {
            seed: None,
            noise_seed: None,
            config: TerrainConfig::default(),
        }
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set a separate noise seed
    ///
    /// Allows the same cell layout with different elevation.
    pub fn noise_seed(mut self, seed: u32) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    /// Set the domain size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive
    pub fn size(mut self, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "domain size must be positive (got {} x {})",
                width, height
            )));
        }
        self.config.width = width;
        self.config.height = height;
        Ok(self)
    }

    /// Set the number of sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0
    pub fn site_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(TerrainError::InvalidConfig(
                "site count must be at least 1".to_string(),
            ));
        }
        self.config.site_count = count;
        Ok(self)
    }

    /// Set the number of relaxation rounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if rounds > 20 (excessive and impractical)
    pub fn relax_rounds(mut self, rounds: usize) -> Result<Self> {
        if rounds > MAX_RELAX_ROUNDS {
            return Err(TerrainError::InvalidConfig(format!(
                "relaxation rounds must be <= {} (got {})",
                MAX_RELAX_ROUNDS, rounds
            )));
        }
        self.config.relax_rounds = rounds;
        Ok(self)
    }

    pub fn base_noise(mut self, layer: NoiseLayer) -> Self {
        self.config.base_noise = layer;
        self
    }

    pub fn roughness_noise(mut self, layer: NoiseLayer) -> Self {
        self.config.roughness_noise = layer;
        self
    }

    /// Disable both noise layers, leaving every height at `base_elevation`
    pub fn flat(self) -> Self {
        self.base_noise(NoiseLayer::FLAT)
            .roughness_noise(NoiseLayer::FLAT)
    }

    pub fn base_elevation(mut self, elevation: f64) -> Self {
        self.config.base_elevation = elevation;
        self
    }

    pub fn shrink(mut self, shrink: ShrinkRange) -> Self {
        self.config.shrink = shrink;
        self
    }

    pub fn river(mut self, river: RiverConfig) -> Self {
        self.config.river = Some(river);
        self
    }

    pub fn without_river(mut self) -> Self {
        self.config.river = None;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a noise layer or the river parameters are invalid
    pub fn build(self) -> Result<TerrainConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let noise_seed = self.noise_seed.unwrap_or(seed);

        let config = TerrainConfig {
            seed,
            noise_seed,
            ..self.config
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for TerrainConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = TerrainConfigBuilder::new().build().unwrap();
        assert_eq!(config.width, 512.0);
        assert_eq!(config.height, 512.0);
        assert_eq!(config.site_count, 100);
        assert_eq!(config.relax_rounds, 4);
        assert_eq!(config.base_noise, NoiseLayer::BASE);
        assert_eq!(config.roughness_noise, NoiseLayer::ROUGHNESS);
        assert_eq!(config.river, Some(RiverConfig::default()));
        assert_eq!(config.noise_seed, config.seed);
    }

    #[test]
    fn test_builder_custom() {
        let config = TerrainConfigBuilder::new()
            .seed(42)
            .noise_seed(99)
            .size(256.0, 128.0)
            .unwrap()
            .site_count(9)
            .unwrap()
            .relax_rounds(0)
            .unwrap()
            .base_elevation(3.0)
            .flat()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.noise_seed, 99);
        assert_eq!(config.width, 256.0);
        assert_eq!(config.height, 128.0);
        assert_eq!(config.site_count, 9);
        assert_eq!(config.relax_rounds, 0);
        assert_eq!(config.base_elevation, 3.0);
        assert_eq!(config.base_noise.amplitude, 0.0);
        assert_eq!(config.roughness_noise.amplitude, 0.0);
    }

    #[test]
    fn test_bounds_are_centered() {
        let config = TerrainConfigBuilder::new()
            .size(200.0, 100.0)
            .unwrap()
            .build()
            .unwrap();
        let bounds = config.bounds();
        assert_eq!(bounds.xl, -100.0);
        assert_eq!(bounds.xr, 100.0);
        assert_eq!(bounds.yt, -50.0);
        assert_eq!(bounds.yb, 50.0);
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(TerrainConfigBuilder::new().size(0.0, 10.0).is_err());
        assert!(TerrainConfigBuilder::new().size(10.0, -1.0).is_err());
        assert!(TerrainConfigBuilder::new().site_count(0).is_err());
        assert!(TerrainConfigBuilder::new().relax_rounds(21).is_err());

        let bad_noise = TerrainConfigBuilder::new()
            .base_noise(NoiseLayer::new(0.0, 1.0, 1.0))
            .build();
        assert!(bad_noise.is_err());

        let bad_river = TerrainConfigBuilder::new()
            .river(RiverConfig {
                wander_chance: 1.5,
                ..Default::default()
            })
            .build();
        assert!(bad_river.is_err());
    }

    #[test]
    fn test_validate_catches_hand_built_config() {
        assert!(TerrainConfig::default().validate().is_ok());

        let config = TerrainConfig {
            shrink: ShrinkRange { min: 0.5, max: 0.2 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig(_))));

        let config = TerrainConfig {
            width: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TerrainConfig {
            relax_rounds: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_river_validation_rejects_non_finite_values() {
        assert!(RiverConfig::default().validate().is_ok());

        let nan_band = RiverConfig {
            start_band_divisor: f64::NAN,
            ..Default::default()
        };
        assert!(nan_band.validate().is_err());

        let nan_walk = RiverConfig {
            walk_band_divisor: f64::NAN,
            ..Default::default()
        };
        assert!(nan_walk.validate().is_err());

        for depth in [f64::NAN, f64::NEG_INFINITY] {
            let config = RiverConfig {
                depth,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig(_))));
        }

        let wander = RiverConfig {
            wander_chance: f64::NAN,
            ..Default::default()
        };
        assert!(wander.validate().is_err());

        let config = TerrainConfig {
            river: Some(nan_band),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shrink_range_validation() {
        assert!(ShrinkRange::new(0.1, 0.5).is_ok());
        assert!(ShrinkRange::new(0.3, 0.3).is_ok());
        assert!(ShrinkRange::new(0.5, 0.1).is_err());
        assert!(ShrinkRange::new(-0.1, 0.5).is_err());
        assert!(ShrinkRange::new(0.1, 1.0).is_err());

        let default = ShrinkRange::default();
        assert!((default.max - 0.7667).abs() < 0.001);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = TerrainConfigBuilder::new().seed(12345).build().unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: TerrainConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
