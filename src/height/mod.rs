//! Elevation sampling
//!
//! Provides the trait the area builder and river carver use to turn planar
//! positions into heights, and a default implementation over 2D coherent noise.

use glam::DVec2;
use noise::{NoiseFn, Simplex};

use crate::config::{NoiseLayer, TerrainConfig};

/// Trait for sampling elevation over the planar domain
pub trait HeightSampler {
    /// Base elevation of an area, sampled once at its site
    fn base_height(&self, site: DVec2) -> f64;

    /// Elevation of one boundary corner of an area whose height is `height`
    ///
    /// Called again for every corner whenever the area's height changes.
    fn point_elevation(&self, height: f64, point: DVec2) -> f64;
}

/// Default sampler: coarse noise per area plus fine roughness per corner
///
/// Both layers read the same noise field at different frequencies:
///
/// - base: `base_elevation + noise(site / base.scale) * base.amplitude`
/// - corner: `height + noise(point / roughness.scale) * roughness.amplitude`
///
/// # Example
///
/// ```
/// use voronoi_terrain::*;
/// use glam::DVec2;
///
/// let sampler = NoiseHeightSampler::new(42);
/// let h = sampler.base_height(DVec2::new(10.0, -20.0));
/// assert!(h.abs() <= NoiseLayer::BASE.amplitude * 1.1);
/// ```
#[derive(Debug, Clone)]
pub struct NoiseHeightSampler<N = Simplex> {
    noise: N,
    /// Per-area layer
    pub base: NoiseLayer,
    /// Per-corner layer
    pub roughness: NoiseLayer,
    /// Constant offset for every base height
    pub base_elevation: f64,
}

impl NoiseHeightSampler<Simplex> {
    /// Create a sampler with the default layers and the given noise seed
    pub fn new(seed: u32) -> Self {
        Self::with_noise(Simplex::new(seed), NoiseLayer::BASE, NoiseLayer::ROUGHNESS, 0.0)
    }

    /// Create a sampler from the noise section of a terrain configuration
    pub fn from_config(config: &TerrainConfig) -> Self {
        Self::with_noise(
            Simplex::new(config.noise_seed),
            config.base_noise,
            config.roughness_noise,
            config.base_elevation,
        )
    }
}

impl<N> NoiseHeightSampler<N> {
    /// Create a sampler over any 2D noise function
    pub fn with_noise(noise: N, base: NoiseLayer, roughness: NoiseLayer, base_elevation: f64) -> Self {
        Self {
            noise,
            base,
            roughness,
            base_elevation,
        }
    }
}

/// Sample one layer; a zero-amplitude layer never touches the noise field
#[inline]
fn sample_layer<N: NoiseFn<f64, 2>>(noise: &N, layer: &NoiseLayer, point: DVec2) -> f64 {
    if layer.amplitude == 0.0 {
        return 0.0;
    }
    noise.get([point.x / layer.scale.x, point.y / layer.scale.y]) * layer.amplitude
}

impl<N: NoiseFn<f64, 2>> HeightSampler for NoiseHeightSampler<N> {
    fn base_height(&self, site: DVec2) -> f64 {
        self.base_elevation + sample_layer(&self.noise, &self.base, site)
    }

    fn point_elevation(&self, height: f64, point: DVec2) -> f64 {
        height + sample_layer(&self.noise, &self.roughness, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Constant;

    #[test]
    fn test_flat_layers_return_base_elevation() {
        let sampler = NoiseHeightSampler::with_noise(
            Simplex::new(1),
            NoiseLayer::FLAT,
            NoiseLayer::FLAT,
            7.5,
        );

        for site in [DVec2::ZERO, DVec2::new(123.0, -45.0), DVec2::new(-300.0, 300.0)] {
            assert_eq!(sampler.base_height(site), 7.5);
            assert_eq!(sampler.point_elevation(-32.0, site), -32.0);
        }
    }

    #[test]
    fn test_layers_scale_noise() {
        let sampler = NoiseHeightSampler::with_noise(
            Constant::new(0.5),
            NoiseLayer::new(400.0, 400.0, 24.0),
            NoiseLayer::new(2048.0, 1024.0, 96.0),
            1.0,
        );

        assert_eq!(sampler.base_height(DVec2::new(10.0, 10.0)), 1.0 + 12.0);
        assert_eq!(sampler.point_elevation(-32.0, DVec2::new(10.0, 10.0)), -32.0 + 48.0);
    }

    #[test]
    fn test_noise_determinism() {
        let a = NoiseHeightSampler::new(123);
        let b = NoiseHeightSampler::new(123);
        let site = DVec2::new(57.0, -211.0);

        assert_eq!(a.base_height(site), b.base_height(site));
        assert_eq!(a.point_elevation(3.0, site), b.point_elevation(3.0, site));
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let sampler = NoiseHeightSampler::new(9);
        for i in 0..200 {
            let site = DVec2::new(i as f64 * 13.7 - 1000.0, i as f64 * -7.3 + 500.0);
            let base = sampler.base_height(site);
            assert!(base.abs() <= 24.0 * 1.1, "base height {} out of range", base);

            let corner = sampler.point_elevation(0.0, site);
            assert!(corner.abs() <= 96.0 * 1.1, "corner height {} out of range", corner);
        }
    }

    #[test]
    fn test_from_config_uses_noise_seed() {
        let config = crate::TerrainConfigBuilder::new()
            .seed(1)
            .noise_seed(2)
            .base_elevation(4.0)
            .build()
            .unwrap();
        let from_config = NoiseHeightSampler::from_config(&config);
        let manual = NoiseHeightSampler::with_noise(
            Simplex::new(2),
            config.base_noise,
            config.roughness_noise,
            4.0,
        );
        let site = DVec2::new(91.0, 17.0);
        assert_eq!(from_config.base_height(site), manual.base_height(site));
    }
}
