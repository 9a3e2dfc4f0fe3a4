//! Voronoi-based terrain mesh generation
//!
//! A standalone library for generating seamless polygonal terrain from relaxed
//! Voronoi cells, suitable for use with any game engine (Bevy, Godot, etc.)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_terrain::*;
//!
//! // Generate a terrain
//! let config = TerrainConfigBuilder::new()
//!     .seed(42)
//!     .size(512.0, 512.0).unwrap()
//!     .site_count(100).unwrap()
//!     .relax_rounds(4).unwrap()
//!     .build().unwrap();
//!
//! let terrain = Terrain::generate(config).unwrap();
//!
//! // One buffer for rendering
//! let mesh = terrain.mesh().merged();
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! # Pipeline
//!
//! 1. Scatter sites and relax them with Lloyd's algorithm
//! 2. Stamp an identity on every vertex of the final subdivision
//! 3. Build one shrunk, noise-elevated area per cell and link neighbors
//! 4. Carve a river through the area graph
//! 5. Stitch interior fans, corner triangles and border bridges
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-area lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and polygons

// Modules
pub mod area;
pub mod config;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod height;
pub mod mesh;
pub mod subdivision;
pub mod terrain;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use area::Area;
pub use config::{NoiseLayer, RiverConfig, ShrinkRange, TerrainConfig, TerrainConfigBuilder};
pub use error::{Result, TerrainError};
pub use geometry::{Polygon, PolygonPoint};
pub use height::{HeightSampler, NoiseHeightSampler};
pub use mesh::{stitch, MeshData, TerrainMesh};
pub use subdivision::{Bounds, ClippedVoronoi, PlanarSubdivider, Subdivision};
pub use terrain::Terrain;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
