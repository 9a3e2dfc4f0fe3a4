//! Terrain generation pipeline stages
//!
//! Scatters sites, relaxes them with Lloyd's algorithm, builds the area graph
//! from the final subdivision and carves a river through it.

mod areas;
mod lloyd;
mod river;
mod sites;

pub use areas::{build_areas, link};
pub use lloyd::{relax, relax_sites};
pub use river::{carve_river, river_source};
pub use sites::scatter_sites;
