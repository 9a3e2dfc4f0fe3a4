//! Complete workflow demonstration for voronoi_terrain
//!
//! Run with `RUST_LOG=debug` to see per-round relaxation timings.

use voronoi_terrain::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== voronoi_terrain Complete Demo ===\n");

    // Step 1: Configure terrain
    println!("Step 1: Configuring terrain...");
    let config = TerrainConfigBuilder::new()
        .seed(12345)
        .size(512.0, 512.0)?
        .site_count(100)?
        .relax_rounds(4)?
        .build()?;

    println!("  Seed: {} (noise seed {})", config.seed, config.noise_seed);
    println!("  Domain: {} x {}", config.width, config.height);
    println!("  Sites: {}, relaxation rounds: {}", config.site_count, config.relax_rounds);
    println!("  Shrink: [{:.3}, {:.3})", config.shrink.min, config.shrink.max);

    // Step 2: Generate terrain
    println!("\nStep 2: Generating terrain...");
    let terrain = Terrain::generate(config)?;
    println!("  Generated {} areas", terrain.area_count());
    println!(
        "  Subdivision: {} vertices, {} edges ({} shared)",
        terrain.subdivision().vertices.len(),
        terrain.subdivision().edges.len(),
        terrain.subdivision().shared_edge_count()
    );

    // Step 3: Analyze areas
    println!("\nStep 3: Area statistics:");
    let areas = terrain.areas();
    let total_neighbors: usize = areas.values().map(Area::neighbor_count).sum();
    let total_vertices: usize = areas.values().map(Area::vertex_count).sum();
    let (lowest, highest) = areas.values().fold((f64::MAX, f64::MIN), |(lo, hi), a| {
        (lo.min(a.height()), hi.max(a.height()))
    });
    println!("  Average neighbors per area: {:.2}", total_neighbors as f64 / areas.len() as f64);
    println!("  Average corners per area: {:.2}", total_vertices as f64 / areas.len() as f64);
    println!("  Height range: {:.2} .. {:.2}", lowest, highest);

    // Step 4: River
    println!("\nStep 4: River:");
    println!("  {} steps through {:?}", terrain.river().len(), terrain.river());

    // Step 5: Spatial queries
    println!("\nStep 5: Spatial queries:");
    let origin = DVec2::ZERO;
    if let Some(id) = terrain.find_area_at(origin) {
        let area = terrain.area(id).ok_or(TerrainError::AreaNotFound(id))?;
        println!("  Position {} -> Area {} (height {:.2})", origin, id, area.height());
        println!("  Within 2 hops: {:?}", terrain.find_areas_within_hops(id, 2));
    }

    // Step 6: Mesh
    println!("\nStep 6: Mesh:");
    let mesh = terrain.mesh();
    println!("  Interior triangles: {}", mesh.interior.triangle_count());
    println!("  Corner triangles: {}", mesh.corners.triangle_count());
    println!("  Border triangles: {}", mesh.borders.triangle_count());

    let merged = mesh.merged();
    let mem = (merged.positions.len() * 12 + merged.normals.len() * 12 + merged.indices.len() * 4) as f32
        / 1024.0
        / 1024.0;
    println!("  Vertices: {}", merged.vertex_count());
    println!("  Memory: {:.2} MB", mem);

    println!("\n=== Demo Complete ===");
    Ok(())
}
