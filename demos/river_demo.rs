//! Example: Print a terrain as an ASCII height map
//!
//! `~` marks river areas; digits bucket the remaining heights from low to high.

use voronoi_terrain::*;

const COLUMNS: usize = 72;
const ROWS: usize = 32;

fn main() -> Result<()> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(7);

    let config = TerrainConfigBuilder::new()
        .seed(seed)
        .size(640.0, 320.0)?
        .site_count(160)?
        .build()?;
    let terrain = Terrain::generate(config)?;

    let heights: Vec<f64> = terrain
        .areas()
        .values()
        .filter(|a| !terrain.river().contains(&a.id()))
        .map(Area::height)
        .collect();
    let low = heights.iter().copied().fold(f64::MAX, f64::min);
    let high = heights.iter().copied().fold(f64::MIN, f64::max);
    let span = (high - low).max(f64::EPSILON);

    println!("Seed {}: {} areas, river of {} steps", seed, terrain.area_count(), terrain.river().len());
    println!();

    let bounds = config.bounds();
    for row in 0..ROWS {
        let line: String = (0..COLUMNS)
            .map(|col| {
                let position = DVec2::new(
                    bounds.xl + (col as f64 + 0.5) / COLUMNS as f64 * bounds.width(),
                    bounds.yt + (row as f64 + 0.5) / ROWS as f64 * bounds.height(),
                );
                match terrain.find_area_at(position) {
                    Some(id) if terrain.river().contains(&id) => '~',
                    Some(id) => terrain
                        .area(id)
                        .map(|a| {
                            let bucket = ((a.height() - low) / span * 9.0).round() as u32;
                            char::from_digit(bucket.min(9), 10).unwrap_or('?')
                        })
                        .unwrap_or(' '),
                    None => ' ',
                }
            })
            .collect();
        println!("{}", line);
    }

    Ok(())
}
