//! River carving
//!
//! A biased random walk over the area graph that drops every visited area
//! below sea level. The walk drifts toward +x but can step almost anywhere;
//! it is not a shortest path.

use rand::Rng;
use std::collections::BTreeMap;

use crate::area::Area;
use crate::config::RiverConfig;
use crate::height::HeightSampler;

/// Smallest step cap used when `RiverConfig::max_steps` is unset
const MIN_STEP_CAP: usize = 64;

/// Pick the area the river starts from
///
/// Areas whose center lies more than `h/2 - h/start_band_divisor` away from
/// the horizontal midline come first (lowest id wins among them); otherwise
/// the area with the smallest center x is used.
pub fn river_source(
    areas: &BTreeMap<usize, Area>,
    domain_height: f64,
    config: &RiverConfig,
) -> Option<usize> {
    let limit = domain_height / 2.0 - domain_height / config.start_band_divisor;

    areas
        .values()
        .map(|area| {
            let center = area.center();
            let rank = if center.y.abs() > limit {
                (0, f64::NEG_INFINITY)
            } else {
                (1, center.x)
            };
            (rank, area.id())
        })
        .min_by(|(a, _), (b, _)| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
        .map(|(_, id)| id)
}

/// Carve a river through `areas`, returning the visited area ids in order
///
/// # Algorithm
///
/// 1. Start at [`river_source`]
/// 2. Set the current area to `config.depth`
/// 3. Scan its neighbors in ascending id order, skipping any whose center is
///    further than `h/2 - h/walk_band_divisor` from the midline. A neighbor
///    becomes current if it lies further along +x than the current pick, or
///    otherwise with probability `config.wander_chance`
/// 4. Stop when the scan leaves the current area unchanged
///
/// The walk can revisit areas. A step cap (`config.max_steps`, or four per
/// area with a floor of 64) ends walks that never settle. An invalid
/// `config` carves nothing.
pub fn carve_river<H, R>(
    areas: &mut BTreeMap<usize, Area>,
    domain_height: f64,
    config: &RiverConfig,
    sampler: &H,
    rng: &mut R,
) -> Vec<usize>
where
    H: HeightSampler + ?Sized,
    R: Rng + ?Sized,
{
    if let Err(err) = config.validate() {
        log::warn!("not carving a river: {}", err);
        return Vec::new();
    }

    let Some(mut current) = river_source(areas, domain_height, config) else {
        return Vec::new();
    };

    let walk_limit = domain_height / 2.0 - domain_height / config.walk_band_divisor;
    let max_steps = config
        .max_steps
        .unwrap_or_else(|| (areas.len() * 4).max(MIN_STEP_CAP));
    let mut path = Vec::new();

    loop {
        let Some(area) = areas.get_mut(&current) else {
            break;
        };
        area.set_height(config.depth, sampler);
        path.push(current);

        if path.len() >= max_steps {
            log::debug!("river stopped at the {} step cap", max_steps);
            break;
        }

        let previous = current;
        let mut current_x = area.center().x;
        let candidates: Vec<usize> = area.neighbors().iter().copied().collect();

        for neighbor_id in candidates {
            let Some(neighbor) = areas.get(&neighbor_id) else {
                continue;
            };
            let center = neighbor.center();
            if center.y.abs() > walk_limit {
                continue;
            }

            if center.x > current_x || rng.gen_bool(config.wander_chance) {
                current = neighbor_id;
                current_x = center.x;
            }
        }

        if current == previous {
            break;
        }
    }

    log::debug!("carved river through {} areas", path.len());
    path
}
