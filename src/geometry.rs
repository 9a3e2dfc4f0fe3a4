//! Planar polygon utilities
//!
//! Centroid, winding and scale-toward-centroid helpers shared by the relaxer,
//! the area builder and the mesh stitcher.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Twice the signed area of a ring (positive when counter-clockwise)
fn doubled_signed_area<I>(ring: I) -> f64
where
    I: ExactSizeIterator<Item = DVec2> + Clone,
{
    let first = ring.clone().next();
    let next = ring.clone().skip(1).chain(first);
    ring.zip(next).map(|(a, b)| a.perp_dot(b)).sum()
}

/// Signed area of a polygon ring (positive when counter-clockwise)
pub fn signed_area(ring: &[DVec2]) -> f64 {
    doubled_signed_area(ring.iter().copied()) * 0.5
}

/// Area-weighted centroid of a polygon ring
///
/// Falls back to the vertex average for rings with (near) zero area.
/// Returns `None` for an empty ring.
pub fn centroid(ring: &[DVec2]) -> Option<DVec2> {
    if ring.is_empty() {
        return None;
    }

    let n = ring.len();
    let mut doubled_area = 0.0;
    let mut weighted = DVec2::ZERO;
    for i in 0..n {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % n];
        let cross = p1.perp_dot(p2);
        doubled_area += cross;
        weighted += (p1 + p2) * cross;
    }

    if doubled_area.abs() < 1e-9 {
        let sum: DVec2 = ring.iter().copied().sum();
        return Some(sum / n as f64);
    }

    Some(weighted / (3.0 * doubled_area))
}

/// A polygon corner carrying elevation and the identity of the subdivision vertex it came from
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonPoint {
    /// Planar position
    pub position: DVec2,
    /// Elevation
    pub z: f64,
    /// Vertex identity shared by every area touching this corner
    pub id: usize,
}

impl PolygonPoint {
    pub fn new(position: DVec2, id: usize) -> Self {
        Self {
            position,
            z: 0.0,
            id,
        }
    }

    /// Position in output space: `(x, elevation, y)`
    #[inline]
    pub fn to_world(&self) -> [f32; 3] {
        [self.position.x as f32, self.z as f32, self.position.y as f32]
    }
}

/// Closed ring of [`PolygonPoint`]s
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    points: Vec<PolygonPoint>,
}

impl Polygon {
    pub fn new(points: Vec<PolygonPoint>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[PolygonPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn positions(&self) -> impl ExactSizeIterator<Item = DVec2> + Clone + '_ {
        self.points.iter().map(|p| p.position)
    }

    pub fn signed_area(&self) -> f64 {
        doubled_signed_area(self.positions()) * 0.5
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() >= 0.0
    }

    /// Centroid of the planar footprint (origin for an empty polygon)
    pub fn center(&self) -> DVec2 {
        let ring: Vec<DVec2> = self.positions().collect();
        centroid(&ring).unwrap_or(DVec2::ZERO)
    }

    /// Reorder the ring counter-clockwise, keeping every point (and its id) intact
    pub fn rewind(&mut self) {
        if !self.is_counter_clockwise() {
            self.points.reverse();
        }
    }

    /// Scale every point toward the centroid by `factor`
    ///
    /// Only positions move; ids and elevations are untouched.
    pub fn scale(&mut self, factor: f64) {
        let center = self.center();
        for point in &mut self.points {
            point.position = center + (point.position - center) * factor;
        }
    }

    /// Set every point's elevation from its planar position
    pub fn set_elevations<F>(&mut self, mut elevation: F)
    where
        F: FnMut(DVec2) -> f64,
    {
        for point in &mut self.points {
            point.z = elevation(point.position);
        }
    }

    /// First point carrying the given vertex identity
    pub fn point_with_id(&self, id: usize) -> Option<&PolygonPoint> {
        self.points.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(clockwise: bool) -> Polygon {
        let mut corners = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        if clockwise {
            corners.reverse();
        }
        Polygon::new(
            corners
                .into_iter()
                .enumerate()
                .map(|(i, p)| PolygonPoint::new(p, 10 + i))
                .collect(),
        )
    }

    #[test]
    fn test_signed_area() {
        assert_eq!(square(false).signed_area(), 4.0);
        assert_eq!(square(true).signed_area(), -4.0);

        let ring = [DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0)];
        assert_eq!(signed_area(&ring), 0.5);
    }

    #[test]
    fn test_centroid() {
        let ring = [
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        let c = centroid(&ring).unwrap();
        assert!((c - DVec2::new(2.0, 1.0)).length() < 1e-12);

        assert_eq!(centroid(&[]), None);

        // Collinear ring falls back to the vertex average
        let line = [DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)];
        assert_eq!(centroid(&line), Some(DVec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_rewind_makes_counter_clockwise() {
        let mut polygon = square(true);
        assert!(!polygon.is_counter_clockwise());

        polygon.rewind();
        assert!(polygon.is_counter_clockwise());

        // Ids travel with their points
        for point in polygon.points() {
            let expected = match (point.position.x as i32, point.position.y as i32) {
                (0, 2) => 10,
                (2, 2) => 11,
                (2, 0) => 12,
                _ => 13,
            };
            assert_eq!(point.id, expected);
        }
    }

    #[test]
    fn test_scale_keeps_ids_and_center() {
        let mut polygon = square(false);
        let ids: Vec<usize> = polygon.points().iter().map(|p| p.id).collect();

        polygon.scale(0.5);

        let scaled_ids: Vec<usize> = polygon.points().iter().map(|p| p.id).collect();
        assert_eq!(ids, scaled_ids);
        assert!((polygon.center() - DVec2::new(1.0, 1.0)).length() < 1e-12);
        assert!((polygon.signed_area() - 1.0).abs() < 1e-12);
        assert_eq!(polygon.points()[0].position, DVec2::new(0.5, 0.5));
    }

    #[test]
    fn test_point_with_id() {
        let polygon = square(false);
        assert_eq!(polygon.point_with_id(12).unwrap().position, DVec2::new(2.0, 2.0));
        assert!(polygon.point_with_id(99).is_none());
    }

    #[test]
    fn test_to_world_swaps_axes() {
        let mut point = PolygonPoint::new(DVec2::new(1.0, 2.0), 0);
        point.z = 3.0;
        assert_eq!(point.to_world(), [1.0, 3.0, 2.0]);
    }
}
