//! Circular board geometry: Inner Zone, Outer Band, and clamping

use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// Base movement and strike distance ("hand span")
pub const HAND_SPAN: f64 = 150.0;

/// Radius of the Inner Zone in the reference board
pub const INNER_RADIUS: f64 = 300.0;

/// Width of the Outer Band in the reference board
pub const BAND_WIDTH: f64 = HAND_SPAN;

/// Which concentric region a point lies in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Inner,
    OuterBand,
    Outside,
}

/// Immutable board description
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub center: Vec2,
    pub inner_radius: f64,
    pub band_width: f64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Vec2::ZERO, INNER_RADIUS, BAND_WIDTH)
    }
}

impl Board {
    pub const fn new(center: Vec2, inner_radius: f64, band_width: f64) -> Self {
        Self {
            center,
            inner_radius,
            band_width,
        }
    }

    /// Outer edge of the playable area
    pub fn outer_radius(&self) -> f64 {
        self.inner_radius + self.band_width
    }

    pub fn distance_to_center(&self, point: Vec2) -> f64 {
        point.distance_to(self.center)
    }

    /// Classify a point against the two playable regions
    pub fn zone_of(&self, point: Vec2) -> Zone {
        let d = self.distance_to_center(point);
        if d <= self.inner_radius {
            Zone::Inner
        } else if d <= self.outer_radius() {
            Zone::OuterBand
        } else {
            Zone::Outside
        }
    }

    pub fn in_inner_zone(&self, point: Vec2) -> bool {
        self.zone_of(point) == Zone::Inner
    }

    pub fn in_outer_band(&self, point: Vec2) -> bool {
        self.zone_of(point) == Zone::OuterBand
    }

    /// Project `point` radially onto the disc of `radius` around the center
    pub fn clamp_to_radius(&self, point: Vec2, radius: f64) -> Vec2 {
        let offset = point - self.center;
        let d = offset.length();
        if d <= radius {
            return point;
        }
        self.center + offset.normalize().scale(radius.max(0.0))
    }

    /// Legal area for the evader: the Inner Zone inset by its size
    pub fn clamp_evader(&self, point: Vec2, size: f64) -> Vec2 {
        self.clamp_to_radius(point, self.inner_radius - size)
    }

    /// Legal area for a hunter: Inner Zone plus Outer Band
    pub fn clamp_hunter(&self, point: Vec2) -> Vec2 {
        self.clamp_to_radius(point, self.outer_radius())
    }

    /// Point at `angle` radians and `radius` from the center
    pub fn point_at(&self, angle: f64, radius: f64) -> Vec2 {
        self.center + Vec2::from_angle(angle).scale(radius)
    }

    /// All parameters are finite and the regions are non-empty
    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.inner_radius.is_finite()
            && self.band_width.is_finite()
            && self.inner_radius > 0.0
            && self.band_width >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_classification() {
        let board = Board::default();
        assert_eq!(board.zone_of(Vec2::new(0.0, 0.0)), Zone::Inner);
        assert_eq!(board.zone_of(Vec2::new(300.0, 0.0)), Zone::Inner);
        assert_eq!(board.zone_of(Vec2::new(300.5, 0.0)), Zone::OuterBand);
        assert_eq!(board.zone_of(Vec2::new(0.0, -450.0)), Zone::OuterBand);
        assert_eq!(board.zone_of(Vec2::new(0.0, 451.0)), Zone::Outside);
    }

    #[test]
    fn test_offset_center() {
        let board = Board::new(Vec2::new(400.0, 400.0), 300.0, 150.0);
        assert_eq!(board.outer_radius(), 450.0);
        assert!(board.in_inner_zone(Vec2::new(400.0, 100.0)));
        assert!(board.in_outer_band(Vec2::new(400.0, 40.0)));
    }

    #[test]
    fn test_clamping() {
        let board = Board::default();
        let clamped = board.clamp_evader(Vec2::new(500.0, 0.0), 30.0);
        assert!((clamped.x - 270.0).abs() < 1e-9);
        assert_eq!(clamped.y, 0.0);

        let hunter = board.clamp_hunter(Vec2::new(0.0, -900.0));
        assert!((hunter.y + 450.0).abs() < 1e-9);

        let inside = Vec2::new(10.0, 10.0);
        assert_eq!(board.clamp_hunter(inside), inside);
    }
}
