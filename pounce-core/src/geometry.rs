//! 2D vector math for the continuous board

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point or displacement on the board
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance_to(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero for the zero vector
    pub fn normalize(self) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.x / len, self.y / len)
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }

    /// Linear interpolation, `t = 0` at `self`, `t = 1` at `other`
    #[inline]
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self + (other - self).scale(t)
    }

    /// Both coordinates are finite numbers
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Truncate the displacement from `self` to `target` to at most `max_len`
    pub fn step_toward(self, target: Vec2, max_len: f64) -> Vec2 {
        let delta = target - self;
        if delta.length() <= max_len {
            return target;
        }
        self + delta.normalize().scale(max_len)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

/// Inclusive point-in-triangle test using barycentric coordinates.
///
/// A degenerate triangle (collinear vertices) contains no point.
pub fn point_in_triangle(point: Vec2, [a, b, c]: [Vec2; 3]) -> bool {
    let denominator = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if denominator == 0.0 {
        return false;
    }
    let u = ((b.y - c.y) * (point.x - c.x) + (c.x - b.x) * (point.y - c.y)) / denominator;
    let v = ((c.y - a.y) * (point.x - c.x) + (a.x - c.x) * (point.y - c.y)) / denominator;
    let w = 1.0 - u - v;
    (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) && (0.0..=1.0).contains(&w)
}
