//! Regular polygons and stars.
//!
//! Both are built by subdividing the full turn evenly, starting straight
//! up from the center (angle `-π/2` in screen coordinates).

use super::{ShapeTrait, bounds_of, closed_path};
use kurbo::{BezPath, Point, Rect};
use std::f64::consts::{FRAC_PI_2, PI};

/// Inner radius of a star as a fraction of its outer radius.
pub const STAR_INNER_RATIO: f64 = 0.5;

/// Point at `angle` on a circle around `center`.
fn polar(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// A regular polygon inscribed in a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularPolygon {
    pub center: Point,
    pub radius: f64,
    pub sides: u32,
}

impl RegularPolygon {
    pub const DEFAULT_SIDES: u32 = 5;
    pub const MIN_SIDES: u32 = 3;
    pub const MAX_SIDES: u32 = 20;

    pub fn new(center: Point, radius: f64, sides: u32) -> Self {
        Self {
            center,
            radius,
            sides: sides.clamp(Self::MIN_SIDES, Self::MAX_SIDES),
        }
    }

    /// Vertices in drawing order, the first one at the top.
    pub fn vertices(&self) -> Vec<Point> {
        let n = self.sides as f64;
        (0..self.sides)
            .map(|i| polar(self.center, self.radius, i as f64 * 2.0 * PI / n - FRAC_PI_2))
            .collect()
    }
}

impl ShapeTrait for RegularPolygon {
    fn bounds(&self) -> Rect {
        bounds_of(&self.vertices())
    }

    fn to_path(&self) -> BezPath {
        closed_path(&self.vertices())
    }
}

/// A star alternating between an outer and an inner radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub center: Point,
    /// Outer radius (tips).
    pub radius: f64,
    /// Number of tips.
    pub points: u32,
}

impl Star {
    pub const DEFAULT_POINTS: u32 = 5;
    pub const MIN_POINTS: u32 = 3;
    pub const MAX_POINTS: u32 = 20;

    pub fn new(center: Point, radius: f64, points: u32) -> Self {
        Self {
            center,
            radius,
            points: points.clamp(Self::MIN_POINTS, Self::MAX_POINTS),
        }
    }

    pub fn inner_radius(&self) -> f64 {
        self.radius * STAR_INNER_RATIO
    }

    /// `2 * points` vertices: tips on even indices, valleys on odd ones.
    pub fn vertices(&self) -> Vec<Point> {
        let n = self.points as f64;
        let inner = self.inner_radius();
        (0..self.points * 2)
            .map(|i| {
                let r = if i % 2 == 0 { self.radius } else { inner };
                polar(self.center, r, i as f64 * PI / n - FRAC_PI_2)
            })
            .collect()
    }
}

impl ShapeTrait for Star {
    fn bounds(&self) -> Rect {
        bounds_of(&self.vertices())
    }

    fn to_path(&self) -> BezPath {
        closed_path(&self.vertices())
    }
}
