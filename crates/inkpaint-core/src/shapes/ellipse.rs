//! Circle and ellipse shapes.

use super::ShapeTrait;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};

/// A circle centered on the drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}

impl ShapeTrait for Circle {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(0.1)
    }
}

/// An axis-aligned ellipse centered on the drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x: radius_x.abs(),
            radius_y: radius_y.abs(),
        }
    }

    /// Radii are the horizontal and vertical drag distances.
    pub fn from_drag(start: Point, current: Point) -> Self {
        Self::new(start, current.x - start.x, current.y - start.y)
    }
}

impl ShapeTrait for Ellipse {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius_x * 2.0, self.radius_y * 2.0))
    }

    fn to_path(&self) -> BezPath {
        kurbo::Ellipse::new(self.center, Vec2::new(self.radius_x, self.radius_y), 0.0).to_path(0.1)
    }
}
