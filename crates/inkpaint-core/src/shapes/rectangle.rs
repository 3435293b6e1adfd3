//! Rectangle shape (and squares, which are rectangles with equal sides).

use super::ShapeTrait;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};

/// A rectangle anchored at the drag start.
///
/// Width and height are signed: dragging up or left gives negative
/// extents and the rectangle grows away from the origin in that direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Corner where the drag started.
    pub origin: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
}

impl Rectangle {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Rectangle spanned by a drag.
    pub fn from_drag(start: Point, current: Point) -> Self {
        Self::new(start, current.x - start.x, current.y - start.y)
    }

    /// Square spanned by a drag: the side is the larger of the two
    /// distances and each side keeps the direction of the drag.
    pub fn square_from_drag(start: Point, current: Point) -> Self {
        let dx = current.x - start.x;
        let dy = current.y - start.y;
        let side = dx.abs().max(dy.abs());
        Self::new(start, side * sign(dx), side * sign(dy))
    }

    /// Normalized kurbo rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(
            self.origin,
            Point::new(self.origin.x + self.width, self.origin.y + self.height),
        )
    }

    pub fn is_square(&self) -> bool {
        (self.width.abs() - self.height.abs()).abs() < 1e-9
    }
}

/// Sign that maps zero to zero.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl ShapeTrait for Rectangle {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }
}
