//! Straight line segment.

use super::ShapeTrait;
use kurbo::{BezPath, Point, Rect};

/// A line from the drag start to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl ShapeTrait for Line {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }
}
