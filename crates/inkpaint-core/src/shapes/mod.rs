//! Shape definitions for the shape modes of the editor.
//!
//! Shapes live in canvas pixel coordinates and are only ever turned into
//! outlines: the editor strokes them onto the bitmap, nothing keeps them
//! around afterwards.

mod ellipse;
mod line;
mod polygon;
mod rectangle;

pub use ellipse::{Circle, Ellipse};
pub use line::Line;
pub use polygon::{RegularPolygon, STAR_INNER_RATIO, Star};
pub use rectangle::Rectangle;

use crate::tools::Mode;
use kurbo::{BezPath, Point, Rect};

/// Common behaviour for all shapes.
pub trait ShapeTrait {
    /// Axis-aligned bounding box of the outline (without stroke width).
    fn bounds(&self) -> Rect;

    /// Outline to be stroked.
    fn to_path(&self) -> BezPath;
}

/// Parameters of the shape modes that are not given by the drag itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeParams {
    pub polygon_sides: u32,
    pub star_points: u32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            polygon_sides: RegularPolygon::DEFAULT_SIDES,
            star_points: Star::DEFAULT_POINTS,
        }
    }
}

/// A candidate shape produced by a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Polygon(RegularPolygon),
    Star(Star),
}

impl Shape {
    /// Build the shape a drag from `start` to `current` describes in `mode`.
    ///
    /// Returns `None` for modes that do not draw shapes.
    pub fn from_drag(mode: Mode, start: Point, current: Point, params: ShapeParams) -> Option<Self> {
        let shape = match mode {
            Mode::Line => Shape::Line(Line::new(start, current)),
            Mode::Rectangle => Shape::Rectangle(Rectangle::from_drag(start, current)),
            Mode::Square => Shape::Rectangle(Rectangle::square_from_drag(start, current)),
            Mode::Circle => Shape::Circle(Circle::new(start, start.distance(current))),
            Mode::Ellipse => Shape::Ellipse(Ellipse::from_drag(start, current)),
            Mode::Polygon => Shape::Polygon(RegularPolygon::new(
                start,
                start.distance(current),
                params.polygon_sides,
            )),
            Mode::Star => Shape::Star(Star::new(start, start.distance(current), params.star_points)),
            Mode::Draw | Mode::Erase | Mode::Picker => return None,
        };
        Some(shape)
    }

    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Line(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Circle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Polygon(s) => s,
            Shape::Star(s) => s,
        }
    }
}

impl ShapeTrait for Shape {
    fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    fn to_path(&self) -> BezPath {
        self.as_trait().to_path()
    }
}

/// Closed path through the given vertices.
pub(crate) fn closed_path(vertices: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = vertices.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Bounding box of a set of points.
pub(crate) fn bounds_of(points: &[Point]) -> Rect {
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    if points.is_empty() {
        Rect::ZERO
    } else {
        Rect::new(min_x, min_y, max_x, max_y)
    }
}
