//! Canvas editor: turns pointer events into pixels.
//!
//! Freehand modes paint segment by segment as the pointer moves. Shape modes
//! take a snapshot of the surface when the gesture starts and, on every
//! move, restore it before drawing the full candidate shape again, so the
//! preview never accumulates strokes from earlier frames.

use crate::shapes::{RegularPolygon, ShapeTrait, Star};
use crate::style::{Brush, ColorParseError, DEFAULT_STROKE_WIDTH, SerializableColor};
use crate::surface::Surface;
use crate::tools::{Mode, ToolManager};
use kurbo::{BezPath, Point};

/// Smallest stroke width the editor accepts.
pub const MIN_STROKE_WIDTH: f64 = 1.0;

/// The drawing editor, generic over the surface it paints on.
pub struct Editor<S: Surface> {
    surface: S,
    tools: ToolManager,
    /// User-selected color.
    color: SerializableColor,
    /// User-selected stroke width (the eraser ignores it).
    line_width: f64,
    /// Pixels as they were when the current gesture started.
    snapshot: Option<S::Snapshot>,
}

impl<S: Surface> Editor<S> {
    /// Create an editor in draw mode with a black 2px brush.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            tools: ToolManager::new(),
            color: SerializableColor::black(),
            line_width: DEFAULT_STROKE_WIDTH,
            snapshot: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn mode(&self) -> Mode {
        self.tools.mode
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.tools.is_active()
    }

    /// The brush the current mode paints with.
    pub fn brush(&self) -> Brush {
        match self.tools.mode {
            Mode::Erase => Brush::eraser(),
            _ => Brush::paint(self.color, self.line_width),
        }
    }

    /// Switch mode. Any gesture in progress is finalized as it stands.
    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("Editor mode: {} -> {}", self.tools.mode, mode);
        self.tools.set_mode(mode);
        self.snapshot = None;
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.color = color;
    }

    /// Set the color from a `#rrggbb` string.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ColorParseError> {
        self.color = SerializableColor::parse_hex(hex)?;
        Ok(())
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = if width.is_finite() {
            width.max(MIN_STROKE_WIDTH)
        } else {
            DEFAULT_STROKE_WIDTH
        };
    }

    /// Clamped to `3..=20`.
    pub fn set_polygon_sides(&mut self, sides: u32) {
        self.tools.params.polygon_sides =
            sides.clamp(RegularPolygon::MIN_SIDES, RegularPolygon::MAX_SIDES);
    }

    /// Clamped to `3..=20`.
    pub fn set_star_points(&mut self, points: u32) {
        self.tools.params.star_points = points.clamp(Star::MIN_POINTS, Star::MAX_POINTS);
    }

    /// Pointer pressed at `point`.
    pub fn pointer_down(&mut self, point: Point) {
        if self.tools.mode == Mode::Picker {
            self.pick_color(point);
            return;
        }
        self.tools.begin(point);
        self.snapshot = Some(self.surface.snapshot());
    }

    /// Pointer moved to `point`.
    pub fn pointer_move(&mut self, point: Point) {
        let Some(start) = self.tools.start() else {
            return;
        };
        let mode = self.tools.mode;
        let brush = self.brush();

        if mode.is_freehand() {
            let Some(last) = self.tools.update(point) else {
                return;
            };
            let mut segment = BezPath::new();
            segment.move_to(last);
            segment.line_to(point);
            self.surface.stroke(&segment, &brush);
            self.surface.fill_circle(point, brush.width / 2.0, &brush);
            return;
        }

        self.tools.update(point);
        if let Some(snapshot) = &self.snapshot {
            self.surface.restore(snapshot);
        }
        if let Some(shape) = self.tools.preview_shape(point) {
            log::trace!("Preview {} from {:?} to {:?}", mode, start, point);
            self.surface.stroke(&shape.to_path(), &brush);
        }
    }

    /// Pointer released. The last preview stays on the surface.
    pub fn pointer_up(&mut self, _point: Point) {
        self.finish();
    }

    /// Pointer left the canvas; treated like a release.
    pub fn pointer_leave(&mut self) {
        self.finish();
    }

    /// Wipe the surface.
    pub fn clear(&mut self) {
        self.surface.clear();
        if self.tools.is_active() {
            self.snapshot = Some(self.surface.snapshot());
        }
    }

    /// Start over with a blank surface.
    pub fn new_drawing(&mut self) {
        self.tools.cancel();
        self.snapshot = None;
        self.surface.clear();
    }

    fn finish(&mut self) {
        self.tools.end();
        self.snapshot = None;
    }

    fn pick_color(&mut self, point: Point) {
        match self.surface.pick(point) {
            Some(color) if !color.is_transparent() => {
                log::debug!("Picked color {} at {:?}", color.to_hex(), point);
                self.color = SerializableColor { a: 255, ..color };
            }
            _ => log::debug!("Nothing to pick at {:?}", point),
        }
    }
}
