//! Tool system for the editor.

use crate::shapes::{Shape, ShapeParams};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editor modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Freehand drawing.
    #[default]
    Draw,
    /// Freehand erasing.
    Erase,
    Line,
    Rectangle,
    Square,
    Circle,
    Ellipse,
    Polygon,
    Star,
    /// Pick the color under the pointer.
    Picker,
}

impl Mode {
    pub const ALL: [Mode; 10] = [
        Mode::Draw,
        Mode::Erase,
        Mode::Line,
        Mode::Rectangle,
        Mode::Square,
        Mode::Circle,
        Mode::Ellipse,
        Mode::Polygon,
        Mode::Star,
        Mode::Picker,
    ];

    /// Modes that paint incrementally while the pointer moves.
    pub fn is_freehand(self) -> bool {
        matches!(self, Mode::Draw | Mode::Erase)
    }

    /// Modes that preview a whole shape from the drag start.
    pub fn is_shape(self) -> bool {
        !self.is_freehand() && self != Mode::Picker
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Draw => "draw",
            Mode::Erase => "erase",
            Mode::Line => "line",
            Mode::Rectangle => "rectangle",
            Mode::Square => "square",
            Mode::Circle => "circle",
            Mode::Ellipse => "ellipse",
            Mode::Polygon => "polygon",
            Mode::Star => "star",
            Mode::Picker => "picker",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown mode: {}", s))
    }
}

/// State of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Waiting for a pointer-down.
    #[default]
    Idle,
    /// A gesture is in progress.
    Active {
        /// Where the gesture started.
        start: Point,
        /// Last pointer position seen.
        last: Point,
    },
}

/// Tracks the current mode and the gesture in progress.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected mode.
    pub mode: Mode,
    /// Current gesture state.
    pub state: ToolState,
    /// Extra parameters for polygon and star.
    pub params: ShapeParams,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            state: ToolState::Idle,
            params: ShapeParams::default(),
        }
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch mode, abandoning any gesture in progress.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.state = ToolState::Idle;
    }

    /// Start a gesture at `point`.
    pub fn begin(&mut self, point: Point) {
        self.state = ToolState::Active {
            start: point,
            last: point,
        };
    }

    /// Move the gesture to `point`.
    ///
    /// Returns the previous position, or `None` when no gesture is active.
    pub fn update(&mut self, point: Point) -> Option<Point> {
        match &mut self.state {
            ToolState::Active { last, .. } => Some(std::mem::replace(last, point)),
            ToolState::Idle => None,
        }
    }

    /// Finish the gesture. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = ToolState::Idle;
        was_active
    }

    /// Abandon the gesture.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Start point of the active gesture.
    pub fn start(&self) -> Option<Point> {
        match self.state {
            ToolState::Active { start, .. } => Some(start),
            ToolState::Idle => None,
        }
    }

    /// Candidate shape for a drag to `current`, if the mode draws shapes.
    pub fn preview_shape(&self, current: Point) -> Option<Shape> {
        let start = self.start()?;
        Shape::from_drag(self.mode, start, current, self.params)
    }
}
