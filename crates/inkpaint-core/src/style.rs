//! Colors and brushes.

use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stroke width used when nothing else has been chosen.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Fixed width of the eraser, independent of the user's stroke width.
pub const ERASER_WIDTH: f64 = 20.0;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color: {0}")]
pub struct ColorParseError(pub String);

/// Serializable color representation (RGBA8, straight alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(input.to_string());
        let hex = input.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| err())
        };

        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Ok(Self::new(r, g, b, 255))
            }
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(err()),
        }
    }

    /// Format as `#rrggbb` (alpha is dropped, like a color input).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Whether the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl std::str::FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// How painted pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Compositing {
    /// Paint over the destination.
    #[default]
    SourceOver,
    /// Remove destination alpha where the source covers it.
    DestinationOut,
}

/// Everything a surface needs to paint a stroke or a fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: SerializableColor,
    pub width: f64,
    pub compositing: Compositing,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: DEFAULT_STROKE_WIDTH,
            compositing: Compositing::SourceOver,
        }
    }
}

impl Brush {
    /// A painting brush.
    pub fn paint(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            compositing: Compositing::SourceOver,
        }
    }

    /// The eraser brush.
    pub fn eraser() -> Self {
        Self {
            color: SerializableColor::black(),
            width: ERASER_WIDTH,
            compositing: Compositing::DestinationOut,
        }
    }

    pub fn is_eraser(&self) -> bool {
        self.compositing == Compositing::DestinationOut
    }
}
