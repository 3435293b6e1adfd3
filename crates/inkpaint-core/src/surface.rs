//! Bitmap surface abstraction.

use crate::style::{Brush, SerializableColor};
use kurbo::{BezPath, Point};

/// A raster surface the editor paints on.
///
/// Implementations can be a CPU pixmap, a GPU texture, or a recording
/// double in tests. Coordinates are in surface pixels with the origin at
/// the top-left corner.
pub trait Surface {
    /// Saved copy of the pixels, used to undo shape previews.
    type Snapshot: Clone;

    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Copy the current pixels.
    fn snapshot(&self) -> Self::Snapshot;

    /// Replace the pixels with a previously taken snapshot.
    fn restore(&mut self, snapshot: &Self::Snapshot);

    /// Stroke an outline.
    fn stroke(&mut self, path: &BezPath, brush: &Brush);

    /// Fill a disc.
    fn fill_circle(&mut self, center: Point, radius: f64, brush: &Brush);

    /// Wipe the surface back to its blank state.
    fn clear(&mut self);

    /// Color of the pixel under `point`, `None` outside the surface.
    fn pick(&self, point: Point) -> Option<SerializableColor>;
}
