//! InkPaint Core Library
//!
//! Platform-agnostic editor logic for the InkPaint drawing application:
//! the mode state machine, shape math, brush styles, the bitmap surface
//! abstraction and the client side of drawing persistence.

pub mod api;
pub mod editor;
pub mod notice;
pub mod payload;
pub mod shapes;
pub mod storage;
pub mod style;
pub mod surface;
pub mod tools;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use editor::Editor;
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use payload::{ImageFormat, PayloadError, decode_data_uri, encode_data_uri};
pub use shapes::{Shape, ShapeTrait};
pub use storage::{DrawingStore, HttpStore, MemoryStore, StorageError, StorageResult};
pub use style::{Brush, Compositing, SerializableColor};
pub use surface::Surface;
pub use tools::{Mode, ToolManager, ToolState};
