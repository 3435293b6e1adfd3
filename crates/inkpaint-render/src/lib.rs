//! InkPaint Render Library
//!
//! A CPU implementation of the editor's [`Surface`](inkpaint_core::Surface)
//! backed by an RGBA8 bitmap, plus PNG export and data-URI import.

mod export;
mod pixmap;
mod raster;
mod renderer;

pub use export::{
    image_from_data_uri, load_drawing, open_drawing, save_drawing, save_png, to_data_uri, to_png,
};
pub use pixmap::Pixmap;
pub use renderer::{RenderResult, RendererError};
