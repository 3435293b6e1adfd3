//! RGBA8 bitmap surface.

use crate::raster;
use crate::renderer::RenderResult;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use inkpaint_core::{Brush, SerializableColor, Surface};
use kurbo::{BezPath, Point};

/// A CPU-side drawing surface.
///
/// Pixels are straight (non-premultiplied) RGBA8. An optional background
/// image, scaled to the surface size, is painted every time the surface is
/// cleared.
#[derive(Debug, Clone)]
pub struct Pixmap {
    image: RgbaImage,
    background: Option<RgbaImage>,
}

impl Pixmap {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            background: None,
        }
    }

    /// Wrap existing pixels.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            background: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Pixel at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<SerializableColor> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| SerializableColor::new(p[0], p[1], p[2], p[3]))
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Set the background image and paint it over the current content.
    pub fn set_background(&mut self, image: &RgbaImage) {
        let (w, h) = self.image.dimensions();
        let scaled = if image.dimensions() == (w, h) {
            image.clone()
        } else {
            imageops::resize(image, w, h, FilterType::Triangle)
        };
        log::debug!(
            "Background {}x{} scaled to {}x{}",
            image.width(),
            image.height(),
            w,
            h
        );
        raster::composite_image(&mut self.image, &scaled);
        self.background = Some(scaled);
    }

    /// Decode an encoded image (PNG, JPEG, WebP) and use it as background.
    pub fn set_background_bytes(&mut self, bytes: &[u8]) -> RenderResult<()> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        self.set_background(&image);
        Ok(())
    }

    /// Drop the background. Pixels already painted stay.
    pub fn clear_background(&mut self) {
        self.background = None;
    }

    /// Wipe to transparent, ignoring the background.
    pub fn clear_transparent(&mut self) {
        self.image.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
    }

    /// Composite `image` at the origin. Parts outside the surface are cut.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        raster::composite_image(&mut self.image, image);
    }
}

impl Surface for Pixmap {
    type Snapshot = RgbaImage;

    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn snapshot(&self) -> RgbaImage {
        self.image.clone()
    }

    fn restore(&mut self, snapshot: &RgbaImage) {
        if snapshot.dimensions() != self.image.dimensions() {
            log::warn!(
                "Ignoring snapshot of size {:?} on {:?} surface",
                snapshot.dimensions(),
                self.image.dimensions()
            );
            return;
        }
        self.image.copy_from_slice(snapshot.as_raw());
    }

    fn stroke(&mut self, path: &BezPath, brush: &Brush) {
        if let Some(mask) = raster::stroke_coverage(path, brush.width, self.size()) {
            raster::blend(&mut self.image, &mask, brush);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, brush: &Brush) {
        if let Some(mask) = raster::disc_coverage(center, radius, self.size()) {
            raster::blend(&mut self.image, &mask, brush);
        }
    }

    fn clear(&mut self) {
        self.clear_transparent();
        if let Some(background) = &self.background {
            raster::composite_image(&mut self.image, background);
        }
    }

    fn pick(&self, point: Point) -> Option<SerializableColor> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        self.pixel(point.x.floor() as u32, point.y.floor() as u32)
    }
}
