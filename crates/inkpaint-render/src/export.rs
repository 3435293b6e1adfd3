//! PNG export and data-URI import.

use crate::pixmap::Pixmap;
use crate::renderer::{RenderResult, RendererError};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use inkpaint_core::{DrawingStore, ImageFormat, StorageError, decode_data_uri, encode_data_uri};
use inkpaint_core::api::DrawingId;
use std::path::Path;

/// Encode the surface as PNG bytes.
pub fn to_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            pixmap.image().as_raw(),
            pixmap.width(),
            pixmap.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| RendererError::Encode(e.to_string()))?;
    Ok(out)
}

/// Encode the surface as a `data:image/png;base64,...` URI.
pub fn to_data_uri(pixmap: &Pixmap) -> RenderResult<String> {
    Ok(encode_data_uri(&to_png(pixmap)?))
}

/// Write the surface to `path` as PNG.
pub fn save_png(pixmap: &Pixmap, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    std::fs::write(path, to_png(pixmap)?)?;
    log::info!("Exported {}x{} PNG to {}", pixmap.width(), pixmap.height(), path.display());
    Ok(())
}

/// Decode an image data URI into pixels.
pub fn image_from_data_uri(uri: &str) -> RenderResult<RgbaImage> {
    let (format, bytes) = decode_data_uri(uri)?;
    let image_format = match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::WebP => image::ImageFormat::WebP,
    };
    Ok(image::load_from_memory_with_format(&bytes, image_format)?.to_rgba8())
}

/// Replace the surface content with a stored drawing, painted at the origin.
///
/// The surface is wiped to transparent first; the background is not
/// repainted.
pub fn load_drawing(pixmap: &mut Pixmap, uri: &str) -> RenderResult<()> {
    let image = image_from_data_uri(uri)?;
    if image.dimensions() != (pixmap.width(), pixmap.height()) {
        log::debug!(
            "Drawing is {}x{}, surface is {}x{}",
            image.width(),
            image.height(),
            pixmap.width(),
            pixmap.height()
        );
    }
    pixmap.clear_transparent();
    pixmap.draw_image(&image);
    Ok(())
}

/// Encode the surface and save it under `name`.
pub async fn save_drawing<S>(store: &S, name: &str, pixmap: &Pixmap) -> RenderResult<DrawingId>
where
    S: DrawingStore + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(StorageError::Invalid("Drawing name is empty".to_string()).into());
    }
    let data = to_data_uri(pixmap)?;
    Ok(store.save(name, &data).await?)
}

/// Fetch drawing `id` and paint it onto the surface.
pub async fn open_drawing<S>(store: &S, id: DrawingId, pixmap: &mut Pixmap) -> RenderResult<String>
where
    S: DrawingStore + ?Sized,
{
    let drawing = store.load(id).await?;
    load_drawing(pixmap, &drawing.data)?;
    Ok(drawing.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use inkpaint_core::testing::block_on;
    use inkpaint_core::{Brush, MemoryStore, SerializableColor, StorageError, Surface};
    use kurbo::Point;

    fn sample() -> Pixmap {
        let mut pixmap = Pixmap::new(16, 12);
        let brush = Brush::paint(SerializableColor::new(200, 40, 10, 255), 3.0);
        pixmap.fill_circle(Point::new(8.0, 6.0), 4.0, &brush);
        pixmap
    }

    #[test]
    fn test_png_signature() {
        let bytes = to_png(&sample()).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_data_uri_reloads_same_pixels() {
        let original = sample();
        let uri = to_data_uri(&original).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let mut target = Pixmap::new(16, 12);
        target.fill_circle(Point::new(1.0, 1.0), 5.0, &Brush::paint(SerializableColor::black(), 1.0));
        load_drawing(&mut target, &uri).unwrap();
        assert_eq!(target.image(), original.image());
    }

    #[test]
    fn test_load_smaller_image_at_origin() {
        let small = Pixmap::from_image(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])));
        let uri = to_data_uri(&small).unwrap();

        let mut target = Pixmap::new(10, 10);
        load_drawing(&mut target, &uri).unwrap();
        assert_eq!(target.pixel(3, 3), Some(SerializableColor::new(0, 0, 255, 255)));
        assert_eq!(target.pixel(4, 4).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut target = Pixmap::new(4, 4);
        assert!(matches!(
            load_drawing(&mut target, "not a uri"),
            Err(RendererError::Payload(_))
        ));
        assert!(load_drawing(&mut target, "data:image/png;base64,AAAA").is_err());
    }

    #[test]
    fn test_save_png_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawing.png");
        save_png(&sample(), &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(&decoded, sample().image());
    }

    #[test]
    fn test_store_round_trip() {
        let store = MemoryStore::new();
        let id = block_on(save_drawing(&store, "  sun  ", &sample())).unwrap();

        let mut target = Pixmap::new(16, 12);
        let name = block_on(open_drawing(&store, id, &mut target)).unwrap();
        assert_eq!(name, "sun");
        assert_eq!(target.image(), sample().image());

        assert!(matches!(
            block_on(open_drawing(&store, id + 1, &mut target)),
            Err(RendererError::Storage(StorageError::NotFound(_)))
        ));
    }

    #[test]
    fn test_blank_name_is_invalid_request() {
        let store = MemoryStore::new();
        assert!(matches!(
            block_on(save_drawing(&store, "   ", &sample())),
            Err(RendererError::Storage(StorageError::Invalid(_)))
        ));
        assert!(block_on(store.list()).unwrap().is_empty());
    }

    #[test]
    fn test_clear_after_load_keeps_surface_size() {
        let mut target = sample();
        target.clear();
        assert_eq!(target.size(), (16, 12));
    }
}
