//! Anti-aliased coverage rasterizer.
//!
//! Strokes are rendered as round-capped capsules around each flattened
//! segment. Coverage for a pixel is the max over all segments, so
//! overlapping segments of one stroke never double-blend.

use image::{Rgba, RgbaImage};
use inkpaint_core::{Brush, Compositing};
use kurbo::{BezPath, PathEl, Point, Vec2};

/// Flattening tolerance in pixels.
const TOLERANCE: f64 = 0.25;

/// Per-pixel coverage over a clipped rectangle of the target.
pub(crate) struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let width = x1 - x0;
        let height = y1 - y0;
        Self {
            x0,
            y0,
            width,
            height,
            data: vec![0.0; (width * height) as usize],
        }
    }

    fn accumulate(&mut self, x: u32, y: u32, coverage: f32) {
        let idx = ((y - self.y0) * self.width + (x - self.x0)) as usize;
        if coverage > self.data[idx] {
            self.data[idx] = coverage;
        }
    }

    fn iter(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        self.data.iter().enumerate().filter_map(move |(i, &c)| {
            if c <= 0.0 {
                return None;
            }
            let i = i as u32;
            Some((self.x0 + i % self.width, self.y0 + i / self.width, c))
        })
    }
}

/// Clip a float box to the target, returning `(x0, y0, x1, y1)` exclusive.
fn clip(min: Point, max: Point, size: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let x0 = min.x.floor().max(0.0);
    let y0 = min.y.floor().max(0.0);
    let x1 = max.x.ceil().min(size.0 as f64);
    let y1 = max.y.ceil().min(size.1 as f64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab: Vec2 = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn coverage_at(distance: f64, half_width: f64) -> f32 {
    (half_width + 0.5 - distance).clamp(0.0, 1.0) as f32
}

/// Flatten a path into line segments. Closed subpaths get their closing
/// segment; lone move-tos produce nothing.
fn segments(path: &BezPath) -> Vec<(Point, Point)> {
    let mut out = Vec::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;
    kurbo::flatten(path.iter(), TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            start = p;
            current = p;
        }
        PathEl::LineTo(p) => {
            out.push((current, p));
            current = p;
        }
        PathEl::ClosePath => {
            if current != start {
                out.push((current, start));
            }
            current = start;
        }
        // flatten only emits the three variants above
        _ => {}
    });
    out
}

/// Coverage of a stroke of `width` along `path`.
pub(crate) fn stroke_coverage(
    path: &BezPath,
    width: f64,
    size: (u32, u32),
) -> Option<CoverageMask> {
    let segs = segments(path);
    if segs.is_empty() || width <= 0.0 {
        return None;
    }
    let hw = width / 2.0;
    let pad = hw + 1.0;

    let (mut min, mut max) = (segs[0].0, segs[0].0);
    for &(a, b) in &segs {
        for p in [a, b] {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
    }
    let (x0, y0, x1, y1) = clip(
        Point::new(min.x - pad, min.y - pad),
        Point::new(max.x + pad, max.y + pad),
        size,
    )?;
    let mut mask = CoverageMask::new(x0, y0, x1, y1);

    for &(a, b) in &segs {
        let Some((sx0, sy0, sx1, sy1)) = clip(
            Point::new(a.x.min(b.x) - pad, a.y.min(b.y) - pad),
            Point::new(a.x.max(b.x) + pad, a.y.max(b.y) + pad),
            size,
        ) else {
            continue;
        };
        for y in sy0..sy1 {
            for x in sx0..sx1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let c = coverage_at(distance_to_segment(center, a, b), hw);
                if c > 0.0 {
                    mask.accumulate(x, y, c);
                }
            }
        }
    }
    Some(mask)
}

/// Coverage of a filled disc.
pub(crate) fn disc_coverage(center: Point, radius: f64, size: (u32, u32)) -> Option<CoverageMask> {
    if radius <= 0.0 {
        return None;
    }
    let pad = radius + 1.0;
    let (x0, y0, x1, y1) = clip(
        Point::new(center.x - pad, center.y - pad),
        Point::new(center.x + pad, center.y + pad),
        size,
    )?;
    let mut mask = CoverageMask::new(x0, y0, x1, y1);
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            // A disc is a zero-length capsule of width 2r.
            let c = coverage_at(p.distance(center), radius);
            if c > 0.0 {
                mask.accumulate(x, y, c);
            }
        }
    }
    Some(mask)
}

/// Composite `brush` through `mask` onto `image`.
pub(crate) fn blend(image: &mut RgbaImage, mask: &CoverageMask, brush: &Brush) {
    let src = brush.color;
    let src_a = src.a as f32 / 255.0;
    for (x, y, coverage) in mask.iter() {
        let dst = image.get_pixel_mut(x, y);
        match brush.compositing {
            Compositing::SourceOver => source_over(dst, [src.r, src.g, src.b], src_a * coverage),
            Compositing::DestinationOut => destination_out(dst, src_a * coverage),
        }
    }
}

/// Source-over `src` onto `dst` with its top-left corner at the origin.
pub(crate) fn composite_image(dst: &mut RgbaImage, src: &RgbaImage) {
    let width = dst.width().min(src.width());
    let height = dst.height().min(src.height());
    for y in 0..height {
        for x in 0..width {
            let s = src.get_pixel(x, y);
            source_over(dst.get_pixel_mut(x, y), [s[0], s[1], s[2]], s[3] as f32 / 255.0);
        }
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 255.0) + 0.5) as u8
}

fn source_over(dst: &mut Rgba<u8>, rgb: [u8; 3], sa: f32) {
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for i in 0..3 {
        let c = (rgb[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        dst[i] = to_u8(c);
    }
    dst[3] = to_u8(out_a * 255.0);
}

fn destination_out(dst: &mut Rgba<u8>, amount: f32) {
    let a = dst[3] as f32 * (1.0 - amount);
    dst[3] = to_u8(a);
    if dst[3] == 0 {
        *dst = Rgba([0, 0, 0, 0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpaint_core::SerializableColor;

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Point::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Point::new(1.0, 1.0), a, a), 2f64.sqrt());
    }

    #[test]
    fn test_closed_path_adds_closing_segment() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.close_path();
        assert_eq!(segments(&path).len(), 3);
    }

    #[test]
    fn test_overlapping_segments_blend_once() {
        let mut path = BezPath::new();
        path.move_to((2.0, 5.5));
        path.line_to((8.0, 5.5));
        path.line_to((2.0, 5.5));

        let brush = Brush::paint(SerializableColor::new(255, 0, 0, 128), 2.0);
        let mut image = RgbaImage::new(10, 10);
        let mask = stroke_coverage(&path, brush.width, (10, 10)).unwrap();
        blend(&mut image, &mask, &brush);

        assert_eq!(image.get_pixel(5, 5)[3], 128);
    }

    #[test]
    fn test_mask_is_clipped() {
        assert!(disc_coverage(Point::new(-50.0, -50.0), 5.0, (10, 10)).is_none());
        let mask = disc_coverage(Point::new(0.0, 0.0), 3.0, (10, 10)).unwrap();
        assert_eq!((mask.x0, mask.y0), (0, 0));
        assert!(mask.width <= 5 && mask.height <= 5);
    }

    #[test]
    fn test_composite_image_onto_transparent_is_exact() {
        let mut src = RgbaImage::new(3, 1);
        src.put_pixel(0, 0, Rgba([200, 40, 10, 255]));
        src.put_pixel(1, 0, Rgba([200, 40, 10, 77]));
        let mut dst = RgbaImage::new(2, 2);
        composite_image(&mut dst, &src);

        assert_eq!(dst.get_pixel(0, 0), &Rgba([200, 40, 10, 255]));
        assert_eq!(dst.get_pixel(1, 0), &Rgba([200, 40, 10, 77]));
        assert_eq!(dst.get_pixel(0, 1)[3], 0);
    }

    #[test]
    fn test_destination_out_clears() {
        let mut px = Rgba([10, 20, 30, 255]);
        destination_out(&mut px, 1.0);
        assert_eq!(px, Rgba([0, 0, 0, 0]));

        let mut px = Rgba([10, 20, 30, 200]);
        destination_out(&mut px, 0.5);
        assert_eq!(px, Rgba([10, 20, 30, 100]));
    }
}
