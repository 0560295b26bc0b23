//! Drawing a scaled source onto a background matte.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::color::parse_rgba_spec;
use crate::geometry::GeometrySpec;
use crate::resize::resize_to;
use crate::{ImageEngineError, Result};

/// Bounding box, crop policy and matte color for a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// `0` leaves the axis unconstrained.
    pub max_width: u32,
    pub max_height: u32,
    pub crop_to_size: bool,
    pub background: Rgba<u8>,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl ThumbnailOptions {
    /// Fit inside `max_width` x `max_height` on an opaque white matte.
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            crop_to_size: false,
            background: Rgba([u8::MAX; 4]),
        }
    }

    pub fn with_crop(mut self, crop_to_size: bool) -> Self {
        self.crop_to_size = crop_to_size;
        self
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    /// Set the matte from an `rgba(r,g,b,a)` spec with fractional components.
    pub fn with_background_spec(self, spec: &str) -> Result<Self> {
        Ok(self.with_background(parse_rgba_spec(spec)?))
    }

    fn geometry(&self, source_width: u32, source_height: u32) -> GeometrySpec {
        GeometrySpec {
            source_width,
            source_height,
            max_width: self.max_width,
            max_height: self.max_height,
            crop_to_size: self.crop_to_size,
        }
    }
}

/// Scale `image` per `options` and composite it over the background.
///
/// The source is flattened onto the matte at full resolution before it is
/// resized, so colour hidden under transparent pixels never bleeds into
/// the filtered result.
///
/// Without crop the canvas is exactly the scaled size. With crop it is the
/// bounding box, and the scaled image is positioned so the overflow is split
/// evenly left/right and one third above, two thirds below.
pub fn compose(image: &DynamicImage, options: &ThumbnailOptions) -> Result<RgbaImage> {
    let geometry = options.geometry(image.width(), image.height());
    let size = geometry.resized_size()?;

    let (canvas_w, canvas_h, offset_x, offset_y) = if options.crop_to_size {
        let (max_w, max_h) = geometry.bounds();
        let offset_x = (i64::from(size.width) - i64::from(max_w)) / 2;
        let offset_y = (i64::from(size.height) - i64::from(max_h)) / 3;
        (max_w, max_h, -offset_x, -offset_y)
    } else {
        (size.width, size.height, 0, 0)
    };

    let mut canvas = allocate_canvas(canvas_w, canvas_h, options.background)?;
    let flat = flatten(image, options.background);
    let scaled = resize_to(&DynamicImage::ImageRgba8(flat), size);
    overlay(&mut canvas, &scaled, offset_x, offset_y);

    debug!(
        width = canvas_w,
        height = canvas_h,
        offset_x,
        offset_y,
        crop = options.crop_to_size,
        "Composed thumbnail"
    );
    Ok(canvas)
}

/// `image` as RGBA, every pixel source-over composited onto `background`.
fn flatten(image: &DynamicImage, background: Rgba<u8>) -> RgbaImage {
    let mut flat = image.to_rgba8();
    for pixel in flat.pixels_mut() {
        *pixel = blend_over(&background, pixel);
    }
    flat
}

/// A `width` x `height` canvas filled with `fill`, or `AllocationFailure`
/// when the buffer cannot be reserved.
pub fn allocate_canvas(width: u32, height: u32, fill: Rgba<u8>) -> Result<RgbaImage> {
    let mut buf = reserve(width, height)?;
    let pixels = width as usize * height as usize;
    for _ in 0..pixels {
        buf.extend_from_slice(&fill.0);
    }
    RgbaImage::from_raw(width, height, buf)
        .ok_or(ImageEngineError::AllocationFailure { width, height })
}

/// An empty buffer with room for `width * height` RGBA pixels.
fn reserve(width: u32, height: u32) -> Result<Vec<u8>> {
    let failure = || ImageEngineError::AllocationFailure { width, height };
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(failure)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| failure())?;
    Ok(buf)
}

/// Source-over composite `top` onto `base` with `top`'s origin at (x, y).
/// Pixels falling outside `base` are dropped.
fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (base_w, base_h) = (i64::from(base.width()), i64::from(base.height()));
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let tx = x + i64::from(dx);
        let ty = y + i64::from(dy);
        if !(0..base_w).contains(&tx) || !(0..base_h).contains(&ty) {
            continue;
        }
        let (tx, ty) = (tx as u32, ty as u32);
        match pixel[3] {
            0 => {}
            u8::MAX => base.put_pixel(tx, ty, *pixel),
            _ => {
                let blended = blend_over(base.get_pixel(tx, ty), pixel);
                base.put_pixel(tx, ty, blended);
            }
        }
    }
}

fn blend_over(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let fa = f32::from(fg[3]) / 255.0;
    let ba = f32::from(bg[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (f32::from(fg[i]) * fa + f32::from(bg[i]) * ba * (1.0 - fa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn near(p: &Rgba<u8>, c: Rgba<u8>) -> bool {
        p.0.iter().zip(c.0).all(|(a, b)| a.abs_diff(b) <= 1)
    }

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
    }

    #[test]
    fn fit_canvas_matches_scaled_size() {
        let out = compose(&solid(400, 200, RED), &ThumbnailOptions::new(100, 100)).unwrap();
        assert_eq!(out.dimensions(), (100, 50));
        assert!(near(out.get_pixel(50, 25), RED));
    }

    #[test]
    fn unconstrained_keeps_source_size() {
        let out = compose(&solid(31, 17, RED), &ThumbnailOptions::default()).unwrap();
        assert_eq!(out.dimensions(), (31, 17));
    }

    #[test]
    fn crop_canvas_is_bounding_box() {
        let options = ThumbnailOptions::new(50, 50).with_crop(true);
        let out = compose(&solid(400, 200, RED), &options).unwrap();
        assert_eq!(out.dimensions(), (50, 50));
        assert!(out.pixels().all(|p| near(p, RED)));
    }

    #[test]
    fn crop_offsets_one_third_vertically() {
        // 10x40 source into 10x10: scaled to 10x40, overflow 30, top offset 10
        let mut src = RgbaImage::from_pixel(10, 40, RED);
        for x in 0..10 {
            src.put_pixel(x, 10, GREEN);
            src.put_pixel(x, 9, Rgba([0, 0, 255, 255]));
        }
        let options = ThumbnailOptions::new(10, 10).with_crop(true);
        let out = compose(&DynamicImage::ImageRgba8(src), &options).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.get_pixel(5, 0), &GREEN);
        assert_eq!(out.get_pixel(5, 1), &RED);
    }

    #[test]
    fn transparent_source_shows_background() {
        let options = ThumbnailOptions::new(8, 8)
            .with_background_spec("rgba(0.0,0.0,1.0,1.0)")
            .unwrap();
        let out = compose(&solid(8, 8, Rgba([0, 0, 0, 0])), &options).unwrap();
        assert!(out.pixels().all(|p| *p == Rgba([0, 0, 255, 255])));
    }

    #[test]
    fn half_alpha_blends_with_background() {
        let options = ThumbnailOptions::new(4, 4).with_background(Rgba([0, 0, 0, 255]));
        let out = compose(&solid(4, 4, Rgba([255, 255, 255, 128])), &options).unwrap();
        let p = out.get_pixel(1, 1);
        assert_eq!(p[3], 255);
        assert!(p[0].abs_diff(128) <= 1);
    }

    #[test]
    fn transparent_half_does_not_darken_downscaled_edge() {
        // left half transparent black, right half opaque white
        let mut src = RgbaImage::from_pixel(64, 8, Rgba([255, 255, 255, 255]));
        for y in 0..8 {
            for x in 0..32 {
                src.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
        let options = ThumbnailOptions::new(16, 2);
        let out = compose(&DynamicImage::ImageRgba8(src), &options).unwrap();
        assert_eq!(out.dimensions(), (16, 2));
        assert!(out.pixels().all(|p| *p == Rgba([255, 255, 255, 255])), "{out:?}");
    }

    #[test]
    fn flatten_keeps_opaque_pixels() {
        let src = solid(2, 2, RED);
        let flat = flatten(&src, Rgba([0, 0, 255, 255]));
        assert!(flat.pixels().all(|p| *p == RED));
    }

    #[test]
    fn bad_background_spec_is_rejected() {
        assert!(matches!(
            ThumbnailOptions::default().with_background_spec("rgba(1,1,1)"),
            Err(ImageEngineError::MalformedColorSpec(_))
        ));
    }

    #[test]
    fn allocate_canvas_fills_every_pixel() {
        let canvas = allocate_canvas(3, 2, GREEN).unwrap();
        assert_eq!(canvas.as_raw().len(), 24);
        assert!(canvas.pixels().all(|p| *p == GREEN));
    }

    #[test]
    fn huge_canvas_fails_to_allocate() {
        assert!(matches!(
            allocate_canvas(u32::MAX, u32::MAX, GREEN),
            Err(ImageEngineError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn blend_over_transparent_background_keeps_foreground() {
        let out = blend_over(&Rgba([0, 0, 0, 0]), &Rgba([200, 100, 50, 128]));
        assert_eq!(out, Rgba([200, 100, 50, 128]));
    }
}
