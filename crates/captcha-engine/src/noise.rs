//! Noise dots scattered over the challenge canvas.
//!
//! Dot count scales with canvas area and dot size with the larger canvas
//! dimension, so noise density looks the same at any resolution.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{Canvas, draw_filled_ellipse_mut};
use rand::Rng;

use crate::pattern::HatchPattern;

/// One dot per this many canvas pixels.
pub const AREA_PER_DOT: u64 = 30;

/// Dot extent is bounded by `max(width, height) / DOT_SIZE_DIVISOR`.
pub const DOT_SIZE_DIVISOR: u32 = 50;

/// Number of dots scattered over a `width`x`height` canvas.
pub fn dot_count(width: u32, height: u32) -> usize {
    (u64::from(width) * u64::from(height) / AREA_PER_DOT) as usize
}

/// Exclusive upper bound for a dot's width and height.
pub fn max_dot_extent(width: u32, height: u32) -> u32 {
    width.max(height) / DOT_SIZE_DIVISOR
}

/// Scatter randomly sized, pattern-filled ellipses over the canvas.
pub fn scatter_dots(img: &mut RgbaImage, rng: &mut impl Rng, brush: &HatchPattern) {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let extent = max_dot_extent(width, height);

    for _ in 0..dot_count(width, height) {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        let (w, h) = if extent == 0 {
            (0, 0)
        } else {
            (rng.gen_range(0..extent), rng.gen_range(0..extent))
        };
        fill_ellipse(img, x, y, w, h, brush);
    }
}

/// Draws through a hatch brush: every pixel the rasterizer touches takes
/// the brush colour at that position instead of the requested colour.
struct BrushCanvas<'a> {
    img: &'a mut RgbaImage,
    brush: &'a HatchPattern,
}

impl Canvas for BrushCanvas<'_> {
    type Pixel = Rgba<u8>;

    fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        *self.img.get_pixel(x, y)
    }

    fn draw_pixel(&mut self, x: u32, y: u32, _color: Self::Pixel) {
        if let Some(pixel) = self.img.get_pixel_mut_checked(x, y) {
            *pixel = self.brush.color_at(x, y);
        }
    }
}

/// Fill the ellipse inscribed in the `width`x`height` box whose top-left
/// corner is `(x, y)`, clipped to the canvas. Empty boxes draw nothing.
pub fn fill_ellipse(
    img: &mut RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    brush: &HatchPattern,
) {
    if width == 0 || height == 0 {
        return;
    }
    // radii such that center +/- radius stays inside the box
    let rx = (width - 1) / 2;
    let ry = (height - 1) / 2;
    let to_i32 = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    let center = (to_i32(x.saturating_add(rx)), to_i32(y.saturating_add(ry)));

    let mut canvas = BrushCanvas { img, brush };
    let color = brush.color_at(x, y);
    draw_filled_ellipse_mut(&mut canvas, center, to_i32(rx), to_i32(ry), color);
}
