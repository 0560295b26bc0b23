//! Two-tone 8x8 hatch brushes used for the background, glyphs, and noise.

use image::{Rgba, RgbaImage};

/// Sparse diagonal speckle, one set bit per row.
const SMALL_CONFETTI: [u8; 8] = [0x80, 0x08, 0x40, 0x02, 0x10, 0x01, 0x20, 0x04];

/// Roughly 6% of the cell in the foreground color.
const PERCENT_10: [u8; 8] = [0x80, 0x00, 0x08, 0x00, 0x80, 0x00, 0x08, 0x00];

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const LIGHT_GRAY: Rgba<u8> = Rgba([211, 211, 211, 255]);
pub const SKY_BLUE: Rgba<u8> = Rgba([135, 206, 235, 255]);

/// A repeating 8x8 bit pattern with a foreground and a background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HatchPattern {
    rows: [u8; 8],
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
}

impl HatchPattern {
    pub const fn new(rows: [u8; 8], foreground: Rgba<u8>, background: Rgba<u8>) -> Self {
        Self {
            rows,
            foreground,
            background,
        }
    }

    /// Background texture: light gray confetti on white.
    pub const fn small_confetti() -> Self {
        Self::new(SMALL_CONFETTI, LIGHT_GRAY, WHITE)
    }

    /// Glyph and noise texture: sparse black on sky blue.
    pub const fn percent_10() -> Self {
        Self::new(PERCENT_10, BLACK, SKY_BLUE)
    }

    /// Pattern color at canvas position `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Rgba<u8> {
        let row = self.rows[(y % 8) as usize];
        if row & (0x80 >> (x % 8)) != 0 {
            self.foreground
        } else {
            self.background
        }
    }

    /// Cover the whole image with the pattern.
    pub fn fill(&self, img: &mut RgbaImage) {
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = self.color_at(x, y);
        }
    }

    /// Paint the pattern at `(x, y)` over the existing pixel, weighted by
    /// `coverage` in `0.0..=1.0`.
    pub fn paint(&self, img: &mut RgbaImage, x: u32, y: u32, coverage: f32) {
        if x >= img.width() || y >= img.height() || coverage <= 0.0 {
            return;
        }
        let fg = self.color_at(x, y);
        if coverage >= 1.0 {
            img.put_pixel(x, y, fg);
            return;
        }
        let bg = *img.get_pixel(x, y);
        img.put_pixel(x, y, blend_pixel(&bg, &fg, coverage));
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    let mix = |f: u8, b: u8| (f32::from(f) * alpha + f32::from(b) * inv).round() as u8;
    Rgba([
        mix(fg[0], bg[0]),
        mix(fg[1], bg[1]),
        mix(fg[2], bg[2]),
        mix(fg[3], bg[3]),
    ])
}
