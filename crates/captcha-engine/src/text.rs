//! Glyph measurement, auto-fit sizing, and text rasterization.
//!
//! Text is laid out as positioned glyph outlines and rasterized into a
//! single-channel coverage mask so it can be warped before it is painted.

use ab_glyph::{Font, Glyph, GlyphId, OutlinedGlyph, PxScale, Rect, ScaleFont, point};
use image::GrayImage;
use tracing::debug;

/// Measure the advance width of a string at the given font and scale.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.max(0.0).ceil() as u32
}

/// Pick the largest pixel size for `text` that fits the canvas width.
///
/// Starts at `height + 1` and steps down one pixel at a time, so the loop
/// runs at most `height + 1` times. Returns `0.0` when no positive size fits.
pub fn fit_font_size<F: Font>(font: &F, text: &str, width: u32, height: u32) -> f32 {
    let mut size = height as f32 + 1.0;
    loop {
        size -= 1.0;
        if size <= 0.0 {
            debug!(width, height, "No font size fits the canvas");
            return 0.0;
        }
        let measured = measure_text_width(font, PxScale::from(size), text);
        if measured <= width {
            debug!(size, measured, width, "Fitted challenge font size");
            return size;
        }
    }
}

/// Lay out `text` on a single baseline starting at the origin.
pub fn layout_glyphs<F: Font>(font: &F, scale: PxScale, text: &str) -> Vec<Glyph> {
    let scaled = font.as_scaled(scale);
    let mut caret = point(0.0, scaled.ascent());
    let mut prev_glyph: Option<GlyphId> = None;
    let mut glyphs = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            caret.x += scaled.kern(prev, glyph_id);
        }
        glyphs.push(glyph_id.with_scale_and_position(scale, caret));
        caret.x += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    glyphs
}

/// Rasterize `text` into a `width`x`height` coverage mask, centered on both
/// axes by the ink bounds of its outlines.
pub fn text_mask<F: Font>(
    font: &F,
    scale: PxScale,
    text: &str,
    width: u32,
    height: u32,
) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    if scale.x <= 0.0 || scale.y <= 0.0 {
        return mask;
    }

    let outlines: Vec<OutlinedGlyph> = layout_glyphs(font, scale, text)
        .into_iter()
        .filter_map(|glyph| font.outline_glyph(glyph))
        .collect();
    let Some(bounds) = outlines.iter().map(OutlinedGlyph::px_bounds).reduce(union) else {
        return mask;
    };

    let dx = ((width as f32 - bounds.width()) / 2.0 - bounds.min.x).round();
    let dy = ((height as f32 - bounds.height()) / 2.0 - bounds.min.y).round();

    for outline in &outlines {
        let glyph_bounds = outline.px_bounds();
        let origin_x = (glyph_bounds.min.x + dx) as i64;
        let origin_y = (glyph_bounds.min.y + dy) as i64;
        outline.draw(|gx, gy, coverage| {
            let x = origin_x + i64::from(gx);
            let y = origin_y + i64::from(gy);
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                return;
            }
            let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let pixel = mask.get_pixel_mut(x as u32, y as u32);
            pixel.0[0] = pixel.0[0].max(value);
        });
    }

    mask
}

fn union(a: Rect, b: Rect) -> Rect {
    Rect {
        min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    }
}
