//! Challenge rendering pipeline.
//!
//! The steps, in order:
//! 1. confetti-textured background
//! 2. font size auto-fit to the canvas width
//! 3. centered text outline rasterized to a coverage mask
//! 4. random perspective warp of the mask
//! 5. hatch fill of the warped text
//! 6. hatch-filled noise dots

use ab_glyph::{Font, PxScale};
use image::{GrayImage, RgbaImage};
use rand::Rng;
use tracing::{debug, trace};

use crate::challenge::Challenge;
use crate::code::random_code;
use crate::noise;
use crate::pattern::HatchPattern;
use crate::text::{fit_font_size, text_mask};
use crate::warp::{WarpCorners, warp_mask};
use crate::{CaptchaError, DEFAULT_HEIGHT, DEFAULT_WIDTH, Result};

/// Canvas and borrowed font for a single render call.
///
/// Dropping the target releases the canvas and ends the font borrow, on the
/// success path and on every early return alike.
pub struct RenderTarget<'f, F: Font> {
    canvas: RgbaImage,
    font: &'f F,
}

impl<'f, F: Font> RenderTarget<'f, F> {
    /// Allocate a transparent `width`x`height` canvas.
    pub fn acquire(font: &'f F, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CaptchaError::InvalidDimension { width, height });
        }
        let canvas = allocate_canvas(width, height)?;
        trace!(width, height, "Render target acquired");
        Ok(Self { canvas, font })
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn canvas_mut(&mut self) -> &mut RgbaImage {
        &mut self.canvas
    }

    pub fn paint_background(&mut self, pattern: &HatchPattern) {
        pattern.fill(&mut self.canvas);
    }

    /// Largest font scale at which `text` fits the canvas width.
    pub fn fit_text(&self, text: &str) -> PxScale {
        PxScale::from(fit_font_size(self.font, text, self.width(), self.height()))
    }

    /// Coverage mask of `text` centered on the canvas.
    pub fn text_mask(&self, scale: PxScale, text: &str) -> GrayImage {
        text_mask(self.font, scale, text, self.width(), self.height())
    }

    /// Paint `brush` wherever `mask` has coverage.
    pub fn fill_mask(&mut self, mask: &GrayImage, brush: &HatchPattern) {
        for (x, y, coverage) in mask.enumerate_pixels() {
            if coverage[0] > 0 {
                brush.paint(&mut self.canvas, x, y, f32::from(coverage[0]) / 255.0);
            }
        }
    }

    /// Finish rendering and hand the bitmap out.
    pub fn into_image(mut self) -> RgbaImage {
        std::mem::replace(&mut self.canvas, RgbaImage::new(0, 0))
    }
}

impl<F: Font> Drop for RenderTarget<'_, F> {
    fn drop(&mut self) {
        trace!("Render target released");
    }
}

/// Allocate a zeroed RGBA canvas, reporting allocation failure as an error.
pub fn allocate_canvas(width: u32, height: u32) -> Result<RgbaImage> {
    let failure = || CaptchaError::AllocationFailure { width, height };
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(failure)?;

    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| failure())?;
    buffer.resize(len, 0u8);
    RgbaImage::from_raw(width, height, buffer).ok_or_else(failure)
}

/// Render `code` onto a fresh `width`x`height` challenge image.
pub fn render<F: Font>(
    rng: &mut impl Rng,
    font: &F,
    code: &str,
    width: u32,
    height: u32,
) -> Result<Challenge> {
    let mut target = RenderTarget::acquire(font, width, height)?;
    target.paint_background(&HatchPattern::small_confetti());

    let scale = target.fit_text(code);
    let mask = target.text_mask(scale, code);

    let corners = WarpCorners::jittered(rng, width, height);
    let warped = warp_mask(&mask, &corners);

    let brush = HatchPattern::percent_10();
    target.fill_mask(&warped, &brush);
    noise::scatter_dots(target.canvas_mut(), rng, &brush);

    debug!(
        width,
        height,
        font_size = scale.y,
        code_len = code.chars().count(),
        "Rendered challenge"
    );

    Ok(Challenge::new(code.to_string(), target.into_image()))
}

/// Generate a default-length code and render it at the default size.
pub fn render_random<F: Font>(rng: &mut impl Rng, font: &F) -> Result<Challenge> {
    let code = random_code(rng);
    render(rng, font, &code, DEFAULT_WIDTH, DEFAULT_HEIGHT)
}
