//! Palette reduction for indexed output formats.
//!
//! The quantizer is a strategy: encoders only see [`ColorQuantizer`] and an
//! [`IndexedImage`], never the algorithm behind it.

use std::collections::HashMap;

use color_quant::NeuQuant;
use image::{Rgba, RgbaImage};
use tracing::debug;

/// Palette size used for PNG and GIF thumbnails.
pub const MAX_PALETTE_COLORS: usize = 255;

/// Alpha below this is treated as fully transparent in single-key formats.
const TRANSPARENT_ALPHA: u8 = 128;

/// An image stored as palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<Rgba<u8>>,
    pub indices: Vec<u8>,
}

impl IndexedImage {
    /// Palette as packed RGB triples.
    pub fn palette_rgb(&self) -> Vec<u8> {
        self.palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect()
    }

    /// Per-entry alpha values, in palette order.
    pub fn palette_alpha(&self) -> Vec<u8> {
        self.palette.iter().map(|c| c[3]).collect()
    }

    pub fn has_transparency(&self) -> bool {
        self.palette.iter().any(|c| c[3] < u8::MAX)
    }

    /// The most transparent palette entry, if it is transparent enough to be
    /// used as a single color key.
    pub fn transparent_index(&self) -> Option<u8> {
        self.palette
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| c[3])
            .filter(|(_, c)| c[3] < TRANSPARENT_ALPHA)
            .map(|(i, _)| i as u8)
    }

    /// Expand back to RGBA.
    #[cfg(test)]
    pub fn to_rgba(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (pixel, &index) in img.pixels_mut().zip(&self.indices) {
            *pixel = self.palette[usize::from(index)];
        }
        img
    }
}

/// Reduces an RGBA image to an indexed palette.
pub trait ColorQuantizer: Send + Sync {
    fn quantize(&self, image: &RgbaImage) -> IndexedImage;
}

/// NeuQuant neural-net quantizer.
///
/// Images that already use no more than `colors` distinct colors are indexed
/// exactly instead.
#[derive(Debug, Clone, Copy)]
pub struct NeuQuantizer {
    colors: usize,
    sample_factor: i32,
}

impl Default for NeuQuantizer {
    fn default() -> Self {
        Self::new(MAX_PALETTE_COLORS, 10)
    }
}

impl NeuQuantizer {
    /// `colors` is clamped to `2..=256`; `sample_factor` to `1..=30`
    /// (1 is slowest and most accurate).
    pub fn new(colors: usize, sample_factor: i32) -> Self {
        Self {
            colors: colors.clamp(2, 256),
            sample_factor: sample_factor.clamp(1, 30),
        }
    }

    pub fn colors(&self) -> usize {
        self.colors
    }
}

impl ColorQuantizer for NeuQuantizer {
    fn quantize(&self, image: &RgbaImage) -> IndexedImage {
        if let Some(indexed) = exact_palette(image, self.colors) {
            debug!(colors = indexed.palette.len(), "Indexed image with exact palette");
            return indexed;
        }

        let nq = NeuQuant::new(self.sample_factor, self.colors, image.as_raw());
        let palette = nq
            .color_map_rgba()
            .chunks_exact(4)
            .map(|c| Rgba([c[0], c[1], c[2], c[3]]))
            .collect();
        let indices = image.pixels().map(|p| nq.index_of(&p.0) as u8).collect();

        debug!(colors = self.colors, "Quantized image with NeuQuant");
        IndexedImage {
            width: image.width(),
            height: image.height(),
            palette,
            indices,
        }
    }
}

fn exact_palette(image: &RgbaImage, max_colors: usize) -> Option<IndexedImage> {
    let mut lookup: HashMap<Rgba<u8>, u8> = HashMap::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity(image.as_raw().len() / 4);

    for pixel in image.pixels() {
        let index = match lookup.get(pixel) {
            Some(&index) => index,
            None => {
                if palette.len() >= max_colors {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(*pixel);
                lookup.insert(*pixel, index);
                index
            }
        };
        indices.push(index);
    }

    Some(IndexedImage {
        width: image.width(),
        height: image.height(),
        palette,
        indices,
    })
}
