//! Per-format thumbnail encoders and the registry that selects them.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use tracing::debug;

use crate::mime::OutputFormat;
use crate::quantize::{ColorQuantizer, NeuQuantizer};
use crate::{ImageEngineError, Result};

/// JPEG quality used for thumbnails.
pub const JPEG_QUALITY: u8 = 100;

/// Writes a finished thumbnail bitmap to a stream.
pub trait ThumbnailEncoder: Send + Sync {
    fn encode(&self, image: &RgbaImage, out: &mut dyn Write) -> Result<()>;
}

/// Baseline JPEG. Alpha is dropped.
#[derive(Debug, Clone, Copy)]
pub struct JpegThumbnailEncoder {
    pub quality: u8,
}

impl Default for JpegThumbnailEncoder {
    fn default() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl ThumbnailEncoder for JpegThumbnailEncoder {
    fn encode(&self, image: &RgbaImage, out: &mut dyn Write) -> Result<()> {
        let rgb: RgbImage = image.convert();
        JpegEncoder::new_with_quality(out, self.quality)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| ImageEngineError::Encode(format!("jpeg: {e}")))
    }
}

/// 8-bit indexed PNG with a transparency chunk when the palette needs one.
pub struct PngPaletteEncoder {
    quantizer: Box<dyn ColorQuantizer>,
}

impl PngPaletteEncoder {
    pub fn new(quantizer: impl ColorQuantizer + 'static) -> Self {
        Self {
            quantizer: Box::new(quantizer),
        }
    }
}

impl ThumbnailEncoder for PngPaletteEncoder {
    fn encode(&self, image: &RgbaImage, out: &mut dyn Write) -> Result<()> {
        let indexed = self.quantizer.quantize(image);
        let png_err = |e: png::EncodingError| ImageEngineError::Encode(format!("png: {e}"));

        let mut encoder = png::Encoder::new(out, indexed.width, indexed.height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(indexed.palette_rgb());
        if indexed.has_transparency() {
            encoder.set_trns(indexed.palette_alpha());
        }

        let mut writer = encoder.write_header().map_err(png_err)?;
        writer.write_image_data(&indexed.indices).map_err(png_err)?;
        writer.finish().map_err(png_err)
    }
}

/// Single-frame GIF with a global palette and optional color key.
pub struct GifPaletteEncoder {
    quantizer: Box<dyn ColorQuantizer>,
}

impl GifPaletteEncoder {
    pub fn new(quantizer: impl ColorQuantizer + 'static) -> Self {
        Self {
            quantizer: Box::new(quantizer),
        }
    }
}

impl ThumbnailEncoder for GifPaletteEncoder {
    fn encode(&self, image: &RgbaImage, out: &mut dyn Write) -> Result<()> {
        let (width, height) = image.dimensions();
        let invalid = || ImageEngineError::InvalidDimension { width, height };
        let w = u16::try_from(width).map_err(|_| invalid())?;
        let h = u16::try_from(height).map_err(|_| invalid())?;

        let indexed = self.quantizer.quantize(image);
        let gif_err = |e: gif::EncodingError| ImageEngineError::Encode(format!("gif: {e}"));

        let mut encoder = gif::Encoder::new(out, w, h, &indexed.palette_rgb()).map_err(gif_err)?;
        let mut frame = gif::Frame::default();
        frame.width = w;
        frame.height = h;
        frame.transparent = indexed.transparent_index();
        frame.buffer = Cow::Owned(indexed.indices);
        encoder.write_frame(&frame).map_err(gif_err)
    }
}

/// Encoders keyed by output format.
pub struct CodecRegistry {
    encoders: HashMap<OutputFormat, Box<dyn ThumbnailEncoder>>,
}

impl Default for CodecRegistry {
    /// JPEG at quality 100; PNG and GIF through a 255-color NeuQuant palette.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(OutputFormat::Jpeg, JpegThumbnailEncoder::default())
            .register(
                OutputFormat::Png,
                PngPaletteEncoder::new(NeuQuantizer::default()),
            )
            .register(
                OutputFormat::Gif,
                GifPaletteEncoder::new(NeuQuantizer::default()),
            );
        registry
    }
}

impl CodecRegistry {
    /// A registry with no encoders.
    pub fn empty() -> Self {
        Self {
            encoders: HashMap::new(),
        }
    }

    /// Register or replace the encoder for `format`.
    pub fn register(
        &mut self,
        format: OutputFormat,
        encoder: impl ThumbnailEncoder + 'static,
    ) -> &mut Self {
        self.encoders.insert(format, Box::new(encoder));
        self
    }

    pub fn encoder(&self, format: OutputFormat) -> Result<&dyn ThumbnailEncoder> {
        self.encoders
            .get(&format)
            .map(|e| e.as_ref())
            .ok_or_else(|| ImageEngineError::UnsupportedFormat(format.mime().to_string()))
    }

    /// Encode `image` in the format named by `mime`.
    pub fn encode(
        &self,
        mime: &str,
        image: &RgbaImage,
        out: &mut dyn Write,
    ) -> Result<OutputFormat> {
        let format = OutputFormat::from_mime(mime)?;
        self.encoder(format)?.encode(image, out)?;
        debug!(%format, width = image.width(), height = image.height(), "Encoded thumbnail");
        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgba};

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([220, 40, 40, 255])
            } else {
                Rgba([20, 20, 200, 255])
            }
        })
    }

    fn encode(mime: &str, image: &RgbaImage) -> Vec<u8> {
        let mut out = Vec::new();
        CodecRegistry::default().encode(mime, image, &mut out).unwrap();
        out
    }

    #[test]
    fn jpeg_output_decodes() {
        let bytes = encode("image/jpeg", &checker(32, 16));
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
    }

    #[test]
    fn png_output_is_lossless_for_small_palettes() {
        let img = checker(16, 8);
        let bytes = encode("image/png", &img);
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgba8(), img);
    }

    #[test]
    fn png_keeps_transparency() {
        let mut img = checker(8, 8);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let bytes = encode("image/png", &img);
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
        assert_eq!(decoded.get_pixel(4, 0)[3], 255);
    }

    #[test]
    fn gif_output_decodes() {
        let img = checker(20, 10);
        let bytes = encode("image/gif", &img);
        assert_eq!(&bytes[..3], b"GIF");
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Gif).unwrap();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert_eq!(decoded.to_rgba8().get_pixel(0, 0), &Rgba([220, 40, 40, 255]));
    }

    #[test]
    fn unsupported_mime_writes_nothing() {
        let mut out = Vec::new();
        let err = CodecRegistry::default()
            .encode("image/bmp", &checker(4, 4), &mut out)
            .unwrap_err();
        assert!(matches!(err, ImageEngineError::UnsupportedFormat(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn empty_registry_rejects_known_format() {
        let registry = CodecRegistry::empty();
        assert!(matches!(
            registry.encoder(OutputFormat::Png),
            Err(ImageEngineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn registered_encoder_replaces_default() {
        struct Marker;
        impl ThumbnailEncoder for Marker {
            fn encode(&self, _image: &RgbaImage, out: &mut dyn Write) -> Result<()> {
                out.write_all(b"marker")?;
                Ok(())
            }
        }

        let mut registry = CodecRegistry::default();
        registry.register(OutputFormat::Jpeg, Marker);
        let mut out = Vec::new();
        registry.encode("image/jpeg", &checker(2, 2), &mut out).unwrap();
        assert_eq!(out, b"marker");
    }
}
