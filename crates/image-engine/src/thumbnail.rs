//! Decode, compose and encode in one call.

use std::io::Write;

use tracing::{debug, info};

use crate::codec::CodecRegistry;
use crate::compose::{ThumbnailOptions, compose};
use crate::geometry::ResizedSize;
use crate::mime::OutputFormat;
use crate::{ImageEngineError, Result};

/// Thumbnail pipeline bound to a set of encoders.
#[derive(Default)]
pub struct Thumbnailer {
    codecs: CodecRegistry,
}

impl Thumbnailer {
    pub fn new(codecs: CodecRegistry) -> Self {
        Self { codecs }
    }

    /// Decode `source`, fit it to `options`, and write it to `out` as `mime`.
    ///
    /// The output format is resolved before decoding, so an unsupported
    /// mime type fails without touching `out`. Returns the dimensions of the
    /// written thumbnail.
    pub fn create_thumbnail<W: Write>(
        &self,
        source: &[u8],
        mime: &str,
        options: &ThumbnailOptions,
        out: &mut W,
    ) -> Result<ResizedSize> {
        let format = OutputFormat::from_mime(mime)?;
        let encoder = self.codecs.encoder(format)?;

        let image = image::load_from_memory(source).map_err(ImageEngineError::Decode)?;
        debug!(
            width = image.width(),
            height = image.height(),
            bytes = source.len(),
            "Decoded thumbnail source"
        );

        let canvas = compose(&image, options)?;
        encoder.encode(&canvas, out)?;

        let size = ResizedSize {
            width: canvas.width(),
            height: canvas.height(),
        };
        info!(%format, width = size.width, height = size.height, "Created thumbnail");
        Ok(size)
    }
}

/// [`Thumbnailer::create_thumbnail`] with the default encoders.
pub fn create_thumbnail<W: Write>(
    source: &[u8],
    mime: &str,
    options: &ThumbnailOptions,
    out: &mut W,
) -> Result<ResizedSize> {
    Thumbnailer::default().create_thumbnail(source, mime, options, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};

    fn png_source(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgba([200, 30, 30, 255])
            } else {
                Rgba([30, 30, 200, 255])
            }
        });
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn round_trip(mime: &str, format: ImageFormat, options: ThumbnailOptions) -> (u32, u32) {
        let mut out = Vec::new();
        let size = create_thumbnail(&png_source(120, 60), mime, &options, &mut out).unwrap();
        let decoded = image::load_from_memory_with_format(&out, format).unwrap();
        assert_eq!(decoded.dimensions(), (size.width, size.height));
        decoded.dimensions()
    }

    #[test]
    fn png_fit() {
        let dims = round_trip("image/png", ImageFormat::Png, ThumbnailOptions::new(60, 60));
        assert_eq!(dims, (60, 30));
    }

    #[test]
    fn jpeg_fit() {
        let dims = round_trip("image/jpeg", ImageFormat::Jpeg, ThumbnailOptions::new(30, 0));
        assert_eq!(dims, (30, 15));
    }

    #[test]
    fn gif_crop() {
        let options = ThumbnailOptions::new(40, 40).with_crop(true);
        let dims = round_trip("image/gif", ImageFormat::Gif, options);
        assert_eq!(dims, (40, 40));
    }

    #[test]
    fn png_crop_keeps_both_halves() {
        let options = ThumbnailOptions::new(40, 40).with_crop(true);
        let mut out = Vec::new();
        create_thumbnail(&png_source(120, 60), "image/png", &options, &mut out).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();
        assert!(decoded.get_pixel(0, 20)[0].abs_diff(200) <= 2);
        assert!(decoded.get_pixel(39, 20)[2].abs_diff(200) <= 2);
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let mut out = Vec::new();
        let err = create_thumbnail(
            &png_source(10, 10),
            "image/webp",
            &ThumbnailOptions::default(),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, ImageEngineError::UnsupportedFormat(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn garbage_source_fails_to_decode() {
        let mut out = Vec::new();
        let err = create_thumbnail(
            b"not an image",
            "image/png",
            &ThumbnailOptions::default(),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, ImageEngineError::Decode(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn custom_registry_is_used() {
        let thumbnailer = Thumbnailer::new(CodecRegistry::empty());
        let mut out = Vec::new();
        let err = thumbnailer
            .create_thumbnail(
                &png_source(10, 10),
                "image/png",
                &ThumbnailOptions::default(),
                &mut out,
            )
            .unwrap_err();
        assert!(matches!(err, ImageEngineError::UnsupportedFormat(_)));
    }
}
