//! File-to-file thumbnail conversion.

use std::path::{Path, PathBuf};

use image_engine::{ImageEngineError, OutputFormat, ThumbnailOptions, Thumbnailer, byte_size};

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Engine(#[from] ImageEngineError),
}

/// Outcome of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailReport {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub source_bytes: usize,
    pub output_bytes: usize,
}

#[derive(Default)]
pub struct ThumbnailService {
    thumbnailer: Thumbnailer,
    options: ThumbnailOptions,
}

impl ThumbnailService {
    pub fn new(options: ThumbnailOptions) -> Self {
        Self {
            thumbnailer: Thumbnailer::default(),
            options,
        }
    }

    /// Thumbnail `source` bytes into the format named by `output`'s extension.
    pub fn convert_bytes(
        &self,
        source: &[u8],
        output: &Path,
    ) -> Result<(Vec<u8>, ThumbnailReport), ThumbnailError> {
        let format = OutputFormat::from_filename(&output.to_string_lossy())?;
        let mut encoded = Vec::new();
        let size = self
            .thumbnailer
            .create_thumbnail(source, format.mime(), &self.options, &mut encoded)?;
        let report = ThumbnailReport {
            format,
            width: size.width,
            height: size.height,
            source_bytes: source.len(),
            output_bytes: encoded.len(),
        };
        Ok((encoded, report))
    }

    /// Read `input`, thumbnail it, and write the result to `output`. The
    /// output file is only created once encoding has succeeded.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ThumbnailReport, ThumbnailError> {
        let source = std::fs::read(input).map_err(|source| ThumbnailError::Read {
            path: input.to_path_buf(),
            source,
        })?;
        let (encoded, report) = self.convert_bytes(&source, output)?;
        std::fs::write(output, &encoded).map_err(|source| ThumbnailError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            format = %report.format,
            width = report.width,
            height = report.height,
            source_size = %byte_size(report.source_bytes as i64),
            output_size = %byte_size(report.output_bytes as i64),
            "Thumbnail written"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("imaging-kit-thumb-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_convert_bytes_reports_size() {
        let service = ThumbnailService::new(ThumbnailOptions::new(50, 50));
        let (encoded, report) = service
            .convert_bytes(&png_bytes(200, 100), Path::new("out.gif"))
            .unwrap();
        assert_eq!(report.format, OutputFormat::Gif);
        assert_eq!((report.width, report.height), (50, 25));
        assert_eq!(report.output_bytes, encoded.len());
        assert_eq!(&encoded[..3], b"GIF");
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let service = ThumbnailService::default();
        let err = service
            .convert_bytes(&png_bytes(4, 4), Path::new("out.bmp"))
            .unwrap_err();
        assert!(matches!(
            err,
            ThumbnailError::Engine(ImageEngineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_convert_file_round_trip() {
        let input = temp_path("in.png");
        let output = temp_path("out.jpg");
        std::fs::write(&input, png_bytes(64, 64)).unwrap();

        let service = ThumbnailService::new(ThumbnailOptions::new(16, 32).with_crop(true));
        let report = service.convert_file(&input, &output).unwrap();
        let decoded = image::open(&output).unwrap();
        let _ = std::fs::remove_file(&input);
        let _ = std::fs::remove_file(&output);

        assert_eq!(report.format, OutputFormat::Jpeg);
        assert_eq!((decoded.width(), decoded.height()), (16, 32));
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let service = ThumbnailService::default();
        let output = temp_path("never.png");
        let err = service
            .convert_file(Path::new("/nonexistent/in.png"), &output)
            .unwrap_err();
        assert!(matches!(err, ThumbnailError::Read { .. }));
        assert!(!output.exists());
    }
}
