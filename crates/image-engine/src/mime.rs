//! Mime-type lookup and the output formats a thumbnail can be written in.

use std::fmt;

use crate::{ImageEngineError, Result};

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_GIF: &str = "image/gif";
pub const IMAGE_PNG: &str = "image/png";

/// Mime type for a filename or bare extension, or `""` when unrecognized.
///
/// Matching is case-insensitive. A name without a dot is treated as an
/// extension, so `"png"` and `"x.png"` resolve the same way.
pub fn mime_type(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => name,
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => IMAGE_JPEG,
        "gif" => IMAGE_GIF,
        "png" => IMAGE_PNG,
        _ => "",
    }
}

/// Encodable thumbnail format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Jpeg, Self::Png, Self::Gif];

    /// Resolve a declared mime type. Anything other than the three known
    /// types is [`ImageEngineError::UnsupportedFormat`].
    pub fn from_mime(mime: &str) -> Result<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            IMAGE_JPEG => Ok(Self::Jpeg),
            IMAGE_PNG => Ok(Self::Png),
            IMAGE_GIF => Ok(Self::Gif),
            _ => Err(ImageEngineError::UnsupportedFormat(mime.to_string())),
        }
    }

    /// Resolve the format from a filename's extension.
    pub fn from_filename(name: &str) -> Result<Self> {
        match mime_type(name) {
            "" => Err(ImageEngineError::UnsupportedFormat(name.to_string())),
            mime => Self::from_mime(mime),
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => IMAGE_JPEG,
            Self::Png => IMAGE_PNG,
            Self::Gif => IMAGE_GIF,
        }
    }

    /// Whether the format stores a reduced color palette.
    pub const fn is_palette(self) -> bool {
        matches!(self, Self::Png | Self::Gif)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_filename_is_case_insensitive() {
        assert_eq!(mime_type("photo.JPG"), IMAGE_JPEG);
        assert_eq!(mime_type("photo.jpeg"), IMAGE_JPEG);
        assert_eq!(mime_type("anim.Gif"), IMAGE_GIF);
        assert_eq!(mime_type("dir/archive.tar.png"), IMAGE_PNG);
    }

    #[test]
    fn bare_extension_is_accepted() {
        assert_eq!(mime_type("png"), IMAGE_PNG);
        assert_eq!(mime_type("JPEG"), IMAGE_JPEG);
        assert_eq!(mime_type(".gif"), IMAGE_GIF);
    }

    #[test]
    fn unknown_extension_is_empty() {
        assert_eq!(mime_type("doc.txt"), "");
        assert_eq!(mime_type("noext."), "");
        assert_eq!(mime_type(""), "");
        assert_eq!(mime_type("bmp"), "");
    }

    #[test]
    fn output_format_from_mime() {
        assert_eq!(OutputFormat::from_mime("image/jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_mime(" IMAGE/PNG ").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_mime("image/gif").unwrap(), OutputFormat::Gif);
        assert!(matches!(
            OutputFormat::from_mime("image/webp"),
            Err(ImageEngineError::UnsupportedFormat(_))
        ));
        assert!(OutputFormat::from_mime("").is_err());
    }

    #[test]
    fn output_format_from_filename() {
        assert_eq!(OutputFormat::from_filename("a.jpg").unwrap(), OutputFormat::Jpeg);
        assert!(OutputFormat::from_filename("a.bmp").is_err());
    }

    #[test]
    fn palette_formats() {
        assert!(!OutputFormat::Jpeg.is_palette());
        assert!(OutputFormat::Png.is_palette());
        assert!(OutputFormat::Gif.is_palette());
        for format in OutputFormat::ALL {
            assert_eq!(OutputFormat::from_mime(format.mime()).unwrap(), format);
        }
    }
}
