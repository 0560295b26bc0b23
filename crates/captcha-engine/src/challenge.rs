//! A rendered challenge: the code plus its bitmap.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage};

use crate::Result;

/// A rendered challenge. Immutable once built.
#[derive(Debug, Clone)]
pub struct Challenge {
    code: String,
    image: RgbaImage,
}

impl Challenge {
    pub(crate) fn new(code: String, image: RgbaImage) -> Self {
        Self { code, image }
    }

    /// The code drawn in the image.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode the bitmap as an uncompressed BMP.
    pub fn to_bmp(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.image.write_to(&mut cursor, ImageFormat::Bmp)?;
        Ok(cursor.into_inner())
    }

    /// Base64 of the BMP bytes.
    pub fn base64_bmp(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_bmp()?))
    }

    /// The BMP as a `data:` URI for embedding in markup.
    pub fn data_uri(&self) -> Result<String> {
        Ok(format!("data:image/bmp;base64,{}", self.base64_bmp()?))
    }
}
