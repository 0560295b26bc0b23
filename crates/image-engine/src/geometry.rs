//! Target size calculation for thumbnails.
//!
//! Two policies:
//! - fit: the result lies inside the bounding box and touches it on one axis
//! - cover: the result fills the bounding box on both axes and may overflow
//!   it on one, ready to be cropped
//!
//! All arithmetic is exact integer math (floor), so scaling the source by
//! any factor yields the same result.

use tracing::debug;

use crate::{ImageEngineError, Result};

/// Inputs to the size calculation. A zero bound means "unconstrained" and
/// takes the source dimension on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometrySpec {
    pub source_width: u32,
    pub source_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub crop_to_size: bool,
}

/// Width and height the source should be scaled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizedSize {
    pub width: u32,
    pub height: u32,
}

impl GeometrySpec {
    /// The bounding box with zero bounds replaced by the source dimension.
    pub fn bounds(&self) -> (u32, u32) {
        let max_width = if self.max_width == 0 {
            self.source_width
        } else {
            self.max_width
        };
        let max_height = if self.max_height == 0 {
            self.source_height
        } else {
            self.max_height
        };
        (max_width, max_height)
    }

    /// Compute the scaled size. Fails for a zero source dimension.
    pub fn resized_size(&self) -> Result<ResizedSize> {
        let (src_w, src_h) = (self.source_width, self.source_height);
        if src_w == 0 || src_h == 0 {
            return Err(ImageEngineError::InvalidDimension {
                width: src_w,
                height: src_h,
            });
        }
        let (max_w, max_h) = self.bounds();

        // max_h / src_h < max_w / src_w, cross-multiplied
        let height_limited =
            u64::from(max_h) * u64::from(src_w) < u64::from(max_w) * u64::from(src_h);
        let (mut width, mut height) = if height_limited {
            (scale(src_w, max_h, src_h), max_h)
        } else {
            (max_w, scale(src_h, max_w, src_w))
        };

        if self.crop_to_size {
            if height < max_h {
                height = max_h;
                width = scale(src_w, max_h, src_h);
            } else if width < max_w {
                width = max_w;
                height = scale(src_h, max_w, src_w);
            }
        }

        let size = ResizedSize {
            width: width.max(1),
            height: height.max(1),
        };
        debug!(
            src_w,
            src_h,
            max_w,
            max_h,
            crop = self.crop_to_size,
            width = size.width,
            height = size.height,
            "Computed thumbnail size"
        );
        Ok(size)
    }
}

/// Compute the thumbnail size for a source image and bounding box.
pub fn compute_size(
    source_width: u32,
    source_height: u32,
    max_width: u32,
    max_height: u32,
    crop_to_size: bool,
) -> Result<ResizedSize> {
    GeometrySpec {
        source_width,
        source_height,
        max_width,
        max_height,
        crop_to_size,
    }
    .resized_size()
}

/// `floor(value * numerator / denominator)`, saturating at `u32::MAX`.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(numerator) / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
