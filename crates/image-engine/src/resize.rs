//! Scaling a decoded source to a computed thumbnail size.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::geometry::ResizedSize;

/// Filter used for every thumbnail resize (bicubic).
pub const THUMBNAIL_FILTER: FilterType = FilterType::CatmullRom;

/// Scale `img` to exactly `size`, ignoring aspect ratio (the size already
/// carries it). Returns an unscaled RGBA copy when the size already matches.
pub fn resize_to(img: &DynamicImage, size: ResizedSize) -> RgbaImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if (orig_w, orig_h) == (size.width, size.height) {
        debug!(orig_w, orig_h, "Source already at thumbnail size, skipping resize");
        return img.to_rgba8();
    }

    debug!(
        orig_w,
        orig_h,
        new_width = size.width,
        new_height = size.height,
        "Resizing source for thumbnail"
    );

    img.resize_exact(size.width, size.height, THUMBNAIL_FILTER)
        .into_rgba8()
}
