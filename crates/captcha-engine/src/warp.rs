//! Perspective distortion of the rendered text.

use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, Projection, warp};
use rand::Rng;
use tracing::debug;

/// Each corner moves inward by up to `dimension / JITTER_DIVISOR`.
pub const JITTER_DIVISOR: f32 = 4.0;

/// Destination corners of the canvas rectangle after warping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpCorners {
    pub top_left: (f32, f32),
    pub top_right: (f32, f32),
    pub bottom_left: (f32, f32),
    pub bottom_right: (f32, f32),
}

impl WarpCorners {
    /// The untouched corners of a `width`x`height` canvas.
    pub fn identity(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            top_left: (0.0, 0.0),
            top_right: (w, 0.0),
            bottom_left: (0.0, h),
            bottom_right: (w, h),
        }
    }

    /// Corners pushed inward by a random amount on each axis.
    pub fn jittered(rng: &mut impl Rng, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let mut jx = || jitter(rng, width);
        let top_left_x = jx();
        let top_right_x = jx();
        let bottom_left_x = jx();
        let bottom_right_x = jx();
        let mut jy = || jitter(rng, height);
        let top_left_y = jy();
        let top_right_y = jy();
        let bottom_left_y = jy();
        let bottom_right_y = jy();

        Self {
            top_left: (top_left_x, top_left_y),
            top_right: (w - top_right_x, top_right_y),
            bottom_left: (bottom_left_x, h - bottom_left_y),
            bottom_right: (w - bottom_right_x, h - bottom_right_y),
        }
    }

    fn as_array(&self) -> [(f32, f32); 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

fn jitter(rng: &mut impl Rng, dimension: u32) -> f32 {
    rng.gen_range(0..dimension.max(1)) as f32 / JITTER_DIVISOR
}

/// Warp `mask` so the canvas rectangle lands on `corners`.
///
/// Falls back to an unwarped copy when the corners do not define a
/// projective transform.
pub fn warp_mask(mask: &GrayImage, corners: &WarpCorners) -> GrayImage {
    let (width, height) = mask.dimensions();
    let from = WarpCorners::identity(width, height).as_array();

    match Projection::from_control_points(from, corners.as_array()) {
        Some(projection) => warp(mask, &projection, Interpolation::Bilinear, Luma([0])),
        None => {
            debug!(width, height, "Degenerate warp corners, leaving text unwarped");
            mask.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn jittered_corners_stay_in_their_quadrant() {
        let mut rng = StdRng::seed_from_u64(9);
        let (w, h) = (300u32, 75u32);
        for _ in 0..100 {
            let c = WarpCorners::jittered(&mut rng, w, h);
            let (qw, qh) = (w as f32 / 4.0, h as f32 / 4.0);
            assert!(c.top_left.0 < qw && c.top_left.1 < qh);
            assert!(c.top_right.0 > w as f32 - qw && c.top_right.1 < qh);
            assert!(c.bottom_left.0 < qw && c.bottom_left.1 > h as f32 - qh);
            assert!(c.bottom_right.0 > w as f32 - qw && c.bottom_right.1 > h as f32 - qh);
        }
    }

    #[test]
    fn identity_warp_keeps_mask() {
        let mut mask = GrayImage::new(16, 16);
        for y in 4..12 {
            for x in 4..12 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let warped = warp_mask(&mask, &WarpCorners::identity(16, 16));
        assert_eq!(warped.dimensions(), (16, 16));
        assert!(warped.get_pixel(8, 8)[0] >= 250);
        assert_eq!(warped.get_pixel(0, 0), &Luma([0]));
    }

    #[test]
    fn warp_preserves_dimensions() {
        let mut rng = StdRng::seed_from_u64(5);
        let mask = GrayImage::from_pixel(40, 20, Luma([200]));
        let corners = WarpCorners::jittered(&mut rng, 40, 20);
        let warped = warp_mask(&mask, &corners);
        assert_eq!(warped.dimensions(), (40, 20));
    }
}
