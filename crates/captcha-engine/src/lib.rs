//! CAPTCHA challenge rendering.
//!
//! Generates short codes from an unambiguous alphabet and renders them as
//! perspective-warped, hatch-textured bitmaps with scattered noise dots.
//! The random source and the font are always supplied by the caller.

pub mod challenge;
pub mod code;
pub mod noise;
pub mod pattern;
pub mod render;
pub mod text;
pub mod warp;

// Re-exports for convenience
pub use challenge::Challenge;
pub use code::{ALPHABET, generate_code, random_code};
pub use render::{RenderTarget, render, render_random};

/// Code length used by [`random_code`] and [`render_random`].
pub const DEFAULT_CODE_LENGTH: usize = 5;

/// Default challenge canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 300;

/// Default challenge canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 75;

/// Errors that can occur while generating a challenge.
#[derive(Debug, thiserror::Error)]
pub enum CaptchaError {
    #[error("Invalid canvas dimensions {width}x{height}: both must be greater than zero")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Invalid code length {0}: must be greater than zero")]
    InvalidLength(usize),

    #[error("Failed to allocate a {width}x{height} canvas")]
    AllocationFailure { width: u32, height: u32 },

    #[error("Failed to encode challenge bitmap: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type alias for captcha operations.
pub type Result<T> = std::result::Result<T, CaptchaError>;
