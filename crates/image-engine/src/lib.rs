//! Thumbnail generation.
//!
//! Provides aspect-preserving resize math with optional cover-and-crop,
//! background matte composition, and per-format encoding with palette
//! reduction for PNG and GIF output. Also carries the small helpers the
//! thumbnail pipeline needs: mime-type lookup, `rgba(...)` color parsing,
//! and human-readable byte sizes.

pub mod codec;
pub mod color;
pub mod compose;
pub mod geometry;
pub mod mime;
pub mod quantize;
pub mod resize;
pub mod size;
pub mod thumbnail;

// Re-exports for convenience
pub use codec::{CodecRegistry, ThumbnailEncoder};
pub use color::parse_rgba_spec;
pub use compose::{ThumbnailOptions, compose};
pub use geometry::{GeometrySpec, ResizedSize, compute_size};
pub use mime::{OutputFormat, mime_type};
pub use quantize::{ColorQuantizer, IndexedImage, NeuQuantizer};
pub use size::byte_size;
pub use thumbnail::{Thumbnailer, create_thumbnail};

/// Errors that can occur while producing a thumbnail.
#[derive(Debug, thiserror::Error)]
pub enum ImageEngineError {
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Unsupported output format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Malformed color spec: {0:?}")]
    MalformedColorSpec(String),

    #[error("Failed to allocate a {width}x{height} bitmap")]
    AllocationFailure { width: u32, height: u32 },

    #[error("Failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for image-engine operations.
pub type Result<T> = std::result::Result<T, ImageEngineError>;
