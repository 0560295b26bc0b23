//! Services wiring configuration to the rendering engines.

pub mod captcha;
pub mod font;
pub mod thumbnail;

pub use captcha::CaptchaService;
pub use font::{FontError, FontService};
pub use thumbnail::{ThumbnailError, ThumbnailReport, ThumbnailService};
