//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;

use image::Rgba;
use image_engine::{ThumbnailOptions, parse_rgba_spec};
use tracing::warn;

use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration for the captcha and thumbnail services.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub captcha_width: u32,
    pub captcha_height: u32,
    pub captcha_code_length: usize,
    pub captcha_font_path: Option<PathBuf>,
    pub thumbnail_max_width: u32,
    pub thumbnail_max_height: u32,
    pub thumbnail_crop: bool,
    pub thumbnail_background: Rgba<u8>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            captcha_width: captcha_engine::DEFAULT_WIDTH,
            captcha_height: captcha_engine::DEFAULT_HEIGHT,
            captcha_code_length: captcha_engine::DEFAULT_CODE_LENGTH,
            captcha_font_path: None,
            thumbnail_max_width: 0,
            thumbnail_max_height: 0,
            thumbnail_crop: false,
            thumbnail_background: Rgba([u8::MAX; 4]),
        }
    }
}

impl AppConfig {
    /// Load configuration through `lookup`. Missing or empty values take the
    /// default; values that fail validation are logged and take the default.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String { setting(&lookup, key) };
        let defaults = Self::default();

        Self {
            captcha_width: parse_u32(&g("CAPTCHA_WIDTH"), defaults.captcha_width),
            captcha_height: parse_u32(&g("CAPTCHA_HEIGHT"), defaults.captcha_height),
            captcha_code_length: g("CAPTCHA_CODE_LENGTH")
                .parse()
                .unwrap_or(defaults.captcha_code_length),
            captcha_font_path: {
                let p = g("CAPTCHA_FONT_PATH");
                if p.is_empty() { None } else { Some(PathBuf::from(p)) }
            },
            thumbnail_max_width: parse_u32(
                &g("THUMBNAIL_MAX_WIDTH"),
                defaults.thumbnail_max_width,
            ),
            thumbnail_max_height: parse_u32(
                &g("THUMBNAIL_MAX_HEIGHT"),
                defaults.thumbnail_max_height,
            ),
            thumbnail_crop: g("THUMBNAIL_CROP") == "true",
            thumbnail_background: parse_rgba_spec(&g("THUMBNAIL_BACKGROUND"))
                .unwrap_or(defaults.thumbnail_background),
        }
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Thumbnail options for the configured bounds, crop policy and matte.
    pub fn thumbnail_options(&self) -> ThumbnailOptions {
        ThumbnailOptions::new(self.thumbnail_max_width, self.thumbnail_max_height)
            .with_crop(self.thumbnail_crop)
            .with_background(self.thumbnail_background)
    }
}

/// Resolve one key: the looked-up value if present and valid, else the default.
fn setting(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> String {
    let default = get_default(key).unwrap_or_default();
    let Some(value) = lookup(key).map(|v| v.trim().to_string()) else {
        return default.to_string();
    };
    if value.is_empty() {
        return default.to_string();
    }
    match validate_setting(key, &value) {
        Ok(()) => value,
        Err(reason) => {
            warn!(
                key,
                value = %value,
                reason = %reason,
                default,
                "Invalid setting, using default"
            );
            default.to_string()
        }
    }
}

fn parse_u32(s: &str, default: u32) -> u32 {
    s.parse().unwrap_or(default)
}
