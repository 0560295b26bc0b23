pub mod config;
pub mod services;

use config::AppConfig;
use services::{CaptchaService, FontService, ThumbnailService};

/// Load `.env` from the working directory or up to two parents.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load `.env` and read the configuration from the environment.
pub fn init_config() -> AppConfig {
    load_dotenv();
    let config = AppConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");
    config
}

/// Build the captcha service, resolving the configured or system font.
pub fn captcha_service(config: &AppConfig) -> Result<CaptchaService, anyhow::Error> {
    let font = FontService::new(config.captcha_font_path.clone()).load()?;
    Ok(CaptchaService::new(font, config))
}

pub fn thumbnail_service(config: &AppConfig) -> ThumbnailService {
    ThumbnailService::new(config.thumbnail_options())
}
