//! Challenge generation with configured size and code length.

use ab_glyph::FontVec;
use captcha_engine::{CaptchaError, Challenge, generate_code, render};
use rand::Rng;

use crate::config::AppConfig;

pub struct CaptchaService {
    font: FontVec,
    width: u32,
    height: u32,
    code_length: usize,
}

impl CaptchaService {
    pub fn new(font: FontVec, config: &AppConfig) -> Self {
        Self {
            font,
            width: config.captcha_width,
            height: config.captcha_height,
            code_length: config.captcha_code_length,
        }
    }

    /// Generate a fresh code and render it.
    pub fn generate(&self, rng: &mut impl Rng) -> Result<Challenge, CaptchaError> {
        let code = generate_code(rng, self.code_length)?;
        let challenge = render(rng, &self.font, &code, self.width, self.height)?;
        tracing::info!(
            width = self.width,
            height = self.height,
            length = self.code_length,
            "Generated challenge"
        );
        Ok(challenge)
    }
}
