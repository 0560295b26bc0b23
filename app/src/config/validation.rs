//! Setting value validation.

use image_engine::parse_rgba_spec;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "CAPTCHA_WIDTH" | "CAPTCHA_HEIGHT" => validate_int_range(value, 1, 4096)?,
        "CAPTCHA_CODE_LENGTH" => validate_int_range(value, 1, 16)?,
        "THUMBNAIL_MAX_WIDTH" | "THUMBNAIL_MAX_HEIGHT" => validate_int_range(value, 0, 8192)?,
        "CAPTCHA_FONT_PATH" => {
            let ext = std::path::Path::new(value)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if !value.is_empty() && !FONT_EXTENSIONS.contains(&ext.as_str()) {
                return Err("font must be a .ttf, .otf or .ttc file".into());
            }
        }
        "THUMBNAIL_BACKGROUND" => {
            parse_rgba_spec(value)
                .map_err(|_| "must be rgba(r,g,b,a) with components in 0.0-1.0")?;
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "THUMBNAIL_CROP")
}
