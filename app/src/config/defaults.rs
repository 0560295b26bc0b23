//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("CAPTCHA_WIDTH", "300", "Challenge image width in pixels"),
    ("CAPTCHA_HEIGHT", "75", "Challenge image height in pixels"),
    (
        "CAPTCHA_CODE_LENGTH",
        "5",
        "Number of characters in a challenge code",
    ),
    (
        "CAPTCHA_FONT_PATH",
        "",
        "TTF/OTF/TTC font for challenges (empty: system bold sans)",
    ),
    (
        "THUMBNAIL_MAX_WIDTH",
        "0",
        "Thumbnail bounding box width (0: unconstrained)",
    ),
    (
        "THUMBNAIL_MAX_HEIGHT",
        "0",
        "Thumbnail bounding box height (0: unconstrained)",
    ),
    (
        "THUMBNAIL_CROP",
        "false",
        "Cover the bounding box and crop the overflow",
    ),
    (
        "THUMBNAIL_BACKGROUND",
        "rgba(1.0,1.0,1.0,1.0)",
        "Matte color behind transparent pixels",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}
