//! Font discovery for challenge rendering.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024; // 50MB
const VALID_EXTENSIONS: &[&str] = &[".ttf", ".otf", ".ttc"];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Invalid font format (only TTF/OTF/TTC supported): {}", .0.display())]
    InvalidFormat(PathBuf),
    #[error("Font file too large (max 50MB): {}", .0.display())]
    FileTooLarge(PathBuf),
    #[error("Font could not be parsed: {}", .0.display())]
    Unreadable(PathBuf),
    #[error("No usable system font found")]
    NoSystemFont,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads the challenge font: a configured file, or the first installed
/// bold sans-serif system font.
#[derive(Debug, Clone, Default)]
pub struct FontService {
    custom_path: Option<PathBuf>,
}

impl FontService {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Load the font. A configured path that fails to load is an error; it
    /// does not fall back to system fonts.
    pub fn load(&self) -> Result<FontVec, FontError> {
        if let Some(path) = &self.custom_path {
            let font = load_font_file(path)?;
            tracing::info!(path = %path.display(), "Loaded custom font");
            return Ok(font);
        }

        for &candidate in system_font_candidates() {
            match load_font_file(Path::new(candidate)) {
                Ok(font) => {
                    tracing::info!(path = candidate, "Loaded system font");
                    return Ok(font);
                }
                Err(e) => {
                    tracing::debug!(path = candidate, error = %e, "Skipping font candidate");
                }
            }
        }
        Err(FontError::NoSystemFont)
    }
}

/// Read and parse a single font file, checking extension and size first.
pub fn load_font_file(path: &Path) -> Result<FontVec, FontError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    if !VALID_EXTENSIONS.contains(&ext.as_str()) {
        return Err(FontError::InvalidFormat(path.to_path_buf()));
    }

    if std::fs::metadata(path)?.len() > MAX_FONT_SIZE {
        return Err(FontError::FileTooLarge(path.to_path_buf()));
    }

    let data = std::fs::read(path)?;
    // collections resolve to their first face
    let parsed = if ext == ".ttc" {
        FontVec::try_from_vec_and_index(data, 0)
    } else {
        FontVec::try_from_vec(data)
    };
    parsed.map_err(|_| FontError::Unreadable(path.to_path_buf()))
}

/// Bold sans-serif fonts commonly installed on each platform.
pub fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            "/System/Library/Fonts/Supplemental/Verdana Bold.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\arialbd.ttf",
            "C:\\Windows\\Fonts\\verdanab.ttf",
            "C:\\Windows\\Fonts\\segoeuib.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        ]
    }
}
