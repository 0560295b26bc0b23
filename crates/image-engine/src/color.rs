//! `rgba(r,g,b,a)` background color parsing.

use std::sync::LazyLock;

use image::Rgba;
use regex::Regex;

use crate::{ImageEngineError, Result};

/// Opaque white.
pub const DEFAULT_BACKGROUND: &str = "rgba(1.0,1.0,1.0,1.0)";

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]*\.?[0-9]+").unwrap());

/// Parse a color spec whose four components are fractions in `0.0..=1.0`.
///
/// Numbers are pulled out of the string in order; exactly four must be
/// present. Each maps to an 8-bit channel as `round(value * 255)`.
pub fn parse_rgba_spec(spec: &str) -> Result<Rgba<u8>> {
    let malformed = || ImageEngineError::MalformedColorSpec(spec.to_string());

    let values = RE_NUMBER
        .find_iter(spec)
        .map(|m| m.as_str().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;

    let &[r, g, b, a] = values.as_slice() else {
        return Err(malformed());
    };

    let channel = |value: f64| -> Result<u8> {
        if !(0.0..=1.0).contains(&value) {
            return Err(malformed());
        }
        Ok((value * 255.0).round() as u8)
    };

    Ok(Rgba([channel(r)?, channel(g)?, channel(b)?, channel(a)?]))
}
