//! Random challenge code generation.

use rand::Rng;

use crate::{CaptchaError, DEFAULT_CODE_LENGTH, Result};

/// Characters a challenge code may contain.
///
/// `0 O o 1 I i L l` are left out: once warped they are indistinguishable.
pub const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// Generate a code of exactly `length` characters drawn uniformly, with
/// replacement, from [`ALPHABET`].
pub fn generate_code(rng: &mut impl Rng, length: usize) -> Result<String> {
    if length == 0 {
        return Err(CaptchaError::InvalidLength(length));
    }
    Ok((0..length).map(|_| pick(rng)).collect())
}

/// Generate a code of the default length.
pub fn random_code(rng: &mut impl Rng) -> String {
    (0..DEFAULT_CODE_LENGTH).map(|_| pick(rng)).collect()
}

fn pick(rng: &mut impl Rng) -> char {
    ALPHABET[rng.gen_range(0..ALPHABET.len())] as char
}
