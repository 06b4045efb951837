//! Key color parsing and 8-bit HSV conversion.
//!
//! HSV values use the compact 8-bit scale common to image libraries:
//! hue in `0..=179` (degrees halved), saturation and value in `0..=255`.

use crate::types::KeyError;

/// Largest hue value on the 8-bit scale.
pub const HUE_MAX: i32 = 179;

/// A color in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue, `0..=179`.
    pub h: u8,
    /// Saturation, `0..=255`.
    pub s: u8,
    /// Value, `0..=255`.
    pub v: u8,
}

impl Hsv {
    /// Convert an RGB triple.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::many_single_char_names
    )]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = f64::from(max - min);

        let s = if max == 0 {
            0.0
        } else {
            (255.0 * diff / f64::from(max)).round()
        };

        let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
        let degrees = if diff == 0.0 {
            0.0
        } else if max == r {
            60.0 * (gf - bf) / diff
        } else if max == g {
            60.0f64.mul_add((bf - rf) / diff, 120.0)
        } else {
            60.0f64.mul_add((rf - gf) / diff, 240.0)
        };
        let degrees = if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        };

        // Rounding 359.x degrees lands on 180, which is hue 0 again.
        let h = (degrees / 2.0).round() as u16 % 180;

        Self {
            h: h as u8,
            s: s as u8,
            v: max,
        }
    }
}

/// Parse a `#RRGGBB` string (leading `#` optional) into RGB.
///
/// # Errors
///
/// Returns [`KeyError::InvalidColor`] unless the string holds exactly six
/// hex digits.
pub fn parse_hex(color: &str) -> Result<[u8; 3], KeyError> {
    let invalid = || KeyError::InvalidColor(color.to_owned());
    let digits = color.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Parse a `#RRGGBB` string straight into 8-bit HSV.
///
/// # Errors
///
/// Returns [`KeyError::InvalidColor`] if the string cannot be parsed.
pub fn hex_to_hsv(color: &str) -> Result<Hsv, KeyError> {
    let [r, g, b] = parse_hex(color)?;
    Ok(Hsv::from_rgb(r, g, b))
}
