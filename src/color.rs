//! Hex color parsing for palette files
//!
//! Supports `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA`. Six-digit forms are
//! fully opaque; the leading `#` is optional.

use image::Rgba;
use thiserror::Error;

/// Fully transparent black, the result of every palette miss.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Parse a hex color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use worldmap::color::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_hex_color("976B4B").unwrap(), image::Rgba([151, 107, 75, 255]));
/// assert_eq!(parse_hex_color("#00000000").unwrap(), image::Rgba([0, 0, 0, 0]));
/// ```
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if hex.is_empty() {
        return Err(ColorError::Empty);
    }

    let digits = hex.chars().map(parse_hex_digit).collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        // #RGB -> #RRGGBB (doubled digits), alpha = 255
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255])),
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

/// Format a color as `#RRGGBBAA`.
pub fn format_hex_color(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}
