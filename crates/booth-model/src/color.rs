//! Opaque sRGB colors.

use photobooth_common::error::BoothError;
use serde::{Deserialize, Serialize};

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, BoothError> {
        let invalid = || BoothError::Config {
            message: format!("invalid hex color: {hex:?}"),
        };
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// RGBA pixel with full alpha.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation in sRGB space, as canvas gradients do.
    pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
        Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#0a1aff").unwrap(), Rgb::new(0x0a, 0x1a, 0xff));
        assert_eq!(Rgb::from_hex("fff").unwrap(), Rgb::WHITE);
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(Rgb::lerp(a, b, 0.0), a);
        assert_eq!(Rgb::lerp(a, b, 1.0), b);
        assert_eq!(Rgb::lerp(a, b, 0.5), Rgb::new(100, 50, 25));
    }
}
