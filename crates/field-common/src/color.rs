//! 8-bit RGB colors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Add `amount` to every channel, saturating at 255.
    pub fn brighten(&self, amount: u8) -> Rgb {
        Rgb {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
        }
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1].
    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);

        let lerp_u8 = |a: u8, b: u8, t: f64| -> u8 {
            ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8
        };

        Rgb {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
        }
    }

    /// Parse "#RRGGBB" (the leading hash is optional).
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

        Some(Rgb { r, g, b })
    }

    /// Format as a CSS functional color, e.g. `rgb(34,139,34)`.
    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(arr: [u8; 3]) -> Self {
        Rgb::new(arr[0], arr[1], arr[2])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brighten_saturates() {
        let c = Rgb::new(34, 139, 230);
        assert_eq!(c.brighten(50), Rgb::new(84, 189, 255));
        assert_eq!(Rgb::WHITE.brighten(50), Rgb::WHITE);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#FF5500"), Some(Rgb::new(255, 85, 0)));
        assert_eq!(Rgb::from_hex("228b22"), Some(Rgb::new(34, 139, 34)));
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
    }

    #[test]
    fn test_css_and_hex_output() {
        let c = Rgb::new(34, 139, 34);
        assert_eq!(c.to_css(), "rgb(34,139,34)");
        assert_eq!(c.to_hex(), "#228B22");
        assert_eq!(c.to_string(), "rgb(34,139,34)");
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgb::BLACK;
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Rgb::new(100, 50, 25));
        assert_eq!(a.lerp(&b, 2.0), b);
    }
}
