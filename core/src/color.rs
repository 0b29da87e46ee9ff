//! Linear RGB color triple used for shader uniforms.

use std::fmt;

use crate::math::{Vec3, saturate};

/// Linear RGB color with `f32` channels.
///
/// Channels are nominally in `[0, 1]`. Values outside that range are
/// representable; [`Rgb::clamped`] and [`Rgb::is_valid`] let callers enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Error produced when parsing a `#rrggbb` color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color: {}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Uniform gray.
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::new(r, g, b)
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ColorParseError(s.to_string()));
        }
        let hex = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError(s.to_string()))?;
        Ok(Self::from_hex(hex))
    }

    /// Pack back into `0xRRGGBB`, rounding each channel.
    pub fn to_hex(self) -> u32 {
        let c = self.clamped();
        let byte = |v: f32| (v * 255.0).round() as u32;
        (byte(c.r) << 16) | (byte(c.g) << 8) | byte(c.b)
    }

    /// `true` when every channel is finite and inside `[0, 1]`.
    pub fn is_valid(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// Clamp every channel to `[0, 1]`. NaN channels become 0.
    pub fn clamped(self) -> Self {
        let clamp = |c: f32| {
            if c.is_nan() { 0.0 } else { saturate(c) }
        };
        Self::new(clamp(self.r), clamp(self.g), clamp(self.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn from_vec3(v: &Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Rgb::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#ffffff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::parse_hex("000000").unwrap(), Rgb::BLACK);
        assert_eq!(Rgb::parse_hex("#ADD8E6").unwrap().to_hex(), 0xadd8e6);
        assert!(Rgb::parse_hex("#fff").is_err());
        assert!(Rgb::parse_hex("#gggggg").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let c = Rgb::from_hex(0x333333);
        assert_eq!(c.to_string(), "#333333");
    }

    #[test]
    fn test_validity_and_clamp() {
        let c = Rgb::new(1.5, -0.2, f32::NAN);
        assert!(!c.is_valid());
        let clamped = c.clamped();
        assert!(clamped.is_valid());
        assert_eq!(clamped, Rgb::new(1.0, 0.0, 0.0));
        assert!(Rgb::gray(0.5).is_valid());
    }
}
