//! Ball and ring segment colors
//!
//! Colors are stored as packed `0xRRGGBB` and serialize as `"#RRGGBB"` strings
//! so snapshots stay readable for web hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(u32);

impl Color {
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_rgb)
    }

    #[inline]
    pub fn rgb(self) -> u32 {
        self.0
    }

    /// Linear-ish float components for GPU hosts
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let r = ((self.0 >> 16) & 0xFF) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xFF) as f32 / 255.0;
        let b = (self.0 & 0xFF) as f32 / 255.0;
        [r, g, b, alpha.clamp(0.0, 1.0)]
    }

    /// `#RRGGBBAA` with the alpha byte appended (canvas-style gradient stops)
    pub fn with_alpha_hex(self, alpha: u8) -> String {
        format!("{}{:02X}", self, alpha)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

/// Number of gameplay colors
pub const PALETTE_SIZE: usize = 5;

/// Gameplay palette, in cycling order
pub const PALETTE: [Color; PALETTE_SIZE] = [
    Color::from_rgb(0xFF6B35), // orange
    Color::from_rgb(0xFFD93D), // yellow
    Color::from_rgb(0x6BCF7F), // green
    Color::from_rgb(0x4D96FF), // blue
    Color::from_rgb(0xFF6B9D), // pink
];

/// Bright star color (~20% of stars)
pub const STAR_WHITE: Color = Color::from_rgb(0xFFFFFF);
/// Default star tint
pub const STAR_LAVENDER: Color = Color::from_rgb(0xE6E6FA);
/// Combo label color
pub const COMBO_GOLD: Color = Color::from_rgb(0xFFD700);

/// Index of `color` in the palette
pub fn palette_index(color: Color) -> Option<usize> {
    PALETTE.iter().position(|&c| c == color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Color::from_hex("#FF6B35").unwrap();
        assert_eq!(c, PALETTE[0]);
        assert_eq!(c.to_string(), "#FF6B35");
        assert_eq!(Color::from_hex("4d96ff"), Some(PALETTE[3]));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&PALETTE[1]).unwrap();
        assert_eq!(json, "\"#FFD93D\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PALETTE[1]);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_alpha_hex() {
        assert_eq!(PALETTE[2].with_alpha_hex(0x40), "#6BCF7F40");
        let rgba = STAR_WHITE.to_rgba(0.5);
        assert_eq!(rgba, [1.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_palette_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            assert_eq!(palette_index(*a), Some(i));
        }
    }
}
