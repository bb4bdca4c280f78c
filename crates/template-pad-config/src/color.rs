/// Palette colour stored in config files as `"#RGB"`, `"#RRGGBB"` or `"#RRGGBBAA"`.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a `#`-prefixed hex colour. The three-digit shorthand expands
    /// each digit (`#f80` is `#ff8800`).
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, ch) in out.iter_mut().zip(digits.chars()) {
                    let v = ch.to_digit(16)? as u8;
                    *slot = v * 16 + v;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Uppercase `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same colour with alpha replaced.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim()).ok_or_else(|| format!("invalid hex color: {s}"))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_forms() {
        assert_eq!(HexColor::from_hex("#FF8800"), Some(HexColor::rgb(255, 136, 0)));
        assert_eq!(
            HexColor::from_hex("#326ec864"),
            Some(HexColor::rgba(50, 110, 200, 100))
        );
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(HexColor::from_hex("#f80"), Some(HexColor::rgb(255, 136, 0)));
        assert_eq!(HexColor::from_hex("#000"), Some(HexColor::rgb(0, 0, 0)));
    }

    #[test]
    fn test_rejects_garbage() {
        for bad in ["", "#", "#GG0000", "#12345", "123456", "#ffé", "#1234"] {
            assert!(HexColor::from_hex(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn test_to_hex_drops_opaque_alpha() {
        assert_eq!(HexColor::rgb(30, 30, 30).to_hex(), "#1E1E1E");
        assert_eq!(HexColor::rgb(30, 30, 30).with_alpha(128).to_hex(), "#1E1E1E80");
    }

    #[test]
    fn test_from_str_trims() {
        let c: HexColor = " #abc ".parse().unwrap();
        assert_eq!(c, HexColor::rgb(0xAA, 0xBB, 0xCC));
        assert!("nope".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let c = HexColor::rgb(212, 212, 212);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#D4D4D4\"");
        let parsed: HexColor = serde_json::from_str("\"#ddd\"").unwrap();
        assert_eq!(parsed, HexColor::rgb(221, 221, 221));
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }
}
