//! RGB color representation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::Error;

/// An RGB color with red, green, and blue components (0-255 each).
///
/// Bulbs exchange colors as one packed integer (`0xRRGGBB`); callers may
/// build a color from either form.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a color from a packed `0xRRGGBB` integer. Bits above the low
    /// 24 are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_lan::Color;
    ///
    /// let orange = Color::from_packed(0xFF8000);
    /// assert_eq!((orange.red(), orange.green(), orange.blue()), (255, 128, 0));
    /// assert_eq!(orange.packed(), 16744448);
    /// ```
    pub fn from_packed(value: u32) -> Self {
        Self {
            red: (value >> 16) as u8,
            green: (value >> 8) as u8,
            blue: value as u8,
        }
    }

    /// The packed `0xRRGGBB` integer sent on the wire.
    pub fn packed(&self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Color::from_packed(value)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parse either comma-separated components (`"255,128,0"`) or a hex
    /// value (`"ff8000"`, `"#ff8000"`, `"0xff8000"`).
    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.contains(',') {
            let parts = s
                .split(',')
                .map(|c| c.trim().parse::<u8>())
                .collect::<Result<Vec<u8>, _>>()
                .map_err(|_| Error::validation(format!("invalid color component in {s:?}")))?;
            return match parts.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                _ => Err(Error::validation("expected format: r,g,b")),
            };
        }

        let hex = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(s);
        if hex.is_empty() || hex.len() > 6 {
            return Err(Error::validation(format!("invalid hex color {s:?}")));
        }
        u32::from_str_radix(hex, 16)
            .map(Self::from_packed)
            .map_err(|_| Error::validation(format!("invalid hex color {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        assert_eq!(Color::from_str("255,0,10").unwrap(), Color::rgb(255, 0, 10));
        assert!(Color::from_str("255,0").is_err());
        assert!(Color::from_str("256,0,0").is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::from_str("ffffff").unwrap().packed(), 0xFFFFFF);
        assert_eq!(Color::from_str("#00ff00").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_str("0x0000ff").unwrap(), Color::rgb(0, 0, 255));
        assert!(Color::from_str("zzz").is_err());
        assert!(Color::from_str("1000000").is_err());
    }

    #[test]
    fn test_packed_matches_components() {
        assert_eq!(Color::rgb(255, 0, 0).packed(), 16711680);
        assert_eq!(Color::from(16711680), Color::rgb(255, 0, 0));
    }
}
