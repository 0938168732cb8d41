//! Active color mode reported by a bulb.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The mode a bulb is currently rendering its color in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, EnumIter, PartialEq, Eq)]
pub enum ColorMode {
    Rgb = 1,
    ColorTemperature = 2,
    Hsv = 3,
}

impl ColorMode {
    /// Map a wire code to a mode; unknown codes (including `0`) give `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_lan::ColorMode;
    ///
    /// assert_eq!(ColorMode::create(2), Some(ColorMode::ColorTemperature));
    /// assert_eq!(ColorMode::create(0), None);
    /// ```
    pub fn create(code: u8) -> Option<Self> {
        ColorMode::iter().find(|mode| *mode as u8 == code)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}
