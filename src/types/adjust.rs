//! Relative adjustments for momentary controllers.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::errors::Error;

/// Direction of a relative adjustment.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdjustAction {
    Increase,
    Decrease,
    /// Step up, wrapping around to the minimum after the maximum.
    Circle,
}

/// Property a relative adjustment applies to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdjustProp {
    Bright,
    Ct,
    Color,
}

impl AdjustProp {
    /// Color can only be cycled; the bulb rejects increase/decrease on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_lan::{AdjustAction, AdjustProp};
    ///
    /// assert!(AdjustProp::Color.check(AdjustAction::Circle).is_ok());
    /// assert!(AdjustProp::Color.check(AdjustAction::Increase).is_err());
    /// assert!(AdjustProp::Bright.check(AdjustAction::Decrease).is_ok());
    /// ```
    pub fn check(&self, action: AdjustAction) -> Result<(), Error> {
        if *self == AdjustProp::Color && action != AdjustAction::Circle {
            return Err(Error::validation(format!(
                "color can only be adjusted with circle, not {action}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_parse_wire_names() {
        assert_eq!(AdjustAction::from_str("circle"), Ok(AdjustAction::Circle));
        assert_eq!(AdjustProp::from_str("ct"), Ok(AdjustProp::Ct));
        assert!(AdjustProp::from_str("hue").is_err());
    }
}
