//! Power state of a light.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Power state as reported and accepted by the bulb (`"on"` / `"off"`).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Power {
    On,
    Off,
}
