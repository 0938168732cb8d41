//! Device records.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::DEFAULT_PORT;
use crate::types::{Color, ColorMode, Power};

/// Everything the client knows about one bulb.
///
/// `location` (`host:port`) identifies the bulb; every other field is
/// whatever the bulb last reported and may be empty or zero. Records are
/// serializable so callers can persist them between runs.
///
/// # Example
///
/// ```
/// use yeelight_lan::Device;
///
/// let device = Device::new("192.168.1.5:55443");
/// assert_eq!(device.host(), "192.168.1.5");
/// assert!(device.power.is_none());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Device {
    pub location: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fw_ver: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub support: Vec<String>,
    #[serde(default)]
    pub power: Option<Power>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub bright: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub color_mode: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ct: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rgb: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub hue: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sat: u32,
    /// Stored lower-case, including when loaded from a saved record.
    #[serde(default, deserialize_with = "lowercase")]
    pub name: String,
}

impl Device {
    pub fn new(location: &str) -> Self {
        Device {
            location: location.to_string(),
            ..Default::default()
        }
    }

    /// Synthesize a record for a bulb that was never discovered, listening
    /// on the default command port.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_lan::Device;
    ///
    /// let device = Device::from_address("10.0.0.7".parse().unwrap());
    /// assert_eq!(device.location, "10.0.0.7:55443");
    /// ```
    pub fn from_address(ip: IpAddr) -> Self {
        Device::new(&SocketAddr::new(ip, DEFAULT_PORT).to_string())
    }

    /// Host portion of the location, without port or IPv6 brackets.
    pub fn host(&self) -> &str {
        let host = match self.location.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
            _ => &self.location,
        };
        host.trim_start_matches('[').trim_end_matches(']')
    }

    pub fn color_mode(&self) -> Option<ColorMode> {
        u8::try_from(self.color_mode).ok().and_then(ColorMode::create)
    }

    /// The current RGB value as a [`Color`].
    pub fn color(&self) -> Color {
        Color::from_packed(self.rgb)
    }

    pub fn supports(&self, method: &str) -> bool {
        self.support.iter().any(|m| m == method)
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_lowercase();
    }

    /// Overwrite the reported state with a complete property snapshot.
    pub fn apply(&mut self, props: &Properties) {
        self.power = props.power;
        self.bright = props.bright;
        self.ct = props.ct;
        self.rgb = props.rgb;
        self.hue = props.hue;
        self.sat = props.sat;
        self.color_mode = props.color_mode;
        self.set_name(&props.name);
    }
}

/// The state returned by a property query, decoded in full before it is
/// applied to a [`Device`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Properties {
    pub power: Option<Power>,
    pub bright: u32,
    pub ct: u32,
    pub rgb: u32,
    pub hue: u32,
    pub sat: u32,
    pub color_mode: u32,
    pub name: String,
}

impl Properties {
    /// Property names requested from the bulb, in result order.
    pub const NAMES: [&'static str; 8] = [
        "power",
        "bright",
        "ct",
        "rgb",
        "hue",
        "sat",
        "color_mode",
        "name",
    ];
}

fn lowercase<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|name| name.to_lowercase())
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}
