//! Color flow programs.
//!
//! A flow is a device-side sequence of state changes. Each step is a tuple of
//! `(duration, mode, value, brightness)` and the whole program travels as one
//! flat comma-separated string, e.g. `"1000,2,2700,100,500,1,16711680,10"`.
//!
//! Durations are milliseconds, the unit the bulb itself uses. They are sent
//! as given, without conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::errors::Error;
use crate::types::Color;

type Result<T> = std::result::Result<T, Error>;

/// What the bulb does once a flow stops.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum FlowAction {
    /// Go back to the state before the flow started.
    #[strum(serialize = "recover-state")]
    Recover = 0,
    /// Stay at the last state of the flow.
    #[strum(serialize = "keep-state")]
    Stay = 1,
    /// Power off.
    #[strum(serialize = "turn-off")]
    TurnOff = 2,
}

impl FlowAction {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl FromStr for FlowAction {
    type Err = Error;

    /// Parse `recover-state`, `keep-state` or `turn-off`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::str::FromStr;
    /// use yeelight_lan::FlowAction;
    ///
    /// assert_eq!(FlowAction::from_str("turn-off").unwrap().value(), 2);
    /// assert!(FlowAction::from_str("explode").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        FlowAction::iter()
            .find(|action| action.to_string() == s)
            .ok_or_else(|| {
                Error::validation(format!(
                    "unknown flow action {s:?}; expected recover-state, keep-state or turn-off"
                ))
            })
    }
}

/// One visible state change of a flow.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FlowTuple {
    /// Milliseconds the change takes (or the pause lasts).
    pub duration: u32,
    /// `1` color, `2` color temperature, `7` sleep.
    pub mode: u8,
    /// Packed RGB for color, kelvin for temperature, ignored for sleep.
    pub value: u32,
    /// Brightness percentage; `-1` keeps the current brightness.
    pub brightness: i32,
}

impl FlowTuple {
    pub const MODE_COLOR: u8 = 1;
    pub const MODE_CT: u8 = 2;
    pub const MODE_SLEEP: u8 = 7;

    pub fn color(duration: u32, color: Color, brightness: i32) -> Self {
        FlowTuple {
            duration,
            mode: Self::MODE_COLOR,
            value: color.packed(),
            brightness,
        }
    }

    pub fn ct(duration: u32, kelvin: u32, brightness: i32) -> Self {
        FlowTuple {
            duration,
            mode: Self::MODE_CT,
            value: kelvin,
            brightness,
        }
    }

    pub fn sleep(duration: u32) -> Self {
        FlowTuple {
            duration,
            mode: Self::MODE_SLEEP,
            value: 0,
            brightness: 0,
        }
    }
}

impl fmt::Display for FlowTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.duration, self.mode, self.value, self.brightness
        )
    }
}

/// A validated flow program.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use yeelight_lan::{Color, FlowExpression, FlowTuple};
///
/// let parsed = FlowExpression::from_str("1000,2,2700,100,500,1,16711680,10").unwrap();
/// assert_eq!(parsed.len(), 2);
///
/// let built = FlowExpression::new(vec![
///     FlowTuple::ct(1000, 2700, 100),
///     FlowTuple::color(500, Color::rgb(255, 0, 0), 10),
/// ]);
/// assert_eq!(built, parsed);
/// assert_eq!(built.to_string(), "1000,2,2700,100,500,1,16711680,10");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct FlowExpression(Vec<FlowTuple>);

impl FlowExpression {
    pub fn new(tuples: Vec<FlowTuple>) -> Self {
        FlowExpression(tuples)
    }

    pub fn tuples(&self) -> &[FlowTuple] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for FlowExpression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() % 4 != 0 {
            return Err(Error::validation(format!(
                "flow expression has {} values; it must be a series of \
                 [duration, mode, value, brightness] tuples",
                fields.len()
            )));
        }

        let tuples = fields
            .chunks_exact(4)
            .map(|chunk| -> Result<FlowTuple> {
                Ok(FlowTuple {
                    duration: parse_field(chunk[0], "duration")?,
                    mode: parse_field(chunk[1], "mode")?,
                    value: parse_field(chunk[2], "value")?,
                    brightness: parse_field(chunk[3], "brightness")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FlowExpression(tuples))
    }
}

impl fmt::Display for FlowExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tuple) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{tuple}")?;
        }
        Ok(())
    }
}

fn parse_field<T: FromStr>(field: &str, name: &str) -> Result<T> {
    field.parse().map_err(|_| {
        if field.parse::<i64>().is_ok() {
            Error::validation(format!("flow value {field} is out of range for {name}"))
        } else {
            Error::validation(format!(
                "flow {name} {field:?} is not an integer; all flow values must be integers"
            ))
        }
    })
}
