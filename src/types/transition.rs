//! Transition effect applied by mutating commands.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// How a bulb moves to a new state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Effect {
    /// Jump straight to the target state.
    Sudden,
    /// Fade to the target state over the transition duration.
    Smooth,
}

/// Effect plus duration pair sent with every mutating command.
///
/// A positive duration selects a smooth fade of that many milliseconds;
/// anything else selects a sudden change and the duration is sent as `0`,
/// which is what the bulb requires.
///
/// # Examples
///
/// ```
/// use yeelight_lan::{Effect, Transition};
///
/// let smooth = Transition::from_millis(500);
/// assert_eq!(smooth.effect(), Effect::Smooth);
/// assert_eq!(smooth.duration(), 500);
///
/// let sudden = Transition::from_millis(-20);
/// assert_eq!(sudden.effect(), Effect::Sudden);
/// assert_eq!(sudden.duration(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    effect: Effect,
    duration: u64,
}

impl Transition {
    pub fn from_millis(duration: i64) -> Self {
        if duration > 0 {
            Transition {
                effect: Effect::Smooth,
                duration: duration as u64,
            }
        } else {
            Self::sudden()
        }
    }

    pub fn sudden() -> Self {
        Transition {
            effect: Effect::Sudden,
            duration: 0,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Duration in milliseconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::sudden()
    }
}
