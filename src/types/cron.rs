//! Timer ("cron") jobs kept on the bulb.

use serde::{Deserialize, Serialize};

/// Kind of timer job. The bulb currently only knows the power-off timer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum CronType {
    #[default]
    PowerOff = 0,
}

impl CronType {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

/// A timer job as reported by `cron_get`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CronJob {
    #[serde(rename = "type")]
    pub kind: u8,
    /// Minutes until the job fires.
    pub delay: u32,
    #[serde(default)]
    pub mix: u32,
}
