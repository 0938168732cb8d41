//! Value types for light control parameters.

mod adjust;
mod color;
mod color_mode;
mod cron;
mod power;
mod scene;
mod transition;

pub use adjust::{AdjustAction, AdjustProp};
pub use color::Color;
pub use color_mode::ColorMode;
pub use cron::{CronJob, CronType};
pub use power::Power;
pub use scene::Scene;
pub use transition::{Effect, Transition};
