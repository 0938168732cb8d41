//! Direct scene settings for `set_scene`.

use serde_json::{Value, json};

use crate::flow::{FlowAction, FlowExpression};
use crate::types::Color;

/// A target state applied in one step, turning the bulb on first if needed.
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    /// RGB color at a brightness.
    Color { color: Color, bright: u8 },
    /// Hue/saturation color at a brightness.
    Hsv { hue: u16, sat: u8, bright: u8 },
    /// Color temperature at a brightness.
    Ct { kelvin: u32, bright: u8 },
    /// Start a color flow.
    Flow {
        count: u32,
        action: FlowAction,
        expression: FlowExpression,
    },
    /// Turn on at a brightness and switch off after `minutes`.
    AutoDelayOff { bright: u8, minutes: u32 },
}

impl Scene {
    /// Positional `set_scene` parameters, class name first.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use yeelight_lan::{Color, Scene};
    ///
    /// let scene = Scene::Color { color: Color::rgb(255, 0, 0), bright: 70 };
    /// assert_eq!(scene.params(), vec![json!("color"), json!(16711680), json!(70)]);
    /// ```
    pub fn params(&self) -> Vec<Value> {
        match self {
            Scene::Color { color, bright } => {
                vec![json!("color"), json!(color.packed()), json!(bright)]
            }
            Scene::Hsv { hue, sat, bright } => {
                vec![json!("hsv"), json!(hue), json!(sat), json!(bright)]
            }
            Scene::Ct { kelvin, bright } => vec![json!("ct"), json!(kelvin), json!(bright)],
            Scene::Flow {
                count,
                action,
                expression,
            } => vec![
                json!("cf"),
                json!(count),
                json!(action.value()),
                json!(expression.to_string()),
            ],
            Scene::AutoDelayOff { bright, minutes } => {
                vec![json!("auto_delay_off"), json!(bright), json!(minutes)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_flow_scene_params() {
        let scene = Scene::Flow {
            count: 0,
            action: FlowAction::Stay,
            expression: FlowExpression::from_str("500,2,3000,50").unwrap(),
        };
        assert_eq!(
            scene.params(),
            vec![json!("cf"), json!(0), json!(1), json!("500,2,3000,50")]
        );
    }

    #[test]
    fn test_auto_delay_off_params() {
        let scene = Scene::AutoDelayOff {
            bright: 50,
            minutes: 5,
        };
        assert_eq!(
            scene.params(),
            vec![json!("auto_delay_off"), json!(50), json!(5)]
        );
    }
}
