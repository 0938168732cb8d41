//! Command codec for the bulb JSON protocol.
//!
//! A request is one JSON object per line, `{"id":..,"method":..,"params":[..]}`,
//! terminated by CRLF. The reply is one JSON line carrying the same id and
//! either a `result` or an `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::device::Properties;
use crate::errors::{Error, ProtocolError};
use crate::types::{CronJob, Power};

type Result<T> = std::result::Result<T, Error>;

/// Methods understood by the bulb.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Method {
    GetProp,
    SetCtAbx,
    SetRgb,
    SetHsv,
    SetBright,
    SetPower,
    Toggle,
    SetDefault,
    StartCf,
    StopCf,
    SetScene,
    CronAdd,
    CronGet,
    CronDel,
    SetAdjust,
    SetName,
}

/// Shape of the `result` a method produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// `["ok"]`
    Ack,
    /// One string per requested property.
    Values,
    /// A list of timer jobs.
    Cron,
}

impl Method {
    pub fn reply_shape(&self) -> ReplyShape {
        match self {
            Method::GetProp => ReplyShape::Values,
            Method::CronGet => ReplyShape::Cron,
            _ => ReplyShape::Ack,
        }
    }
}

/// One outgoing request.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Command {
    pub id: u32,
    pub method: Method,
    pub params: Vec<Value>,
}

impl Command {
    pub fn new(id: u32, method: Method, params: Vec<Value>) -> Self {
        Command { id, method, params }
    }

    /// Wire form: the JSON object followed by CRLF.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use yeelight_lan::{Command, Method};
    ///
    /// let cmd = Command::new(5, Method::SetBright, vec![json!(75), json!("smooth"), json!(500)]);
    /// assert_eq!(
    ///     cmd.encode().unwrap(),
    ///     "{\"id\":5,\"method\":\"set_bright\",\"params\":[75,\"smooth\",500]}\r\n"
    /// );
    /// ```
    pub fn encode(&self) -> Result<String> {
        let mut line = serde_json::to_string(self).map_err(Error::Encode)?;
        line.push_str("\r\n");
        Ok(line)
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
}

/// One incoming reply.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Response {
    pub id: u32,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ResponseError>,
}

/// A decoded result, shaped by the method that was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Values(Vec<String>),
    Cron(Vec<CronJob>),
}

impl Response {
    /// Parse one response line.
    pub fn decode(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim_end())
            .map_err(|e| Error::Protocol(ProtocolError::Malformed(e)))
    }

    /// Turn the response into the reply `method` declares, surfacing a
    /// populated `error` as [`ProtocolError::Rejected`].
    pub fn into_reply(self, method: Method) -> Result<Reply> {
        if let Some(err) = self.error {
            return Err(ProtocolError::Rejected {
                code: err.code,
                message: err.message,
            }
            .into());
        }

        let result = self.result.unwrap_or(Value::Null);
        let unexpected = |result: &Value| ProtocolError::UnexpectedResult {
            method: method.to_string(),
            result: result.to_string(),
        };

        match method.reply_shape() {
            ReplyShape::Ack => match result.as_array().and_then(|a| a.first()) {
                Some(Value::String(token)) if token == "ok" => Ok(Reply::Ack),
                _ => Err(unexpected(&result).into()),
            },
            ReplyShape::Values => {
                let Some(items) = result.as_array() else {
                    return Err(unexpected(&result).into());
                };
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        other => Err(ProtocolError::bad_value("property", other).into()),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Reply::Values)
            }
            ReplyShape::Cron => serde_json::from_value::<Vec<CronJob>>(result.clone())
                .map(Reply::Cron)
                .map_err(|_| unexpected(&result).into()),
        }
    }
}

/// Decode the positional `get_prop` values into [`Properties`].
///
/// All eight values must be present. Numeric values must parse; an empty
/// string means the model does not have that property and reads as `0`.
pub(crate) fn decode_properties(values: &[String]) -> Result<Properties> {
    let expected = Properties::NAMES.len();
    if values.len() < expected {
        return Err(ProtocolError::ShortResult {
            expected,
            got: values.len(),
        }
        .into());
    }

    let power = match values[0].as_str() {
        "" => None,
        "on" => Some(Power::On),
        "off" => Some(Power::Off),
        other => return Err(ProtocolError::bad_value("power", other).into()),
    };

    Ok(Properties {
        power,
        bright: number("bright", &values[1])?,
        ct: number("ct", &values[2])?,
        rgb: number("rgb", &values[3])?,
        hue: number("hue", &values[4])?,
        sat: number("sat", &values[5])?,
        color_mode: number("color_mode", &values[6])?,
        name: values[7].clone(),
    })
}

fn number(field: &'static str, value: &str) -> Result<u32> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| ProtocolError::bad_value(field, value).into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn props(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_method_wire_names() {
        assert_eq!(Method::SetCtAbx.as_ref(), "set_ct_abx");
        assert_eq!(Method::StartCf.to_string(), "start_cf");
        assert_eq!(json!(Method::CronGet), json!("cron_get"));
    }

    #[test]
    fn test_set_bright_round_trip() {
        let cmd = Command::new(
            5,
            Method::SetBright,
            vec![json!(75), json!("smooth"), json!(500)],
        );
        let wire: Value = serde_json::from_str(cmd.encode().unwrap().trim_end()).unwrap();
        assert_eq!(
            wire,
            json!({"id": 5, "method": "set_bright", "params": [75, "smooth", 500]})
        );

        let resp = Response::decode("{\"id\":5,\"result\":[\"ok\"]}\r\n").unwrap();
        assert_eq!(resp.id, 5);
        assert_eq!(resp.into_reply(Method::SetBright).unwrap(), Reply::Ack);
    }

    #[test]
    fn test_error_field_is_failure() {
        let resp =
            Response::decode(r#"{"id":1,"error":{"code":-1,"message":"invalid params"}}"#)
                .unwrap();
        let err = resp.into_reply(Method::SetBright).unwrap_err();
        assert!(err.is_rejected());
        assert!(err.to_string().contains("invalid params"));
    }

    #[test]
    fn test_malformed_line() {
        let err = Response::decode("{\"id\":").unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_ack_expected_for_setters() {
        let resp = Response::decode(r#"{"id":1,"result":["on","10"]}"#).unwrap();
        assert!(resp.into_reply(Method::Toggle).is_err());
    }

    #[test]
    fn test_values_must_be_strings() {
        let resp = Response::decode(r#"{"id":1,"result":["on",10]}"#).unwrap();
        let err = resp.into_reply(Method::GetProp).unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::BadValue { .. })
        ));
    }

    #[test]
    fn test_cron_reply() {
        let resp =
            Response::decode(r#"{"id":3,"result":[{"type":0,"delay":15,"mix":0}]}"#).unwrap();
        assert_eq!(
            resp.into_reply(Method::CronGet).unwrap(),
            Reply::Cron(vec![CronJob {
                kind: 0,
                delay: 15,
                mix: 0
            }])
        );
    }

    #[test]
    fn test_decode_properties() {
        let decoded = decode_properties(&props(&[
            "on", "100", "4000", "16711680", "359", "100", "2", "Desk",
        ]))
        .unwrap();
        assert_eq!(decoded.power, Some(Power::On));
        assert_eq!(decoded.rgb, 16711680);
        assert_eq!(decoded.hue, 359);
        assert_eq!(decoded.name, "Desk");
    }

    #[test]
    fn test_decode_properties_empty_values() {
        let decoded = decode_properties(&props(&["off", "1", "", "", "", "", "2", ""])).unwrap();
        assert_eq!(decoded.power, Some(Power::Off));
        assert_eq!(decoded.rgb, 0);
    }

    #[test]
    fn test_decode_properties_short() {
        let err = decode_properties(&props(&["on", "100", "4000"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ShortResult {
                expected: 8,
                got: 3
            })
        ));
    }

    #[test]
    fn test_decode_properties_bad_number() {
        let err = decode_properties(&props(&["on", "bright", "", "", "", "", "", ""])).unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::BadValue { field: "bright", .. })
        ));
    }
}
