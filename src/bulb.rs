//! Individual bulb control.

use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;
use serde_json::{Value, json};

use crate::command::{self, Command, Method, Reply};
use crate::config::{POWER_TRANSITION_MS, Timeouts};
use crate::device::{Device, Properties};
use crate::errors::{Error, ProtocolError};
use crate::flow::{FlowAction, FlowExpression};
use crate::transport;
use crate::types::{AdjustAction, AdjustProp, Color, CronJob, CronType, Power, Scene, Transition};

type Result<T> = std::result::Result<T, Error>;

/// A command handle for one bulb.
///
/// Every operation is a single request/response exchange over a fresh TCP
/// connection to the bulb's location. Nothing is retried: a failed command
/// is reported to the caller as is.
///
/// Operations that change the light take a `duration` in milliseconds; see
/// [`Transition`] for how it is encoded.
///
/// # Example
///
/// ```no_run
/// use yeelight_lan::{Bulb, Color, Device};
///
/// # async fn run() -> Result<(), yeelight_lan::Error> {
/// let device = Device::new("192.168.1.5:55443");
/// let bulb = Bulb::new(&device);
/// bulb.on().await?;
/// bulb.set_rgb(Color::rgb(255, 0, 0), 500).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bulb {
    location: String,
    timeouts: Timeouts,
    next_id: AtomicU32,
}

impl Bulb {
    pub fn new(device: &Device) -> Self {
        Self::at(&device.location)
    }

    /// Handle for a raw `host:port` location.
    pub fn at(location: &str) -> Self {
        Bulb {
            location: location.to_string(),
            timeouts: Timeouts::default(),
            next_id: AtomicU32::new(1),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Query the current state.
    ///
    /// Fails with a protocol error unless the bulb returns all eight values
    /// in order.
    pub async fn get_prop(&self) -> Result<Properties> {
        let names = Properties::NAMES.iter().map(|n| json!(n)).collect();
        match self.request(Method::GetProp, names).await? {
            Reply::Values(values) => command::decode_properties(&values),
            other => Err(unexpected(Method::GetProp, &other)),
        }
    }

    /// Query the current state and overwrite `device` with it.
    ///
    /// On any failure `device` is left untouched.
    pub async fn refresh(&self, device: &mut Device) -> Result<()> {
        let props = self.get_prop().await?;
        device.apply(&props);
        Ok(())
    }

    /// Set the color temperature. The bulb accepts 1700-6500K; other values
    /// are sent anyway and rejected by the bulb.
    pub async fn set_ct_abx(&self, kelvin: u32, duration: i64) -> Result<()> {
        self.ack(Method::SetCtAbx, transition(vec![json!(kelvin)], duration))
            .await
    }

    pub async fn set_rgb(&self, color: Color, duration: i64) -> Result<()> {
        self.ack(
            Method::SetRgb,
            transition(vec![json!(color.packed())], duration),
        )
        .await
    }

    /// Set the color from hue (0-359) and saturation (0-100).
    pub async fn set_hsv(&self, hue: u16, sat: u8, duration: i64) -> Result<()> {
        self.ack(
            Method::SetHsv,
            transition(vec![json!(hue), json!(sat)], duration),
        )
        .await
    }

    /// Set the brightness percentage.
    pub async fn set_bright(&self, bright: u8, duration: i64) -> Result<()> {
        self.ack(Method::SetBright, transition(vec![json!(bright)], duration))
            .await
    }

    pub async fn set_power(&self, power: Power, duration: i64) -> Result<()> {
        self.ack(
            Method::SetPower,
            transition(vec![json!(power.to_string())], duration),
        )
        .await
    }

    pub async fn on(&self) -> Result<()> {
        self.set_power(Power::On, POWER_TRANSITION_MS).await
    }

    pub async fn off(&self) -> Result<()> {
        self.set_power(Power::Off, POWER_TRANSITION_MS).await
    }

    pub async fn toggle(&self) -> Result<()> {
        self.ack(Method::Toggle, Vec::new()).await
    }

    /// Save the current state as the power-on default.
    pub async fn set_default(&self) -> Result<()> {
        self.ack(Method::SetDefault, Vec::new()).await
    }

    /// Start a color flow. `count` is the number of state changes to run,
    /// `0` for an endless loop.
    pub async fn start_cf(
        &self,
        count: u32,
        action: FlowAction,
        expression: &FlowExpression,
    ) -> Result<()> {
        if expression.is_empty() {
            return Err(Error::validation("flow expression has no tuples"));
        }
        self.ack(
            Method::StartCf,
            vec![
                json!(count),
                json!(action.value()),
                json!(expression.to_string()),
            ],
        )
        .await
    }

    pub async fn stop_cf(&self) -> Result<()> {
        self.ack(Method::StopCf, Vec::new()).await
    }

    pub async fn set_scene(&self, scene: &Scene) -> Result<()> {
        if matches!(scene, Scene::Flow { expression, .. } if expression.is_empty()) {
            return Err(Error::validation("flow expression has no tuples"));
        }
        self.ack(Method::SetScene, scene.params()).await
    }

    /// Schedule a timer job firing after `minutes`.
    pub async fn cron_add(&self, kind: CronType, minutes: u32) -> Result<()> {
        self.ack(Method::CronAdd, vec![json!(kind.value()), json!(minutes)])
            .await
    }

    pub async fn cron_get(&self, kind: CronType) -> Result<Vec<CronJob>> {
        match self.request(Method::CronGet, vec![json!(kind.value())]).await? {
            Reply::Cron(jobs) => Ok(jobs),
            other => Err(unexpected(Method::CronGet, &other)),
        }
    }

    pub async fn cron_del(&self, kind: CronType) -> Result<()> {
        self.ack(Method::CronDel, vec![json!(kind.value())]).await
    }

    /// Change a property relative to its current value without reading it
    /// first.
    pub async fn set_adjust(&self, action: AdjustAction, prop: AdjustProp) -> Result<()> {
        prop.check(action)?;
        self.ack(
            Method::SetAdjust,
            vec![json!(action.as_ref()), json!(prop.as_ref())],
        )
        .await
    }

    /// Store a name on the bulb. It is reported by discovery and property
    /// queries from then on.
    pub async fn set_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::validation("the new name cannot be empty"));
        }
        self.ack(Method::SetName, vec![json!(name)]).await
    }

    async fn ack(&self, method: Method, params: Vec<Value>) -> Result<()> {
        match self.request(method, params).await? {
            Reply::Ack => Ok(()),
            other => Err(unexpected(method, &other)),
        }
    }

    async fn request(&self, method: Method, params: Vec<Value>) -> Result<Reply> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let command = Command::new(id, method, params);
        debug!("Sending {} to {}", method, self.location);

        transport::send(&self.location, &command, &self.timeouts)
            .await?
            .into_reply(method)
    }
}

fn transition(mut params: Vec<Value>, duration: i64) -> Vec<Value> {
    let transition = Transition::from_millis(duration);
    params.push(json!(transition.effect().as_ref()));
    params.push(json!(transition.duration()));
    params
}

fn unexpected(method: Method, reply: &Reply) -> Error {
    ProtocolError::UnexpectedResult {
        method: method.to_string(),
        result: format!("{reply:?}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    use super::*;

    /// A fake bulb answering one connection per entry in `results`.
    ///
    /// Each entry is either a `result` value or, if it has an `error` key,
    /// the whole error object. The request id is echoed back. Returns the
    /// address and a handle yielding the decoded requests.
    async fn fake_bulb(results: Vec<Value>) -> (String, tokio::task::JoinHandle<Vec<Value>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for result in results {
                let (stream, _) = listener.accept().await.unwrap();
                let mut reader = BufReader::new(stream);
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                let request: Value = serde_json::from_str(line.trim_end()).unwrap();

                let mut reply = json!({"id": request["id"]});
                match result.get("error") {
                    Some(error) => reply["error"] = error.clone(),
                    None => reply["result"] = result,
                }
                let mut out = reply.to_string();
                out.push_str("\r\n");
                reader.get_mut().write_all(out.as_bytes()).await.unwrap();
                requests.push(request);
            }
            requests
        });
        (addr, handle)
    }

    fn ok() -> Value {
        json!(["ok"])
    }

    #[tokio::test]
    async fn test_setters_encode_transition() {
        let (addr, bulb) = fake_bulb(vec![ok(), ok(), ok(), ok()]).await;
        let light = Bulb::at(&addr);

        light.set_bright(75, 500).await.unwrap();
        light.set_ct_abx(9000, 0).await.unwrap();
        light.set_rgb(Color::rgb(255, 0, 0), -5).await.unwrap();
        light.set_hsv(120, 50, 300).await.unwrap();

        let requests = bulb.await.unwrap();
        assert_eq!(requests[0]["method"], "set_bright");
        assert_eq!(requests[0]["params"], json!([75, "smooth", 500]));
        assert_eq!(requests[1]["params"], json!([9000, "sudden", 0]));
        assert_eq!(requests[2]["params"], json!([16711680, "sudden", 0]));
        assert_eq!(requests[3]["params"], json!([120, 50, "smooth", 300]));
    }

    #[tokio::test]
    async fn test_ids_increase_per_command() {
        let (addr, bulb) = fake_bulb(vec![ok(), ok()]).await;
        let light = Bulb::at(&addr);

        light.toggle().await.unwrap();
        light.set_default().await.unwrap();

        let requests = bulb.await.unwrap();
        assert_eq!(requests[0]["id"], 1);
        assert_eq!(requests[0]["params"], json!([]));
        assert_eq!(requests[1]["id"], 2);
        assert_eq!(requests[1]["method"], "set_default");
    }

    #[tokio::test]
    async fn test_power_uses_default_transition() {
        let (addr, bulb) = fake_bulb(vec![ok(), ok()]).await;
        let light = Bulb::at(&addr);

        light.on().await.unwrap();
        light.off().await.unwrap();

        let requests = bulb.await.unwrap();
        assert_eq!(requests[0]["params"], json!(["on", "smooth", 1000]));
        assert_eq!(requests[1]["params"], json!(["off", "smooth", 1000]));
    }

    #[tokio::test]
    async fn test_refresh_overwrites_device() {
        let (addr, _bulb) = fake_bulb(vec![json!([
            "on", "80", "4000", "16711680", "100", "35", "2", "Bedroom"
        ])])
        .await;
        let mut device = Device::new(&addr);
        device.id = "0x0000000002dfb19a".into();

        Bulb::new(&device).refresh(&mut device).await.unwrap();

        assert_eq!(device.power, Some(Power::On));
        assert_eq!(device.bright, 80);
        assert_eq!(device.ct, 4000);
        assert_eq!(device.rgb, 16711680);
        assert_eq!(device.hue, 100);
        assert_eq!(device.sat, 35);
        assert_eq!(device.color_mode, 2);
        assert_eq!(device.name, "bedroom");
        assert_eq!(device.id, "0x0000000002dfb19a");
    }

    #[tokio::test]
    async fn test_short_result_leaves_device_untouched() {
        let (addr, _bulb) = fake_bulb(vec![json!(["on", "80", "4000"])]).await;
        let mut device = Device::new(&addr);
        device.bright = 10;
        device.name = "desk".into();
        let before = device.clone();

        let err = Bulb::new(&device).refresh(&mut device).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ShortResult { .. })
        ));
        assert_eq!(device, before);
    }

    #[tokio::test]
    async fn test_get_prop_requests_all_properties() {
        let (addr, bulb) =
            fake_bulb(vec![json!(["off", "1", "2700", "0", "0", "0", "2", ""])]).await;

        let props = Bulb::at(&addr).get_prop().await.unwrap();
        assert_eq!(props.power, Some(Power::Off));

        let requests = bulb.await.unwrap();
        assert_eq!(
            requests[0]["params"],
            json!(["power", "bright", "ct", "rgb", "hue", "sat", "color_mode", "name"])
        );
    }

    #[tokio::test]
    async fn test_rejected_command() {
        let (addr, _bulb) = fake_bulb(vec![json!({
            "error": {"code": -1, "message": "invalid params"}
        })])
        .await;

        let err = Bulb::at(&addr).set_bright(150, 0).await.unwrap_err();
        assert!(err.is_rejected());
    }

    #[tokio::test]
    async fn test_flow_commands() {
        let (addr, bulb) = fake_bulb(vec![ok(), ok()]).await;
        let light = Bulb::at(&addr);
        let flow = FlowExpression::from_str("1000,2,2700,100,500,1,16711680,10").unwrap();

        light.start_cf(4, FlowAction::TurnOff, &flow).await.unwrap();
        light.stop_cf().await.unwrap();

        let requests = bulb.await.unwrap();
        assert_eq!(
            requests[0]["params"],
            json!([4, 2, "1000,2,2700,100,500,1,16711680,10"])
        );
        assert_eq!(requests[1]["method"], "stop_cf");
    }

    #[tokio::test]
    async fn test_empty_flow_is_not_sent() {
        let err = Bulb::at("127.0.0.1:1")
            .start_cf(0, FlowAction::Recover, &FlowExpression::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_empty_flow_scene_is_not_sent() {
        let err = Bulb::at("127.0.0.1:1")
            .set_scene(&Scene::Flow {
                count: 0,
                action: FlowAction::Stay,
                expression: FlowExpression::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_scene_and_name() {
        let (addr, bulb) = fake_bulb(vec![ok(), ok()]).await;
        let light = Bulb::at(&addr);

        light
            .set_scene(&Scene::Ct {
                kelvin: 5400,
                bright: 50,
            })
            .await
            .unwrap();
        light.set_name("Living Room").await.unwrap();

        let requests = bulb.await.unwrap();
        assert_eq!(requests[0]["params"], json!(["ct", 5400, 50]));
        assert_eq!(requests[1]["params"], json!(["Living Room"]));
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected_locally() {
        let err = Bulb::at("127.0.0.1:1").set_name("  ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_cron_round_trip() {
        let (addr, bulb) = fake_bulb(vec![
            ok(),
            json!([{"type": 0, "delay": 15, "mix": 0}]),
            ok(),
        ])
        .await;
        let light = Bulb::at(&addr);

        light.cron_add(CronType::PowerOff, 15).await.unwrap();
        let jobs = light.cron_get(CronType::PowerOff).await.unwrap();
        light.cron_del(CronType::PowerOff).await.unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].delay, 15);

        let requests = bulb.await.unwrap();
        assert_eq!(requests[0]["params"], json!([0, 15]));
        assert_eq!(requests[1]["method"], "cron_get");
        assert_eq!(requests[2]["params"], json!([0]));
    }

    #[tokio::test]
    async fn test_adjust() {
        let (addr, bulb) = fake_bulb(vec![ok()]).await;
        let light = Bulb::at(&addr);

        light
            .set_adjust(AdjustAction::Increase, AdjustProp::Bright)
            .await
            .unwrap();
        let err = light
            .set_adjust(AdjustAction::Decrease, AdjustProp::Color)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let requests = bulb.await.unwrap();
        assert_eq!(requests[0]["params"], json!(["increase", "bright"]));
    }

    #[tokio::test]
    async fn test_unreachable_bulb() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = Bulb::at(&addr).toggle().await.unwrap_err();
        assert!(matches!(err, Error::Connect { .. }));
    }
}
