//! Device discovery via SSDP-style UDP multicast.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use url::Url;

use crate::config::DISCOVERY_ADDR;
use crate::device::Device;
use crate::errors::Error;
use crate::registry::Devices;
use crate::runtime::{self, AsyncUdpSocket, Instant, UdpSocket};

type Result<T> = std::result::Result<T, Error>;

const SEARCH_TARGET: &str = "wifi_bulb";

/// Discover bulbs on the local network.
///
/// Sends one `M-SEARCH` probe to the bulb multicast group and collects
/// replies until `discovery_timeout` elapses. Several replies from the same
/// source address count once, keeping the latest, and answers announcing the
/// same location collapse into one record holding the latest data. Replies that cannot be
/// parsed are skipped; finding nothing is not an error.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use yeelight_lan::discover;
///
/// # async fn run() -> Result<(), yeelight_lan::Error> {
/// let devices = discover(Duration::from_secs(2)).await?;
/// for device in devices {
///     println!("{} {} at {}", device.model, device.name, device.location);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn discover(discovery_timeout: Duration) -> Result<Vec<Device>> {
    discover_at(DISCOVERY_ADDR, discovery_timeout).await
}

/// Same as [`discover`], probing `target` instead of the standard multicast
/// group.
pub async fn discover_at(target: &str, discovery_timeout: Duration) -> Result<Vec<Device>> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| Error::connect("0.0.0.0:0", e))?;

    let probe = search_request(target);
    runtime::timeout(discovery_timeout, socket.send_to(probe.as_bytes(), target))
        .await
        .map_err(|_| {
            Error::connect(
                target,
                std::io::Error::new(std::io::ErrorKind::TimedOut, "probe send timeout"),
            )
        })?
        .map_err(|e| Error::connect(target, e))?;
    debug!("Sent discovery probe to {}", target);

    let answers = collect(&socket, discovery_timeout).await;
    debug!("Discovery got answers from {} sources", answers.len());

    // A location identifies a bulb; the latest answer for it wins.
    let mut devices = Devices::new();
    for (source, payload) in answers {
        match parse_announcement(&payload) {
            Some(device) => {
                if devices.upsert(device) {
                    debug!("Answer from {} replaces an earlier one for its location", source);
                }
            }
            None => debug!("Ignoring unusable discovery answer from {}", source),
        }
    }
    Ok(devices.into_iter().collect())
}

/// Read datagrams until the deadline, keeping the latest payload per source.
///
/// Answers are returned in the order their latest payload arrived.
async fn collect(socket: &UdpSocket, discovery_timeout: Duration) -> Vec<(String, String)> {
    let mut answers: HashMap<String, (usize, String)> = HashMap::new();
    let mut arrivals = 0usize;
    let start = Instant::now();
    let mut buffer = [0u8; 2048];

    loop {
        let Some(remaining) = discovery_timeout.checked_sub(start.elapsed()) else {
            break;
        };
        match runtime::timeout(remaining, socket.recv_from(&mut buffer)).await {
            Ok(Ok((size, source))) => {
                let payload = String::from_utf8_lossy(&buffer[..size]).into_owned();
                answers.insert(source.to_string(), (arrivals, payload));
                arrivals += 1;
            }
            Ok(Err(e)) => {
                warn!("Discovery receive failed: {}", e);
                break;
            }
            Err(_) => break,
        }
    }

    let mut ordered: Vec<_> = answers.into_iter().collect();
    ordered.sort_by_key(|(_, (arrival, _))| *arrival);
    ordered
        .into_iter()
        .map(|(source, (_, payload))| (source, payload))
        .collect()
}

fn search_request(target: &str) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\nHOST: {target}\r\nMAN: \"ssdp:discover\"\r\nST: {SEARCH_TARGET}\r\n"
    )
}

/// Parse one discovery answer into a [`Device`].
///
/// The first line is a status line and is ignored. The rest are
/// `Name: Value` headers with case-insensitive names. Returns `None` when
/// there is no usable `Location` header. Integer headers that are missing
/// or malformed read as `0`.
///
/// # Examples
///
/// ```
/// use yeelight_lan::parse_announcement;
///
/// let answer = "HTTP/1.1 200 OK\r\n\
///     Location: yeelight://192.168.1.239:55443\r\n\
///     id: 0x000000000015243f\r\n\
///     model: color\r\n\
///     power: on\r\n\
///     bright: 100\r\n\
///     name: Bedroom\r\n";
///
/// let device = parse_announcement(answer).unwrap();
/// assert_eq!(device.location, "192.168.1.239:55443");
/// assert_eq!(device.bright, 100);
/// assert_eq!(device.name, "bedroom");
/// ```
pub fn parse_announcement(payload: &str) -> Option<Device> {
    let headers: HashMap<String, &str> = payload
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim()))
        .collect();

    let header = |name: &str| headers.get(name).copied().unwrap_or_default();
    let number = |name: &str| header(name).parse::<u32>().unwrap_or(0);

    let location = parse_location(header("location"))?;

    let mut device = Device::new(&location);
    device.id = header("id").to_string();
    device.model = header("model").to_string();
    device.fw_ver = number("fw_ver");
    device.support = header("support")
        .split_whitespace()
        .map(String::from)
        .collect();
    device.power = header("power").parse().ok();
    device.bright = number("bright");
    device.color_mode = number("color_mode");
    device.ct = number("ct");
    device.rgb = number("rgb");
    device.hue = number("hue");
    device.sat = number("sat");
    device.set_name(header("name"));
    Some(device)
}

/// Keep only `host:port` of a `yeelight://host:port` location.
fn parse_location(value: &str) -> Option<String> {
    let url = Url::parse(value).ok()?;
    let host = url.host_str()?;
    let port = url.port()?;
    if host.contains(':') && !host.starts_with('[') {
        Some(format!("[{host}]:{port}"))
    } else {
        Some(format!("{host}:{port}"))
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::UdpSocket as TokioUdpSocket;

    use super::*;
    use crate::types::{ColorMode, Power};

    const ANSWER: &str = "HTTP/1.1 200 OK\r\n\
        Cache-Control: max-age=3600\r\n\
        Date: \r\n\
        Ext: \r\n\
        Location: yeelight://192.168.1.239:55443\r\n\
        Server: POSIX UPnP/1.0 YGLC/1\r\n\
        id: 0x000000000015243f\r\n\
        model: color\r\n\
        fw_ver: 18\r\n\
        support: get_prop set_default set_power toggle set_bright start_cf stop_cf\r\n\
        power: on\r\n\
        bright: 100\r\n\
        color_mode: 2\r\n\
        ct: 4000\r\n\
        rgb: 16711680\r\n\
        hue: 100\r\n\
        sat: 35\r\n\
        name: my_bulb\r\n";

    #[test]
    fn test_parse_full_answer() {
        let device = parse_announcement(ANSWER).unwrap();
        assert_eq!(device.location, "192.168.1.239:55443");
        assert_eq!(device.id, "0x000000000015243f");
        assert_eq!(device.model, "color");
        assert_eq!(device.fw_ver, 18);
        assert_eq!(device.support.len(), 7);
        assert!(device.supports("start_cf"));
        assert_eq!(device.power, Some(Power::On));
        assert_eq!(device.color_mode(), Some(ColorMode::ColorTemperature));
        assert_eq!(device.ct, 4000);
        assert_eq!(device.rgb, 16711680);
        assert_eq!(device.hue, 100);
        assert_eq!(device.sat, 35);
        assert_eq!(device.name, "my_bulb");
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_announcement(ANSWER), parse_announcement(ANSWER));
    }

    #[test]
    fn test_header_names_ignore_case() {
        let answer = "HTTP/1.1 200 OK\r\nLOCATION: yeelight://10.0.0.4:55443\r\nBRIGHT: 42\r\n";
        let device = parse_announcement(answer).unwrap();
        assert_eq!(device.location, "10.0.0.4:55443");
        assert_eq!(device.bright, 42);
    }

    #[test]
    fn test_bad_integers_default_to_zero() {
        let answer = "HTTP/1.1 200 OK\r\nLocation: yeelight://10.0.0.4:55443\r\n\
            fw_ver: beta\r\nbright: \r\nsupport: \r\n";
        let device = parse_announcement(answer).unwrap();
        assert_eq!(device.fw_ver, 0);
        assert_eq!(device.bright, 0);
        assert!(device.support.is_empty());
        assert!(device.power.is_none());
    }

    #[test]
    fn test_missing_location_is_skipped() {
        assert!(parse_announcement("HTTP/1.1 200 OK\r\nid: 0x1\r\n").is_none());
        assert!(parse_announcement("HTTP/1.1 200 OK\r\nLocation: nowhere\r\n").is_none());
        assert!(parse_announcement("").is_none());
    }

    #[test]
    fn test_search_request() {
        assert_eq!(
            search_request(DISCOVERY_ADDR),
            "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1982\r\nMAN: \"ssdp:discover\"\r\nST: wifi_bulb\r\n"
        );
    }

    /// A fake bulb that answers the probe with each payload in turn.
    async fn fake_bulb(payloads: Vec<String>) -> String {
        let socket = TokioUdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (size, from) = socket.recv_from(&mut buf).await.unwrap();
            assert!(buf[..size].starts_with(b"M-SEARCH * HTTP/1.1\r\n"));
            for payload in payloads {
                socket.send_to(payload.as_bytes(), from).await.unwrap();
            }
        });
        addr
    }

    fn answer(location: &str, name: &str) -> String {
        format!("HTTP/1.1 200 OK\r\nLocation: yeelight://{location}\r\nname: {name}\r\n")
    }

    #[tokio::test]
    async fn test_same_source_keeps_latest() {
        let target = fake_bulb(vec![
            answer("127.0.0.1:55443", "first"),
            answer("127.0.0.1:55443", "second"),
        ])
        .await;

        let devices = discover_at(&target, Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "second");
    }

    #[tokio::test]
    async fn test_same_location_from_two_sources_keeps_latest() {
        let first = TokioUdpSocket::bind("127.0.0.1:0").await.unwrap();
        let second = TokioUdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = first.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (_, from) = first.recv_from(&mut buf).await.unwrap();
            let old = answer("10.0.0.5:55443", "old");
            first.send_to(old.as_bytes(), from).await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            let new = answer("10.0.0.5:55443", "new");
            second.send_to(new.as_bytes(), from).await.unwrap();
        });

        let devices = discover_at(&target, Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].location, "10.0.0.5:55443");
        assert_eq!(devices[0].name, "new");
    }

    #[tokio::test]
    async fn test_garbage_is_dropped() {
        let target = fake_bulb(vec!["garbage".to_string()]).await;

        let devices = discover_at(&target, Duration::from_millis(300))
            .await
            .unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn test_silence_returns_empty_within_timeout() {
        let quiet = TokioUdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = quiet.local_addr().unwrap().to_string();

        let start = std::time::Instant::now();
        let devices = discover_at(&target, Duration::from_millis(200))
            .await
            .unwrap();
        assert!(devices.is_empty());
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
