//! Protocol constants and client timeouts.

use std::time::Duration;

/// TCP port bulbs listen on for commands.
pub const DEFAULT_PORT: u16 = 55443;

/// Multicast group and port discovery probes are sent to.
pub const DISCOVERY_ADDR: &str = "239.255.255.250:1982";

/// Transition used by [`Bulb::on`](crate::Bulb::on) and [`Bulb::off`](crate::Bulb::off).
pub const POWER_TRANSITION_MS: i64 = 1000;

/// Timeouts bounding each blocking step of a command.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use yeelight_lan::Timeouts;
///
/// let timeouts = Timeouts::default().connect(Duration::from_millis(500));
/// assert_eq!(timeouts.connect_timeout(), Duration::from_millis(500));
/// assert_eq!(timeouts.read_timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    connect: Duration,
    read: Duration,
}

impl Timeouts {
    const DEFAULT: Duration = Duration::from_secs(2);

    pub fn new(connect: Duration, read: Duration) -> Self {
        Timeouts { connect, read }
    }

    /// Set the TCP connect timeout.
    pub fn connect(mut self, connect: Duration) -> Self {
        self.connect = connect;
        self
    }

    /// Set the response read timeout.
    pub fn read(mut self, read: Duration) -> Self {
        self.read = read;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect
    }

    pub fn read_timeout(&self) -> Duration {
        self.read
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts::new(Self::DEFAULT, Self::DEFAULT)
    }
}
