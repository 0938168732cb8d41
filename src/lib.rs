//! # yeelight_lan
//!
//! An async Rust library for discovering and controlling Yeelight smart bulbs
//! on the local network.
//!
//! This crate provides a **runtime-agnostic** async API. Bulbs are found with
//! an SSDP-style multicast probe and controlled through their JSON command
//! protocol over TCP, one connection per command.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use yeelight_lan::{Bulb, Color, Devices, discover};
//!
//! async fn control_light() -> Result<(), Box<dyn std::error::Error>> {
//!     // Find the bulbs on the network
//!     let devices = Devices::from(discover(Duration::from_secs(1)).await?);
//!
//!     // Address one by name or IP address
//!     let device = devices.resolve("bedroom")?;
//!     let bulb = Bulb::new(&device);
//!
//!     // Fade to blue over half a second
//!     bulb.set_rgb(Color::rgb(0, 0, 255), 500).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Discovery**: Find bulbs with [`discover`], parsed into [`Device`] records
//! - **Addressing**: Resolve names or IP addresses through [`Devices`] and [`matches`]
//! - **Power**: [`Bulb::on`], [`Bulb::off`], [`Bulb::toggle`], [`Bulb::set_power`]
//! - **Color**: RGB via [`Color`], hue/saturation, color temperature, brightness
//! - **Color Flows**: Device-side programs with [`FlowExpression`]
//! - **Scenes, Timers, Adjustments, Naming**: [`Scene`], [`CronType`], [`AdjustAction`]
//! - **State**: [`Bulb::refresh`] reads the bulb's properties into its [`Device`]
//!
//! ## Communication
//!
//! Discovery probes go to the multicast group `239.255.255.250:1982`. Commands
//! are JSON lines sent over TCP to the bulb's location, usually port 55443.
//! The bulb must have "LAN control" enabled in the Yeelight app.
//!
//! Delivery is at most once. A command whose response is lost to a timeout
//! may still have taken effect on the bulb; the library never retries.
//!
//! ## Runtime Selection
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! yeelight-lan = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! yeelight-lan = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! yeelight-lan = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! ```

mod bulb;
mod command;
mod config;
mod device;
mod discovery;
mod errors;
mod flow;
mod matcher;
mod registry;
pub mod runtime;
pub mod transport;
mod types;

// Re-export public API
pub use bulb::Bulb;
pub use command::{Command, Method, Reply, ReplyShape, Response, ResponseError};
pub use config::{DEFAULT_PORT, DISCOVERY_ADDR, POWER_TRANSITION_MS, Timeouts};
pub use device::{Device, Properties};
pub use discovery::{discover, discover_at, parse_announcement};
pub use errors::{Error, ProtocolError};
pub use flow::{FlowAction, FlowExpression, FlowTuple};
pub use matcher::{matches, matches_host, matches_name};
pub use registry::Devices;
pub use types::{
    AdjustAction, AdjustProp, Color, ColorMode, CronJob, CronType, Effect, Power, Scene,
    Transition,
};
