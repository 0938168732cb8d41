//! CLI application for controlling Yeelight bulbs.
//!
//! Discovered bulbs are saved to a JSON file so later commands can address
//! them by name. Any IP address works too, discovered or not.
//!
//! Run with: cargo run --example yeelight_cli -- --help

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use yeelight_lan::{
    AdjustAction, AdjustProp, Bulb, Color, CronType, Device, Devices, FlowAction, FlowExpression,
    Scene, discover,
};

#[derive(Parser)]
#[command(name = "yeelight-cli")]
#[command(about = "Control Yeelight bulbs on your LAN from the command line", long_about = None)]
struct Cli {
    /// File the discovered lights are saved to
    #[arg(short, long, global = true, default_value = "yeelight.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover bulbs on the network and save them
    Discover {
        /// Discovery timeout in milliseconds
        #[arg(short, long, default_value = "1000")]
        timeout: u64,
    },

    /// List the saved bulbs
    List,

    /// Show the current properties of a bulb
    Props { light: String },

    /// Turn a bulb on
    On { light: String },

    /// Turn a bulb off
    Off { light: String },

    /// Toggle a bulb on/off
    Toggle { light: String },

    /// Set color temperature in Kelvin (1700-6500)
    SetTemp {
        light: String,
        kelvin: u32,
        /// Transition in milliseconds; 0 for an instant change
        #[arg(short, long, default_value = "30")]
        duration: i64,
    },

    /// Set color as hex (ff8800) or r,g,b
    SetColor {
        light: String,
        color: String,
        #[arg(short, long, default_value = "30")]
        duration: i64,
    },

    /// Set hue (0-359) and saturation (0-100)
    SetHsv {
        light: String,
        hue: u16,
        sat: u8,
        #[arg(short, long, default_value = "30")]
        duration: i64,
    },

    /// Set brightness (1-100)
    SetBright {
        light: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=100))]
        level: u8,
        #[arg(short, long, default_value = "30")]
        duration: i64,
    },

    /// Adjust brightness, temperature or color without knowing the current value
    Adjust {
        light: String,
        /// increase, decrease or circle
        action: String,
        /// bright, ct or color
        prop: String,
    },

    /// Start a color flow, e.g. `start-cf bedroom 4 turn-off 1000,2,2700,100`
    StartCf {
        light: String,
        /// Number of state changes before stopping, 0 for endless
        count: u32,
        /// recover-state, keep-state or turn-off
        action: String,
        /// Flat list of duration(ms),mode,value,brightness tuples
        expression: String,
    },

    /// Stop a running color flow
    StopCf { light: String },

    /// Turn on at a brightness and switch off after some minutes
    Sleep {
        light: String,
        bright: u8,
        minutes: u32,
    },

    /// Turn a bulb off after some minutes
    Timer { light: String, minutes: u32 },

    /// Show the pending off timer
    TimerShow { light: String },

    /// Cancel the pending off timer
    TimerCancel { light: String },

    /// Save the current state as the power-on default
    SetDefault { light: String },

    /// Give a bulb a name
    SetName { light: String, name: String },
}

impl Commands {
    fn light(&self) -> Option<&str> {
        match self {
            Commands::Discover { .. } | Commands::List => None,
            Commands::Props { light }
            | Commands::On { light }
            | Commands::Off { light }
            | Commands::Toggle { light }
            | Commands::SetTemp { light, .. }
            | Commands::SetColor { light, .. }
            | Commands::SetHsv { light, .. }
            | Commands::SetBright { light, .. }
            | Commands::Adjust { light, .. }
            | Commands::StartCf { light, .. }
            | Commands::StopCf { light }
            | Commands::Sleep { light, .. }
            | Commands::Timer { light, .. }
            | Commands::TimerShow { light }
            | Commands::TimerCancel { light }
            | Commands::SetDefault { light }
            | Commands::SetName { light, .. } => Some(light),
        }
    }
}

fn load(path: &Path) -> Devices {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|data| serde_json::from_str(&data).ok())
        .unwrap_or_default()
}

fn save(path: &Path, devices: &Devices) -> Result<(), Box<dyn std::error::Error>> {
    if devices.is_empty() {
        return Ok(());
    }
    std::fs::write(path, serde_json::to_string_pretty(devices)?)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut devices = load(&cli.store);

    let Some(token) = cli.command.light().map(String::from) else {
        match cli.command {
            Commands::Discover { timeout } => {
                let found = discover(Duration::from_millis(timeout)).await?;
                println!("{} Yeelight found on your network.", found.len());
                devices.merge(found);
                save(&cli.store, &devices)?;
            }
            Commands::List => {
                if devices.is_empty() {
                    println!("No Yeelight saved. Run `discover` to find lights on your network.");
                }
                for (i, device) in devices.iter().enumerate() {
                    let name = if device.name.is_empty() {
                        "Unknown [no name]"
                    } else {
                        &device.name
                    };
                    println!("- {}: {} on {}", i + 1, name, device.host());
                }
            }
            _ => unreachable!(),
        }
        return Ok(());
    };

    let device = devices.resolve(&token)?;
    let bulb = Bulb::new(&device);

    match cli.command {
        Commands::Discover { .. } | Commands::List => unreachable!(),
        Commands::Props { .. } => {
            let mut device = device.clone();
            bulb.refresh(&mut device).await?;
            println!("{} properties\n{}", token, serde_json::to_string_pretty(&device)?);
        }
        Commands::On { .. } => bulb.on().await?,
        Commands::Off { .. } => bulb.off().await?,
        Commands::Toggle { .. } => bulb.toggle().await?,
        Commands::SetTemp {
            kelvin, duration, ..
        } => bulb.set_ct_abx(kelvin, duration).await?,
        Commands::SetColor {
            color, duration, ..
        } => bulb.set_rgb(Color::from_str(&color)?, duration).await?,
        Commands::SetHsv {
            hue, sat, duration, ..
        } => bulb.set_hsv(hue, sat, duration).await?,
        Commands::SetBright {
            level, duration, ..
        } => bulb.set_bright(level, duration).await?,
        Commands::Adjust { action, prop, .. } => {
            let action = AdjustAction::from_str(&action)
                .map_err(|_| format!("unknown action {action:?}; use increase, decrease or circle"))?;
            let prop = AdjustProp::from_str(&prop)
                .map_err(|_| format!("unknown property {prop:?}; use bright, ct or color"))?;
            bulb.set_adjust(action, prop).await?
        }
        Commands::StartCf {
            count,
            action,
            expression,
            ..
        } => {
            let action = FlowAction::from_str(&action)?;
            let expression = FlowExpression::from_str(&expression)?;
            bulb.start_cf(count, action, &expression).await?
        }
        Commands::StopCf { .. } => bulb.stop_cf().await?,
        Commands::Sleep {
            bright, minutes, ..
        } => bulb.set_scene(&Scene::AutoDelayOff { bright, minutes }).await?,
        Commands::Timer { minutes, .. } => bulb.cron_add(CronType::PowerOff, minutes).await?,
        Commands::TimerShow { .. } => {
            for job in bulb.cron_get(CronType::PowerOff).await? {
                println!("power off in {} minute(s)", job.delay);
            }
        }
        Commands::TimerCancel { .. } => bulb.cron_del(CronType::PowerOff).await?,
        Commands::SetDefault { .. } => bulb.set_default().await?,
        Commands::SetName { name, .. } => bulb.set_name(&name).await?,
    }
    println!("{token}: done");

    // Keep the saved record current; a failed refresh leaves it as it was.
    if let Some(saved) = devices.find_mut(&device.host().to_string()) {
        let mut refreshed: Device = saved.clone();
        if bulb.refresh(&mut refreshed).await.is_ok() {
            *saved = refreshed;
            save(&cli.store, &devices)?;
        }
    }

    Ok(())
}
