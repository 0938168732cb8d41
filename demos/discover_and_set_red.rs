//! Discover all Yeelight bulbs on the network and set them to red.
//!
//! This example demonstrates:
//! - Discovery of bulbs on the local network
//! - Setting all discovered lights to red color
//!
//! Run with: cargo run --example discover_and_set_red

use std::time::Duration;
use yeelight_lan::{Bulb, Color, discover};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Discovering Yeelight bulbs on the network...");

    let devices = discover(Duration::from_secs(2)).await?;

    if devices.is_empty() {
        println!("No lights found on the network.");
        return Ok(());
    }

    println!("Found {} light(s):", devices.len());
    for device in &devices {
        println!("  - {} ({}) at {}", device.name, device.model, device.location);
    }

    let red = Color::rgb(255, 0, 0);

    println!("\nSetting all lights to red...");

    for device in &devices {
        let bulb = Bulb::new(device);
        match bulb.set_rgb(red, 500).await {
            Ok(()) => println!("  ✓ Successfully set {} to red", device.location),
            Err(e) => eprintln!("  ✗ Failed to set {} to red: {}", device.location, e),
        }
    }

    println!("\nDone!");
    Ok(())
}
