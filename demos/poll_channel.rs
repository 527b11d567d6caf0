//! Poll Channel Example
//!
//! Polls the live values of one channel until the process has been idle
//! for ten consecutive reads.
//!
//! Usage:
//!   cargo run --example poll_channel -- /dev/ttyUSB0 2
//!
//! Set RUST_LOG=debug to see every command.

use c4_gpslogger_protocol::{AkkuMaster, Channel, Result};
use log::{info, warn};
use std::thread;
use std::time::Duration;

const IDLE_RETRIES: u32 = 10;
const POLL_INTERVAL: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let port_name = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let channel = Channel::try_from(args.next().and_then(|n| n.parse().ok()).unwrap_or(1))?;

    info!("Polling {} on {}", channel, port_name);
    let mut charger = AkkuMaster::with_serial_port(&port_name);

    let mut retries = IDLE_RETRIES;
    while retries > 0 {
        match charger.get_data(channel) {
            Ok(data) if data.is_active() => {
                retries = IDLE_RETRIES;
                info!(
                    "{} ({}): {} mV, {} mA, {} mAh, power {}, energy {}",
                    data.phase,
                    data.process_number(),
                    data.voltage_mv,
                    data.current_ma,
                    data.capacity_mah,
                    data.power.unwrap_or_default(),
                    data.energy.unwrap_or_default()
                );
            }
            Ok(data) => {
                retries -= 1;
                info!("{}: inactive ({} retries left)", data.phase, retries);
            }
            Err(e) => {
                retries -= 1;
                warn!("Read failed: {} ({} retries left)", e, retries);
            }
        }
        thread::sleep(POLL_INTERVAL);
    }

    info!("{} idle, stopping", channel);
    Ok(())
}
