//! Setup File Example
//!
//! Loads a GPS-Logger `$SETUP` file, prints it, clamps the alarm limits
//! and writes it back with a fresh checksum.
//!
//! Usage:
//!   cargo run --example setup_file -- SETUP.INI GPS-Logger2
//!   cargo run --example setup_file -- SETUP.INI GPS-Logger2 OUT.INI

use c4_gpslogger_protocol::setup::DataRate;
use c4_gpslogger_protocol::{load_setup_file, save_setup_file, DeviceVariant, Result};
use log::{error, info, warn};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("Usage: setup_file <SETUP file> [variant] [output]");
        std::process::exit(1);
    };
    let variant_name = args.next().unwrap_or_else(|| "GPS-Logger".to_string());
    let Some(variant) = DeviceVariant::from_name(&variant_name) else {
        error!("Unknown device variant {}", variant_name);
        std::process::exit(1);
    };
    let output = args.next().unwrap_or_else(|| input.clone());

    let decoded = load_setup_file(&input, variant)?;
    if !decoded.is_valid {
        warn!(
            "Checksum mismatch (stored {:#06x}, computed {:#06x}), values may be wrong",
            decoded.stored_checksum, decoded.computed_checksum
        );
    }

    let mut record = decoded.record;
    info!("=== {} setup ===", variant);
    info!("Serial number: {}", record.serial_number);
    info!("Firmware: {:.2}", record.firmware_version as f64 / 100.0);
    info!(
        "Data rate: {}",
        match record.data_rate() {
            Some(DataRate::Hz10) => "10 Hz",
            Some(DataRate::Hz5) => "5 Hz",
            Some(DataRate::Hz2) => "2 Hz",
            Some(DataRate::Hz1) => "1 Hz",
            None => "unknown",
        }
    );
    info!("Start mode: {:?}", record.start_mode());
    info!("Alarms: {:?}", record.telemetry_alarms);
    info!("Jeti EX slots enabled: {}", record.jeti_ex_mask.enabled_count());
    let fix = record.fix_position;
    if fix.enabled {
        info!(
            "Fixed position: {:.4}, {:.4}, {} m",
            fix.latitude.degrees(),
            fix.longitude.degrees(),
            fix.altitude_m
        );
    }

    record.clamp_alarm_limits();
    save_setup_file(&output, &record, variant)?;
    info!("Written to {}", output);

    Ok(())
}
