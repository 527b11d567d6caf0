//! Basic Usage Example
//!
//! Reads the firmware version and the state of all four channels of an
//! AkkuMaster C4:
//! - Listing and selecting serial ports
//! - Reading configuration, measured and adjusted values per channel
//! - Derived process data with JSON export
//!
//! Usage:
//!   cargo run --example basic_usage                  # Interactive mode
//!   cargo run --example basic_usage -- COM3          # Specify port
//!   cargo run --example basic_usage -- /dev/ttyUSB0
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=debug cargo run --example basic_usage
//!   RUST_LOG=trace cargo run --example basic_usage   # Raw bytes on the line

use c4_gpslogger_protocol::{AkkuMaster, Channel, Result, SerialTransport, Transport};
use inquire::Select;
use log::{error, info};

/// Interactive serial port selection using inquire
fn select_port() -> Result<String> {
    let ports = SerialTransport::list_ports()?;

    if ports.is_empty() {
        eprintln!("No serial ports found!");
        std::process::exit(1);
    }

    let port_names: Vec<String> = ports
        .iter()
        .map(|p| format!("{} - {:?}", p.port_name, p.port_type))
        .collect();

    let selection = Select::new("Select a serial port:", port_names)
        .prompt()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Selection cancelled: {}", e),
            )
        })?;

    // Extract just the port name (before " - ")
    let port_name = selection.split(" - ").next().unwrap_or_default().to_string();
    Ok(port_name)
}

fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG is not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port_name = std::env::args()
        .nth(1)
        .map(Ok)
        .unwrap_or_else(|| select_port())?;

    info!("Connecting to AkkuMaster C4 on {}...", port_name);
    let mut charger = AkkuMaster::with_serial_port(&port_name);

    // Keep the port open across all reads below
    charger.transport_mut().open()?;

    info!("=== Device ===");
    let version = charger.get_version()?;
    info!("Firmware {}", version);
    info!("Hardware: {:?}, {:?}", version.current_variant, version.front_variant);

    for channel in Channel::ALL {
        info!("=== {} ===", channel);
        match charger.get_configuration(channel) {
            Ok(configuration) => info!(
                "{} {} x{} cells, {} mAh, charge {} mA, discharge {} mA",
                configuration.program,
                configuration.accu_type,
                configuration.cell_count,
                configuration.capacity_mah,
                configuration.charge_current_ma,
                configuration.discharge_current_ma
            ),
            Err(e) => error!("Configuration: {}", e),
        }

        match charger.get_measured_values(channel) {
            Ok(measured) => info!("{}", measured),
            Err(e) => error!("Measured values: {}", e),
        }

        match charger.get_adjusted_values(channel) {
            Ok(adjusted) => info!(
                "Memory {}, repeat {}, actual charge current {} mA",
                adjusted.memory_slot, adjusted.repeat_count, adjusted.actual_charge_current_ma
            ),
            Err(e) => error!("Adjusted values: {}", e),
        }

        if let Ok(data) = charger.get_data(channel) {
            if let Ok(json) = serde_json::to_string_pretty(&data) {
                info!("{}", json);
            }
        }
    }

    charger.transport_mut().close();
    info!("=== Basic Usage Complete ===");

    Ok(())
}
