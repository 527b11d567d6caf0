//! # AkkuMaster C4 / GPS-Logger Protocol Library
//!
//! A Rust library for talking to AkkuMaster C4 battery chargers over a
//! serial line and for reading and writing the `$SETUP` configuration
//! block of SM GPS-Logger devices.
//!
//! ## Features
//!
//! - Start, stop and program the four charger channels
//! - Read configuration, measured and adjusted values plus firmware version
//! - Derive live process data (phase, current, capacity, power, energy)
//! - Decode and encode the 192 byte `$SETUP` block with CRC16 validation
//! - Per-variant descriptors for GPS-Logger, GPS-Logger2 and GPS-Logger3
//!
//! ## Example
//!
//! ```no_run
//! use c4_gpslogger_protocol::{AkkuMaster, Channel};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut charger = AkkuMaster::with_serial_port("/dev/ttyUSB0");
//!     let data = charger.get_data(Channel::One)?;
//!     println!("{}: {} mV", data.phase, data.voltage_mv);
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod constants;
pub mod error;
pub mod protocol;
pub mod setup;
pub mod transport;
pub mod types;
pub mod variant;

#[cfg(test)]
mod mock_transport;

pub use error::{ProtocolError, Result};
pub use protocol::AkkuMaster;
pub use setup::{load_setup_file, save_setup_file, DecodedSetup, SetupCodec, SetupRecord};
pub use transport::{SerialTransport, Transport};
pub use types::*;
pub use variant::DeviceVariant;
