//! Protocol constants for AkkuMaster C4 and GPS-Logger communication.
//!
//! This module defines the AkkuMaster command bytes, channel offsets and
//! answer sizes, the serial port defaults, and the geometry of the
//! GPS-Logger `$SETUP` block.

/// Read firmware version (global, not channel addressed)
pub const READ_VERSION: u8 = 0x16;

/// Read configured values of a channel
pub const READ_CONFIGURATION: u8 = 0x11;

/// Read measured values of a channel
pub const READ_MEASURED_VALUES: u8 = 0x12;

/// Read additional adjusted parameters of a channel
pub const READ_ADJUSTED_VALUES: u8 = 0x21;

/// Write charge program parameters
pub const WRITE_PROGRAM: u8 = 0x14;

/// Write memory slot, cycle count and sleep time
pub const SET_MEMORY_CYCLE_SLEEP: u8 = 0x24;

/// Start loaded program
pub const START_PROGRAM: u8 = 0x15;

/// Stop running program
pub const STOP_PROGRAM: u8 = 0x13;

/// Acknowledge program start
pub const OK_PROGRAM: u8 = 0x19;

/// Channel select offsets added to a channel addressed op-code
pub const CHANNEL_OFFSETS: [u8; 4] = [0x00, 0x40, 0x80, 0xC0];

/// Status byte of a successful command
pub const SUCCESS: u8 = 0x00;

/// Bit flag in the state byte set while the AkkuMaster is active
pub const STATE_DEVICE_ACTIVE: u8 = 0x80;

/// Answer length of ok/start/stop/write commands
pub const STATUS_ANSWER_LEN: usize = 2;

/// Answer length of read configuration
pub const CONFIGURATION_ANSWER_LEN: usize = 14;

/// Answer length of read adjusted values
pub const ADJUSTED_ANSWER_LEN: usize = 5;

/// Answer length of read measured values
pub const MEASURED_ANSWER_LEN: usize = 16;

/// Answer length of read version
pub const VERSION_ANSWER_LEN: usize = 11;

/// Baud rate (9600 bps)
pub const BAUD_RATE: u32 = 9600;

/// Stop bits configuration
pub const STOP_BITS: serialport::StopBits = serialport::StopBits::One;

/// Default answer timeout in milliseconds
pub const TIMEOUT_MS: u64 = 2000;

/// Size of the GPS-Logger `$SETUP` block
pub const SETUP_SIZE: usize = 192;

/// Offset of the little-endian CRC16 at the end of the `$SETUP` block
pub const SETUP_CHECKSUM_OFFSET: usize = SETUP_SIZE - 2;
