//! CRC16 used to protect the GPS-Logger `$SETUP` block.
//!
//! Polynomial 0x1021, initial value 0, MSB first, no final XOR
//! (CRC-16/XMODEM).

use crc::{Crc, CRC_16_XMODEM};

pub const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Compute the CRC16 of `bytes`.
pub fn crc16(bytes: &[u8]) -> u16 {
    CRC16.checksum(bytes)
}
