//! GPS-Logger `$SETUP` configuration block.
//!
//! The block is 192 bytes of little-endian fields at fixed offsets,
//! closed by a CRC16 over the first 190 bytes. Firmware 1.00 only knows a
//! subset of the fields ([`SetupLayout::V1`]); later loggers use the
//! reserved areas for the rest ([`SetupLayout::Extended`]).
//!
//! A checksum mismatch does not fail decoding. Files written by other
//! firmware versions are common, so the record is returned with
//! [`DecodedSetup::is_valid`] cleared and the caller decides whether to
//! trust it.

use crate::checksum::crc16;
use crate::constants::{SETUP_CHECKSUM_OFFSET, SETUP_SIZE};
use crate::error::{ProtocolError, Result};
use crate::transport::hex;
use crate::variant::{DeviceVariant, SetupLayout};
use bitflags::bitflags;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

mod offsets {
    pub const SERIAL_NUMBER: usize = 0;
    pub const DATA_RATE: usize = 2;
    pub const START_MODE: usize = 4;
    pub const TIME_ZONE: usize = 6;
    pub const UNITS: usize = 8;
    pub const VARIO_THRESHOLD: usize = 10;
    pub const VARIO_TONE: usize = 12;
    pub const STOP_MODE: usize = 14;
    pub const MODUS_IGC: usize = 16;
    pub const MODUS_DISTANCE: usize = 18;
    pub const TELEMETRY_TYPE: usize = 20;
    pub const VARIO_THRESHOLD_SINK: usize = 22;
    pub const VARIO_FACTOR: usize = 24;
    pub const VARIO_FILTER: usize = 25;
    pub const FIX_ALTITUDE: usize = 26;
    pub const TELEMETRY_ALARMS: usize = 34;
    pub const HEIGHT_ALARM: usize = 36;
    pub const SPEED_MAX_ALARM: usize = 38;
    pub const DISTANCE_MAX_ALARM: usize = 40;
    pub const VOLTAGE_RX_ALARM: usize = 42;
    pub const TRIP_LENGTH_ALARM: usize = 44;
    pub const CURRENT_UL_ALARM: usize = 46;
    pub const VOLTAGE_START_UL_ALARM: usize = 48;
    pub const VOLTAGE_UL_ALARM: usize = 50;
    pub const CAPACITY_UL_ALARM: usize = 52;
    pub const DISTANCE_MIN_ALARM: usize = 54;
    pub const SPEED_MIN_ALARM: usize = 56;
    pub const MLINK_VARIO: usize = 74;
    pub const MLINK_SPEED: usize = 76;
    pub const MLINK_DIRECTION: usize = 78;
    pub const MLINK_HEIGHT: usize = 80;
    pub const MLINK_DISTANCE: usize = 82;
    pub const MLINK_TRIP_LENGTH: usize = 84;
    pub const MLINK_VOLTAGE_RX: usize = 86;
    pub const MLINK_VOLTAGE: usize = 88;
    pub const MLINK_CURRENT: usize = 90;
    pub const MLINK_CAPACITY: usize = 92;
    pub const MLINK_REVOLUTION: usize = 94;
    pub const MLINK_CELL_VOLTAGE: usize = 96;
    pub const MLINK_A1: usize = 98;
    pub const MLINK_A2: usize = 100;
    pub const MLINK_A3: usize = 102;
    pub const FIRMWARE_VERSION: usize = 106;
    pub const JETI_EX_MASK: usize = 108;
    pub const FIX_LATITUDE: usize = 112;
    pub const FIX_LONGITUDE: usize = 116;
}

/// M-Link address value meaning "not assigned" ("--" on the device)
pub const MLINK_UNASSIGNED: u16 = 16;

const USE_FIXED_POSITION: u32 = 0x8000_0000;
const HEMISPHERE_SOUTH_WEST: u32 = 0x4000_0000;
const COORDINATE_MAGNITUDE: u32 = 0x3FFF_FFFF;
const MAX_DEGREES: f64 = 180.0;

bitflags! {
    /// Enabled telemetry alarms
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TelemetryAlarms: u16 {
        const HEIGHT = 0x0001;
        const SPEED_MAX = 0x0002;
        const DISTANCE_MAX = 0x0004;
        const TRIP_LENGTH = 0x0008;
        const VOLTAGE_RX = 0x0010;
        const CURRENT_UL = 0x0020;
        const VOLTAGE_START_UL = 0x0040;
        const VOLTAGE_UL = 0x0080;
        const CAPACITY_UL = 0x0100;
        const DISTANCE_MIN = 0x0200;
        const SPEED_MIN = 0x0400;
    }
}

/// Jeti EX telemetry slot mask.
///
/// Slot 0 (time) is always sent. Slots 1..=30 are optional measurements;
/// a set bit switches the slot OFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JetiExMask(pub u32);

impl JetiExMask {
    pub const TIME_SLOT: u8 = 0;
    pub const OPTIONAL_SLOTS: u32 = 30;
    const OPTIONAL_BITS: u32 = 0x7FFF_FFFE;

    pub fn is_enabled(self, slot: u8) -> bool {
        match slot {
            Self::TIME_SLOT => true,
            1..=30 => self.0 & (1 << slot) == 0,
            _ => false,
        }
    }

    /// Switch an optional slot on or off. The time slot and slots above 30
    /// are left untouched.
    pub fn set_enabled(&mut self, slot: u8, enabled: bool) {
        if !(1..=30).contains(&slot) {
            return;
        }
        if enabled {
            self.0 &= !(1 << slot);
        } else {
            self.0 |= 1 << slot;
        }
    }

    /// Number of enabled optional slots
    pub fn enabled_count(self) -> u32 {
        Self::OPTIONAL_SLOTS - (self.0 & Self::OPTIONAL_BITS).count_ones()
    }

    pub fn enabled_slots(self) -> impl Iterator<Item = u8> {
        (1..=30u8).filter(move |&slot| self.is_enabled(slot))
    }
}

/// Fixed-point coordinate in 1/10000 degree.
///
/// `negative` is South for latitudes and West for longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Magnitude, 30 bits on the wire. Higher bits are dropped by [`raw`](Self::raw).
    pub ten_thousandths: u32,
    pub negative: bool,
}

impl GeoCoordinate {
    /// Decode from a packed word, ignoring the use-fixed flag in bit 31
    pub fn from_raw(raw: u32) -> Self {
        GeoCoordinate {
            ten_thousandths: raw & COORDINATE_MAGNITUDE,
            negative: raw & HEMISPHERE_SOUTH_WEST != 0,
        }
    }

    /// Packed word without the use-fixed flag. Only the low 30 bits of the
    /// magnitude are kept.
    pub fn raw(self) -> u32 {
        let mut raw = self.ten_thousandths & COORDINATE_MAGNITUDE;
        if self.negative {
            raw |= HEMISPHERE_SOUTH_WEST;
        }
        raw
    }

    /// Convert signed degrees, `None` unless finite and within +/-180.
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() || degrees.abs() > MAX_DEGREES {
            return None;
        }
        Some(GeoCoordinate {
            ten_thousandths: (degrees.abs() * 10000.0).round() as u32,
            negative: degrees < 0.0,
        })
    }

    /// Signed degrees, negative for South/West
    pub fn degrees(self) -> f64 {
        let magnitude = self.ten_thousandths as f64 / 10000.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Fixed start position used instead of the first GPS fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FixPosition {
    /// Stored in bit 31 of the latitude word
    pub enabled: bool,
    pub latitude: GeoCoordinate,
    pub longitude: GeoCoordinate,
    pub altitude_m: i16,
}

/// Alarm thresholds. Units follow the device: m, km/h, V/100, km/10,
/// A, V/10 and mAh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmLimits {
    pub height: u16,
    pub speed_max: u16,
    pub distance_max: u16,
    pub voltage_rx: u16,
    pub trip_length: u16,
    pub current_ul: u16,
    pub voltage_start_ul: u16,
    pub voltage_ul: u16,
    pub capacity_ul: u16,
    pub distance_min: u16,
    pub speed_min: u16,
}

impl Default for AlarmLimits {
    fn default() -> Self {
        AlarmLimits {
            height: 200,
            speed_max: 200,
            distance_max: 500,
            voltage_rx: 450,
            trip_length: 50,
            current_ul: 100,
            voltage_start_ul: 124,
            voltage_ul: 100,
            capacity_ul: 2000,
            distance_min: 10,
            speed_min: 10,
        }
    }
}

/// M-Link telemetry addresses (0-15, [`MLINK_UNASSIGNED`] for none)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MLinkAddresses {
    pub vario: u16,
    pub speed: u16,
    pub direction: u16,
    pub height: u16,
    pub distance: u16,
    pub trip_length: u16,
    pub voltage_rx: u16,
    pub voltage: u16,
    pub current: u16,
    pub capacity: u16,
    pub revolution: u16,
    pub cell_voltage: u16,
    pub a1: u16,
    pub a2: u16,
    pub a3: u16,
}

impl Default for MLinkAddresses {
    fn default() -> Self {
        MLinkAddresses {
            vario: 0,
            speed: 1,
            direction: 4,
            height: 2,
            distance: 5,
            trip_length: 3,
            voltage_rx: MLINK_UNASSIGNED,
            voltage: MLINK_UNASSIGNED,
            current: MLINK_UNASSIGNED,
            capacity: MLINK_UNASSIGNED,
            revolution: MLINK_UNASSIGNED,
            cell_voltage: MLINK_UNASSIGNED,
            a1: MLINK_UNASSIGNED,
            a2: MLINK_UNASSIGNED,
            a3: MLINK_UNASSIGNED,
        }
    }
}

/// Logging rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRate {
    Hz10,
    Hz5,
    Hz2,
    Hz1,
}

/// When logging starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    Manual,
    Fix3d,
    Above20m,
    Above20kmh,
}

/// Decoded `$SETUP` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupRecord {
    pub serial_number: u16,
    /// Firmware version times 100
    pub firmware_version: u16,
    pub data_rate: u16,
    pub start_mode: u16,
    pub stop_mode: u16,
    /// Hours from UTC, -12..=12
    pub time_zone: i16,
    pub units: u16,
    pub vario_threshold: u16,
    pub vario_threshold_sink: u16,
    pub vario_tone: u16,
    pub vario_factor: i8,
    pub vario_filter: i8,
    pub modus_igc: u16,
    pub modus_distance: u16,
    pub telemetry_type: u16,
    pub telemetry_alarms: TelemetryAlarms,
    pub alarm_limits: AlarmLimits,
    pub mlink_addresses: MLinkAddresses,
    pub jeti_ex_mask: JetiExMask,
    pub fix_position: FixPosition,
}

impl Default for SetupRecord {
    fn default() -> Self {
        SetupRecord {
            serial_number: 357,
            firmware_version: 100,
            data_rate: 0,
            start_mode: 1,
            stop_mode: 0,
            time_zone: 2,
            units: 0,
            vario_threshold: 5,
            vario_threshold_sink: 5,
            vario_tone: 0,
            vario_factor: 0,
            vario_filter: 0,
            modus_igc: 0,
            modus_distance: 0,
            telemetry_type: 0,
            telemetry_alarms: TelemetryAlarms::HEIGHT | TelemetryAlarms::SPEED_MAX | TelemetryAlarms::VOLTAGE_RX,
            alarm_limits: AlarmLimits::default(),
            mlink_addresses: MLinkAddresses::default(),
            jeti_ex_mask: JetiExMask::default(),
            fix_position: FixPosition::default(),
        }
    }
}

impl SetupRecord {
    pub fn data_rate(&self) -> Option<DataRate> {
        match self.data_rate {
            0 => Some(DataRate::Hz10),
            1 => Some(DataRate::Hz5),
            2 => Some(DataRate::Hz2),
            3 => Some(DataRate::Hz1),
            _ => None,
        }
    }

    pub fn start_mode(&self) -> Option<StartMode> {
        match self.start_mode {
            0 => Some(StartMode::Manual),
            1 => Some(StartMode::Fix3d),
            2 => Some(StartMode::Above20m),
            3 => Some(StartMode::Above20kmh),
            _ => None,
        }
    }

    /// Clamp every alarm threshold into the range the logger accepts.
    pub fn clamp_alarm_limits(&mut self) {
        let limits = &mut self.alarm_limits;
        limits.height = limits.height.clamp(10, 4000);
        limits.speed_max = limits.speed_max.clamp(10, 1000);
        limits.speed_min = limits.speed_min.clamp(10, 1000);
        limits.distance_max = limits.distance_max.clamp(10, 5000);
        limits.distance_min = limits.distance_min.clamp(10, 5000);
        limits.trip_length = limits.trip_length.clamp(1, 999);
        limits.voltage_rx = limits.voltage_rx.clamp(300, 800);
        limits.current_ul = limits.current_ul.clamp(1, 400);
        limits.voltage_start_ul = limits.voltage_start_ul.clamp(10, 600);
        limits.voltage_ul = limits.voltage_ul.clamp(10, 600);
        limits.capacity_ul = limits.capacity_ul.clamp(100, 30000);
    }
}

/// Result of decoding a `$SETUP` block
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSetup {
    pub record: SetupRecord,
    /// Stored checksum matches the computed one
    pub is_valid: bool,
    pub stored_checksum: u16,
    pub computed_checksum: u16,
}

struct SetupReader<'a> {
    bytes: &'a [u8],
}

impl SetupReader<'_> {
    fn u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }

    fn i16(&self, offset: usize) -> i16 {
        self.u16(offset) as i16
    }

    fn i8(&self, offset: usize) -> i8 {
        self.bytes[offset] as i8
    }

    fn u32(&self, offset: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_le_bytes(word)
    }
}

struct SetupWriter {
    bytes: [u8; SETUP_SIZE],
}

impl SetupWriter {
    fn u16(&mut self, offset: usize, value: u16) {
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn i16(&mut self, offset: usize, value: i16) {
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn i8(&mut self, offset: usize, value: i8) {
        self.bytes[offset] = value as u8;
    }

    fn u32(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// `$SETUP` encoder/decoder for one logger variant
#[derive(Debug, Clone, Copy)]
pub struct SetupCodec {
    variant: DeviceVariant,
}

impl SetupCodec {
    pub fn new(variant: DeviceVariant) -> Self {
        SetupCodec { variant }
    }

    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    /// Decode a 192 byte block. Fields the variant's layout does not carry
    /// keep their [`SetupRecord::default`] values.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedSetup> {
        use offsets::*;

        if bytes.len() != SETUP_SIZE {
            return Err(ProtocolError::SetupLength { actual: bytes.len() });
        }
        let r = SetupReader { bytes };
        let mut record = SetupRecord::default();

        record.serial_number = r.u16(SERIAL_NUMBER);
        record.data_rate = r.u16(DATA_RATE);
        record.start_mode = r.u16(START_MODE);
        record.time_zone = r.i16(TIME_ZONE);
        record.units = r.u16(UNITS);
        record.vario_threshold = r.u16(VARIO_THRESHOLD);
        record.vario_tone = r.u16(VARIO_TONE);
        record.telemetry_alarms = TelemetryAlarms::from_bits_retain(r.u16(TELEMETRY_ALARMS));
        record.firmware_version = r.u16(FIRMWARE_VERSION);

        let limits = &mut record.alarm_limits;
        limits.height = r.u16(HEIGHT_ALARM);
        limits.speed_max = r.u16(SPEED_MAX_ALARM);
        limits.distance_max = r.u16(DISTANCE_MAX_ALARM);
        limits.voltage_rx = r.u16(VOLTAGE_RX_ALARM);
        limits.trip_length = r.u16(TRIP_LENGTH_ALARM);
        limits.current_ul = r.u16(CURRENT_UL_ALARM);
        limits.voltage_start_ul = r.u16(VOLTAGE_START_UL_ALARM);
        limits.voltage_ul = r.u16(VOLTAGE_UL_ALARM);
        limits.capacity_ul = r.u16(CAPACITY_UL_ALARM);

        let mlink = &mut record.mlink_addresses;
        mlink.vario = r.u16(MLINK_VARIO);
        mlink.speed = r.u16(MLINK_SPEED);
        mlink.direction = r.u16(MLINK_DIRECTION);
        mlink.height = r.u16(MLINK_HEIGHT);
        mlink.distance = r.u16(MLINK_DISTANCE);
        mlink.trip_length = r.u16(MLINK_TRIP_LENGTH);

        if self.variant.setup_layout() == SetupLayout::Extended {
            record.stop_mode = r.u16(STOP_MODE);
            record.modus_igc = r.u16(MODUS_IGC);
            record.modus_distance = r.u16(MODUS_DISTANCE);
            record.telemetry_type = r.u16(TELEMETRY_TYPE);
            record.vario_threshold_sink = r.u16(VARIO_THRESHOLD_SINK);
            record.vario_factor = r.i8(VARIO_FACTOR);
            record.vario_filter = r.i8(VARIO_FILTER);

            record.alarm_limits.distance_min = r.u16(DISTANCE_MIN_ALARM);
            record.alarm_limits.speed_min = r.u16(SPEED_MIN_ALARM);

            let mlink = &mut record.mlink_addresses;
            mlink.voltage_rx = r.u16(MLINK_VOLTAGE_RX);
            mlink.voltage = r.u16(MLINK_VOLTAGE);
            mlink.current = r.u16(MLINK_CURRENT);
            mlink.capacity = r.u16(MLINK_CAPACITY);
            mlink.revolution = r.u16(MLINK_REVOLUTION);
            mlink.cell_voltage = r.u16(MLINK_CELL_VOLTAGE);
            mlink.a1 = r.u16(MLINK_A1);
            mlink.a2 = r.u16(MLINK_A2);
            mlink.a3 = r.u16(MLINK_A3);

            record.jeti_ex_mask = JetiExMask(r.u32(JETI_EX_MASK));

            let latitude = r.u32(FIX_LATITUDE);
            record.fix_position = FixPosition {
                enabled: (latitude >> 24) & 0x80 != 0,
                latitude: GeoCoordinate::from_raw(latitude),
                longitude: GeoCoordinate::from_raw(r.u32(FIX_LONGITUDE)),
                altitude_m: r.i16(FIX_ALTITUDE),
            };
        }

        let stored_checksum = r.u16(SETUP_CHECKSUM_OFFSET);
        let computed_checksum = crc16(&bytes[..SETUP_CHECKSUM_OFFSET]);
        let is_valid = stored_checksum == computed_checksum;
        if !is_valid {
            warn!(
                "Checksum mismatch! stored {:#06x}, computed {:#06x}",
                stored_checksum, computed_checksum
            );
        }
        debug!(
            "Decoded {} setup: serial {}, firmware {}",
            self.variant, record.serial_number, record.firmware_version
        );

        Ok(DecodedSetup {
            record,
            is_valid,
            stored_checksum,
            computed_checksum,
        })
    }

    /// Encode a record into a 192 byte block with trailing CRC16. Areas the
    /// variant's layout does not use stay zero.
    pub fn encode(&self, record: &SetupRecord) -> [u8; SETUP_SIZE] {
        use offsets::*;

        let mut w = SetupWriter { bytes: [0u8; SETUP_SIZE] };

        w.u16(SERIAL_NUMBER, record.serial_number);
        w.u16(DATA_RATE, record.data_rate);
        w.u16(START_MODE, record.start_mode);
        w.i16(TIME_ZONE, record.time_zone);
        w.u16(UNITS, record.units);
        w.u16(VARIO_THRESHOLD, record.vario_threshold);
        w.u16(VARIO_TONE, record.vario_tone);
        w.u16(TELEMETRY_ALARMS, record.telemetry_alarms.bits());
        w.u16(FIRMWARE_VERSION, record.firmware_version);

        let limits = &record.alarm_limits;
        w.u16(HEIGHT_ALARM, limits.height);
        w.u16(SPEED_MAX_ALARM, limits.speed_max);
        w.u16(DISTANCE_MAX_ALARM, limits.distance_max);
        w.u16(VOLTAGE_RX_ALARM, limits.voltage_rx);
        w.u16(TRIP_LENGTH_ALARM, limits.trip_length);
        w.u16(CURRENT_UL_ALARM, limits.current_ul);
        w.u16(VOLTAGE_START_UL_ALARM, limits.voltage_start_ul);
        w.u16(VOLTAGE_UL_ALARM, limits.voltage_ul);
        w.u16(CAPACITY_UL_ALARM, limits.capacity_ul);

        let mlink = &record.mlink_addresses;
        w.u16(MLINK_VARIO, mlink.vario);
        w.u16(MLINK_SPEED, mlink.speed);
        w.u16(MLINK_DIRECTION, mlink.direction);
        w.u16(MLINK_HEIGHT, mlink.height);
        w.u16(MLINK_DISTANCE, mlink.distance);
        w.u16(MLINK_TRIP_LENGTH, mlink.trip_length);

        if self.variant.setup_layout() == SetupLayout::Extended {
            w.u16(STOP_MODE, record.stop_mode);
            w.u16(MODUS_IGC, record.modus_igc);
            w.u16(MODUS_DISTANCE, record.modus_distance);
            w.u16(TELEMETRY_TYPE, record.telemetry_type);
            w.u16(VARIO_THRESHOLD_SINK, record.vario_threshold_sink);
            w.i8(VARIO_FACTOR, record.vario_factor);
            w.i8(VARIO_FILTER, record.vario_filter);

            w.u16(DISTANCE_MIN_ALARM, limits.distance_min);
            w.u16(SPEED_MIN_ALARM, limits.speed_min);

            w.u16(MLINK_VOLTAGE_RX, mlink.voltage_rx);
            w.u16(MLINK_VOLTAGE, mlink.voltage);
            w.u16(MLINK_CURRENT, mlink.current);
            w.u16(MLINK_CAPACITY, mlink.capacity);
            w.u16(MLINK_REVOLUTION, mlink.revolution);
            w.u16(MLINK_CELL_VOLTAGE, mlink.cell_voltage);
            w.u16(MLINK_A1, mlink.a1);
            w.u16(MLINK_A2, mlink.a2);
            w.u16(MLINK_A3, mlink.a3);

            w.u32(JETI_EX_MASK, record.jeti_ex_mask.0);

            let fix = &record.fix_position;
            let mut latitude = fix.latitude.raw();
            if fix.enabled {
                latitude |= USE_FIXED_POSITION;
            }
            w.u32(FIX_LATITUDE, latitude);
            w.u32(FIX_LONGITUDE, fix.longitude.raw());
            w.i16(FIX_ALTITUDE, fix.altitude_m);
        }

        let checksum = crc16(&w.bytes[..SETUP_CHECKSUM_OFFSET]);
        w.u16(SETUP_CHECKSUM_OFFSET, checksum);
        trace!("$SETUP,{}", hex(&w.bytes));
        w.bytes
    }
}

/// Read and decode a `$SETUP` file.
pub fn load_setup_file(path: impl AsRef<Path>, variant: DeviceVariant) -> Result<DecodedSetup> {
    let path = path.as_ref();
    debug!("Loading setup file {}", path.display());
    let bytes = fs::read(path)?;
    SetupCodec::new(variant).decode(&bytes)
}

/// Encode `record` and write it as a `$SETUP` file.
pub fn save_setup_file(path: impl AsRef<Path>, record: &SetupRecord, variant: DeviceVariant) -> Result<()> {
    let path = path.as_ref();
    debug!("Saving setup file {}", path.display());
    let bytes = SetupCodec::new(variant).encode(record);
    fs::write(path, bytes)?;
    Ok(())
}
