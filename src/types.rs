use crate::constants::{CHANNEL_OFFSETS, STATE_DEVICE_ACTIVE};
use crate::error::ProtocolError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One of the four charge/discharge channels of the AkkuMaster C4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    One,
    Two,
    Three,
    Four,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::One, Channel::Two, Channel::Three, Channel::Four];

    /// Channel number as printed on the device (1-4)
    pub fn number(self) -> u8 {
        match self {
            Channel::One => 1,
            Channel::Two => 2,
            Channel::Three => 3,
            Channel::Four => 4,
        }
    }

    /// Offset added to a base op-code to address this channel
    pub fn offset(self) -> u8 {
        CHANNEL_OFFSETS[(self.number() - 1) as usize]
    }

    /// Command byte for `op_code` addressed to this channel
    pub fn address(self, op_code: u8) -> u8 {
        op_code.wrapping_add(self.offset())
    }
}

impl TryFrom<u8> for Channel {
    type Error = ProtocolError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(Channel::One),
            2 => Ok(Channel::Two),
            3 => Ok(Channel::Three),
            4 => Ok(Channel::Four),
            _ => Err(ProtocolError::InvalidChannel(number)),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.number())
    }
}

/// Activity of a channel, derived from the state byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Waiting,
    Charging,
    Discharging,
    KeepCharge,
    /// Any state byte that is not the active flag plus a known phase
    Unknown(u8),
}

impl Phase {
    /// Process number used by the device's display: 1 = charging,
    /// 2 = discharging, 3 = keep-charge.
    pub fn process_number(self) -> u8 {
        match self {
            Phase::Waiting => 0,
            Phase::Charging => 1,
            Phase::Discharging => 2,
            Phase::KeepCharge => 3,
            Phase::Unknown(_) => 4,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Waiting => write!(f, "waiting for command"),
            Phase::Charging => write!(f, "charging"),
            Phase::Discharging => write!(f, "discharging"),
            Phase::KeepCharge => write!(f, "keep charge"),
            Phase::Unknown(raw) => write!(f, "pause ({:#04x})", raw),
        }
    }
}

/// Raw state byte: `0x80` (device active) OR'd with the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState(pub u8);

impl DeviceState {
    pub fn is_active(self) -> bool {
        self.0 & STATE_DEVICE_ACTIVE != 0
    }

    /// Phase with the active flag removed. A byte without the flag does
    /// not map to a known phase.
    pub fn phase(self) -> Phase {
        match self.0.wrapping_sub(STATE_DEVICE_ACTIVE) {
            0x00 => Phase::Waiting,
            0x01 => Phase::Charging,
            0x02 => Phase::Discharging,
            0x04 => Phase::KeepCharge,
            _ => Phase::Unknown(self.0),
        }
    }
}

/// Charge program kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Program {
    ChargeOnly,
    DischargeOnly,
    DischargeCharge,
    ChargeDischargeCharge,
    DischargeChargeTwice,
    FormUp,
    Overwinter,
    Refresh,
    Diagnostic,
    Unknown(u8),
}

impl Program {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x01 => Program::ChargeOnly,
            0x02 => Program::DischargeOnly,
            0x03 => Program::DischargeCharge,
            0x04 => Program::ChargeDischargeCharge,
            0x05 => Program::DischargeChargeTwice,
            0x06 => Program::FormUp,
            0x07 => Program::Overwinter,
            0x08 => Program::Refresh,
            0x09 => Program::Diagnostic,
            other => Program::Unknown(other),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Program::ChargeOnly => 0x01,
            Program::DischargeOnly => 0x02,
            Program::DischargeCharge => 0x03,
            Program::ChargeDischargeCharge => 0x04,
            Program::DischargeChargeTwice => 0x05,
            Program::FormUp => 0x06,
            Program::Overwinter => 0x07,
            Program::Refresh => 0x08,
            Program::Diagnostic => 0x09,
            Program::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Program::ChargeOnly => "charge only",
            Program::DischargeOnly => "discharge only",
            Program::DischargeCharge => "discharge / charge",
            Program::ChargeDischargeCharge => "charge / discharge / charge",
            Program::DischargeChargeTwice => "2 x discharge / charge",
            Program::FormUp => "form up",
            Program::Overwinter => "overwinter",
            Program::Refresh => "refresh",
            Program::Diagnostic => "diagnostic",
            Program::Unknown(raw) => return write!(f, "unknown ({:#04x})", raw),
        };
        f.write_str(name)
    }
}

/// Battery chemistry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuType {
    NiCd,
    NiMh,
    Pb,
    Unknown(u8),
}

impl AccuType {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => AccuType::NiCd,
            0x01 => AccuType::NiMh,
            0x02 => AccuType::Pb,
            other => AccuType::Unknown(other),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            AccuType::NiCd => 0x00,
            AccuType::NiMh => 0x01,
            AccuType::Pb => 0x02,
            AccuType::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for AccuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccuType::NiCd => write!(f, "NiCd"),
            AccuType::NiMh => write!(f, "NiMH"),
            AccuType::Pb => write!(f, "Pb"),
            AccuType::Unknown(raw) => write!(f, "unknown ({:#04x})", raw),
        }
    }
}

/// Parameters of a new charge program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramParameters {
    pub program: Program,
    /// Wait time before form-up repeats, in days
    pub wait_time_days: u8,
    pub accu_type: AccuType,
    pub cell_count: u8,
    pub capacity_mah: u16,
    pub discharge_current_ma: u16,
    pub charge_current_ma: u16,
}

/// Answer to read configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: DeviceState,
    pub error_number: u8,
    pub program: Program,
    pub accu_type: AccuType,
    pub cell_count: u8,
    pub capacity_mah: u16,
    pub discharge_current_ma: u16,
    pub charge_current_ma: u16,
    /// Wait time before form-up repeats, in minutes
    pub wait_time_min: u16,
}

/// Answer to read adjusted values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedValues {
    pub memory_slot: u8,
    pub repeat_count: u8,
    pub actual_charge_current_ma: u16,
}

/// Elapsed time as reported by the device, one byte per unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HmsTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl HmsTime {
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64)
    }
}

impl fmt::Display for HmsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Answer to read measured values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredValues {
    pub discharge_capacity_mah: u16,
    pub charge_capacity_mah: u16,
    /// Battery voltage, raw counts scaled by 10/2
    pub voltage_mv: u32,
    pub discharge_time: HmsTime,
    pub charge_time: HmsTime,
    pub cycle_count: u8,
    /// Remaining wait time until form-up repeats, in minutes
    pub remaining_latency_min: u16,
}

impl fmt::Display for MeasuredValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mV, discharged {} mAh in {}, charged {} mAh in {}, cycle {}, {} min remaining",
            self.voltage_mv,
            self.discharge_capacity_mah,
            self.discharge_time,
            self.charge_capacity_mah,
            self.charge_time,
            self.cycle_count,
            self.remaining_latency_min
        )
    }
}

/// Current rating of the device hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentVariant {
    HalfAmp,
    TwoAmp,
    Unknown(u8),
}

impl CurrentVariant {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => CurrentVariant::HalfAmp,
            0x01 => CurrentVariant::TwoAmp,
            other => CurrentVariant::Unknown(other),
        }
    }
}

/// Front panel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontVariant {
    SixKeys,
    FourKeys,
    Unknown(u8),
}

impl FrontVariant {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => FrontVariant::SixKeys,
            0x01 => FrontVariant::FourKeys,
            other => FrontVariant::Unknown(other),
        }
    }
}

/// Answer to read version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub number: u8,
    pub index: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
    /// Firmware date, `None` if the device reports an impossible date
    pub date: Option<NaiveDate>,
    pub current_variant: CurrentVariant,
    pub front_variant: FrontVariant,
}

impl VersionInfo {
    /// Version as "number.index"
    pub fn version(&self) -> String {
        format!("{}.{}", self.number, self.index)
    }

    /// Date as "D.M.Y", the way the device documents it
    pub fn date_text(&self) -> String {
        format!("{}.{}.{}", self.day, self.month, self.year)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version {} from {}", self.version(), self.date_text())
    }
}

/// Combined live values of one channel, produced by `get_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessData {
    pub phase: Phase,
    pub error_number: u8,
    pub voltage_mv: u32,
    /// Configured current of the running process
    pub current_ma: u16,
    /// Capacity moved by the running process
    pub capacity_mah: u32,
    /// `voltage * current`, only while active
    pub power: Option<u64>,
    /// `voltage * capacity`, only while active
    pub energy: Option<u64>,
}

impl ProcessData {
    pub fn process_number(&self) -> u8 {
        self.phase.process_number()
    }

    pub fn is_active(&self) -> bool {
        self.power.is_some()
    }
}
