//! GPS-Logger device family descriptors.
//!
//! The loggers differ in the measurement layout they record and in the
//! `$SETUP` fields their firmware understands. Each variant maps to one
//! static [`VariantDescriptor`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which `$SETUP` fields a firmware reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupLayout {
    /// Firmware 1.00 fields only
    V1,
    /// V1 plus stop mode, IGC/distance modes, telemetry type, extra alarms,
    /// extra M-Link addresses, Jeti EX mask and fixed start position
    Extended,
}

/// Measurement blocks of a logger record, in ordinal order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementBlock {
    Gps,
    SmGps,
    UniLog,
    MLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceVariant {
    GpsLogger,
    GpsLogger2,
    GpsLogger3,
}

/// Static description of one logger variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    pub name: &'static str,
    pub setup_layout: SetupLayout,
    pub measurement_count: usize,
    pub gps_offset: usize,
    pub smgps_offset: usize,
    pub unilog_offset: usize,
    pub mlink_offset: usize,
    pub mlink_channels: usize,
}

impl VariantDescriptor {
    pub fn block_offset(&self, block: MeasurementBlock) -> usize {
        match block {
            MeasurementBlock::Gps => self.gps_offset,
            MeasurementBlock::SmGps => self.smgps_offset,
            MeasurementBlock::UniLog => self.unilog_offset,
            MeasurementBlock::MLink => self.mlink_offset,
        }
    }

    fn block_end(&self, block: MeasurementBlock) -> usize {
        match block {
            MeasurementBlock::Gps => self.smgps_offset,
            MeasurementBlock::SmGps => self.unilog_offset,
            MeasurementBlock::UniLog => self.mlink_offset,
            MeasurementBlock::MLink => self.measurement_count,
        }
    }

    pub fn block_len(&self, block: MeasurementBlock) -> usize {
        self.block_end(block) - self.block_offset(block)
    }

    /// Record ordinal of the `index`-th measurement in `block`, `None` if
    /// the block is shorter on this variant.
    pub fn ordinal(&self, block: MeasurementBlock, index: usize) -> Option<usize> {
        (index < self.block_len(block)).then(|| self.block_offset(block) + index)
    }
}

// GPS: latitude, longitude, altitude, satellites, PDOP, HDOP, VDOP, velocity
// SM-GPS (v1): relative altitude, climb, Rx voltage, total distance,
//   distance from start, direction from start, glide ratio
// UniLog: voltage, current, power, revolution, Rx voltage, height, A1-A3
// M-Link: 15 address values
static VARIANTS: [VariantDescriptor; 3] = [
    VariantDescriptor {
        name: "GPS-Logger",
        setup_layout: SetupLayout::V1,
        measurement_count: 39,
        gps_offset: 0,
        smgps_offset: 8,
        unilog_offset: 15,
        mlink_offset: 24,
        mlink_channels: 15,
    },
    // SM-GPS gains trip length and air speed
    VariantDescriptor {
        name: "GPS-Logger2",
        setup_layout: SetupLayout::Extended,
        measurement_count: 41,
        gps_offset: 0,
        smgps_offset: 8,
        unilog_offset: 17,
        mlink_offset: 26,
        mlink_channels: 15,
    },
    // SM-GPS gains acceleration X/Y/Z and engine noise level
    VariantDescriptor {
        name: "GPS-Logger3",
        setup_layout: SetupLayout::Extended,
        measurement_count: 45,
        gps_offset: 0,
        smgps_offset: 8,
        unilog_offset: 21,
        mlink_offset: 30,
        mlink_channels: 15,
    },
];

impl DeviceVariant {
    pub const ALL: [DeviceVariant; 3] = [DeviceVariant::GpsLogger, DeviceVariant::GpsLogger2, DeviceVariant::GpsLogger3];

    pub fn descriptor(self) -> &'static VariantDescriptor {
        match self {
            DeviceVariant::GpsLogger => &VARIANTS[0],
            DeviceVariant::GpsLogger2 => &VARIANTS[1],
            DeviceVariant::GpsLogger3 => &VARIANTS[2],
        }
    }

    /// Look up a variant by its device name, e.g. "GPS-Logger2"
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.descriptor().name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn setup_layout(self) -> SetupLayout {
        self.descriptor().setup_layout
    }
}

impl fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_cover_all_measurements() {
        for variant in DeviceVariant::ALL {
            let d = variant.descriptor();
            let total: usize = [
                MeasurementBlock::Gps,
                MeasurementBlock::SmGps,
                MeasurementBlock::UniLog,
                MeasurementBlock::MLink,
            ]
            .iter()
            .map(|&block| d.block_len(block))
            .sum();
            assert_eq!(total, d.measurement_count, "{}", d.name);
            assert_eq!(d.block_len(MeasurementBlock::Gps), 8);
            assert_eq!(d.block_len(MeasurementBlock::UniLog), 9);
            assert_eq!(d.block_len(MeasurementBlock::MLink), d.mlink_channels);
        }
    }

    #[test]
    fn test_ordinals() {
        let v1 = DeviceVariant::GpsLogger.descriptor();
        assert_eq!(v1.ordinal(MeasurementBlock::UniLog, 0), Some(15));
        assert_eq!(v1.ordinal(MeasurementBlock::MLink, 14), Some(38));
        assert_eq!(v1.ordinal(MeasurementBlock::MLink, 15), None);
        assert_eq!(v1.ordinal(MeasurementBlock::SmGps, 7), None);

        let v3 = DeviceVariant::GpsLogger3.descriptor();
        assert_eq!(v3.ordinal(MeasurementBlock::SmGps, 12), Some(20));
        assert_eq!(v3.ordinal(MeasurementBlock::MLink, 0), Some(30));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DeviceVariant::from_name("GPS-Logger"), Some(DeviceVariant::GpsLogger));
        assert_eq!(DeviceVariant::from_name(" gps-logger3 "), Some(DeviceVariant::GpsLogger3));
        assert_eq!(DeviceVariant::from_name("UniLog"), None);
        assert_eq!(DeviceVariant::GpsLogger2.to_string(), "GPS-Logger2");
    }

    #[test]
    fn test_setup_layouts() {
        assert_eq!(DeviceVariant::GpsLogger.setup_layout(), SetupLayout::V1);
        assert_eq!(DeviceVariant::GpsLogger2.setup_layout(), SetupLayout::Extended);
        assert_eq!(DeviceVariant::GpsLogger3.setup_layout(), SetupLayout::Extended);
    }
}
