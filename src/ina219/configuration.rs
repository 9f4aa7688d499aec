//! Typed view of the INA219 configuration register.
//!
//! The chip packs range, gain, resolution and mode into a single 16 bit
//! word.  [`Configuration`] spells those fields out and converts to and
//! from the wire word; the bit positions are a serialization contract and
//! must not change.

use fugit::{ExtU32, MicrosDurationU32};

/// Bus voltage measurement range, bit 13.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BusVoltageRange {
    /// Full-scale range of 16V
    Fsr16v = 0,
    /// Full-scale range of 32V
    #[default]
    Fsr32v = 1,
}

/// Shunt voltage full-scale range selected by the PGA gain, bits 12-11.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Gain {
    /// Gain 1, ±40mV
    Fsr40mv = 0b00,
    /// Gain 2, ±80mV
    Fsr80mv = 0b01,
    /// Gain 4, ±160mV
    Fsr160mv = 0b10,
    /// Gain 8, ±320mV
    #[default]
    Fsr320mv = 0b11,
}

/// ADC resolution or averaging setting.
///
/// One 4 bit field per channel: bus at bits 10-7, shunt at bits 6-3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Resolution {
    /// Single 9 bit sample
    Bits9 = 0b0000,
    /// Single 10 bit sample
    Bits10 = 0b0001,
    /// Single 11 bit sample
    Bits11 = 0b0010,
    /// Single 12 bit sample (power-on default)
    #[default]
    Bits12 = 0b0011,
    /// 2 averaged 12 bit samples
    Samples2 = 0b1001,
    /// 4 averaged 12 bit samples
    Samples4 = 0b1010,
    /// 8 averaged 12 bit samples
    Samples8 = 0b1011,
    /// 16 averaged 12 bit samples
    Samples16 = 0b1100,
    /// 32 averaged 12 bit samples
    Samples32 = 0b1101,
    /// 64 averaged 12 bit samples
    Samples64 = 0b1110,
    /// 128 averaged 12 bit samples
    Samples128 = 0b1111,
}

impl Resolution {
    /// Minimum time the chip needs to complete one conversion with this
    /// setting.
    ///
    /// Only the single 12 bit sample used by the driver presets has a
    /// measured entry.  Every other setting reports a zero duration, so a
    /// conversion wait keyed on it covers no conversion time at all.
    #[must_use]
    pub fn conversion_time(self) -> MicrosDurationU32 {
        match self {
            Self::Bits12 => 532.micros(),
            _ => 0.micros(),
        }
    }

    fn from_field(field: u16) -> Self {
        // 0b0100..=0b0111 and 0b1000 alias the single-sample settings on
        // the chip and decode to them here.
        match field {
            0b0000 | 0b0100 => Self::Bits9,
            0b0001 | 0b0101 => Self::Bits10,
            0b0010 | 0b0110 => Self::Bits11,
            0b1001 => Self::Samples2,
            0b1010 => Self::Samples4,
            0b1011 => Self::Samples8,
            0b1100 => Self::Samples16,
            0b1101 => Self::Samples32,
            0b1110 => Self::Samples64,
            0b1111 => Self::Samples128,
            _ => Self::Bits12,
        }
    }
}

/// Operating mode, bits 2-0.
///
/// Triggered modes sample once per explicit request; continuous modes
/// free-run in the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    /// Powered down
    PowerDown = 0b000,
    /// One shunt conversion per trigger
    ShuntTriggered = 0b001,
    /// One bus conversion per trigger
    BusTriggered = 0b010,
    /// One shunt and one bus conversion per trigger
    ShuntAndBusTriggered = 0b011,
    /// ADC disabled
    AdcOff = 0b100,
    /// Free-running shunt conversions
    ShuntContinuous = 0b101,
    /// Free-running bus conversions
    BusContinuous = 0b110,
    /// Free-running shunt and bus conversions (power-on default)
    #[default]
    ShuntAndBusContinuous = 0b111,
}

impl Mode {
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(
            self,
            Self::ShuntContinuous | Self::BusContinuous | Self::ShuntAndBusContinuous
        )
    }

    #[must_use]
    pub const fn is_triggered(self) -> bool {
        matches!(
            self,
            Self::ShuntTriggered | Self::BusTriggered | Self::ShuntAndBusTriggered
        )
    }

    fn from_field(field: u16) -> Self {
        match field {
            0b000 => Self::PowerDown,
            0b001 => Self::ShuntTriggered,
            0b010 => Self::BusTriggered,
            0b011 => Self::ShuntAndBusTriggered,
            0b100 => Self::AdcOff,
            0b101 => Self::ShuntContinuous,
            0b110 => Self::BusContinuous,
            _ => Self::ShuntAndBusContinuous,
        }
    }
}

/// The configuration register as a record.
///
/// `Default` is the chip's power-on configuration (`0x399F`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Configuration {
    pub bus_voltage_range: BusVoltageRange,
    pub gain: Gain,
    pub bus_resolution: Resolution,
    pub shunt_resolution: Resolution,
    pub mode: Mode,
}

impl Configuration {
    /// Packs the fields into the register's wire word.
    #[must_use]
    pub const fn as_bits(self) -> u16 {
        (self.bus_voltage_range as u16) << 13
            | (self.gain as u16) << 11
            | (self.bus_resolution as u16) << 7
            | (self.shunt_resolution as u16) << 3
            | self.mode as u16
    }

    /// Unpacks a register word read back from the chip.
    #[must_use]
    pub fn from_bits(bits: u16) -> Self {
        Self {
            bus_voltage_range: if bits >> 13 & 1 == 0 {
                BusVoltageRange::Fsr16v
            } else {
                BusVoltageRange::Fsr32v
            },
            gain: match bits >> 11 & 0b11 {
                0b00 => Gain::Fsr40mv,
                0b01 => Gain::Fsr80mv,
                0b10 => Gain::Fsr160mv,
                _ => Gain::Fsr320mv,
            },
            bus_resolution: Resolution::from_field(bits >> 7 & 0b1111),
            shunt_resolution: Resolution::from_field(bits >> 3 & 0b1111),
            mode: Mode::from_field(bits & 0b111),
        }
    }
}
