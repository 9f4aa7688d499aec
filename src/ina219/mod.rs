//! # Unofficial Rust Driver for the INA219 Current Sensor
//!
//! ## External Links
//!
//! - [Official Product Site]
//! - [Datasheet]
//!
//! [Official Product Site]: https://www.ti.com/product/INA219
//! [Datasheet]: https://www.ti.com/lit/ds/symlink/ina219.pdf

use crate::OutOfRange;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use fugit::{ExtU32, MicrosDurationU32};
use num_enum::IntoPrimitive;

use self::configuration::{BusVoltageRange, Configuration, Gain, Mode, Resolution};

/// Fixed part of the 7 bit device address; the low 3 bits come from the
/// chip's address pins.
const BASE_ADDRESS: u8 = 0x40;

/// Configuration word that resets the chip to its power-on state.
const RESET: u16 = 0x8000;

/// Configuration word that powers the chip down.
const POWER_DOWN: u16 = 0x0000;

/// Registers addressable through the register pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum Register {
    /// Configuration, read/write
    Configuration = 0x00,
    /// Shunt voltage, read only, signed, 10uV/LSB
    ShuntVoltage = 0x01,
    /// Bus voltage, read only, bits 15-3 in 4mV steps
    BusVoltage = 0x02,
}

/// Bus voltage range preset selected at [`Ina219::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Range {
    /// 16V bus range with a ±40mV shunt full-scale
    Range16v,
    /// 32V bus range with a ±320mV shunt full-scale
    Range32v,
}

/// The INA219 driver
///
/// Typical usage:
///
/// 1. Create an instance through [`Ina219::new`] with the address offset
///    set by the chip's address pins and the shunt resistance in milliohms
/// 2. Start conversions with [`Ina219::begin`]
/// 3. Read values with [`Ina219::bus`], [`Ina219::shunt`],
///    [`Ina219::current`] and [`Ina219::power`]
/// 4. Power the chip down with [`Ina219::end`]
pub struct Ina219<I2C, DELAY> {
    i2c: I2C,
    delay: DELAY,
    address: u8,
    resistor: u16,
    active: bool,
    range: Range,
    configuration: Configuration,
    bus_conversion_time: MicrosDurationU32,
    shunt_conversion_time: MicrosDurationU32,
}

impl<I2C: I2c, DELAY: DelayNs> Ina219<I2C, DELAY> {
    /// Returns a new driver instance for the device at `BASE_ADDRESS`
    /// plus `address`, with the shunt resistance given in milliohms.
    /// No bus traffic is issued until [`Ina219::begin`].
    ///
    /// # Errors
    ///
    /// [`OutOfRange`]: the address offset is outside of `0..=7`
    pub fn new(i2c: I2C, delay: DELAY, address: u8, resistor: u16) -> Result<Self, OutOfRange> {
        if address > 0x7 {
            return Err(OutOfRange);
        }
        Ok(Self {
            i2c,
            delay,
            address: BASE_ADDRESS | address,
            resistor,
            active: false,
            range: Range::Range32v,
            configuration: Configuration::from_bits(POWER_DOWN),
            bus_conversion_time: 0.micros(),
            shunt_conversion_time: 0.micros(),
        })
    }

    /// Resets the chip and starts continuous 12 bit shunt and bus
    /// conversions for the given range.  Returns once the first
    /// conversion is complete.
    ///
    /// # Errors
    pub fn begin(&mut self, range: Range) -> Result<(), I2C::Error> {
        self.range = range;

        self.write_register(Register::Configuration, RESET)?;
        // powerdown recovery takes 40us
        self.delay.delay_us(50);

        let configuration = match range {
            Range::Range32v => Configuration {
                bus_voltage_range: BusVoltageRange::Fsr32v,
                gain: Gain::Fsr320mv,
                bus_resolution: Resolution::Bits12,
                shunt_resolution: Resolution::Bits12,
                mode: Mode::ShuntAndBusContinuous,
            },
            Range::Range16v => Configuration {
                bus_voltage_range: BusVoltageRange::Fsr16v,
                gain: Gain::Fsr40mv,
                bus_resolution: Resolution::Bits12,
                shunt_resolution: Resolution::Bits12,
                mode: Mode::ShuntAndBusContinuous,
            },
        };
        self.configure(configuration)?;

        self.active = true;
        Ok(())
    }

    /// Powers the chip down.  Register reads return 0 until the next
    /// [`Ina219::begin`].
    ///
    /// # Errors
    pub fn end(&mut self) -> Result<(), I2C::Error> {
        self.active = false;

        self.write_register(Register::Configuration, POWER_DOWN)
    }

    /// Get bus voltage in mV.
    ///
    /// # Errors
    pub fn bus(&mut self) -> Result<u32, I2C::Error> {
        Ok((u32::from(self.read_register(Register::BusVoltage)?) >> 3) * 4)
    }

    /// Get shunt voltage in uV.
    ///
    /// # Errors
    pub fn shunt(&mut self) -> Result<i32, I2C::Error> {
        // 10uV resolution
        Ok(i32::from(self.read_register(Register::ShuntVoltage)? as i16) * 10)
    }

    /// Calc current in tenths of mA from a shunt voltage in uV, with
    /// I = V/R over the configured shunt resistance.
    #[must_use]
    pub fn current_from(&self, microvolts: i32) -> i32 {
        microvolts * 10 / i32::from(self.resistor)
    }

    /// Get current in tenths of mA.
    ///
    /// # Errors
    pub fn current(&mut self) -> Result<i32, I2C::Error> {
        let microvolts = self.shunt()?;
        Ok(self.current_from(microvolts))
    }

    /// Calc power in tenths of mW from a shunt voltage in uV.
    ///
    /// Approximates with P = V²/R over the shunt voltage alone instead of
    /// the chip's bus voltage times current product.
    #[must_use]
    pub fn power_from(&self, microvolts: i32) -> i32 {
        let calc = microvolts / 10;
        calc * calc / i32::from(self.resistor)
    }

    /// Get power in tenths of mW.
    ///
    /// # Errors
    pub fn power(&mut self) -> Result<i32, I2C::Error> {
        let microvolts = self.shunt()?;
        Ok(self.power_from(microvolts))
    }

    /// Get the range applied by the last [`Ina219::begin`].
    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Get time between bus value updates for the active configuration.
    #[must_use]
    pub fn bus_time(&self) -> MicrosDurationU32 {
        self.bus_conversion_time
    }

    /// Get time between shunt value updates for the active configuration.
    #[must_use]
    pub fn shunt_time(&self) -> MicrosDurationU32 {
        self.shunt_conversion_time
    }

    /// Applies a configuration word and records the conversion times for
    /// both channels.  A continuous mode starts sampling immediately, so
    /// this blocks until the slower channel has finished its first
    /// conversion; reading earlier would return a stale value.
    fn configure(&mut self, configuration: Configuration) -> Result<(), I2C::Error> {
        self.configuration = configuration;

        self.bus_conversion_time = configuration.bus_resolution.conversion_time();
        self.shunt_conversion_time = configuration.shunt_resolution.conversion_time();

        self.write_register(Register::Configuration, configuration.as_bits())?;

        if configuration.mode.is_continuous() {
            if self.bus_conversion_time > self.shunt_conversion_time {
                self.wait(Register::BusVoltage);
            } else {
                self.wait(Register::ShuntVoltage);
            }
        }
        Ok(())
    }

    /// Blocks for at least the recorded conversion time of the named
    /// channel.  Times above 1ms sleep with millisecond granularity;
    /// shorter times busy-wait with a 250us margin to stay accurate
    /// where sleep granularity would overshoot.
    fn wait(&mut self, register: Register) {
        let time = match register {
            Register::BusVoltage => self.bus_conversion_time,
            Register::ShuntVoltage => self.shunt_conversion_time,
            Register::Configuration => return,
        };

        let micros = time.to_micros();
        if micros > 1000 {
            self.delay.delay_ms(micros / 1000 + 1);
        } else {
            self.delay.delay_us(micros + 250);
        }
    }

    /// Reads a 16 bit register.  Returns 0 without any bus traffic while
    /// the driver is inactive.  In a triggered mode the matching channel
    /// only converts on request, so the conversion wait runs between
    /// selecting the register and reading it; continuous values are
    /// always fresh.
    fn read_register(&mut self, register: Register) -> Result<u16, I2C::Error> {
        if !self.active {
            return Ok(0);
        }

        self.i2c.write(self.address, &[u8::from(register)])?;

        let triggered = match register {
            Register::ShuntVoltage => matches!(
                self.configuration.mode,
                Mode::ShuntTriggered | Mode::ShuntAndBusTriggered
            ),
            Register::BusVoltage => matches!(
                self.configuration.mode,
                Mode::BusTriggered | Mode::ShuntAndBusTriggered
            ),
            Register::Configuration => false,
        };
        if triggered {
            self.wait(register);
        }

        let mut data: [u8; 2] = [0; 2];
        self.i2c.read(self.address, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    /// Writes a 16 bit register, big-endian on the wire.
    fn write_register(&mut self, register: Register, value: u16) -> Result<(), I2C::Error> {
        let bytes: [u8; 2] = u16::to_be_bytes(value);
        self.i2c
            .write(self.address, &[u8::from(register), bytes[0], bytes[1]])?;
        Ok(())
    }
}


pub mod configuration;
pub mod helper;
