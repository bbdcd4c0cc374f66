//! Driver for the BH1750 ambient light sensor from Rohm
//!
//! The sensor is addressed over I²C and reports illuminance as a 16-bit
//! register value which this driver converts to lux using the fixed
//! datasheet divisor of 1.2. The bus is abstracted behind
//! [`interface::BusInterface`] so the driver runs on any `embedded-hal`
//! I²C implementation and unit tests against a mock bus.

#![no_std]
// #![deny(missing_debug_implementations)]
#![allow(missing_docs)]
#![deny(warnings)]
#![deny(missing_copy_implementations)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]

use bit_field::BitField;

use crate::interface::BusInterface;

pub mod interface;


/// Errors in this crate
///
/// Each driver operation maps a failed bus transaction to its own
/// variant so a failed [`Bh1750::init`] reports which step broke.
#[derive(Debug)]
pub enum Error<CommE> {
    /// Power-on command failed on the bus
    PowerOn(CommE),
    /// Power-down command failed on the bus
    PowerDown(CommE),
    /// Reset command failed on the bus
    Reset(CommE),
    /// Mode command failed on the bus; the stored mode is unchanged
    SetMode(CommE),
    /// Measurement-time command failed on the bus
    MeasurementTime(CommE),
    /// Reading the measurement register failed on the bus
    Read(CommE),
}

/// Addresses selectable via the ADDR pin
#[derive(Debug, Clone, Copy)]
pub enum Address {
    /// ADDR pin low or floating
    Low = 0x23,
    /// ADDR pin high
    High = 0x5C,
}

/// Measurement modes of the sensor
///
/// Continuous modes repeat measurements until stopped; one-time modes
/// take a single measurement and return the device to power-down.
/// Discriminants are the command opcodes from the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Continuous measurement, 1 lx resolution, 120 ms typical time
    ContinuousHighRes = 0x10,
    /// Continuous measurement, 0.5 lx resolution, 120 ms typical time
    ContinuousHighRes2 = 0x11,
    /// Continuous measurement, 4 lx resolution, 16 ms typical time
    ContinuousLowRes = 0x13,
    /// One-time measurement, 1 lx resolution, 120 ms typical time
    OneTimeHighRes = 0x20,
    /// One-time measurement, 0.5 lx resolution, 120 ms typical time
    OneTimeHighRes2 = 0x21,
    /// One-time measurement, 4 lx resolution, 16 ms typical time
    OneTimeLowRes = 0x23,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::ContinuousHighRes
    }
}

/// Smallest accepted MTreg value
pub const MEASUREMENT_TIME_MIN: u8 = 31;
/// Largest accepted MTreg value
pub const MEASUREMENT_TIME_MAX: u8 = 254;
/// MTreg value the sensor starts up with
pub const MEASUREMENT_TIME_DEFAULT: u8 = 69;

/// Commands available for the sensor
#[derive(Debug, Clone, Copy)]
pub enum Command {
    /// No active state, the sensor stops measuring
    PowerDown,
    /// Wake up and wait for a measurement command
    PowerOn,
    /// Clear the data register. Not acceptable in power-down state
    Reset,
    /// Start measuring in the given mode
    SetMode(Mode),
    /// Upper 3 bits of the measurement time register
    ChangeMeasurementTimeHigh(u8),
    /// Lower 5 bits of the measurement time register
    ChangeMeasurementTimeLow(u8),
}

impl Command {
    /// Opcode sent over the wire for this command
    pub fn opcode(self) -> u8 {
        match self {
            Command::PowerDown => 0x00,
            Command::PowerOn => 0x01,
            Command::Reset => 0x07,
            Command::SetMode(mode) => mode as u8,
            Command::ChangeMeasurementTimeHigh(bits) => 0x40 | bits.get_bits(0..3),
            Command::ChangeMeasurementTimeLow(bits) => 0x60 | bits.get_bits(0..5),
        }
    }

    pub fn send<SI>(self, iface: &mut SI) -> Result<(), SI::Error>
    where
        SI: BusInterface,
    {
        iface.write_bytes(&[self.opcode()])
    }
}

/// BH1750 driver
///
/// Owns the bus interface and the currently selected mode. The device
/// address is fixed when the interface is built and every transaction
/// uses it. One driver instance per device; share across threads only
/// with external locking.
pub struct Bh1750<SI> {
    iface: SI,
    mode: Mode,
    measurement_time: u8,
}

impl<SI> Bh1750<SI>
where
    SI: BusInterface,
{
    /// Create a driver over the given bus interface
    ///
    /// The stored mode defaults to [`Mode::ContinuousHighRes`]; nothing
    /// is sent to the device until [`Bh1750::init`] or one of the
    /// command methods is called.
    pub fn new(iface: SI) -> Self {
        Bh1750 {
            iface,
            mode: Mode::default(),
            measurement_time: MEASUREMENT_TIME_DEFAULT,
        }
    }

    /// Bring the device up: power on, reset, start the stored mode
    ///
    /// Aborts on the first failing step and returns that step's error.
    /// No rollback is attempted, so a failed reset leaves the device
    /// powered on with no mode selected.
    pub fn init(&mut self) -> Result<(), Error<SI::Error>> {
        self.power_on()?;
        self.reset()?;
        self.set_mode(self.mode)
    }

    /// Wake the device up
    pub fn power_on(&mut self) -> Result<(), Error<SI::Error>> {
        Command::PowerOn.send(&mut self.iface).map_err(Error::PowerOn)
    }

    /// Stop measuring and enter the no-active state
    ///
    /// Per datasheet the reset command is not accepted while powered
    /// down; the driver does not enforce ordering, the caller sequences
    /// commands correctly.
    pub fn power_down(&mut self) -> Result<(), Error<SI::Error>> {
        Command::PowerDown.send(&mut self.iface).map_err(Error::PowerDown)
    }

    /// Clear the data register. Only valid while powered on
    pub fn reset(&mut self) -> Result<(), Error<SI::Error>> {
        Command::Reset.send(&mut self.iface).map_err(Error::Reset)
    }

    /// Start measuring in `mode`
    ///
    /// The stored mode is updated only after the bus write succeeded,
    /// so a transport error cannot desynchronize driver state from the
    /// device.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<SI::Error>> {
        Command::SetMode(mode)
            .send(&mut self.iface)
            .map_err(Error::SetMode)?;
        self.mode = mode;
        Ok(())
    }

    /// Mode last confirmed on the device
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Write the measurement time register (MTreg) to change sensitivity
    ///
    /// The value is clamped to the datasheet range 31..=254 and split
    /// into the high-bits and low-bits change commands. As with
    /// [`Bh1750::set_mode`], the stored value is committed only after
    /// both writes succeeded.
    pub fn set_measurement_time(&mut self, mtreg: u8) -> Result<(), Error<SI::Error>> {
        let mt = mtreg.clamp(MEASUREMENT_TIME_MIN, MEASUREMENT_TIME_MAX);
        Command::ChangeMeasurementTimeHigh(mt.get_bits(5..8))
            .send(&mut self.iface)
            .map_err(Error::MeasurementTime)?;
        Command::ChangeMeasurementTimeLow(mt.get_bits(0..5))
            .send(&mut self.iface)
            .map_err(Error::MeasurementTime)?;
        self.measurement_time = mt;
        Ok(())
    }

    /// MTreg value last confirmed on the device
    pub fn measurement_time(&self) -> u8 {
        self.measurement_time
    }

    /// Read the raw 16-bit measurement register, big-endian on the wire
    pub fn read_raw(&mut self) -> Result<u16, Error<SI::Error>> {
        let mut buf = [0u8; 2];
        self.iface.read_bytes(&mut buf).map_err(Error::Read)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read the current illuminance in lux
    ///
    /// Applies the datasheet conversion `lux = raw / 1.2`, truncated to
    /// an integer. Computed as `raw * 10 / 12` so the result is exactly
    /// `floor(raw / 1.2)` with no floating point involved. The caller
    /// must wait out the mode's typical conversion time before reading;
    /// the driver performs no readiness check.
    pub fn read_lux(&mut self) -> Result<u16, Error<SI::Error>> {
        let raw = self.read_raw()?;
        Ok((u32::from(raw) * 10 / 12) as u16)
    }

    /// Give the bus interface back
    pub fn release(self) -> SI {
        self.iface
    }
}
