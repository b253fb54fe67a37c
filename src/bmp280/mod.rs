pub mod calibration;
pub mod compensation;
pub mod config;
pub mod registers;
pub mod transport;

use core::fmt;

use embedded_hal::{delay::DelayNs, i2c::I2c};

pub use crate::bmp280::{
    calibration::{Bmp280Calib, CalibrationError},
    compensation::{compensate, Measurement, RawReading},
    config::{Bmp280Config, Bmp280ConfigPreset, PowerMode, PressOversampling, TempOversampling},
    transport::{I2cInterface, RegisterAccess},
};

use crate::bmp280::registers::{
    Bmp280Register, CalibRegister, BMP280_CHIP_ID, BMP280_RESET_REG_VALUE, STATUS_IM_UPDATE,
    STATUS_MEASURING,
};

/// Settle time after a soft reset.
const RESET_DELAY_MS: u32 = 10;
/// Status poll period while a forced conversion or NVM copy runs.
const STATUS_POLL_MS: u32 = 1;
/// Longest forced conversion (x16/x16) is ~44 ms; give up well after that.
const STATUS_POLL_LIMIT: u32 = 100;

/// I²C slave address, selected by the SDO pin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Address {
    /// SDO connected to GND
    SdoGnd = 0x76,
    /// SDO connected to VDDIO
    #[default]
    SdoVdd = 0x77,
}

impl Address {
    pub const fn from_sdo(sdo_gnd: bool) -> Self {
        if sdo_gnd {
            Address::SdoGnd
        } else {
            Address::SdoVdd
        }
    }

    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Errors reported by the driver. `E` is the bus error, handed back untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmp280Error<E> {
    /// Register read or write failed
    Transport(E),
    /// Calibration block rejected
    InvalidCalibration(CalibrationError),
    /// Chip ID is not 0x58 (not a BMP280)
    ChipIdMismatch(u8),
    /// Forced conversion still running after the poll limit
    MeasurementTimeout,
    /// NVM copy to the calibration image registers never finished after reset
    NvmCopyTimeout,
    /// Temperature oversampling is `Skipped`, so there is no `t_fine` to compensate with
    TemperatureSkipped,
}

impl<E> From<CalibrationError> for Bmp280Error<E> {
    fn from(e: CalibrationError) -> Self {
        Bmp280Error::InvalidCalibration(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Bmp280Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bmp280Error::Transport(e) => write!(f, "register access failed: {e:?}"),
            Bmp280Error::InvalidCalibration(e) => write!(f, "invalid calibration: {e}"),
            Bmp280Error::ChipIdMismatch(id) => {
                write!(f, "chip id {id:#04x}, expected {BMP280_CHIP_ID:#04x}")
            }
            Bmp280Error::MeasurementTimeout => f.write_str("forced measurement did not complete"),
            Bmp280Error::NvmCopyTimeout => f.write_str("calibration NVM copy did not complete"),
            Bmp280Error::TemperatureSkipped => {
                f.write_str("temperature measurement is skipped, cannot compensate")
            }
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Bmp280Error<E> {}

/// BMP280 driver instance.
///
/// Owns the register interface and delay provider. Calibration is not kept
/// here: [`Bmp280::init`] hands it back and every [`Bmp280::measure`] takes it
/// by reference.
pub struct Bmp280<R, D> {
    regs: R,
    delay: D,
    config: Bmp280Config,
}

impl<I2C: I2c, D: DelayNs> Bmp280<I2cInterface<I2C>, D> {
    /// Creates a driver for a BMP280 on an I²C bus.
    pub fn with_i2c(i2c: I2C, address: Address, delay: D) -> Self {
        Self::new(I2cInterface::new(i2c, address), delay)
    }
}

impl<R: RegisterAccess, D: DelayNs> Bmp280<R, D> {
    /// Creates a driver using the default (weather-station) configuration.
    pub fn new(regs: R, delay: D) -> Self {
        Self {
            regs,
            delay,
            config: Bmp280Config::default(),
        }
    }

    /// Replaces the configuration that the next [`Bmp280::init`] will write.
    pub fn with_config(mut self, config: Bmp280Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> Bmp280Config {
        self.config
    }

    /// Gives back the register interface and the delay provider.
    pub fn release(self) -> (R, D) {
        (self.regs, self.delay)
    }

    /// Initializes the BMP280 sensor.
    ///
    /// Sequence:
    /// 1. Soft reset (0xE0 ← 0xB6), wait 10 ms and for the NVM copy to finish
    /// 2. Verify chip ID (0xD0 == 0x58)
    /// 3. Read calibration coefficients
    /// 4. Write `config` (0xF5) and `ctrl_meas` (0xF4)
    ///
    /// Returns the calibration for this session. Call again after any reset.
    ///
    /// # Errors
    /// Bus failures, chip ID mismatch, or a rejected calibration block.
    pub fn init(&mut self) -> Result<Bmp280Calib, Bmp280Error<R::Error>> {
        self.soft_reset()?;

        let chip_id = self.chip_id()?;
        if chip_id != BMP280_CHIP_ID {
            error!("Chip ID mismatch: {:#x}", chip_id);
            return Err(Bmp280Error::ChipIdMismatch(chip_id));
        }

        let calib = Bmp280Calib::load(&mut self.regs).inspect_err(|_| {
            error!("Failed to read calibration data");
        })?;
        for reg in CalibRegister::ALL {
            debug!("{} = {}", reg.name(), calib.coefficient(reg));
        }

        self.set_config(self.config)?;
        info!("BMP280 initialized");
        Ok(calib)
    }

    /// Runs the complete power-on-reset procedure.
    ///
    /// Returns once `im_update` is clear, i.e. the calibration image registers
    /// hold the NVM contents and are safe to read.
    pub fn soft_reset(&mut self) -> Result<(), Bmp280Error<R::Error>> {
        self.regs
            .write_u8(Bmp280Register::Reset.addr(), BMP280_RESET_REG_VALUE)
            .map_err(|e| {
                error!("Failed to perform soft reset");
                Bmp280Error::Transport(e)
            })?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.wait_status_clear(STATUS_IM_UPDATE, Bmp280Error::NvmCopyTimeout)
            .inspect_err(|_| {
                error!("NVM copy still running after reset");
            })
    }

    pub fn chip_id(&mut self) -> Result<u8, Bmp280Error<R::Error>> {
        let id = self
            .regs
            .read_u8(Bmp280Register::Id.addr())
            .map_err(Bmp280Error::Transport)?;
        debug!("Chip ID: {:#x}", id);
        Ok(id)
    }

    /// Raw `status` (0xF3): bit 3 conversion running, bit 0 NVM copy running.
    pub fn status(&mut self) -> Result<u8, Bmp280Error<R::Error>> {
        self.regs
            .read_u8(Bmp280Register::Status.addr())
            .map_err(Bmp280Error::Transport)
    }

    /// Writes `config` then `ctrl_meas` and keeps `config` for later measurements.
    pub fn set_config(&mut self, config: Bmp280Config) -> Result<(), Bmp280Error<R::Error>> {
        self.regs
            .write_u8(Bmp280Register::Config.addr(), config.config())
            .map_err(|e| {
                error!("Failed to set configuration setting");
                Bmp280Error::Transport(e)
            })?;
        self.regs
            .write_u8(Bmp280Register::CtrlMeas.addr(), config.ctrl_meas())
            .map_err(|e| {
                error!("Failed to set measurement setting");
                Bmp280Error::Transport(e)
            })?;
        debug!(
            "config = {:#x}, ctrl_meas = {:#x}",
            config.config(),
            config.ctrl_meas()
        );
        self.config = config;
        Ok(())
    }

    /// Burst-reads the six data registers (0xF7–0xFC) in one transaction so
    /// pressure and temperature come from the same conversion.
    pub fn read_raw(&mut self) -> Result<RawReading, Bmp280Error<R::Error>> {
        let mut raw = [0u8; 6];
        self.regs
            .read_block(Bmp280Register::PressMsb.addr(), &mut raw)
            .map_err(Bmp280Error::Transport)?;
        let reading = RawReading::from_burst(&raw);
        trace!(
            "adc_T = {}, adc_P = {}",
            reading.temperature,
            reading.pressure
        );
        Ok(reading)
    }

    /// Reads one measurement cycle and compensates it with `calib`.
    ///
    /// In Forced mode a conversion is triggered first and awaited. A pressure of
    /// `0.0` (see [`Measurement::pressure`]) is passed through, not turned into
    /// an error.
    ///
    /// A skipped channel reads back as the placeholder code 0x80000, which is
    /// never compensated: with temperature skipped this fails with
    /// `TemperatureSkipped` before touching the bus, with pressure skipped the
    /// pressure is reported as `0.0`.
    pub fn measure(&mut self, calib: &Bmp280Calib) -> Result<Measurement, Bmp280Error<R::Error>> {
        if self.config.tovrs == TempOversampling::Skipped {
            error!("Temperature oversampling is skipped");
            return Err(Bmp280Error::TemperatureSkipped);
        }
        if self.config.pmode == PowerMode::Forced {
            self.run_forced_conversion()?;
        }
        let mut measurement = compensate(self.read_raw()?, calib);
        if self.config.povrs == PressOversampling::Skipped {
            measurement.pressure_pa = 0.0;
        } else if measurement.pressure().is_none() {
            warn!("Pressure not computable this cycle");
        }
        Ok(measurement)
    }

    fn run_forced_conversion(&mut self) -> Result<(), Bmp280Error<R::Error>> {
        self.regs
            .write_u8(Bmp280Register::CtrlMeas.addr(), self.config.ctrl_meas())
            .map_err(Bmp280Error::Transport)?;
        self.wait_status_clear(STATUS_MEASURING, Bmp280Error::MeasurementTimeout)
            .inspect_err(|_| {
                warn!("Forced conversion timed out");
            })
    }

    /// Polls `status` every millisecond until every bit in `mask` is clear.
    fn wait_status_clear(
        &mut self,
        mask: u8,
        timeout: Bmp280Error<R::Error>,
    ) -> Result<(), Bmp280Error<R::Error>> {
        for _ in 0..STATUS_POLL_LIMIT {
            self.delay.delay_ms(STATUS_POLL_MS);
            if self.status()? & mask == 0 {
                return Ok(());
            }
        }
        Err(timeout)
    }
}
