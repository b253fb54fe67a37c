//! Platform-agnostic BMP280 driver built around the Bosch fixed-point
//! compensation formulas.
//!
//! The crate is split in two layers:
//!
//! - [`bmp280::calibration`] and [`bmp280::compensation`] are the pure core: the
//!   factory calibration block and the integer pipeline that turns raw ADC codes
//!   into degrees Celsius and pascals. No I/O, no logging, no hidden state.
//! - [`bmp280::Bmp280`] is the thin device layer on top of any
//!   [`embedded_hal::i2c::I2c`] bus: reset, chip ID check, configuration and
//!   raw reads.
//!
//! ```ignore
//! use bmp280_station::bmp280::{Address, Bmp280};
//!
//! let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, delay);
//! let calib = device.init()?;
//! let measurement = device.measure(&calib)?;
//! info!("T={} C, P={:?} Pa", measurement.temperature_c, measurement.pressure());
//! ```
//!
//! ## Features
//!
//! - `log` (default): log through the `log` crate.
//! - `defmt`: log through `defmt` and derive `defmt::Format` on public types.
//!   Disable default features when enabling it.

#![no_std]
#![deny(unsafe_code)]

mod fmt;

pub mod bmp280;
