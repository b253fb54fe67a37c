//! Fixed-point temperature and pressure compensation.
//!
//! Implements the 64-bit integer formulas of the BMP280 datasheet (section 3.11.3
//! and appendix 8.2). Everything here is a pure function of its arguments: no I/O,
//! no logging, no state kept between calls.
//!
//! Temperature must be compensated first. [`fine_temperature`] produces `t_fine`,
//! which [`pressure`] takes as an explicit argument; both have to come from the
//! same [`RawReading`]. [`compensate`] does the two steps in the right order.

use crate::bmp280::calibration::Bmp280Calib;

/// Uncompensated 20-bit ADC codes from one measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    /// `adc_T`
    pub temperature: u32,
    /// `adc_P`
    pub pressure: u32,
}

impl RawReading {
    /// Builds a reading from the 24-bit register values, dropping the 4 unused low bits.
    pub const fn from_codes(temperature_24: u32, pressure_24: u32) -> Self {
        Self {
            temperature: (temperature_24 & 0x00FF_FFFF) >> 4,
            pressure: (pressure_24 & 0x00FF_FFFF) >> 4,
        }
    }

    /// Decodes the 6-byte burst read starting at `press_msb` (0xF7).
    pub const fn from_burst(raw: &[u8; 6]) -> Self {
        Self {
            pressure: (raw[0] as u32) << 12 | (raw[1] as u32) << 4 | (raw[2] as u32) >> 4,
            temperature: (raw[3] as u32) << 12 | (raw[4] as u32) << 4 | (raw[5] as u32) >> 4,
        }
    }
}

/// Compensated output of one measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Degrees Celsius, resolution 0.01
    pub temperature_c: f64,
    /// Pascals, resolution 1/256; exactly `0.0` when not computable this cycle
    pub pressure_pa: f64,
}

impl Measurement {
    /// Pressure in Pa, or `None` when the compensation hit the zero-denominator
    /// case or the pressure channel was skipped.
    pub fn pressure(&self) -> Option<f64> {
        if self.pressure_pa == 0.0 {
            None
        } else {
            Some(self.pressure_pa)
        }
    }

    pub fn pressure_hpa(&self) -> Option<f64> {
        self.pressure().map(|p| p / 100.0)
    }

    pub fn pressure_inhg(&self) -> Option<f64> {
        self.pressure_hpa().map(|p| p / HPA_PER_INHG)
    }

    pub fn temperature_f(&self) -> f64 {
        self.temperature_c * 1.8 + 32.0
    }
}

/// Hectopascals in one inch of mercury.
pub const HPA_PER_INHG: f64 = 33.863886666667;

/// Fine temperature `t_fine` (degrees Celsius × 5120) from the 20-bit `adc_T` code.
///
/// Every intermediate is a signed 64-bit value and every right shift is arithmetic,
/// so the result is bit-identical to the reference integer code.
pub fn fine_temperature(adc_t: u32, calib: &Bmp280Calib) -> i64 {
    let adc_t = i64::from(adc_t);
    let t1 = i64::from(calib.dig_t1());
    let t2 = i64::from(calib.dig_t2());
    let t3 = i64::from(calib.dig_t3());

    let var1 = (((adc_t >> 3) - (t1 << 1)) * t2) >> 11;
    let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12) * t3) >> 14;

    var1 + var2
}

/// Temperature in degrees Celsius from `t_fine`, rounded to 0.01.
pub fn temperature(t_fine: i64) -> f64 {
    let centi = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
    centi as f64 / 100.0
}

/// Pressure in Pa from the 20-bit `adc_P` code and the `t_fine` of the same cycle.
///
/// Returns exactly `0.0` when the P1-scaled denominator is zero; see
/// [`Measurement::pressure`].
///
/// The pipeline needs the full signed 64-bit range: several products exceed 32 bits
/// for ordinary readings. Arithmetic wraps like two's-complement hardware instead
/// of panicking, which only matters for inputs outside the sensor's range.
pub fn pressure(adc_p: u32, t_fine: i64, calib: &Bmp280Calib) -> f64 {
    let p1 = i64::from(calib.dig_p1());
    let p2 = i64::from(calib.dig_p2());
    let p3 = i64::from(calib.dig_p3());
    let p4 = i64::from(calib.dig_p4());
    let p5 = i64::from(calib.dig_p5());
    let p6 = i64::from(calib.dig_p6());
    let p7 = i64::from(calib.dig_p7());
    let p8 = i64::from(calib.dig_p8());
    let p9 = i64::from(calib.dig_p9());

    let mut var1 = t_fine.wrapping_sub(128000);
    let mut var2 = var1.wrapping_mul(var1).wrapping_mul(p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 17);
    var2 = var2.wrapping_add(p4 << 35);
    var1 = (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8)
        .wrapping_add(var1.wrapping_mul(p2) << 12);
    var1 = ((1i64 << 47).wrapping_add(var1)).wrapping_mul(p1) >> 33;

    if var1 == 0 {
        return 0.0; // avoid division by zero
    }

    let mut p = 1_048_576 - i64::from(adc_p);
    p = ((p << 31).wrapping_sub(var2)).wrapping_mul(3125).wrapping_div(var1);
    var1 = p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
    var2 = p8.wrapping_mul(p) >> 19;
    p = (p.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(p7 << 4);

    // Q24.8
    p as f64 / 256.0
}

/// Compensates one raw reading: temperature first, then pressure with the same `t_fine`.
pub fn compensate(raw: RawReading, calib: &Bmp280Calib) -> Measurement {
    let t_fine = fine_temperature(raw.temperature, calib);
    Measurement {
        temperature_c: temperature(t_fine),
        pressure_pa: pressure(raw.pressure, t_fine, calib),
    }
}
