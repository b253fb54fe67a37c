//! BMP280 calibration coefficients.
//!
//! The factory-trimmed compensation coefficients live in registers 0x88–0x9F
//! (12 little-endian words), as described in the Bosch BMP280 datasheet
//! (BST-BMP280-DS001 rev 1.26, section 3.11.2 "Trimming parameter readout").
//! They are read once per device session and never change afterwards; a new
//! [`Bmp280Calib`] is loaded after every reset.

use core::fmt;

use crate::bmp280::{
    registers::{CalibRegister, CALIB_BLOCK_LEN},
    transport::RegisterAccess,
    Bmp280Error,
};

/// Why a calibration block was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// `dig_T1` read as zero (unpowered sensor or failed read)
    ZeroT1,
    /// `dig_P1` read as zero (unpowered sensor or failed read)
    ZeroP1,
    /// Calibration block is not 24 bytes long
    BlockLength { expected: usize, actual: usize },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::ZeroT1 => f.write_str("calibration coefficient dig_T1 is zero"),
            CalibrationError::ZeroP1 => f.write_str("calibration coefficient dig_P1 is zero"),
            CalibrationError::BlockLength { expected, actual } => write!(
                f,
                "calibration block is {actual} bytes, expected {expected}"
            ),
        }
    }
}

impl core::error::Error for CalibrationError {}

/// Factory-trimmed calibration coefficients (dig_T* and dig_P*) for temperature
/// and pressure compensation.
///
/// Construction always validates: a `Bmp280Calib` in hand has non-zero
/// `dig_T1` and `dig_P1`. The value is `Copy` and immutable, so one instance can
/// be shared by reference across threads without locking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bmp280Calib {
    dig_t1: u16,
    dig_t2: i16,
    dig_t3: i16,
    dig_p1: u16,
    dig_p2: i16,
    dig_p3: i16,
    dig_p4: i16,
    dig_p5: i16,
    dig_p6: i16,
    dig_p7: i16,
    dig_p8: i16,
    dig_p9: i16,
}

impl Bmp280Calib {
    /// Builds a calibration set from already-decoded coefficients.
    ///
    /// `t` is `(dig_T1, dig_T2, dig_T3)`, `p` is `dig_P1` followed by `dig_P2..=dig_P9`.
    ///
    /// # Errors
    /// - `ZeroT1` / `ZeroP1` if either unsigned base coefficient is zero
    pub fn new(t: (u16, i16, i16), p1: u16, p: [i16; 8]) -> Result<Self, CalibrationError> {
        let calib = Self {
            dig_t1: t.0,
            dig_t2: t.1,
            dig_t3: t.2,
            dig_p1: p1,
            dig_p2: p[0],
            dig_p3: p[1],
            dig_p4: p[2],
            dig_p5: p[3],
            dig_p6: p[4],
            dig_p7: p[5],
            dig_p8: p[6],
            dig_p9: p[7],
        };
        calib.validate()
    }

    /// Reads the 12 coefficient words one register pair at a time.
    ///
    /// Must be called after soft reset and chip ID verification.
    ///
    /// # Errors
    /// - `Transport` with the bus error untouched if any read fails
    /// - `InvalidCalibration` if `dig_T1` or `dig_P1` reads as zero
    pub fn load<R: RegisterAccess>(reader: &mut R) -> Result<Self, Bmp280Error<R::Error>> {
        let mut words = [0u16; 12];
        for (word, reg) in words.iter_mut().zip(CalibRegister::ALL) {
            let read = if reg.is_unsigned() {
                reader.read_u16_le(reg.addr())
            } else {
                reader.read_i16_le(reg.addr()).map(|v| v as u16)
            };
            *word = read.map_err(Bmp280Error::Transport)?;
        }
        Ok(Self::from_words(&words)?)
    }

    /// Parses the 24-byte block burst-read from 0x88.
    ///
    /// # Errors
    /// - `BlockLength` if `block` is not exactly 24 bytes
    /// - `ZeroT1` / `ZeroP1` as for [`Bmp280Calib::new`]
    pub fn from_bytes(block: &[u8]) -> Result<Self, CalibrationError> {
        if block.len() != CALIB_BLOCK_LEN {
            return Err(CalibrationError::BlockLength {
                expected: CALIB_BLOCK_LEN,
                actual: block.len(),
            });
        }
        let mut words = [0u16; 12];
        for (word, reg) in words.iter_mut().zip(CalibRegister::ALL) {
            let at = reg.block_offset();
            *word = u16::from_le_bytes([block[at], block[at + 1]]);
        }
        Self::from_words(&words)
    }

    /// Words are raw register bit patterns; signedness is applied here.
    fn from_words(w: &[u16; 12]) -> Result<Self, CalibrationError> {
        Self {
            dig_t1: w[0],
            dig_t2: w[1] as i16,
            dig_t3: w[2] as i16,
            dig_p1: w[3],
            dig_p2: w[4] as i16,
            dig_p3: w[5] as i16,
            dig_p4: w[6] as i16,
            dig_p5: w[7] as i16,
            dig_p6: w[8] as i16,
            dig_p7: w[9] as i16,
            dig_p8: w[10] as i16,
            dig_p9: w[11] as i16,
        }
        .validate()
    }

    fn validate(self) -> Result<Self, CalibrationError> {
        if self.dig_t1 == 0 {
            return Err(CalibrationError::ZeroT1);
        }
        if self.dig_p1 == 0 {
            return Err(CalibrationError::ZeroP1);
        }
        Ok(self)
    }

    /// Coefficient stored at `reg`, widened to `i64` with its signedness applied.
    pub fn coefficient(&self, reg: CalibRegister) -> i64 {
        match reg {
            CalibRegister::DigT1 => self.dig_t1.into(),
            CalibRegister::DigT2 => self.dig_t2.into(),
            CalibRegister::DigT3 => self.dig_t3.into(),
            CalibRegister::DigP1 => self.dig_p1.into(),
            CalibRegister::DigP2 => self.dig_p2.into(),
            CalibRegister::DigP3 => self.dig_p3.into(),
            CalibRegister::DigP4 => self.dig_p4.into(),
            CalibRegister::DigP5 => self.dig_p5.into(),
            CalibRegister::DigP6 => self.dig_p6.into(),
            CalibRegister::DigP7 => self.dig_p7.into(),
            CalibRegister::DigP8 => self.dig_p8.into(),
            CalibRegister::DigP9 => self.dig_p9.into(),
        }
    }

    pub fn dig_t1(&self) -> u16 {
        self.dig_t1
    }

    pub fn dig_t2(&self) -> i16 {
        self.dig_t2
    }

    pub fn dig_t3(&self) -> i16 {
        self.dig_t3
    }

    pub fn dig_p1(&self) -> u16 {
        self.dig_p1
    }

    pub fn dig_p2(&self) -> i16 {
        self.dig_p2
    }

    pub fn dig_p3(&self) -> i16 {
        self.dig_p3
    }

    pub fn dig_p4(&self) -> i16 {
        self.dig_p4
    }

    pub fn dig_p5(&self) -> i16 {
        self.dig_p5
    }

    pub fn dig_p6(&self) -> i16 {
        self.dig_p6
    }

    pub fn dig_p7(&self) -> i16 {
        self.dig_p7
    }

    pub fn dig_p8(&self) -> i16 {
        self.dig_p8
    }

    pub fn dig_p9(&self) -> i16 {
        self.dig_p9
    }
}
