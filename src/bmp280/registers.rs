/// BMP280 register map (Bosch Sensortec BMP280 datasheet, revision 1.26).
///
/// Key groups:
/// - **Measurement results** - 0xF7–0xFC (6 bytes): pressure (20-bit) then temperature (20-bit)
/// - **Control registers** - 0xF4 (measurement config), 0xF5 (IIR + standby)
/// - **Status** - 0xF3 (measuring / updating bits)
/// - **Reset & ID** - 0xE0 (soft reset), 0xD0 (chip ID)
/// - **Calibration** - 0x88–0x9F (24 bytes, read-only, factory trimmed), see [`CalibRegister`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Bmp280Register {
    TempXlsb = 0xFC,
    TempLsb = 0xFB,
    TempMsb = 0xFA,
    PressXlsb = 0xF9,
    PressLsb = 0xF8,
    PressMsb = 0xF7,
    Config = 0xF5,
    CtrlMeas = 0xF4,
    // bit 3 - conversion running, bit 0 - NVM data being copied
    Status = 0xF3,
    // Writing 0xB6 runs the complete power-on-reset procedure
    Reset = 0xE0,
    // Chip identification number, 0x58 after start up
    Id = 0xD0,
    CalibStart = 0x88,
}

impl Bmp280Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Little-endian 16-bit calibration words, one per compensation coefficient.
///
/// `DigT1` and `DigP1` are unsigned; every other word is two's-complement signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CalibRegister {
    DigT1 = 0x88,
    DigT2 = 0x8A,
    DigT3 = 0x8C,
    DigP1 = 0x8E,
    DigP2 = 0x90,
    DigP3 = 0x92,
    DigP4 = 0x94,
    DigP5 = 0x96,
    DigP6 = 0x98,
    DigP7 = 0x9A,
    DigP8 = 0x9C,
    DigP9 = 0x9E,
}

impl CalibRegister {
    /// All coefficient words in register order.
    pub const ALL: [CalibRegister; 12] = [
        CalibRegister::DigT1,
        CalibRegister::DigT2,
        CalibRegister::DigT3,
        CalibRegister::DigP1,
        CalibRegister::DigP2,
        CalibRegister::DigP3,
        CalibRegister::DigP4,
        CalibRegister::DigP5,
        CalibRegister::DigP6,
        CalibRegister::DigP7,
        CalibRegister::DigP8,
        CalibRegister::DigP9,
    ];

    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(self, CalibRegister::DigT1 | CalibRegister::DigP1)
    }

    /// Byte offset of this word inside the 24-byte burst-read block.
    pub const fn block_offset(self) -> usize {
        (self as u8 - Bmp280Register::CalibStart as u8) as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            CalibRegister::DigT1 => "dig_T1",
            CalibRegister::DigT2 => "dig_T2",
            CalibRegister::DigT3 => "dig_T3",
            CalibRegister::DigP1 => "dig_P1",
            CalibRegister::DigP2 => "dig_P2",
            CalibRegister::DigP3 => "dig_P3",
            CalibRegister::DigP4 => "dig_P4",
            CalibRegister::DigP5 => "dig_P5",
            CalibRegister::DigP6 => "dig_P6",
            CalibRegister::DigP7 => "dig_P7",
            CalibRegister::DigP8 => "dig_P8",
            CalibRegister::DigP9 => "dig_P9",
        }
    }
}

pub const BMP280_RESET_REG_VALUE: u8 = 0xB6;
pub const BMP280_CHIP_ID: u8 = 0x58;

/// Length of the calibration block starting at [`Bmp280Register::CalibStart`].
pub const CALIB_BLOCK_LEN: usize = 24;

/// Status register: conversion running.
pub const STATUS_MEASURING: u8 = 0b0000_1000;
/// Status register: NVM data being copied to image registers.
pub const STATUS_IM_UPDATE: u8 = 0b0000_0001;
