/// Oversampling setting for pressure (osrs_p[2:0] in ctrl_meas 0xF4, bits 4:2).
///
/// | Variant  | osrs_p | Bits | Resolution | RMS Noise (typ) | Typical use            |
/// |----------|--------|------|------------|-----------------|------------------------|
/// | Skipped  | 000    | 0x00 | -          | -               | Temperature only       |
/// | Px1UL    | 001    | 0x04 | 16 bit     | ~3.3 Pa         | Weather (lowest power) |
/// | Px2L     | 010    | 0x08 | 17 bit     | ~2.6 Pa         | Low-power handheld     |
/// | Px4STD   | 011    | 0x0C | 18 bit     | ~2.1 Pa         | Standard / balanced    |
/// | Px8H     | 100    | 0x10 | 19 bit     | ~1.6 Pa         | High resolution        |
/// | Px16UH   | 101    | 0x14 | 20 bit     | ~1.3 Pa         | Indoor navigation      |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PressOversampling {
    Skipped = 0x00,
    Px1UL = 0x04,
    Px2L = 0x08,
    Px4STD = 0x0C,
    Px8H = 0x10,
    Px16UH = 0x14,
}

/// Oversampling setting for temperature (osrs_t[2:0] in ctrl_meas 0xF4, bits 7:5).
///
/// Temperature is always converted before pressure in a cycle, and pressure
/// compensation needs it, so `Skipped` leaves pressure uncompensable too.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TempOversampling {
    Skipped = 0x00,
    Tx1UL = 0x20,
    Tx2L = 0x40,
    Tx4STD = 0x60,
    Tx8H = 0x80,
    Tx16UH = 0xA0,
}

/// Power mode (mode[1:0] in ctrl_meas 0xF4, bits 1:0).
///
/// | Variant | Value | Behavior                                                  |
/// |---------|-------|-----------------------------------------------------------|
/// | Sleep   | 0x00  | No measurements; registers readable                       |
/// | Forced  | 0x01  | One measurement cycle, then back to sleep; host re-triggers |
/// | Normal  | 0x03  | Continuous: measure, standby (t_sb), measure              |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerMode {
    Sleep = 0x0,
    Forced = 0x1,
    Normal = 0x3,
}

/// IIR filter coefficient (filter[2:0] in config 0xF5, bits 4:2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IIRFilter {
    IIROff = 0x0,
    IIRx2 = 0x04,
    IIRx4 = 0x08,
    IIRx8 = 0x0C,
    IIRx16 = 0x10,
}

/// Standby duration in Normal mode (t_sb[2:0] in config 0xF5, bits 7:5).
///
/// Variant names are in milliseconds; `StdBy625` is 62.5 ms, `StdBy05` is 0.5 ms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StdByTime {
    StdBy05 = 0x0,
    StdBy625 = 0x20,
    StdBy125 = 0x40,
    StdBy250 = 0x60,
    StdBy500 = 0x80,
    StdBy1000 = 0xA0,
    StdBy2000 = 0xC0,
    StdBy4000 = 0xE0,
}

/// Pre-defined configurations matching the datasheet recommendations (section 3.5, Table 7).
///
/// | Preset      | Use case                    | Oversampling (T/P) | Mode   | Filter |
/// |-------------|-----------------------------|--------------------|--------|--------|
/// | HHDeviceLP  | Handheld low-power          | x2 / x16           | Normal | x4     |
/// | HHDeviceDyn | Handheld dynamic            | x1 / x4            | Normal | x16    |
/// | Weather     | Weather monitoring          | x1 / x1            | Forced | Off    |
/// | Elevator    | Floor change detection      | x1 / x4            | Normal | x4     |
/// | Drop        | Drop detection              | x1 / x2            | Normal | Off    |
/// | Indoor      | Indoor navigation           | x2 / x16           | Normal | x16    |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmp280ConfigPreset {
    HHDeviceLP,
    HHDeviceDyn,
    Weather,
    Elevator,
    Drop,
    Indoor,
}

/// Measurement configuration written to `ctrl_meas` (0xF4) and `config` (0xF5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bmp280Config {
    pub tovrs: TempOversampling,
    pub povrs: PressOversampling,
    pub pmode: PowerMode,
    pub iir: IIRFilter,
    pub stdby: StdByTime,
}

impl Bmp280Config {
    pub const fn new(
        tovrs: TempOversampling,
        povrs: PressOversampling,
        pmode: PowerMode,
        iir: IIRFilter,
        stdby: StdByTime,
    ) -> Self {
        Self {
            tovrs,
            povrs,
            pmode,
            iir,
            stdby,
        }
    }

    /// Weather-station setup: temperature x1, pressure x4, normal mode,
    /// IIR x2, 4 s standby (`ctrl_meas = 0x2F`, `config = 0xE4`).
    pub const fn station() -> Self {
        Self::new(
            TempOversampling::Tx1UL,
            PressOversampling::Px4STD,
            PowerMode::Normal,
            IIRFilter::IIRx2,
            StdByTime::StdBy4000,
        )
    }

    pub fn with_povrs(mut self, povrs: PressOversampling) -> Self {
        self.povrs = povrs;
        self
    }

    pub fn with_tovrs(mut self, tovrs: TempOversampling) -> Self {
        self.tovrs = tovrs;
        self
    }

    pub fn with_pmode(mut self, pmode: PowerMode) -> Self {
        self.pmode = pmode;
        self
    }

    pub fn with_filter(mut self, iir: IIRFilter) -> Self {
        self.iir = iir;
        self
    }

    /// Standby time only matters in Normal mode.
    pub fn with_stdby_time(mut self, stdby: StdByTime) -> Self {
        self.stdby = stdby;
        self
    }

    /// Creates a configuration from one of the datasheet presets.
    ///
    /// Standby time is passed separately since it depends on the desired output
    /// data rate; it is ignored in Forced mode.
    pub const fn from_preset(preset: Bmp280ConfigPreset, stdby: StdByTime) -> Self {
        let (tovrs, povrs, pmode, iir) = match preset {
            Bmp280ConfigPreset::HHDeviceLP => (
                TempOversampling::Tx2L,
                PressOversampling::Px16UH,
                PowerMode::Normal,
                IIRFilter::IIRx4,
            ),
            Bmp280ConfigPreset::HHDeviceDyn => (
                TempOversampling::Tx1UL,
                PressOversampling::Px4STD,
                PowerMode::Normal,
                IIRFilter::IIRx16,
            ),
            Bmp280ConfigPreset::Weather => (
                TempOversampling::Tx1UL,
                PressOversampling::Px1UL,
                PowerMode::Forced,
                IIRFilter::IIROff,
            ),
            Bmp280ConfigPreset::Elevator => (
                TempOversampling::Tx1UL,
                PressOversampling::Px4STD,
                PowerMode::Normal,
                IIRFilter::IIRx4,
            ),
            Bmp280ConfigPreset::Drop => (
                TempOversampling::Tx1UL,
                PressOversampling::Px2L,
                PowerMode::Normal,
                IIRFilter::IIROff,
            ),
            Bmp280ConfigPreset::Indoor => (
                TempOversampling::Tx2L,
                PressOversampling::Px16UH,
                PowerMode::Normal,
                IIRFilter::IIRx16,
            ),
        };
        Self::new(tovrs, povrs, pmode, iir, stdby)
    }

    /// Value for `ctrl_meas` (0xF4): osrs_t | osrs_p | mode.
    pub const fn ctrl_meas(&self) -> u8 {
        self.tovrs as u8 | self.povrs as u8 | self.pmode as u8
    }

    /// Value for `config` (0xF5): t_sb | filter, 3-wire SPI disabled.
    pub const fn config(&self) -> u8 {
        self.stdby as u8 | self.iir as u8
    }
}

impl Default for Bmp280Config {
    fn default() -> Self {
        Self::station()
    }
}
