use bmp280_station::bmp280::{
    compensation, registers::CalibRegister, Address, Bmp280, Bmp280Calib, Bmp280Config,
    Bmp280ConfigPreset, Bmp280Error, CalibrationError, I2cInterface, RawReading,
};
use bmp280_station::bmp280::config::{IIRFilter, PressOversampling, StdByTime, TempOversampling};
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal_mock::eh1::{
    delay::NoopDelay,
    i2c::{Mock as I2cMock, Transaction as I2cTransaction},
};

const ADDR: u8 = 0x77;

// Datasheet section 3.12 example: coefficients and the matching raw data registers.
const REFERENCE_WORDS: [i32; 12] = [
    27504, 26435, -1000, 36477, -10685, 3024, 2855, 140, -7, 15500, -14600, 6000,
];
const REFERENCE_BURST: [u8; 6] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00];

fn reference_calib() -> Bmp280Calib {
    Bmp280Calib::new(
        (27504, 26435, -1000),
        36477,
        [-10685, 3024, 2855, 140, -7, 15500, -14600, 6000],
    )
    .unwrap()
}

fn calibration_reads(words: &[i32; 12]) -> Vec<I2cTransaction> {
    CalibRegister::ALL
        .iter()
        .zip(words)
        .map(|(reg, word)| {
            I2cTransaction::write_read(
                ADDR,
                vec![reg.addr()],
                (*word as u16).to_le_bytes().to_vec(),
            )
        })
        .collect()
}

// Soft reset, NVM copy already finished on the first status poll.
fn reset_expectations() -> Vec<I2cTransaction> {
    vec![
        I2cTransaction::write(ADDR, vec![0xE0, 0xB6]),
        I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x00]),
    ]
}

fn init_expectations(words: &[i32; 12], config: Bmp280Config) -> Vec<I2cTransaction> {
    let mut expectations = reset_expectations();
    expectations.push(I2cTransaction::write_read(ADDR, vec![0xD0], vec![0x58]));
    expectations.extend(calibration_reads(words));
    expectations.push(I2cTransaction::write(ADDR, vec![0xF5, config.config()]));
    expectations.push(I2cTransaction::write(ADDR, vec![0xF4, config.ctrl_meas()]));
    expectations
}

fn finish(device: Bmp280<I2cInterface<I2cMock>, NoopDelay>) {
    let (iface, _) = device.release();
    let mut i2c = iface.release();
    i2c.done();
}

#[test]
fn init_loads_calibration_and_writes_config() {
    let expectations = init_expectations(&REFERENCE_WORDS, Bmp280Config::default());
    let i2c = I2cMock::new(&expectations);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    let calib = device.init().unwrap();
    assert_eq!(calib, reference_calib());
    finish(device);
}

#[test]
fn measure_compensates_reference_reading() {
    let mut expectations = init_expectations(&REFERENCE_WORDS, Bmp280Config::default());
    expectations.push(I2cTransaction::write_read(
        ADDR,
        vec![0xF7],
        REFERENCE_BURST.to_vec(),
    ));
    let i2c = I2cMock::new(&expectations);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    let calib = device.init().unwrap();
    let measurement = device.measure(&calib).unwrap();
    assert!((measurement.temperature_c - 25.08).abs() < 0.01);
    // Exact 64-bit integer result (25767233); the datasheet table's 100653.27
    // is 0.012 Pa away, hence the 0.02 bound.
    assert_eq!(measurement.pressure(), Some(25767233.0 / 256.0));
    assert!((measurement.pressure_pa - 100653.27).abs() < 0.02);
    finish(device);
}

#[test]
fn secondary_address_is_used_for_every_transaction() {
    let i2c = I2cMock::new(&[I2cTransaction::write_read(0x76, vec![0xD0], vec![0x58])]);
    let mut device = Bmp280::with_i2c(i2c, Address::from_sdo(true), NoopDelay::new());
    assert_eq!(device.chip_id(), Ok(0x58));
    finish(device);
}

#[test]
fn wrong_chip_id_stops_init() {
    let mut expectations = reset_expectations();
    expectations.push(I2cTransaction::write_read(ADDR, vec![0xD0], vec![0x60]));
    let i2c = I2cMock::new(&expectations);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    assert_eq!(device.init(), Err(Bmp280Error::ChipIdMismatch(0x60)));
    finish(device);
}

#[test]
fn zero_calibration_is_rejected_before_configuring() {
    let mut words = REFERENCE_WORDS;
    words[3] = 0;
    let mut expectations = reset_expectations();
    expectations.push(I2cTransaction::write_read(ADDR, vec![0xD0], vec![0x58]));
    expectations.extend(calibration_reads(&words));
    let i2c = I2cMock::new(&expectations);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    let err = device.init().unwrap_err();
    assert_eq!(err, Bmp280Error::InvalidCalibration(CalibrationError::ZeroP1));
    assert_eq!(
        format!("{err}"),
        "invalid calibration: calibration coefficient dig_P1 is zero"
    );
    finish(device);
}

#[test]
fn bus_error_is_propagated_unchanged() {
    let i2c = I2cMock::new(&[
        I2cTransaction::write(ADDR, vec![0xE0, 0xB6]).with_error(ErrorKind::Other)
    ]);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    assert_eq!(device.init(), Err(Bmp280Error::Transport(ErrorKind::Other)));
    finish(device);
}

#[test]
fn bus_error_during_calibration_read_aborts_init() {
    let mut expectations = reset_expectations();
    expectations.push(I2cTransaction::write_read(ADDR, vec![0xD0], vec![0x58]));
    let mut reads = calibration_reads(&REFERENCE_WORDS);
    reads.truncate(5);
    let last = reads
        .pop()
        .unwrap()
        .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
    expectations.extend(reads);
    expectations.push(last);
    let i2c = I2cMock::new(&expectations);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    assert_eq!(
        device.init(),
        Err(Bmp280Error::Transport(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)))
    );
    finish(device);
}

#[test]
fn forced_mode_triggers_and_waits_for_conversion() {
    let config = Bmp280Config::from_preset(Bmp280ConfigPreset::Weather, StdByTime::StdBy1000);
    let mut expectations = init_expectations(&REFERENCE_WORDS, config);
    expectations.extend([
        I2cTransaction::write(ADDR, vec![0xF4, 0x25]),
        I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x08]),
        I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x08]),
        I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x00]),
        I2cTransaction::write_read(ADDR, vec![0xF7], REFERENCE_BURST.to_vec()),
    ]);
    let i2c = I2cMock::new(&expectations);
    let mut device =
        Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new()).with_config(config);

    let calib = device.init().unwrap();
    let measurement = device.measure(&calib).unwrap();
    assert_eq!(measurement.temperature_c, 25.08);
    finish(device);
}

#[test]
fn forced_mode_gives_up_when_conversion_never_ends() {
    let config = Bmp280Config::from_preset(Bmp280ConfigPreset::Weather, StdByTime::StdBy1000);
    let mut expectations = vec![I2cTransaction::write(ADDR, vec![0xF4, 0x25])];
    expectations.extend(
        (0..100).map(|_| I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x08])),
    );
    let i2c = I2cMock::new(&expectations);
    let mut device =
        Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new()).with_config(config);

    assert_eq!(
        device.measure(&reference_calib()),
        Err(Bmp280Error::MeasurementTimeout)
    );
    finish(device);
}

#[test]
fn reset_waits_for_nvm_copy_before_reading_calibration() {
    let mut expectations = vec![
        I2cTransaction::write(ADDR, vec![0xE0, 0xB6]),
        I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x01]),
        I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x09]),
        I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x08]),
        I2cTransaction::write_read(ADDR, vec![0xD0], vec![0x58]),
    ];
    expectations.extend(calibration_reads(&REFERENCE_WORDS));
    let config = Bmp280Config::default();
    expectations.push(I2cTransaction::write(ADDR, vec![0xF5, config.config()]));
    expectations.push(I2cTransaction::write(ADDR, vec![0xF4, config.ctrl_meas()]));
    let i2c = I2cMock::new(&expectations);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    assert_eq!(device.init(), Ok(reference_calib()));
    finish(device);
}

#[test]
fn reset_gives_up_when_nvm_copy_never_ends() {
    let mut expectations = vec![I2cTransaction::write(ADDR, vec![0xE0, 0xB6])];
    expectations.extend(
        (0..100).map(|_| I2cTransaction::write_read(ADDR, vec![0xF3], vec![0x01])),
    );
    let i2c = I2cMock::new(&expectations);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    assert_eq!(device.init(), Err(Bmp280Error::NvmCopyTimeout));
    finish(device);
}

#[test]
fn skipped_temperature_is_not_compensated() {
    let config = Bmp280Config::default().with_tovrs(TempOversampling::Skipped);
    let i2c = I2cMock::new(&init_expectations(&REFERENCE_WORDS, config));
    let mut device =
        Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new()).with_config(config);

    let calib = device.init().unwrap();
    // No burst read: the temperature registers would only hold 0x80000.
    let err = device.measure(&calib).unwrap_err();
    assert_eq!(err, Bmp280Error::TemperatureSkipped);
    assert_eq!(
        format!("{err}"),
        "temperature measurement is skipped, cannot compensate"
    );
    finish(device);
}

#[test]
fn skipped_pressure_reports_no_pressure() {
    let config = Bmp280Config::default().with_povrs(PressOversampling::Skipped);
    let mut expectations = init_expectations(&REFERENCE_WORDS, config);
    expectations.push(I2cTransaction::write_read(
        ADDR,
        vec![0xF7],
        vec![0x80, 0x00, 0x00, 0x7E, 0xED, 0x00],
    ));
    let i2c = I2cMock::new(&expectations);
    let mut device =
        Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new()).with_config(config);

    let calib = device.init().unwrap();
    let measurement = device.measure(&calib).unwrap();
    assert_eq!(measurement.temperature_c, 25.08);
    assert_eq!(measurement.pressure_pa.to_bits(), 0.0f64.to_bits());
    assert_eq!(measurement.pressure(), None);
    finish(device);
}

#[test]
fn set_config_updates_registers_and_state() {
    let config = Bmp280Config::default().with_filter(IIRFilter::IIRx16);
    let i2c = I2cMock::new(&[
        I2cTransaction::write(ADDR, vec![0xF5, 0xF0]),
        I2cTransaction::write(ADDR, vec![0xF4, 0x2F]),
    ]);
    let mut device = Bmp280::with_i2c(i2c, Address::SdoVdd, NoopDelay::new());

    device.set_config(config).unwrap();
    assert_eq!(device.config(), config);
    finish(device);
}

#[test]
fn shared_calibration_across_threads() {
    let calib = reference_calib();
    let readings: Vec<RawReading> = (0..64u32)
        .map(|i| RawReading {
            temperature: 500_000 + i * 613,
            pressure: 400_000 + i * 977,
        })
        .collect();
    let serial: Vec<_> = readings
        .iter()
        .map(|raw| compensation::compensate(*raw, &calib))
        .collect();

    let parallel: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = readings
            .chunks(16)
            .map(|chunk| {
                let calib = &calib;
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|raw| compensation::compensate(*raw, calib))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    assert_eq!(serial, parallel);
}
