//! Register-level access to the sensor.
//!
//! [`RegisterAccess`] is the only bus abstraction the rest of the crate sees.
//! [`I2cInterface`] implements it on top of any `embedded-hal` 1.0 I²C bus;
//! anything else that can read and write 8-bit registers (SPI, a simulator,
//! a captured register dump) can implement it too.

use embedded_hal::i2c::I2c;

use crate::bmp280::Address;

/// Register read/write primitives of the BMP280.
///
/// Errors are opaque to the driver and always handed back unchanged.
pub trait RegisterAccess {
    type Error;

    /// Reads `buf.len()` consecutive registers starting at `reg`.
    fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes a single register.
    fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;

    fn read_u8(&mut self, reg: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_block(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Little-endian unsigned word at `reg` (LSB) and `reg + 1` (MSB).
    fn read_u16_le(&mut self, reg: u8) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.read_block(reg, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Little-endian two's-complement word at `reg` (LSB) and `reg + 1` (MSB).
    fn read_i16_le(&mut self, reg: u8) -> Result<i16, Self::Error> {
        let mut buf = [0u8; 2];
        self.read_block(reg, &mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Big-endian 24-bit value at `reg` (MSB), `reg + 1` (LSB), `reg + 2` (XLSB).
    fn read_u24(&mut self, reg: u8) -> Result<u32, Self::Error> {
        let mut buf = [0u8; 3];
        self.read_block(reg, &mut buf)?;
        Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    type Error = T::Error;

    fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_block(reg, buf)
    }

    fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_u8(reg, value)
    }
}

/// BMP280 on an I²C bus.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: Address) -> Self {
        Self {
            i2c,
            address: address.addr(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterAccess for I2cInterface<I2C> {
    type Error = I2C::Error;

    fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[reg], buf)
    }

    fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[reg, value])
    }
}
