//! I2C adapter for `embedded-hal` I2C masters

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::I2cInterface,
    Result,
};
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, Operation};

/// I2C master wrapper
pub struct HalI2c<I: I2c> {
    i2c: I,
}

impl<I: I2c> HalI2c<I> {
    /// Wrap an already configured I2C master
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Release the underlying HAL peripheral
    pub fn release(self) -> I {
        self.i2c
    }
}

fn map_err<E: embedded_hal::i2c::Error>(e: E) -> PlatformError {
    let kind = match e.kind() {
        ErrorKind::NoAcknowledge(_) => I2cError::Nack,
        ErrorKind::ArbitrationLoss => I2cError::ArbitrationLost,
        _ => I2cError::BusError,
    };
    PlatformError::I2c(kind)
}

impl<I: I2c> I2cInterface for HalI2c<I> {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.i2c.write(addr, data).map_err(map_err)
    }

    fn write_prefixed(&mut self, addr: u8, header: &[u8], payload: &[u8]) -> Result<()> {
        // Adjacent write operations are merged into one bus write
        self.i2c
            .transaction(addr, &mut [Operation::Write(header), Operation::Write(payload)])
            .map_err(map_err)
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.i2c.read(addr, buffer).map_err(map_err)
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(addr, write_data, read_buffer)
            .map_err(map_err)
    }

    fn set_frequency(&mut self, _frequency: u32) -> Result<()> {
        // embedded-hal masters are clocked at construction time
        Err(PlatformError::InvalidConfig)
    }
}
