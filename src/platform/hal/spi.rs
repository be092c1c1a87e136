//! SPI adapter for `embedded-hal` SPI buses
//!
//! Wraps a [`SpiBus`] (no chip select); the Click driver owns the CS GPIO.

use crate::platform::{
    error::{PlatformError, SpiError},
    traits::{SpiInterface, SpiMode},
    Result,
};
use embedded_hal::spi::{Error as _, ErrorKind, SpiBus};

/// SPI bus wrapper
pub struct HalSpi<S: SpiBus> {
    spi: S,
}

impl<S: SpiBus> HalSpi<S> {
    /// Wrap an already configured SPI bus
    pub fn new(spi: S) -> Self {
        Self { spi }
    }
}

fn map_err<E: embedded_hal::spi::Error>(e: E) -> PlatformError {
    let kind = match e.kind() {
        ErrorKind::Overrun => SpiError::Overrun,
        ErrorKind::ModeFault => SpiError::ModeFault,
        _ => SpiError::TransferFailed,
    };
    PlatformError::Spi(kind)
}

impl<S: SpiBus> SpiInterface for HalSpi<S> {
    fn transfer(&mut self, write_buffer: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        if write_buffer.len() != read_buffer.len() {
            return Err(PlatformError::Spi(SpiError::TransferFailed));
        }
        self.spi.transfer(read_buffer, write_buffer).map_err(map_err)?;
        self.spi.flush().map_err(map_err)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.spi.write(data).map_err(map_err)?;
        self.spi.flush().map_err(map_err)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.spi.read(buffer).map_err(map_err)
    }

    fn set_frequency(&mut self, _frequency: u32) -> Result<()> {
        Err(PlatformError::InvalidConfig)
    }

    fn set_mode(&mut self, _mode: SpiMode) -> Result<()> {
        Err(PlatformError::InvalidConfig)
    }
}
