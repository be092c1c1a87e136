//! I2C interface trait
//!
//! Register-style bus used by most sensor Click boards.

use crate::platform::Result;

/// Standard I2C bus speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cSpeed {
    /// 100 kHz
    Standard,
    /// 400 kHz
    Fast,
    /// 1 MHz
    FastPlus,
}

impl I2cSpeed {
    /// Bus frequency in Hz
    pub const fn hz(self) -> u32 {
        match self {
            I2cSpeed::Standard => 100_000,
            I2cSpeed::Fast => 400_000,
            I2cSpeed::FastPlus => 1_000_000,
        }
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Bus frequency in Hz (typically 100_000 or 400_000)
    pub frequency: u32,
    /// Timeout in microseconds
    pub timeout_us: u32,
}

impl I2cConfig {
    /// Configuration for one of the standard bus speeds
    pub const fn with_speed(speed: I2cSpeed) -> Self {
        Self {
            frequency: speed.hz(),
            timeout_us: 1_000_000,
        }
    }
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::with_speed(I2cSpeed::Standard)
    }
}

/// I2C interface trait
///
/// # Safety Invariants
///
/// - Only one owner per I2C bus instance
/// - Address must be 7-bit (valid range: 0x00..=0x7F)
pub trait I2cInterface {
    /// Write data to I2C device
    ///
    /// START - ADDR(W) - DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` on NACK, bus error or timeout.
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Write a header (register address, command bytes) followed by a
    /// payload as one transaction
    ///
    /// START - ADDR(W) - HEADER - PAYLOAD - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` on NACK, bus error or timeout.
    fn write_prefixed(&mut self, addr: u8, header: &[u8], payload: &[u8]) -> Result<()>;

    /// Read data from I2C device
    ///
    /// START - ADDR(R) - DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` on NACK, bus error or timeout.
    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Write then read with a repeated START
    ///
    /// START - ADDR(W) - WRITE_DATA - REPEATED_START - ADDR(R) - READ_DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` on NACK, bus error or timeout.
    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()>;

    /// Set I2C bus frequency
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;
}
