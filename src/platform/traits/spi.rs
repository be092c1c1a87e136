//! SPI interface trait

use crate::platform::Result;

/// SPI configuration
#[derive(Debug, Clone, Copy)]
pub struct SpiConfig {
    /// Bus frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL and CPHA)
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: SpiBitOrder,
    /// Dummy byte clocked out during reads
    pub default_write_data: u8,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000,
            mode: SpiMode::Mode0,
            bit_order: SpiBitOrder::MsbFirst,
            default_write_data: 0x00,
        }
    }
}

/// SPI mode (Clock Polarity and Phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

/// SPI bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiBitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// Chip select polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelectPolarity {
    /// CS asserted low (almost every Click board)
    #[default]
    ActiveLow,
    /// CS asserted high
    ActiveHigh,
}

/// SPI interface trait
///
/// Chip select is not part of the bus; drivers own a GPIO for it and wrap
/// every transaction in select/deselect.
pub trait SpiInterface {
    /// Transfer data (full-duplex)
    ///
    /// Both buffers must have the same length.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the transfer fails.
    fn transfer(&mut self, write_buffer: &[u8], read_buffer: &mut [u8]) -> Result<()>;

    /// Write data (transmit only)
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Write a header followed by a payload within one chip-select window
    fn write_prefixed(&mut self, header: &[u8], payload: &[u8]) -> Result<()> {
        self.write(header)?;
        self.write(payload)
    }

    /// Read data (receive only), clocking out the dummy byte
    fn read(&mut self, buffer: &mut [u8]) -> Result<()>;

    /// Write a header, then read into `buffer` within one chip-select window
    fn write_read(&mut self, header: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.write(header)?;
        self.read(buffer)
    }

    /// Set SPI bus frequency
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Set SPI clock mode
    fn set_mode(&mut self, mode: SpiMode) -> Result<()>;
}
