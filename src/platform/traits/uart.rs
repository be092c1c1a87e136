//! UART interface trait
//!
//! Byte-stream bus for cellular and GNSS modules. Reads never block: they
//! return whatever the receive ring buffer currently holds.

use crate::platform::Result;

/// UART configuration
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Data bits (typically 8)
    pub data_bits: u8,
    /// Parity mode
    pub parity: UartParity,
    /// Stop bits
    pub stop_bits: UartStopBits,
}

impl UartConfig {
    /// 8N1 framing at `baud_rate`
    pub const fn eight_n_one(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: 8,
            parity: UartParity::None,
            stop_bits: UartStopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::eight_n_one(115200)
    }
}

/// UART parity modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartParity {
    /// No parity
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartStopBits {
    /// One stop bit
    One,
    /// Two stop bits
    Two,
}

/// UART interface trait
pub trait UartInterface {
    /// Queue data for transmission
    ///
    /// Returns the number of bytes accepted.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart` if the write operation fails.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read data from the receive buffer
    ///
    /// Copies up to `buffer.len()` bytes and returns the number actually
    /// available, which may be zero. Never waits for more data.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Set UART baud rate
    fn set_baud_rate(&mut self, baud: u32) -> Result<()>;

    /// Check if data is available to read
    fn available(&self) -> bool;

    /// Flush transmit buffer
    fn flush(&mut self) -> Result<()>;
}
