//! Mock UART implementation for testing

use crate::platform::{
    traits::{UartConfig, UartInterface},
    Result,
};
use core::cell::RefCell;
use std::vec::Vec;

/// Mock UART implementation
///
/// In-memory transmit log and receive ring. Reads hand back only what has
/// been injected so far, mirroring a non-blocking ring-buffer UART.
///
/// # Example
///
/// ```ignore
/// use click_drivers::platform::mock::MockUart;
/// use click_drivers::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new(Default::default());
/// uart.write(b"AT\r\n").unwrap();
/// assert_eq!(uart.tx_buffer(), b"AT\r\n");
///
/// uart.inject_rx_data(b"OK\r\n");
/// let mut buf = [0u8; 16];
/// assert_eq!(uart.read(&mut buf).unwrap(), 4);
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    tx_buffer: RefCell<Vec<u8>>,
    rx_buffer: RefCell<Vec<u8>>,
    write_calls: usize,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            tx_buffer: RefCell::new(Vec::new()),
            rx_buffer: RefCell::new(Vec::new()),
            write_calls: 0,
        }
    }

    /// Get transmitted data (for test verification)
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.tx_buffer.borrow().clone()
    }

    /// Clear transmit buffer
    pub fn clear_tx_buffer(&mut self) {
        self.tx_buffer.borrow_mut().clear();
        self.write_calls = 0;
    }

    /// Number of `write` calls since creation or the last clear
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }

    /// Inject receive data (for test setup)
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_buffer.borrow_mut().extend_from_slice(data);
    }

    /// Get current baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.tx_buffer.borrow_mut().extend_from_slice(data);
        self.write_calls += 1;
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut rx = self.rx_buffer.borrow_mut();
        let to_read = core::cmp::min(buffer.len(), rx.len());

        buffer[..to_read].copy_from_slice(&rx[..to_read]);
        rx.drain(..to_read);

        Ok(to_read)
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<()> {
        self.config.baud_rate = baud;
        Ok(())
    }

    fn available(&self) -> bool {
        !self.rx_buffer.borrow().is_empty()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_uart_write() {
        let mut uart = MockUart::new(UartConfig::default());
        let written = uart.write(b"AT+CSQ\r\n").unwrap();
        assert_eq!(written, 8);
        assert_eq!(uart.tx_buffer(), b"AT+CSQ\r\n");
        assert_eq!(uart.write_calls(), 1);
    }

    #[test]
    fn test_mock_uart_read_returns_available_count() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.inject_rx_data(b"OK\r\n");

        let mut buffer = [0u8; 16];
        let read = uart.read(&mut buffer).unwrap();
        assert_eq!(read, 4);
        assert_eq!(&buffer[..4], b"OK\r\n");

        // Ring is now empty: non-blocking read returns zero
        assert_eq!(uart.read(&mut buffer).unwrap(), 0);
        assert!(!uart.available());
    }

    #[test]
    fn test_mock_uart_baud_rate() {
        let mut uart = MockUart::new(UartConfig::default());
        assert_eq!(uart.baud_rate(), 115200);

        uart.set_baud_rate(9600).unwrap();
        assert_eq!(uart.baud_rate(), 9600);
    }
}
