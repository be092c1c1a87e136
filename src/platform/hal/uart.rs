//! UART adapter for `embedded-io` serial ports

use crate::platform::{
    error::{PlatformError, UartError},
    traits::UartInterface,
    Result,
};
use core::cell::RefCell;
use embedded_io::{Read, ReadReady, Write};

/// Serial port wrapper
///
/// Reads only touch the port when it reports data ready, keeping the
/// non-blocking contract of [`UartInterface::read`].
pub struct HalUart<U: Read + ReadReady + Write> {
    uart: RefCell<U>,
}

impl<U: Read + ReadReady + Write> HalUart<U> {
    /// Wrap a serial port configured for the module's baud rate
    pub fn new(uart: U) -> Self {
        Self {
            uart: RefCell::new(uart),
        }
    }
}

impl<U: Read + ReadReady + Write> UartInterface for HalUart<U> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.uart
            .get_mut()
            .write_all(data)
            .map_err(|_| PlatformError::Uart(UartError::WriteFailed))?;
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if buffer.is_empty() {
            return Ok(0);
        }
        let uart = self.uart.get_mut();
        let ready = uart
            .read_ready()
            .map_err(|_| PlatformError::Uart(UartError::ReadFailed))?;
        if !ready {
            return Ok(0);
        }
        uart.read(buffer)
            .map_err(|_| PlatformError::Uart(UartError::ReadFailed))
    }

    fn set_baud_rate(&mut self, _baud: u32) -> Result<()> {
        // embedded-io ports carry no line configuration
        Err(PlatformError::Uart(UartError::InvalidBaudRate))
    }

    fn available(&self) -> bool {
        self.uart.borrow_mut().read_ready().unwrap_or(false)
    }

    fn flush(&mut self) -> Result<()> {
        self.uart
            .get_mut()
            .flush()
            .map_err(|_| PlatformError::Uart(UartError::WriteFailed))
    }
}
