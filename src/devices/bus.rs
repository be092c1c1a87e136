//! Shared register-style bus access
//!
//! Most Click boards expose a register map: the first byte on the wire is a
//! register address, the rest is payload. These wrappers keep the slave
//! address (I2C) or chip-select line (SPI) with the bus so drivers only deal
//! in registers.

use crate::platform::{
    traits::{ChipSelectPolarity, GpioInterface, I2cInterface, SpiInterface},
    Result,
};

/// I2C device at a fixed 7-bit address
#[derive(Debug)]
pub struct RegisterDevice<I: I2cInterface> {
    i2c: I,
    address: u8,
}

impl<I: I2cInterface> RegisterDevice<I> {
    /// Bind an I2C bus to a slave address
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Slave address used for every transaction
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Change the slave address (boards with address-select jumpers)
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Write `payload` starting at register `reg`
    pub fn write_register(&mut self, reg: u8, payload: &[u8]) -> Result<()> {
        self.i2c.write_prefixed(self.address, &[reg], payload)
    }

    /// Read `buffer.len()` bytes starting at register `reg`
    pub fn read_register(&mut self, reg: u8, buffer: &mut [u8]) -> Result<()> {
        self.i2c.write_read(self.address, &[reg], buffer)
    }

    /// Read a single register
    pub fn read_u8(&mut self, reg: u8) -> Result<u8> {
        let mut value = [0u8; 1];
        self.read_register(reg, &mut value)?;
        Ok(value[0])
    }

    /// Write a single register
    pub fn write_u8(&mut self, reg: u8, value: u8) -> Result<()> {
        self.write_register(reg, &[value])
    }

    /// Read without a register pointer (devices that stream a frame)
    pub fn read_raw(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.i2c.read(self.address, buffer)
    }

    /// Underlying bus
    pub fn bus(&self) -> &I {
        &self.i2c
    }

    /// Underlying bus, mutable
    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.i2c
    }
}

/// SPI device with a driver-owned chip select
///
/// Every access is select, transfer, deselect. Chip select is released even
/// when the transfer fails so a bus error never leaves the device selected.
#[derive(Debug)]
pub struct SpiDevice<S: SpiInterface, G: GpioInterface> {
    spi: S,
    cs: G,
    polarity: ChipSelectPolarity,
}

impl<S: SpiInterface, G: GpioInterface> SpiDevice<S, G> {
    /// Wrap a bus and chip-select pin, leaving the device deselected
    pub fn new(spi: S, cs: G, polarity: ChipSelectPolarity) -> Result<Self> {
        let mut device = Self { spi, cs, polarity };
        device.deselect()?;
        Ok(device)
    }

    fn select(&mut self) -> Result<()> {
        self.cs
            .write(self.polarity == ChipSelectPolarity::ActiveHigh)
    }

    fn deselect(&mut self) -> Result<()> {
        self.cs.write(self.polarity == ChipSelectPolarity::ActiveLow)
    }

    fn framed<T>(&mut self, op: impl FnOnce(&mut S) -> Result<T>) -> Result<T> {
        self.select()?;
        let result = op(&mut self.spi);
        let released = self.deselect();
        let value = result?;
        released?;
        Ok(value)
    }

    /// Full-duplex transfer inside one chip-select frame
    pub fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        self.framed(|spi| spi.transfer(write, read))
    }

    /// Clock in `buffer.len()` bytes
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.framed(|spi| spi.read(buffer))
    }

    /// Write `payload` starting at register `reg`
    pub fn write_register(&mut self, reg: u8, payload: &[u8]) -> Result<()> {
        self.framed(|spi| spi.write_prefixed(&[reg], payload))
    }

    /// Read `buffer.len()` bytes starting at register `reg`
    pub fn read_register(&mut self, reg: u8, buffer: &mut [u8]) -> Result<()> {
        self.framed(|spi| spi.write_read(&[reg], buffer))
    }

    /// Whether the chip select is currently asserted
    pub fn is_selected(&self) -> bool {
        self.cs.read() == (self.polarity == ChipSelectPolarity::ActiveHigh)
    }

    /// Underlying bus, mutable
    pub fn bus_mut(&mut self) -> &mut S {
        &mut self.spi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{PlatformError, SpiError};
    use crate::platform::mock::{I2cTransaction, MockGpio, MockI2c, MockSpi, SpiTransaction};
    use crate::platform::traits::{I2cConfig, SpiConfig, SpiMode};

    #[test]
    fn test_register_write_sends_header_then_payload() {
        let mut dev = RegisterDevice::new(MockI2c::new(I2cConfig::default()), 0x68);
        dev.write_register(0x08, &[1, 2, 3]).unwrap();

        assert_eq!(
            dev.bus().transactions(),
            vec![I2cTransaction::Write {
                addr: 0x68,
                data: vec![0x08, 1, 2, 3]
            }]
        );
    }

    #[test]
    fn test_register_read_u8() {
        let mut dev = RegisterDevice::new(MockI2c::new(I2cConfig::default()), 0x40);
        dev.bus_mut().set_read_data(&[0x5a]);

        assert_eq!(dev.read_u8(0x01).unwrap(), 0x5a);
        assert_eq!(
            dev.bus().transactions(),
            vec![I2cTransaction::WriteRead {
                addr: 0x40,
                write_data: vec![0x01],
                read_len: 1
            }]
        );
    }

    #[test]
    fn test_spi_frame_toggles_chip_select() {
        let mut dev = SpiDevice::new(
            MockSpi::new(SpiConfig::default()),
            MockGpio::new_output(),
            ChipSelectPolarity::ActiveLow,
        )
        .unwrap();
        assert!(!dev.is_selected());
        assert!(dev.cs.read());

        dev.bus_mut().set_read_data(&[0xde, 0xad]);
        let mut buf = [0u8; 2];
        dev.read(&mut buf).unwrap();

        assert_eq!(buf, [0xde, 0xad]);
        assert!(!dev.is_selected());
        // init deselect + select + deselect
        assert_eq!(dev.cs.write_count(), 3);
    }

    #[test]
    fn test_spi_active_high_chip_select() {
        let dev = SpiDevice::new(
            MockSpi::new(SpiConfig::default()),
            MockGpio::new_output(),
            ChipSelectPolarity::ActiveHigh,
        )
        .unwrap();
        assert!(!dev.cs.read());
        assert!(!dev.is_selected());
    }

    #[test]
    fn test_spi_register_write_is_one_frame() {
        let mut dev = SpiDevice::new(
            MockSpi::new(SpiConfig::default()),
            MockGpio::new_output(),
            ChipSelectPolarity::ActiveLow,
        )
        .unwrap();
        dev.write_register(0x80, &[0x11]).unwrap();

        assert_eq!(
            dev.spi.transactions(),
            vec![SpiTransaction::Write {
                data: vec![0x80, 0x11]
            }]
        );
    }

    /// SPI bus whose every transfer fails
    struct BrokenSpi;

    impl SpiInterface for BrokenSpi {
        fn transfer(&mut self, _: &[u8], _: &mut [u8]) -> Result<()> {
            Err(PlatformError::Spi(SpiError::TransferFailed))
        }
        fn write(&mut self, _: &[u8]) -> Result<()> {
            Err(PlatformError::Spi(SpiError::TransferFailed))
        }
        fn read(&mut self, _: &mut [u8]) -> Result<()> {
            Err(PlatformError::Spi(SpiError::TransferFailed))
        }
        fn set_frequency(&mut self, _: u32) -> Result<()> {
            Ok(())
        }
        fn set_mode(&mut self, _: SpiMode) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_spi_chip_select_released_on_failure() {
        let mut dev =
            SpiDevice::new(BrokenSpi, MockGpio::new_output(), ChipSelectPolarity::ActiveLow)
                .unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(
            dev.read(&mut buf),
            Err(PlatformError::Spi(SpiError::TransferFailed))
        );
        assert!(!dev.is_selected());
    }
}
