//! Mock SPI implementation for testing

use crate::platform::{
    traits::{SpiConfig, SpiInterface, SpiMode},
    Result,
};
use core::cell::RefCell;
use std::vec::Vec;

/// SPI transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiTransaction {
    /// Transfer (full-duplex)
    Transfer { write: Vec<u8>, read: Vec<u8> },
    /// Write only
    Write { data: Vec<u8> },
    /// Read only
    Read { len: usize },
}

/// Mock SPI implementation
///
/// Records all transactions for test verification and allows
/// pre-programming expected read data.
#[derive(Debug)]
pub struct MockSpi {
    config: SpiConfig,
    transactions: RefCell<Vec<SpiTransaction>>,
    read_data: RefCell<Vec<u8>>,
}

impl MockSpi {
    /// Create a new mock SPI
    pub fn new(config: SpiConfig) -> Self {
        Self {
            config,
            transactions: RefCell::new(Vec::new()),
            read_data: RefCell::new(Vec::new()),
        }
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<SpiTransaction> {
        self.transactions.borrow().clone()
    }

    /// Set data to return for read operations
    pub fn set_read_data(&mut self, data: &[u8]) {
        *self.read_data.borrow_mut() = data.to_vec();
    }

    /// Current clock mode
    pub fn mode(&self) -> SpiMode {
        self.config.mode
    }

    /// Get current frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    fn fill(&self, buffer: &mut [u8]) {
        let mut read_data = self.read_data.borrow_mut();
        let to_read = core::cmp::min(buffer.len(), read_data.len());
        buffer[..to_read].copy_from_slice(&read_data[..to_read]);
        for b in buffer[to_read..].iter_mut() {
            *b = self.config.default_write_data;
        }
        read_data.drain(..to_read);
    }
}

impl SpiInterface for MockSpi {
    fn transfer(&mut self, write_buffer: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.fill(read_buffer);
        self.transactions
            .borrow_mut()
            .push(SpiTransaction::Transfer {
                write: write_buffer.to_vec(),
                read: read_buffer.to_vec(),
            });
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.transactions.borrow_mut().push(SpiTransaction::Write {
            data: data.to_vec(),
        });
        Ok(())
    }

    fn write_prefixed(&mut self, header: &[u8], payload: &[u8]) -> Result<()> {
        let mut data = header.to_vec();
        data.extend_from_slice(payload);
        self.transactions
            .borrow_mut()
            .push(SpiTransaction::Write { data });
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.fill(buffer);
        self.transactions
            .borrow_mut()
            .push(SpiTransaction::Read { len: buffer.len() });
        Ok(())
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        self.config.frequency = frequency;
        Ok(())
    }

    fn set_mode(&mut self, mode: SpiMode) -> Result<()> {
        self.config.mode = mode;
        Ok(())
    }
}
