//! Mock I2C implementation for testing

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
    Result,
};
use core::cell::RefCell;
use std::vec::Vec;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction (header and payload appear concatenated, as on the wire)
    Write { addr: u8, data: Vec<u8> },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

/// Mock I2C implementation
///
/// Records all transactions for test verification and replays
/// pre-programmed read data as a byte FIFO.
#[derive(Debug)]
pub struct MockI2c {
    config: I2cConfig,
    transactions: RefCell<Vec<I2cTransaction>>,
    read_data: RefCell<Vec<u8>>,
    fault: Option<I2cError>,
}

impl MockI2c {
    /// Create a new mock I2C
    pub fn new(config: I2cConfig) -> Self {
        Self {
            config,
            transactions: RefCell::new(Vec::new()),
            read_data: RefCell::new(Vec::new()),
            fault: None,
        }
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<I2cTransaction> {
        self.transactions.borrow().clone()
    }

    /// Clear transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.borrow_mut().clear();
    }

    /// Set data to return for read operations
    pub fn set_read_data(&mut self, data: &[u8]) {
        *self.read_data.borrow_mut() = data.to_vec();
    }

    /// Append data to return for read operations
    pub fn push_read_data(&mut self, data: &[u8]) {
        self.read_data.borrow_mut().extend_from_slice(data);
    }

    /// Make every following transaction fail with `error` (None clears)
    pub fn set_fault(&mut self, error: Option<I2cError>) {
        self.fault = error;
    }

    /// Get current frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    fn check_fault(&self) -> Result<()> {
        match self.fault {
            Some(e) => Err(PlatformError::I2c(e)),
            None => Ok(()),
        }
    }

    fn fill(&self, buffer: &mut [u8]) {
        let mut read_data = self.read_data.borrow_mut();
        let to_read = core::cmp::min(buffer.len(), read_data.len());
        buffer[..to_read].copy_from_slice(&read_data[..to_read]);
        read_data.drain(..to_read);
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.check_fault()?;
        self.transactions.borrow_mut().push(I2cTransaction::Write {
            addr,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn write_prefixed(&mut self, addr: u8, header: &[u8], payload: &[u8]) -> Result<()> {
        self.check_fault()?;
        let mut data = header.to_vec();
        data.extend_from_slice(payload);
        self.transactions
            .borrow_mut()
            .push(I2cTransaction::Write { addr, data });
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.check_fault()?;
        self.transactions.borrow_mut().push(I2cTransaction::Read {
            addr,
            len: buffer.len(),
        });
        self.fill(buffer);
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.check_fault()?;
        self.transactions
            .borrow_mut()
            .push(I2cTransaction::WriteRead {
                addr,
                write_data: write_data.to_vec(),
                read_len: read_buffer.len(),
            });
        self.fill(read_buffer);
        Ok(())
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        self.config.frequency = frequency;
        Ok(())
    }
}
