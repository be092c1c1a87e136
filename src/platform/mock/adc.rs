//! Mock analog input for testing

use crate::platform::{
    error::{AdcError, PlatformError},
    traits::{AdcConfig, AnalogInInterface},
    Result,
};

/// Mock ADC returning a test-controlled conversion value
#[derive(Debug)]
pub struct MockAdc {
    config: AdcConfig,
    raw: u16,
    conversions: usize,
}

impl MockAdc {
    /// Create a new mock ADC reading zero
    pub fn new(config: AdcConfig) -> Self {
        Self {
            config,
            raw: 0,
            conversions: 0,
        }
    }

    /// Set the value returned by subsequent conversions (clamped to full scale)
    pub fn set_raw(&mut self, raw: u16) {
        let max = ((1u32 << self.config.resolution_bits) - 1) as u16;
        self.raw = raw.min(max);
    }

    /// Set the value that corresponds to `volts` at the current reference
    pub fn set_voltage(&mut self, volts: f32) {
        let full_scale = ((1u32 << self.config.resolution_bits) - 1) as f32;
        let raw = libm::roundf(volts / self.config.vref * full_scale);
        self.set_raw(if raw < 0.0 { 0 } else { raw as u16 });
    }

    /// Number of conversions performed
    pub fn conversions(&self) -> usize {
        self.conversions
    }
}

impl AnalogInInterface for MockAdc {
    fn read_raw(&mut self) -> Result<u16> {
        self.conversions += 1;
        Ok(self.raw)
    }

    fn resolution(&self) -> u8 {
        self.config.resolution_bits
    }

    fn vref(&self) -> f32 {
        self.config.vref
    }

    fn set_vref(&mut self, vref: f32) -> Result<()> {
        if vref <= 0.0 {
            return Err(PlatformError::Adc(AdcError::InvalidReference));
        }
        self.config.vref = vref;
        Ok(())
    }
}
