//! Analog input trait
//!
//! Single-channel ADC attached to the MikroBUS AN pin.

use crate::platform::Result;

/// ADC configuration
#[derive(Debug, Clone, Copy)]
pub struct AdcConfig {
    /// Conversion resolution in bits
    pub resolution_bits: u8,
    /// Reference voltage in volts
    pub vref: f32,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            resolution_bits: 12,
            vref: 3.3,
        }
    }
}

/// Analog input interface
pub trait AnalogInInterface {
    /// Read one raw conversion (counts)
    fn read_raw(&mut self) -> Result<u16>;

    /// Resolution in bits
    fn resolution(&self) -> u8;

    /// Reference voltage in volts
    fn vref(&self) -> f32;

    /// Change the reference voltage used for conversions
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Adc(AdcError::InvalidReference)` for a
    /// non-positive reference.
    fn set_vref(&mut self, vref: f32) -> Result<()>;

    /// Read one conversion scaled to volts
    fn read_voltage(&mut self) -> Result<f32> {
        let raw = self.read_raw()?;
        let full_scale = ((1u32 << self.resolution()) - 1) as f32;
        Ok(raw as f32 * self.vref() / full_scale)
    }
}
