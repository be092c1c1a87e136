//! PWM output channel

use crate::platform::Result;

/// Channel settings applied when the platform hands out a PWM pin
#[derive(Debug, Clone, Copy)]
pub struct PwmConfig {
    /// Carrier frequency in Hz
    pub frequency: u32,
    /// Starting duty as a fraction, `0.0..=1.0`
    pub duty_cycle: f32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: 5_000,
            duty_cycle: 0.0,
        }
    }
}

/// A single PWM output, owned by one driver
///
/// Duty is a fraction rather than a timer compare value, so drivers stay
/// independent of the counter width behind the pin.
pub trait PwmInterface {
    /// Set the duty fraction
    ///
    /// # Errors
    ///
    /// `PwmError::InvalidDutyCycle` outside `0.0..=1.0` (NaN included); the
    /// output keeps its previous duty.
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()>;

    /// Duty fraction last applied
    fn duty_cycle(&self) -> f32;

    /// Change the carrier frequency
    ///
    /// # Errors
    ///
    /// `PwmError::InvalidFrequency` when the hardware cannot produce it.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Carrier frequency in Hz
    fn frequency(&self) -> u32;

    /// Start driving the pin
    fn enable(&mut self);

    /// Stop driving the pin (held low)
    fn disable(&mut self);

    /// Whether the pin is being driven
    fn is_enabled(&self) -> bool;
}
