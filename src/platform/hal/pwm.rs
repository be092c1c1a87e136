//! PWM adapter for `embedded-hal` duty-cycle channels

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::PwmInterface,
    Result,
};
use embedded_hal::pwm::SetDutyCycle;

/// PWM channel wrapper
///
/// Disabling parks the channel at 0% and restores the stored duty on enable.
pub struct HalPwm<P: SetDutyCycle> {
    pwm: P,
    duty: f32,
    frequency: u32,
    enabled: bool,
}

impl<P: SetDutyCycle> HalPwm<P> {
    /// Wrap a channel already running at `frequency` Hz
    pub fn new(pwm: P, frequency: u32) -> Self {
        Self {
            pwm,
            duty: 0.0,
            frequency,
            enabled: false,
        }
    }

    fn apply(&mut self, duty: f32) -> Result<()> {
        let max = self.pwm.max_duty_cycle();
        let ticks = libm::roundf(duty * max as f32) as u16;
        self.pwm
            .set_duty_cycle(ticks.min(max))
            .map_err(|_| PlatformError::Pwm(PwmError::ChannelUnavailable))
    }
}

impl<P: SetDutyCycle> PwmInterface for HalPwm<P> {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        if self.enabled {
            self.apply(duty_cycle)?;
        }
        self.duty = duty_cycle;
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.duty
    }

    fn set_frequency(&mut self, _frequency: u32) -> Result<()> {
        // Period is owned by the HAL timer slice
        Err(PlatformError::Pwm(PwmError::InvalidFrequency))
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn enable(&mut self) {
        if self.apply(self.duty).is_ok() {
            self.enabled = true;
        }
    }

    fn disable(&mut self) {
        let _ = self.apply(0.0);
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
