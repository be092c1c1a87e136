//! Mock PWM channel
//!
//! Keeps the current output state and an ordered log of every change, so
//! tests can check the sequence a driver produced and not just where it
//! ended up.

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PwmConfig, PwmInterface},
    Result,
};
use std::vec::Vec;

/// One accepted change to the channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PwmEvent {
    /// Duty cycle written
    Duty(f32),
    /// Frequency written
    Frequency(u32),
    /// Output switched on
    Enabled,
    /// Output switched off
    Disabled,
}

/// Mock PWM channel
#[derive(Debug)]
pub struct MockPwm {
    duty_cycle: f32,
    frequency: u32,
    enabled: bool,
    events: Vec<PwmEvent>,
}

impl MockPwm {
    /// Channel at the configured frequency and duty, output off
    pub fn new(config: PwmConfig) -> Self {
        Self {
            duty_cycle: config.duty_cycle,
            frequency: config.frequency,
            enabled: false,
            events: Vec::new(),
        }
    }

    /// Changes in the order they were made; rejected writes are not logged
    pub fn events(&self) -> &[PwmEvent] {
        &self.events
    }

    /// Duty cycles written so far
    pub fn duty_history(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PwmEvent::Duty(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    /// Forget logged events, keeping the current output state
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl PwmInterface for MockPwm {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty_cycle = duty_cycle;
        self.events.push(PwmEvent::Duty(duty_cycle));
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.duty_cycle
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        self.frequency = frequency;
        self.events.push(PwmEvent::Frequency(frequency));
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.events.push(PwmEvent::Enabled);
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.events.push(PwmEvent::Disabled);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_duty_is_not_logged() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        pwm.set_duty_cycle(0.5).unwrap();
        assert!(pwm.set_duty_cycle(-0.1).is_err());
        assert!(pwm.set_duty_cycle(1.1).is_err());

        assert_eq!(pwm.duty_cycle(), 0.5);
        assert_eq!(pwm.duty_history(), [0.5]);
    }

    #[test]
    fn test_events_keep_order() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        assert_eq!(pwm.frequency(), 5_000);
        assert!(pwm.set_frequency(0).is_err());

        pwm.set_frequency(1_000).unwrap();
        pwm.set_duty_cycle(0.25).unwrap();
        pwm.enable();
        pwm.disable();
        assert_eq!(
            pwm.events(),
            [
                PwmEvent::Frequency(1_000),
                PwmEvent::Duty(0.25),
                PwmEvent::Enabled,
                PwmEvent::Disabled,
            ]
        );

        pwm.clear_events();
        assert!(pwm.events().is_empty());
        assert_eq!(pwm.duty_cycle(), 0.25);
    }
}
