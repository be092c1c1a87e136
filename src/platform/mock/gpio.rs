//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO implementation
///
/// Tracks pin level and mode. Input levels are driven by the test through
/// [`MockGpio::set_input_state`].
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
    writes: usize,
}

impl MockGpio {
    /// Create a mock GPIO in the given mode, initially low
    pub fn new(mode: GpioMode) -> Self {
        Self {
            state: false,
            mode,
            writes: 0,
        }
    }

    /// Create a new mock GPIO in output mode
    pub fn new_output() -> Self {
        Self::new(GpioMode::OutputPushPull)
    }

    /// Create a new mock GPIO in input mode
    pub fn new_input() -> Self {
        Self::new(GpioMode::Input)
    }

    /// Simulate the external level seen by an input pin
    pub fn set_input_state(&mut self, high: bool) {
        self.state = high;
    }

    /// Number of level changes requested by the driver
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn drive(&mut self, level: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.state = level;
        self.writes += 1;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn toggle(&mut self) -> Result<()> {
        let next = !self.state;
        self.drive(next)
    }

    fn read(&self) -> bool {
        self.state
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_gpio_output() {
        let mut gpio = MockGpio::new_output();
        assert!(!gpio.read());

        gpio.set_high().unwrap();
        assert!(gpio.read());

        gpio.write(false).unwrap();
        assert!(!gpio.read());
        assert_eq!(gpio.write_count(), 2);
    }

    #[test]
    fn test_mock_gpio_toggle() {
        let mut gpio = MockGpio::new_output();
        gpio.toggle().unwrap();
        assert!(gpio.read());

        gpio.toggle().unwrap();
        assert!(!gpio.read());
    }

    #[test]
    fn test_mock_gpio_input() {
        let mut gpio = MockGpio::new_input();
        gpio.set_input_state(true);
        assert!(gpio.read());
        assert!(gpio.read());

        // Input mode should not allow driving the pin
        assert_eq!(
            gpio.set_high(),
            Err(PlatformError::Gpio(GpioError::InvalidMode))
        );
        assert!(gpio.set_low().is_err());
        assert!(gpio.toggle().is_err());
    }
}
