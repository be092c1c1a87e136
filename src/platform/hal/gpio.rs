//! GPIO adapters for `embedded-hal` digital pins

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use core::cell::RefCell;
use embedded_hal::digital::{InputPin, OutputPin};

/// Output pin wrapper
///
/// Remembers the last driven level so `read` needs no bus access.
pub struct HalOutput<P: OutputPin> {
    pin: P,
    level: bool,
    mode: GpioMode,
}

impl<P: OutputPin> HalOutput<P> {
    /// Wrap an output pin, driving it to `initial`
    pub fn new(mut pin: P, initial: bool) -> Result<Self> {
        let res = if initial { pin.set_high() } else { pin.set_low() };
        res.map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        Ok(Self {
            pin,
            level: initial,
            mode: GpioMode::OutputPushPull,
        })
    }

    fn drive(&mut self, level: bool) -> Result<()> {
        let res = if level {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        self.level = level;
        Ok(())
    }
}

impl<P: OutputPin> GpioInterface for HalOutput<P> {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn toggle(&mut self) -> Result<()> {
        let next = !self.level;
        self.drive(next)
    }

    fn read(&self) -> bool {
        self.level
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        // The pin type fixes the direction; only the drive flavour may change
        if !mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

/// Input pin wrapper
pub struct HalInput<P: InputPin> {
    pin: RefCell<P>,
    mode: GpioMode,
}

impl<P: InputPin> HalInput<P> {
    /// Wrap an input pin
    pub fn new(pin: P) -> Self {
        Self {
            pin: RefCell::new(pin),
            mode: GpioMode::Input,
        }
    }
}

impl<P: InputPin> GpioInterface for HalInput<P> {
    fn set_high(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn set_low(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn toggle(&mut self) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn read(&self) -> bool {
        self.pin.borrow_mut().is_high().unwrap_or(false)
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
