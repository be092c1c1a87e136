//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod mikrobus;
pub mod platform;
pub mod pwm;
pub mod spi;
pub mod timer;
pub mod uart;

pub use adc::{AdcConfig, AnalogInInterface};
pub use gpio::{GpioInterface, GpioMode};
pub use i2c::{I2cConfig, I2cInterface, I2cSpeed};
pub use mikrobus::{MikrobusPinout, MikrobusSocket, PinName, PinoutError};
pub use platform::{I2cPins, Platform, SpiPins, UartPins};
pub use pwm::{PwmConfig, PwmInterface};
pub use spi::{ChipSelectPolarity, SpiBitOrder, SpiConfig, SpiInterface, SpiMode};
pub use timer::TimerInterface;
pub use uart::{UartConfig, UartInterface, UartParity, UartStopBits};
