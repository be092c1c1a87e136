//! Platform abstraction layer
//!
//! Bus masters, GPIO, PWM, analog input and delays as consumed by the Click
//! drivers. Board support lives behind these traits; nothing in `devices`
//! touches a vendor HAL directly.

pub mod error;
pub mod traits;

#[cfg(feature = "embedded-hal")]
pub mod hal;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{PlatformError, Result};
pub use traits::{
    AnalogInInterface, GpioInterface, I2cInterface, Platform, PwmInterface, SpiInterface,
    TimerInterface, UartInterface,
};
