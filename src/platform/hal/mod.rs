//! embedded-hal backend
//!
//! Adapters that let any HAL implementing `embedded-hal` 1.0 (and
//! `embedded-io` for serial ports) drive the Click drivers. Each wrapper maps
//! the HAL's error kinds onto [`PlatformError`](crate::platform::PlatformError).
//!
//! # Feature Gate
//!
//! Only available with the `embedded-hal` feature:
//!
//! ```toml
//! [dependencies]
//! click_drivers = { version = "0.1", features = ["embedded-hal"] }
//! ```
//!
//! Bus pins are already routed by the time a HAL peripheral exists, so these
//! adapters are constructed directly and handed to a driver's `new`
//! constructor rather than going through [`Platform`](crate::platform::Platform).
//! Analog input has no `embedded-hal` 1.0 trait; boards implement
//! [`AnalogInInterface`](crate::platform::AnalogInInterface) themselves.

mod delay;
mod gpio;
mod i2c;
mod pwm;
mod spi;
mod uart;

pub use delay::HalDelay;
pub use gpio::{HalInput, HalOutput};
pub use i2c::HalI2c;
pub use pwm::HalPwm;
pub use spi::HalSpi;
pub use uart::HalUart;
