//! Mock platform implementation for testing
//!
//! In-memory peripherals that record what drivers put on the bus and replay
//! scripted responses, so every driver can be exercised on the host.
//!
//! # Feature Gate
//!
//! Available during test builds and when the `mock` feature is enabled.
//!
//! # Example
//!
//! ```ignore
//! use click_drivers::platform::mock::MockPlatform;
//! use click_drivers::platform::traits::{MikrobusSocket, Platform, UartInterface, UartPins};
//!
//! let mut platform = MockPlatform::new();
//! let pinout = platform.mikrobus(MikrobusSocket::One);
//! let mut uart = platform
//!     .create_uart(UartPins { tx: pinout.tx, rx: pinout.rx }, Default::default())
//!     .unwrap();
//! uart.write(b"AT\r\n").unwrap();
//! ```

mod adc;
mod gpio;
mod i2c;
mod platform;
mod pwm;
mod spi;
mod timer;
mod uart;

pub use adc::MockAdc;
pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use platform::MockPlatform;
pub use pwm::{MockPwm, PwmEvent};
pub use spi::{MockSpi, SpiTransaction};
pub use timer::MockTimer;
pub use uart::MockUart;
