//! Root platform trait
//!
//! Aggregates every peripheral interface and opens them from logical pin
//! names. This is the seam where a board support package plugs in; drivers
//! only see the associated types.

use super::{
    AdcConfig, AnalogInInterface, GpioInterface, GpioMode, I2cConfig, I2cInterface,
    MikrobusPinout, MikrobusSocket, PinName, PwmConfig, PwmInterface, SpiConfig, SpiInterface,
    TimerInterface, UartConfig, UartInterface,
};
use crate::platform::Result;

/// I2C pin pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cPins {
    /// Clock
    pub scl: PinName,
    /// Data
    pub sda: PinName,
}

/// SPI pin triple (chip select is a separate GPIO)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiPins {
    /// Clock
    pub sck: PinName,
    /// Data into the MCU
    pub miso: PinName,
    /// Data out of the MCU
    pub mosi: PinName,
}

/// UART pin pair (MCU perspective)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartPins {
    /// MCU transmit
    pub tx: PinName,
    /// MCU receive
    pub rx: PinName,
}

/// Root platform trait
///
/// # Example
///
/// ```ignore
/// let mut platform = MockPlatform::new();
/// let pinout = platform.mikrobus(MikrobusSocket::One);
/// let i2c = platform.create_i2c(
///     I2cPins { scl: pinout.scl, sda: pinout.sda },
///     I2cConfig::default(),
/// )?;
/// ```
pub trait Platform: Sized {
    /// UART peripheral type
    type Uart: UartInterface;

    /// I2C peripheral type
    type I2c: I2cInterface;

    /// SPI peripheral type
    type Spi: SpiInterface;

    /// PWM peripheral type
    type Pwm: PwmInterface;

    /// GPIO peripheral type
    type Gpio: GpioInterface;

    /// Analog input type
    type Adc: AnalogInInterface;

    /// Timer peripheral type
    type Timer: TimerInterface;

    /// Initialize the platform
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InitializationFailed` if initialization fails.
    fn init() -> Result<Self>;

    /// System clock frequency in Hz
    fn system_clock_hz(&self) -> u32;

    /// Pin assignment of a MikroBUS socket on this board
    fn mikrobus(&self, socket: MikrobusSocket) -> MikrobusPinout;

    /// Open a UART on the given pins
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::InvalidPins)` if either pin is
    /// unconnected, or `PlatformError::ResourceUnavailable` if a pin is taken.
    fn create_uart(&mut self, pins: UartPins, config: UartConfig) -> Result<Self::Uart>;

    /// Open an I2C master on the given pins
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c(I2cError::InvalidPins)` if either pin is
    /// unconnected, or `PlatformError::ResourceUnavailable` if a pin is taken.
    fn create_i2c(&mut self, pins: I2cPins, config: I2cConfig) -> Result<Self::I2c>;

    /// Open an SPI master on the given pins
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi(SpiError::InvalidPins)` if any pin is
    /// unconnected, or `PlatformError::ResourceUnavailable` if a pin is taken.
    fn create_spi(&mut self, pins: SpiPins, config: SpiConfig) -> Result<Self::Spi>;

    /// Open a PWM channel on a pin
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::ChannelUnavailable)` if the pin
    /// is unconnected or cannot produce PWM.
    fn create_pwm(&mut self, pin: PinName, config: PwmConfig) -> Result<Self::Pwm>;

    /// Claim a GPIO in the given mode
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidPin)` if the pin is
    /// unconnected or out of range, `PlatformError::ResourceUnavailable` if
    /// it is already claimed.
    fn create_gpio(&mut self, pin: PinName, mode: GpioMode) -> Result<Self::Gpio>;

    /// Open an analog input on a pin
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Adc(AdcError::InvalidPin)` if the pin is
    /// unconnected or not an analog channel.
    fn create_adc(&mut self, pin: PinName, config: AdcConfig) -> Result<Self::Adc>;

    /// Get timer reference
    fn timer(&self) -> &Self::Timer;

    /// Get mutable timer reference
    fn timer_mut(&mut self) -> &mut Self::Timer;
}
