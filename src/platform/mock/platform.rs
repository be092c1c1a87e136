//! Mock Platform implementation for testing

use crate::platform::{
    error::{AdcError, GpioError, I2cError, PlatformError, PwmError, SpiError, UartError},
    traits::{
        AdcConfig, GpioMode, I2cConfig, I2cPins, MikrobusPinout, MikrobusSocket, PinName,
        Platform, PwmConfig, SpiConfig, SpiPins, UartConfig, UartPins,
    },
    Result,
};

use super::{MockAdc, MockGpio, MockI2c, MockPwm, MockSpi, MockTimer, MockUart};
use std::vec::Vec;

/// Mock Platform implementation
///
/// A two-socket board. Pins are claimed exclusively; opening a bus on an
/// unconnected pin fails with that bus's own error, like a real HAL given
/// an invalid pin map.
#[derive(Debug)]
pub struct MockPlatform {
    timer: MockTimer,
    allocated: Vec<u8>,
}

impl MockPlatform {
    /// Create a new mock platform
    pub fn new() -> Self {
        Self {
            timer: MockTimer::new(),
            allocated: Vec::new(),
        }
    }

    /// Maximum GPIO pin number
    pub const MAX_GPIO: u8 = 29;

    /// First analog-capable GPIO
    pub const ADC_MIN: u8 = 26;

    /// Whether a GPIO has been claimed
    pub fn is_claimed(&self, gpio: u8) -> bool {
        self.allocated.contains(&gpio)
    }

    fn claim(&mut self, pins: &[u8]) -> Result<()> {
        for (i, &pin) in pins.iter().enumerate() {
            if pin > Self::MAX_GPIO {
                return Err(PlatformError::Gpio(GpioError::InvalidPin));
            }
            if self.allocated.contains(&pin) || pins[..i].contains(&pin) {
                return Err(PlatformError::ResourceUnavailable);
            }
        }
        self.allocated.extend_from_slice(pins);
        Ok(())
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    type Uart = MockUart;
    type I2c = MockI2c;
    type Spi = MockSpi;
    type Pwm = MockPwm;
    type Gpio = MockGpio;
    type Adc = MockAdc;
    type Timer = MockTimer;

    fn init() -> Result<Self> {
        Ok(Self::new())
    }

    fn system_clock_hz(&self) -> u32 {
        125_000_000 // Simulated 125 MHz system clock
    }

    fn mikrobus(&self, socket: MikrobusSocket) -> MikrobusPinout {
        use PinName::Gpio;

        match socket {
            MikrobusSocket::One => MikrobusPinout {
                an: Gpio(26),
                rst: Gpio(2),
                cs: Gpio(17),
                sck: Gpio(18),
                miso: Gpio(16),
                mosi: Gpio(19),
                pwm: Gpio(6),
                int: Gpio(7),
                rx: Gpio(1),
                tx: Gpio(0),
                scl: Gpio(21),
                sda: Gpio(20),
            },
            MikrobusSocket::Two => MikrobusPinout {
                an: Gpio(27),
                rst: Gpio(3),
                cs: Gpio(9),
                sck: Gpio(10),
                miso: Gpio(12),
                mosi: Gpio(11),
                pwm: Gpio(13),
                int: Gpio(14),
                rx: Gpio(5),
                tx: Gpio(4),
                scl: Gpio(23),
                sda: Gpio(22),
            },
            MikrobusSocket::Three | MikrobusSocket::Four => MikrobusPinout::unconnected(),
        }
    }

    fn create_uart(&mut self, pins: UartPins, config: UartConfig) -> Result<Self::Uart> {
        let (Some(tx), Some(rx)) = (pins.tx.gpio(), pins.rx.gpio()) else {
            return Err(PlatformError::Uart(UartError::InvalidPins));
        };
        if config.baud_rate == 0 {
            return Err(PlatformError::Uart(UartError::InvalidBaudRate));
        }
        self.claim(&[tx, rx])?;
        Ok(MockUart::new(config))
    }

    fn create_i2c(&mut self, pins: I2cPins, config: I2cConfig) -> Result<Self::I2c> {
        let (Some(scl), Some(sda)) = (pins.scl.gpio(), pins.sda.gpio()) else {
            return Err(PlatformError::I2c(I2cError::InvalidPins));
        };
        self.claim(&[scl, sda])?;
        Ok(MockI2c::new(config))
    }

    fn create_spi(&mut self, pins: SpiPins, config: SpiConfig) -> Result<Self::Spi> {
        let (Some(sck), Some(miso), Some(mosi)) =
            (pins.sck.gpio(), pins.miso.gpio(), pins.mosi.gpio())
        else {
            return Err(PlatformError::Spi(SpiError::InvalidPins));
        };
        self.claim(&[sck, miso, mosi])?;
        Ok(MockSpi::new(config))
    }

    fn create_pwm(&mut self, pin: PinName, config: PwmConfig) -> Result<Self::Pwm> {
        let Some(gpio) = pin.gpio() else {
            return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
        };
        self.claim(&[gpio])?;
        Ok(MockPwm::new(config))
    }

    fn create_gpio(&mut self, pin: PinName, mode: GpioMode) -> Result<Self::Gpio> {
        let Some(gpio) = pin.gpio() else {
            return Err(PlatformError::Gpio(GpioError::InvalidPin));
        };
        self.claim(&[gpio])?;
        Ok(MockGpio::new(mode))
    }

    fn create_adc(&mut self, pin: PinName, config: AdcConfig) -> Result<Self::Adc> {
        let Some(gpio) = pin.gpio().filter(|g| (Self::ADC_MIN..=Self::MAX_GPIO).contains(g))
        else {
            return Err(PlatformError::Adc(AdcError::InvalidPin));
        };
        if !(8..=16).contains(&config.resolution_bits) {
            return Err(PlatformError::Adc(AdcError::InvalidResolution));
        }
        self.claim(&[gpio])?;
        Ok(MockAdc::new(config))
    }

    fn timer(&self) -> &Self::Timer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut Self::Timer {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::traits::{GpioInterface, TimerInterface, UartInterface};

    #[test]
    fn test_mock_platform_init() {
        let platform = MockPlatform::init().unwrap();
        assert_eq!(platform.system_clock_hz(), 125_000_000);
    }

    #[test]
    fn test_mock_platform_pinouts_are_valid() {
        let platform = MockPlatform::new();
        assert!(platform.mikrobus(MikrobusSocket::One).validate().is_ok());
        assert!(platform.mikrobus(MikrobusSocket::Two).validate().is_ok());
        assert_eq!(
            platform.mikrobus(MikrobusSocket::Three),
            MikrobusPinout::unconnected()
        );
    }

    #[test]
    fn test_mock_platform_uart() {
        let mut platform = MockPlatform::new();
        let pinout = platform.mikrobus(MikrobusSocket::One);
        let pins = UartPins {
            tx: pinout.tx,
            rx: pinout.rx,
        };
        let mut uart = platform.create_uart(pins, UartConfig::default()).unwrap();
        uart.write(b"test").unwrap();

        // Same pins cannot be opened twice
        assert_eq!(
            platform.create_uart(pins, UartConfig::default()).err(),
            Some(PlatformError::ResourceUnavailable)
        );
    }

    #[test]
    fn test_mock_platform_unconnected_pins_fail_with_bus_error() {
        let mut platform = MockPlatform::new();
        let none = PinName::Unconnected;

        assert_eq!(
            platform
                .create_i2c(I2cPins { scl: none, sda: none }, I2cConfig::default())
                .err(),
            Some(PlatformError::I2c(I2cError::InvalidPins))
        );
        assert_eq!(
            platform
                .create_spi(
                    SpiPins {
                        sck: none,
                        miso: none,
                        mosi: none
                    },
                    SpiConfig::default()
                )
                .err(),
            Some(PlatformError::Spi(SpiError::InvalidPins))
        );
        assert_eq!(
            platform.create_gpio(none, GpioMode::Input).err(),
            Some(PlatformError::Gpio(GpioError::InvalidPin))
        );
        assert!(!platform.is_claimed(0));
    }

    #[test]
    fn test_mock_platform_gpio() {
        let mut platform = MockPlatform::new();
        let mut gpio0 = platform
            .create_gpio(PinName::Gpio(0), GpioMode::OutputPushPull)
            .unwrap();
        gpio0.set_high().unwrap();

        assert!(platform
            .create_gpio(PinName::Gpio(0), GpioMode::Input)
            .is_err());
        assert!(platform
            .create_gpio(PinName::Gpio(100), GpioMode::Input)
            .is_err());
    }

    #[test]
    fn test_mock_platform_adc_requires_analog_pin() {
        let mut platform = MockPlatform::new();
        assert_eq!(
            platform
                .create_adc(PinName::Gpio(3), AdcConfig::default())
                .err(),
            Some(PlatformError::Adc(AdcError::InvalidPin))
        );
        assert!(platform
            .create_adc(PinName::Gpio(26), AdcConfig::default())
            .is_ok());
    }

    #[test]
    fn test_mock_platform_timer() {
        let mut platform = MockPlatform::new();
        platform.timer_mut().delay_us(1000).unwrap();
        assert_eq!(platform.timer().now_us(), 1000);
    }
}
