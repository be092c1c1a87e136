//! Thermo Click driver (Maxim MAX31855 thermocouple converter)
//!
//! Read-only SPI device. Every frame is 32 bits:
//!
//! | Bits   | Content                                     |
//! |--------|---------------------------------------------|
//! | 31..18 | Thermocouple temperature, signed, 0.25 °C   |
//! | 16     | Fault (any of bits 2..0 set)                |
//! | 15..4  | Cold-junction temperature, signed, 0.0625 °C|
//! | 2      | Short to VCC                                |
//! | 1      | Short to GND                                |
//! | 0      | Open circuit                                |

use super::{
    bus::SpiDevice,
    convert::{be_u32, sign_extend},
    error::SenseError,
    traits::{ClickDriver, Sensor},
};
use crate::platform::{
    traits::{
        ChipSelectPolarity, GpioInterface, GpioMode, MikrobusPinout, PinName, Platform, SpiConfig,
        SpiInterface, SpiMode, SpiPins,
    },
    Result,
};
use bitflags::bitflags;

const FAULT_BIT: u32 = 1 << 16;
const FAULT_MASK: u32 = 0x07;
const THERMOCOUPLE_LSB: f32 = 0.25;
const JUNCTION_LSB: f32 = 0.0625;

bitflags! {
    /// Thermocouple fault conditions
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ThermoFault: u8 {
        /// Thermocouple open
        const OPEN_CIRCUIT = 0b001;
        /// Thermocouple shorted to GND
        const SHORT_TO_GND = 0b010;
        /// Thermocouple shorted to VCC
        const SHORT_TO_VCC = 0b100;
    }
}

/// Thermo Click configuration
#[derive(Debug, Clone, Copy)]
pub struct ThermoConfig {
    /// SPI clock
    pub sck: PinName,
    /// SPI data in
    pub miso: PinName,
    /// SPI data out (unused by the chip but part of the bus)
    pub mosi: PinName,
    /// Chip select
    pub cs: PinName,
    /// SPI clock rate in Hz
    pub spi_speed: u32,
    /// SPI mode
    pub spi_mode: SpiMode,
    /// Chip select polarity
    pub cs_polarity: ChipSelectPolarity,
}

impl Default for ThermoConfig {
    fn default() -> Self {
        Self {
            sck: PinName::Unconnected,
            miso: PinName::Unconnected,
            mosi: PinName::Unconnected,
            cs: PinName::Unconnected,
            spi_speed: 100_000,
            spi_mode: SpiMode::Mode0,
            cs_polarity: ChipSelectPolarity::ActiveLow,
        }
    }
}

impl ThermoConfig {
    /// Take the SPI pins from a MikroBUS socket
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.sck = pinout.sck;
        self.miso = pinout.miso;
        self.mosi = pinout.mosi;
        self.cs = pinout.cs;
    }
}

/// Thermo Click driver
pub struct Thermo<S: SpiInterface, G: GpioInterface> {
    dev: SpiDevice<S, G>,
}

impl<S: SpiInterface, G: GpioInterface> Thermo<S, G> {
    /// Open the SPI bus and chip select described by `config`
    pub fn init<P>(platform: &mut P, config: &ThermoConfig) -> Result<Self>
    where
        P: Platform<Spi = S, Gpio = G>,
    {
        let spi = platform.create_spi(
            SpiPins {
                sck: config.sck,
                miso: config.miso,
                mosi: config.mosi,
            },
            SpiConfig {
                frequency: config.spi_speed,
                mode: config.spi_mode,
                ..SpiConfig::default()
            },
        )?;
        let cs = platform.create_gpio(config.cs, GpioMode::OutputPushPull)?;
        crate::log_info!("Thermo Click ready");
        Self::new(spi, cs, config.cs_polarity)
    }

    /// Wrap an already configured bus and chip select
    pub fn new(spi: S, cs: G, polarity: ChipSelectPolarity) -> Result<Self> {
        Ok(Self {
            dev: SpiDevice::new(spi, cs, polarity)?,
        })
    }

    /// Generic read inside one chip-select frame
    pub fn generic_read(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.dev.read(buffer)
    }

    /// Read the raw 32-bit frame
    pub fn read_raw(&mut self) -> Result<u32> {
        let mut frame = [0u8; 4];
        self.dev.read(&mut frame)?;
        Ok(be_u32(frame))
    }

    /// Thermocouple temperature in °C
    ///
    /// # Errors
    ///
    /// `SenseError::Fault` with the fault bits when the chip flags the
    /// thermocouple as faulty; the temperature field is meaningless then.
    pub fn get_temperature(&mut self) -> core::result::Result<f32, SenseError> {
        let raw = self.read_raw()?;
        if raw & FAULT_BIT != 0 {
            let bits = (raw & FAULT_MASK) as u8;
            crate::log_warn!("Thermocouple fault: {}", bits);
            return Err(SenseError::Fault(bits));
        }
        Ok(thermocouple_celsius(raw))
    }

    /// Cold-junction (die) temperature in °C
    pub fn get_junction_temperature(&mut self) -> core::result::Result<f32, SenseError> {
        let raw = self.read_raw()?;
        Ok(junction_celsius(raw))
    }

    /// Fault conditions reported by the last conversion (empty when healthy)
    pub fn check_fault(&mut self) -> core::result::Result<ThermoFault, SenseError> {
        let raw = self.read_raw()?;
        if raw & FAULT_BIT == 0 {
            return Ok(ThermoFault::empty());
        }
        Ok(ThermoFault::from_bits_truncate((raw & FAULT_MASK) as u8))
    }

    /// Underlying bus
    pub fn spi_mut(&mut self) -> &mut S {
        self.dev.bus_mut()
    }
}

fn thermocouple_celsius(raw: u32) -> f32 {
    sign_extend(raw >> 18, 14) as f32 * THERMOCOUPLE_LSB
}

fn junction_celsius(raw: u32) -> f32 {
    sign_extend((raw >> 4) & 0x0FFF, 12) as f32 * JUNCTION_LSB
}

impl<S: SpiInterface, G: GpioInterface> ClickDriver for Thermo<S, G> {
    fn name(&self) -> &'static str {
        "Thermo Click"
    }
}

impl<S: SpiInterface, G: GpioInterface> Sensor for Thermo<S, G> {
    fn unit(&self) -> &'static str {
        "°C"
    }

    fn read(&mut self) -> core::result::Result<f32, SenseError> {
        self.get_temperature()
    }
}
