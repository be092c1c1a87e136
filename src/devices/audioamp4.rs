//! Audio Amp 4 Click driver
//!
//! Stereo class-D amplifier with an 8-way input selector and a 32-step
//! volume control on I2C. A SHDN line (active low, on the socket's RST pin)
//! powers the amplifier down; the register file is only reachable while it
//! is awake.
//!
//! Register map:
//!
//! | Addr | Bits | Content                |
//! |------|------|------------------------|
//! | 0x00 | 2..0 | Input channel          |
//! | 0x00 | 6    | Mute                   |
//! | 0x01 | 4..0 | Volume step (0 = min)  |

use super::{bus::RegisterDevice, error::ActuateError, traits::ClickDriver};
use crate::platform::{
    traits::{
        GpioInterface, GpioMode, I2cConfig, I2cInterface, I2cPins, I2cSpeed, MikrobusPinout,
        PinName, Platform,
    },
    Result,
};

/// Default 7-bit slave address
pub const DEFAULT_ADDRESS: u8 = 0x6C;

/// Highest selectable input channel
pub const MAX_CHANNEL: u8 = 7;

/// Highest volume step
pub const MAX_VOLUME: u8 = 31;

const REG_MODE: u8 = 0x00;
const REG_VOLUME: u8 = 0x01;
const MODE_CHANNEL_MASK: u8 = 0x07;
const MODE_MUTE: u8 = 1 << 6;

/// Reasons an Audio Amp 4 request is rejected before reaching the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioAmp4Fault {
    /// Channel above [`MAX_CHANNEL`]
    Channel,
    /// Volume above [`MAX_VOLUME`]
    Volume,
    /// Amplifier is shut down
    Shutdown,
}

/// Result of an Audio Amp 4 operation
pub type AudioAmp4Result<T> = core::result::Result<T, ActuateError<AudioAmp4Fault>>;

/// Audio Amp 4 Click configuration
#[derive(Debug, Clone, Copy)]
pub struct AudioAmp4Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Shutdown (active low)
    pub shdn: PinName,
    /// Bus speed
    pub i2c_speed: I2cSpeed,
    /// Slave address
    pub i2c_address: u8,
}

impl Default for AudioAmp4Config {
    fn default() -> Self {
        Self {
            scl: PinName::Unconnected,
            sda: PinName::Unconnected,
            shdn: PinName::Unconnected,
            i2c_speed: I2cSpeed::Standard,
            i2c_address: DEFAULT_ADDRESS,
        }
    }
}

impl AudioAmp4Config {
    /// Take I2C and SHDN (RST position) from a MikroBUS socket
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.scl = pinout.scl;
        self.sda = pinout.sda;
        self.shdn = pinout.rst;
    }
}

/// Audio Amp 4 Click driver
///
/// Keeps a shadow of the mode register so channel and mute changes are a
/// single write.
pub struct AudioAmp4<I: I2cInterface, G: GpioInterface> {
    dev: RegisterDevice<I>,
    shdn: G,
    mode: u8,
    volume: u8,
}

impl<I: I2cInterface, G: GpioInterface> AudioAmp4<I, G> {
    /// Open the I2C bus and SHDN line; leaves the amplifier awake
    pub fn init<P>(platform: &mut P, config: &AudioAmp4Config) -> Result<Self>
    where
        P: Platform<I2c = I, Gpio = G>,
    {
        let i2c = platform.create_i2c(
            I2cPins {
                scl: config.scl,
                sda: config.sda,
            },
            I2cConfig::with_speed(config.i2c_speed),
        )?;
        let shdn = platform.create_gpio(config.shdn, GpioMode::OutputPushPull)?;
        let amp = Self::new(i2c, shdn, config.i2c_address)?;
        crate::log_info!("Audio Amp 4 Click ready");
        Ok(amp)
    }

    /// Wrap an already configured bus and SHDN output
    pub fn new(i2c: I, mut shdn: G, address: u8) -> Result<Self> {
        shdn.set_high()?;
        Ok(Self {
            dev: RegisterDevice::new(i2c, address),
            shdn,
            mode: 0,
            volume: 0,
        })
    }

    /// Write the power-on defaults: channel 0, unmuted, volume 0
    pub fn default_cfg(&mut self) -> AudioAmp4Result<()> {
        self.ensure_awake()?;
        self.dev.write_u8(REG_MODE, 0)?;
        self.dev.write_u8(REG_VOLUME, 0)?;
        self.mode = 0;
        self.volume = 0;
        Ok(())
    }

    /// Generic register write
    pub fn generic_write(&mut self, reg: u8, data: &[u8]) -> Result<()> {
        self.dev.write_register(reg, data)
    }

    /// Generic register read
    pub fn generic_read(&mut self, reg: u8, data: &mut [u8]) -> Result<()> {
        self.dev.read_register(reg, data)
    }

    fn ensure_awake(&self) -> AudioAmp4Result<()> {
        if self.is_shutdown() {
            crate::log_warn!("Audio Amp 4 is shut down");
            return Err(ActuateError::Invalid(AudioAmp4Fault::Shutdown));
        }
        Ok(())
    }

    fn write_mode(&mut self, mode: u8) -> AudioAmp4Result<()> {
        self.dev.write_u8(REG_MODE, mode)?;
        self.mode = mode;
        Ok(())
    }

    /// Select input channel `0..=7`
    ///
    /// # Errors
    ///
    /// `ActuateError::Invalid(AudioAmp4Fault::Channel)` for channels above 7;
    /// nothing is written in that case.
    pub fn set_channel(&mut self, channel: u8) -> AudioAmp4Result<()> {
        if channel > MAX_CHANNEL {
            crate::log_warn!("Audio Amp 4 channel {} out of range", channel);
            return Err(ActuateError::Invalid(AudioAmp4Fault::Channel));
        }
        self.ensure_awake()?;
        self.write_mode((self.mode & !MODE_CHANNEL_MASK) | channel)
    }

    /// Currently selected channel
    pub fn channel(&self) -> u8 {
        self.mode & MODE_CHANNEL_MASK
    }

    /// Set volume step `0..=31`
    pub fn set_volume(&mut self, volume: u8) -> AudioAmp4Result<()> {
        if volume > MAX_VOLUME {
            crate::log_warn!("Audio Amp 4 volume {} out of range", volume);
            return Err(ActuateError::Invalid(AudioAmp4Fault::Volume));
        }
        self.ensure_awake()?;
        self.dev.write_u8(REG_VOLUME, volume)?;
        self.volume = volume;
        Ok(())
    }

    /// Current volume step
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Silence the output without losing the volume setting
    pub fn mute(&mut self) -> AudioAmp4Result<()> {
        self.ensure_awake()?;
        self.write_mode(self.mode | MODE_MUTE)
    }

    /// Restore output after [`AudioAmp4::mute`]
    pub fn unmute(&mut self) -> AudioAmp4Result<()> {
        self.ensure_awake()?;
        self.write_mode(self.mode & !MODE_MUTE)
    }

    /// Whether the output is muted
    pub fn is_muted(&self) -> bool {
        self.mode & MODE_MUTE != 0
    }

    /// Power the amplifier down
    pub fn shutdown(&mut self) -> Result<()> {
        self.shdn.set_low()
    }

    /// Power the amplifier up
    pub fn wake_up(&mut self) -> Result<()> {
        self.shdn.set_high()
    }

    /// Whether SHDN is asserted
    pub fn is_shutdown(&self) -> bool {
        !self.shdn.read()
    }

    /// Underlying bus
    pub fn i2c_mut(&mut self) -> &mut I {
        self.dev.bus_mut()
    }
}

impl<I: I2cInterface, G: GpioInterface> ClickDriver for AudioAmp4<I, G> {
    fn name(&self) -> &'static str {
        "Audio Amp 4 Click"
    }
}
