//! RTC 2 Click driver (Maxim DS1307)
//!
//! Battery-backed real-time clock on I2C with 56 bytes of NVRAM. Time and
//! date registers are packed BCD; bit 7 of the seconds register is the
//! clock-halt flag and bit 6 of the hours register selects 12-hour mode.

use super::{
    bus::RegisterDevice,
    convert::{bcd_to_dec, dec_to_bcd},
    error::{ActuateError, SenseError},
    traits::ClickDriver,
};
use crate::platform::{
    traits::{I2cConfig, I2cInterface, I2cPins, I2cSpeed, MikrobusPinout, PinName, Platform},
    Result,
};

/// Fixed 7-bit slave address
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// NVRAM size in bytes
pub const RAM_SIZE: usize = 56;

const REG_SECONDS: u8 = 0x00;
const REG_DAY_OF_WEEK: u8 = 0x03;
const REG_CONTROL: u8 = 0x07;
const REG_RAM: u8 = 0x08;

const SECONDS_CLOCK_HALT: u8 = 1 << 7;
const HOURS_12H_MODE: u8 = 1 << 6;
const HOURS_PM: u8 = 1 << 5;

const CONTROL_OUT: u8 = 1 << 7;
const CONTROL_SQWE: u8 = 1 << 4;

/// Reasons an RTC request is rejected before reaching the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rtc2Fault {
    /// Hours, minutes or seconds out of range
    Time,
    /// Day, month, year or weekday out of range
    Date,
    /// Access past the end of NVRAM
    RamBounds,
}

/// Result of an RTC 2 write
pub type Rtc2Result<T> = core::result::Result<T, ActuateError<Rtc2Fault>>;

/// Time of day, 24-hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcTime {
    /// 0..=23
    pub hours: u8,
    /// 0..=59
    pub minutes: u8,
    /// 0..=59
    pub seconds: u8,
}

impl RtcTime {
    fn is_valid(&self) -> bool {
        self.hours < 24 && self.minutes < 60 && self.seconds < 60
    }
}

/// Calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcDate {
    /// 1..=7, user-defined start of week
    pub day_of_week: u8,
    /// 1..=31
    pub day: u8,
    /// 1..=12
    pub month: u8,
    /// 2000..=2099
    pub year: u16,
}

impl RtcDate {
    fn is_valid(&self) -> bool {
        (1..=7).contains(&self.day_of_week)
            && (1..=31).contains(&self.day)
            && (1..=12).contains(&self.month)
            && (2000..=2099).contains(&self.year)
    }
}

/// SQW/OUT pin function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWave {
    /// Output disabled, pin held low
    OffLow,
    /// Output disabled, pin held high
    OffHigh,
    /// 1 Hz
    Hz1,
    /// 4.096 kHz
    Hz4096,
    /// 8.192 kHz
    Hz8192,
    /// 32.768 kHz
    Hz32768,
}

impl SquareWave {
    fn control_bits(self) -> u8 {
        match self {
            SquareWave::OffLow => 0,
            SquareWave::OffHigh => CONTROL_OUT,
            SquareWave::Hz1 => CONTROL_SQWE,
            SquareWave::Hz4096 => CONTROL_SQWE | 0b01,
            SquareWave::Hz8192 => CONTROL_SQWE | 0b10,
            SquareWave::Hz32768 => CONTROL_SQWE | 0b11,
        }
    }
}

/// RTC 2 Click configuration
#[derive(Debug, Clone, Copy)]
pub struct Rtc2Config {
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
    /// Bus speed (the DS1307 is standard-mode only)
    pub i2c_speed: I2cSpeed,
    /// Slave address
    pub i2c_address: u8,
}

impl Default for Rtc2Config {
    fn default() -> Self {
        Self {
            scl: PinName::Unconnected,
            sda: PinName::Unconnected,
            i2c_speed: I2cSpeed::Standard,
            i2c_address: DEFAULT_ADDRESS,
        }
    }
}

impl Rtc2Config {
    /// Take the I2C pins from a MikroBUS socket
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.scl = pinout.scl;
        self.sda = pinout.sda;
    }
}

/// RTC 2 Click driver
pub struct Rtc2<I: I2cInterface> {
    dev: RegisterDevice<I>,
}

impl<I: I2cInterface> Rtc2<I> {
    /// Open the I2C bus
    pub fn init<P>(platform: &mut P, config: &Rtc2Config) -> Result<Self>
    where
        P: Platform<I2c = I>,
    {
        let i2c = platform.create_i2c(
            I2cPins {
                scl: config.scl,
                sda: config.sda,
            },
            I2cConfig::with_speed(config.i2c_speed),
        )?;
        crate::log_info!("RTC 2 Click ready");
        Ok(Self::new(i2c, config.i2c_address))
    }

    /// Wrap an already configured bus
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            dev: RegisterDevice::new(i2c, address),
        }
    }

    /// Generic register write
    pub fn generic_write(&mut self, reg: u8, data: &[u8]) -> Result<()> {
        self.dev.write_register(reg, data)
    }

    /// Generic register read
    pub fn generic_read(&mut self, reg: u8, data: &mut [u8]) -> Result<()> {
        self.dev.read_register(reg, data)
    }

    /// Current time, normalised to 24-hour
    pub fn get_time(&mut self) -> core::result::Result<RtcTime, SenseError> {
        let mut regs = [0u8; 3];
        self.dev.read_register(REG_SECONDS, &mut regs)?;

        let hours_reg = regs[2];
        let hours = if hours_reg & HOURS_12H_MODE != 0 {
            let h12 = bcd_to_dec(hours_reg & 0x1F) % 12;
            if hours_reg & HOURS_PM != 0 {
                h12 + 12
            } else {
                h12
            }
        } else {
            bcd_to_dec(hours_reg & 0x3F)
        };

        Ok(RtcTime {
            hours,
            minutes: bcd_to_dec(regs[1] & 0x7F),
            seconds: bcd_to_dec(regs[0] & 0x7F),
        })
    }

    /// Set the time in 24-hour mode, keeping the clock-halt flag as it was
    pub fn set_time(&mut self, time: RtcTime) -> Rtc2Result<()> {
        if !time.is_valid() {
            return Err(ActuateError::Invalid(Rtc2Fault::Time));
        }
        let halt = self.dev.read_u8(REG_SECONDS)? & SECONDS_CLOCK_HALT;
        self.dev.write_register(
            REG_SECONDS,
            &[
                halt | dec_to_bcd(time.seconds),
                dec_to_bcd(time.minutes),
                dec_to_bcd(time.hours),
            ],
        )?;
        Ok(())
    }

    /// Current date
    pub fn get_date(&mut self) -> core::result::Result<RtcDate, SenseError> {
        let mut regs = [0u8; 4];
        self.dev.read_register(REG_DAY_OF_WEEK, &mut regs)?;
        Ok(RtcDate {
            day_of_week: regs[0] & 0x07,
            day: bcd_to_dec(regs[1] & 0x3F),
            month: bcd_to_dec(regs[2] & 0x1F),
            year: 2000 + bcd_to_dec(regs[3]) as u16,
        })
    }

    /// Set the date
    pub fn set_date(&mut self, date: RtcDate) -> Rtc2Result<()> {
        if !date.is_valid() {
            return Err(ActuateError::Invalid(Rtc2Fault::Date));
        }
        self.dev.write_register(
            REG_DAY_OF_WEEK,
            &[
                date.day_of_week,
                dec_to_bcd(date.day),
                dec_to_bcd(date.month),
                dec_to_bcd((date.year - 2000) as u8),
            ],
        )?;
        Ok(())
    }

    fn update_seconds(&mut self, halt: bool) -> Result<()> {
        let seconds = self.dev.read_u8(REG_SECONDS)?;
        let next = if halt {
            seconds | SECONDS_CLOCK_HALT
        } else {
            seconds & !SECONDS_CLOCK_HALT
        };
        self.dev.write_u8(REG_SECONDS, next)
    }

    /// Start the oscillator
    pub fn enable_counting(&mut self) -> Result<()> {
        self.update_seconds(false)
    }

    /// Halt the oscillator; time registers freeze
    pub fn disable_counting(&mut self) -> Result<()> {
        self.update_seconds(true)
    }

    /// Whether the oscillator is running
    pub fn is_counting(&mut self) -> Result<bool> {
        Ok(self.dev.read_u8(REG_SECONDS)? & SECONDS_CLOCK_HALT == 0)
    }

    /// Configure the SQW/OUT pin
    pub fn set_square_wave(&mut self, mode: SquareWave) -> Result<()> {
        self.dev.write_u8(REG_CONTROL, mode.control_bits())
    }

    fn check_ram(offset: u8, len: usize) -> Rtc2Result<()> {
        if offset as usize + len > RAM_SIZE {
            crate::log_warn!("RTC RAM access out of bounds at {}", offset);
            return Err(ActuateError::Invalid(Rtc2Fault::RamBounds));
        }
        Ok(())
    }

    /// Write `data` into NVRAM starting at `offset`
    pub fn write_ram(&mut self, offset: u8, data: &[u8]) -> Rtc2Result<()> {
        Self::check_ram(offset, data.len())?;
        self.dev.write_register(REG_RAM + offset, data)?;
        Ok(())
    }

    /// Read NVRAM starting at `offset` into `data`
    pub fn read_ram(&mut self, offset: u8, data: &mut [u8]) -> Rtc2Result<()> {
        Self::check_ram(offset, data.len())?;
        self.dev.read_register(REG_RAM + offset, data)?;
        Ok(())
    }

    /// Underlying bus
    pub fn i2c_mut(&mut self) -> &mut I {
        self.dev.bus_mut()
    }
}

impl<I: I2cInterface> ClickDriver for Rtc2<I> {
    fn name(&self) -> &'static str {
        "RTC 2 Click"
    }
}
