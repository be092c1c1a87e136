//! Air Velocity Click driver (Renesas FS3000-1005)
//!
//! Thermal mass-flow sensor on I2C. The device streams a 5-byte frame on
//! every read: a checksum byte, the 12-bit flow count big-endian, and two
//! filler bytes. The count is mapped to m/s through the datasheet's
//! piecewise-linear calibration curve.
//!
//! # Example
//!
//! ```ignore
//! let mut config = AirVelocityConfig::default();
//! config.map_mikrobus(&platform.mikrobus(MikrobusSocket::One));
//! let mut sensor = AirVelocity::init(&mut platform, &config)?;
//! let mps = sensor.get_air_velocity()?;
//! ```

use super::{
    bus::RegisterDevice,
    convert::{be_u16, LookupTable},
    error::SenseError,
    traits::{ClickDriver, Sensor},
};
use crate::platform::{
    traits::{I2cConfig, I2cInterface, I2cPins, I2cSpeed, MikrobusPinout, PinName, Platform},
    Result,
};

/// Default 7-bit slave address
pub const DEFAULT_ADDRESS: u8 = 0x28;

/// Frame length in bytes
pub const FRAME_LEN: usize = 5;

/// Mask of the valid flow-count bits
pub const OUTPUT_MASK: u16 = 0x0FFF;

/// FS3000-1005 calibration breakpoints (raw counts)
pub const CALIBRATION_COUNTS: [u16; 9] = [409, 915, 1522, 2066, 2523, 2908, 3256, 3572, 3686];

/// FS3000-1005 calibration values (m/s)
pub const CALIBRATION_MPS: [f32; 9] = [0.0, 1.07, 2.01, 3.00, 3.97, 4.96, 5.98, 6.99, 7.23];

const CALIBRATION: LookupTable<'static> =
    LookupTable::from_static(&CALIBRATION_COUNTS, &CALIBRATION_MPS);

/// Air Velocity Click configuration
#[derive(Debug, Clone, Copy)]
pub struct AirVelocityConfig {
    /// I2C clock pin
    pub scl: PinName,
    /// I2C data pin
    pub sda: PinName,
    /// Bus speed
    pub i2c_speed: I2cSpeed,
    /// Slave address
    pub i2c_address: u8,
}

impl Default for AirVelocityConfig {
    fn default() -> Self {
        Self {
            scl: PinName::Unconnected,
            sda: PinName::Unconnected,
            i2c_speed: I2cSpeed::Standard,
            i2c_address: DEFAULT_ADDRESS,
        }
    }
}

impl AirVelocityConfig {
    /// Take the I2C pins from a MikroBUS socket
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.scl = pinout.scl;
        self.sda = pinout.sda;
    }
}

/// Air Velocity Click driver
pub struct AirVelocity<I: I2cInterface> {
    dev: RegisterDevice<I>,
}

impl<I: I2cInterface> AirVelocity<I> {
    /// Open the I2C bus described by `config`
    ///
    /// # Errors
    ///
    /// Returns the platform's I2C error when the pins are not mapped or
    /// already in use.
    pub fn init<P>(platform: &mut P, config: &AirVelocityConfig) -> Result<Self>
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
        crate::log_info!("Air Velocity Click ready at {}", config.i2c_address);
        Ok(Self::new(i2c, config.i2c_address))
    }

    /// Wrap an already configured bus
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            dev: RegisterDevice::new(i2c, address),
        }
    }

    /// Generic read of `buffer.len()` bytes from the device
    pub fn generic_read(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.dev.read_raw(buffer)
    }

    /// Read one frame and return the 12-bit flow count
    ///
    /// # Errors
    ///
    /// `SenseError::Checksum` when the frame bytes do not sum to zero.
    pub fn read_output(&mut self) -> core::result::Result<u16, SenseError> {
        let mut frame = [0u8; FRAME_LEN];
        self.dev.read_raw(&mut frame)?;

        let sum = frame.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        if sum != 0 {
            crate::log_warn!("Air velocity frame checksum mismatch: {}", sum);
            return Err(SenseError::Checksum {
                expected: 0,
                actual: sum,
            });
        }

        Ok(be_u16(frame[1], frame[2]) & OUTPUT_MASK)
    }

    /// Convert a flow count to m/s
    pub fn convert_output(raw: u16) -> f32 {
        CALIBRATION.interpolate(raw)
    }

    /// Read and convert in one step
    pub fn get_air_velocity(&mut self) -> core::result::Result<f32, SenseError> {
        let raw = self.read_output()?;
        Ok(Self::convert_output(raw))
    }

    /// Underlying bus
    pub fn i2c_mut(&mut self) -> &mut I {
        self.dev.bus_mut()
    }
}

impl<I: I2cInterface> ClickDriver for AirVelocity<I> {
    fn name(&self) -> &'static str {
        "Air Velocity Click"
    }
}

impl<I: I2cInterface> Sensor for AirVelocity<I> {
    fn unit(&self) -> &'static str {
        "m/s"
    }

    fn read(&mut self) -> core::result::Result<f32, SenseError> {
        self.get_air_velocity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{I2cError, PlatformError};
    use crate::platform::mock::{I2cTransaction, MockI2c, MockPlatform};
    use crate::platform::traits::MikrobusSocket;

    /// Frame for `count` with a valid checksum byte
    fn frame(count: u16) -> [u8; FRAME_LEN] {
        let mut f = [0u8, (count >> 8) as u8, count as u8, 0x00, 0x00];
        let sum = f.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        f[0] = 0u8.wrapping_sub(sum);
        f
    }

    fn sensor() -> AirVelocity<MockI2c> {
        AirVelocity::new(MockI2c::new(I2cConfig::default()), DEFAULT_ADDRESS)
    }

    #[test]
    fn test_convert_clamps_below_table() {
        assert_eq!(AirVelocity::<MockI2c>::convert_output(300), 0.0);
        assert_eq!(AirVelocity::<MockI2c>::convert_output(409), 0.0);
    }

    #[test]
    fn test_convert_clamps_above_table() {
        assert_eq!(AirVelocity::<MockI2c>::convert_output(4000), 7.23);
        assert_eq!(AirVelocity::<MockI2c>::convert_output(3686), 7.23);
    }

    #[test]
    fn test_convert_hits_breakpoints() {
        assert!((AirVelocity::<MockI2c>::convert_output(915) - 1.07).abs() < 1e-6);
        assert!((AirVelocity::<MockI2c>::convert_output(1522) - 2.01).abs() < 1e-6);
    }

    #[test]
    fn test_convert_interpolates_midpoint() {
        // Halfway between 915 (1.07) and 1522 (2.01)
        let mid = AirVelocity::<MockI2c>::convert_output(1218);
        let expected = 1.07 + (2.01 - 1.07) * (1218.0 - 915.0) / (1522.0 - 915.0);
        assert!((mid - expected).abs() < 1e-5);
        assert!(mid > 1.07 && mid < 2.01);
    }

    #[test]
    fn test_read_output_masks_to_12_bits() {
        let mut sensor = sensor();
        sensor.i2c_mut().set_read_data(&frame(0xF5E0));

        assert_eq!(sensor.read_output().unwrap(), 0x05E0);
        assert_eq!(
            sensor.i2c_mut().transactions(),
            vec![I2cTransaction::Read {
                addr: DEFAULT_ADDRESS,
                len: FRAME_LEN
            }]
        );
    }

    #[test]
    fn test_read_output_rejects_bad_checksum() {
        let mut sensor = sensor();
        let mut bad = frame(1522);
        bad[3] = 0x01;
        sensor.i2c_mut().set_read_data(&bad);

        assert_eq!(
            sensor.read_output(),
            Err(SenseError::Checksum {
                expected: 0,
                actual: 1
            })
        );
    }

    #[test]
    fn test_get_air_velocity() {
        let mut sensor = sensor();
        sensor.i2c_mut().set_read_data(&frame(3686));
        assert_eq!(sensor.get_air_velocity().unwrap(), 7.23);
        assert_eq!(sensor.unit(), "m/s");
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut sensor = sensor();
        sensor.i2c_mut().set_fault(Some(I2cError::Nack));
        assert_eq!(
            sensor.read(),
            Err(SenseError::Bus(PlatformError::I2c(I2cError::Nack)))
        );
    }

    #[test]
    fn test_init_with_default_config_fails() {
        let mut platform = MockPlatform::new();
        let result = AirVelocity::init(&mut platform, &AirVelocityConfig::default());
        assert!(matches!(
            result,
            Err(PlatformError::I2c(I2cError::InvalidPins))
        ));
    }

    #[test]
    fn test_init_with_mapped_socket() {
        let mut platform = MockPlatform::new();
        let mut config = AirVelocityConfig::default();
        config.i2c_speed = I2cSpeed::Fast;
        config.map_mikrobus(&platform.mikrobus(MikrobusSocket::Two));

        let mut sensor = AirVelocity::init(&mut platform, &config).unwrap();
        assert_eq!(sensor.i2c_mut().frequency(), 400_000);
        assert!(platform.is_claimed(23));
        assert!(platform.is_claimed(22));
    }
}
