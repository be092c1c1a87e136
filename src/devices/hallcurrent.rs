//! Hall Current Click driver (Allegro ACS711-class sensor)
//!
//! Analog output centred on half the supply, moving linearly with current.
//! The open-drain fault output is wired to INT and pulls low on overcurrent.

use super::{
    error::{ActuateError, SenseError},
    traits::{ClickDriver, Sensor},
};
use crate::platform::{
    traits::{
        AdcConfig, AnalogInInterface, GpioInterface, GpioMode, MikrobusPinout, PinName, Platform,
        TimerInterface,
    },
    Result,
};

/// Sensitivity of the 15.5 A part at 3.3 V supply, V/A
pub const DEFAULT_SENSITIVITY: f32 = 0.090;

/// Output at zero current for a 3.3 V supply
pub const DEFAULT_ZERO_OFFSET: f32 = 1.65;

/// Rejected calibration parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HallCurrentFault {
    /// Sensitivity must be positive and finite
    Sensitivity,
    /// Zero calibration needs at least one sample
    SampleCount,
}

/// Hall Current Click configuration
#[derive(Debug, Clone, Copy)]
pub struct HallCurrentConfig {
    /// Analog output
    pub an: PinName,
    /// Overcurrent fault (active low)
    pub int: PinName,
    /// ADC setup
    pub adc: AdcConfig,
    /// Sensor sensitivity in V/A
    pub sensitivity: f32,
    /// Output voltage at zero current
    pub zero_offset: f32,
}

impl Default for HallCurrentConfig {
    fn default() -> Self {
        Self {
            an: PinName::Unconnected,
            int: PinName::Unconnected,
            adc: AdcConfig::default(),
            sensitivity: DEFAULT_SENSITIVITY,
            zero_offset: DEFAULT_ZERO_OFFSET,
        }
    }
}

impl HallCurrentConfig {
    /// Take AN and INT from a MikroBUS socket
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.an = pinout.an;
        self.int = pinout.int;
    }
}

/// Hall Current Click driver
pub struct HallCurrent<A: AnalogInInterface, G: GpioInterface> {
    adc: A,
    fault: G,
    sensitivity: f32,
    zero_offset: f32,
}

impl<A: AnalogInInterface, G: GpioInterface> HallCurrent<A, G> {
    /// Open the analog channel and fault input
    pub fn init<P>(platform: &mut P, config: &HallCurrentConfig) -> Result<Self>
    where
        P: Platform<Adc = A, Gpio = G>,
    {
        let adc = platform.create_adc(config.an, config.adc)?;
        let fault = platform.create_gpio(config.int, GpioMode::InputPullUp)?;
        crate::log_info!("Hall Current Click ready");
        Ok(Self::new(adc, fault, config.sensitivity, config.zero_offset))
    }

    /// Wrap an already configured ADC channel and fault input
    pub fn new(adc: A, fault: G, sensitivity: f32, zero_offset: f32) -> Self {
        Self {
            adc,
            fault,
            sensitivity,
            zero_offset,
        }
    }

    /// Raw ADC counts
    pub fn read_raw(&mut self) -> Result<u16> {
        self.adc.read_raw()
    }

    /// Sensor output in volts
    pub fn read_voltage(&mut self) -> Result<f32> {
        self.adc.read_voltage()
    }

    /// Current in amperes
    pub fn get_current(&mut self) -> core::result::Result<f32, SenseError> {
        let volts = self.adc.read_voltage()?;
        Ok((volts - self.zero_offset) / self.sensitivity)
    }

    /// Average `samples` readings taken `interval_ms` apart and use the
    /// result as the zero-current output. Call with no load connected.
    pub fn calibrate_zero<T: TimerInterface>(
        &mut self,
        timer: &mut T,
        samples: u16,
        interval_ms: u32,
    ) -> core::result::Result<f32, ActuateError<HallCurrentFault>> {
        if samples == 0 {
            return Err(ActuateError::Invalid(HallCurrentFault::SampleCount));
        }

        let mut sum = 0.0f32;
        for i in 0..samples {
            if i > 0 {
                timer.delay_ms(interval_ms)?;
            }
            sum += self.adc.read_voltage()?;
        }
        self.zero_offset = sum / samples as f32;
        crate::log_debug!("Hall current zero offset {} V", self.zero_offset);
        Ok(self.zero_offset)
    }

    /// Change the ADC reference voltage
    pub fn set_vref(&mut self, vref: f32) -> Result<()> {
        self.adc.set_vref(vref)
    }

    /// Change the sensor sensitivity (V/A)
    pub fn set_sensitivity(
        &mut self,
        sensitivity: f32,
    ) -> core::result::Result<(), ActuateError<HallCurrentFault>> {
        if !sensitivity.is_finite() || sensitivity <= 0.0 {
            return Err(ActuateError::Invalid(HallCurrentFault::Sensitivity));
        }
        self.sensitivity = sensitivity;
        Ok(())
    }

    /// Zero-current output currently applied
    pub fn zero_offset(&self) -> f32 {
        self.zero_offset
    }

    /// Whether the sensor is signalling overcurrent
    pub fn overcurrent(&self) -> bool {
        !self.fault.read()
    }

    /// Underlying ADC channel
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

impl<A: AnalogInInterface, G: GpioInterface> ClickDriver for HallCurrent<A, G> {
    fn name(&self) -> &'static str {
        "Hall Current Click"
    }
}

impl<A: AnalogInInterface, G: GpioInterface> Sensor for HallCurrent<A, G> {
    fn unit(&self) -> &'static str {
        "A"
    }

    fn read(&mut self) -> core::result::Result<f32, SenseError> {
        self.get_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{AdcError, PlatformError};
    use crate::platform::mock::{MockAdc, MockGpio, MockPlatform, MockTimer};
    use crate::platform::traits::MikrobusSocket;

    fn sensor() -> HallCurrent<MockAdc, MockGpio> {
        let mut fault = MockGpio::new(GpioMode::InputPullUp);
        fault.set_input_state(true);
        HallCurrent::new(
            MockAdc::new(AdcConfig::default()),
            fault,
            DEFAULT_SENSITIVITY,
            DEFAULT_ZERO_OFFSET,
        )
    }

    #[test]
    fn test_zero_current_at_offset() {
        let mut hc = sensor();
        hc.adc_mut().set_raw(2048);
        // 2048/4095 * 3.3 is 0.4 mV above 1.65 V
        assert!(hc.get_current().unwrap().abs() < 0.01);
    }

    #[test]
    fn test_current_is_linear() {
        let mut hc = sensor();
        hc.adc_mut().set_voltage(1.65 + 0.9);
        assert!((hc.get_current().unwrap() - 10.0).abs() < 0.02);

        hc.adc_mut().set_voltage(1.65 - 0.45);
        assert!((hc.read().unwrap() + 5.0).abs() < 0.02);
    }

    #[test]
    fn test_calibrate_zero_averages_samples() {
        let mut hc = sensor();
        let mut timer = MockTimer::new();
        hc.adc_mut().set_voltage(1.70);

        let offset = hc.calibrate_zero(&mut timer, 4, 10).unwrap();
        assert!((offset - 1.70).abs() < 0.001);
        assert_eq!(hc.adc_mut().conversions(), 4);
        assert_eq!(timer.delay_calls(), 3);
        assert!(hc.get_current().unwrap().abs() < 0.02);
    }

    #[test]
    fn test_calibrate_zero_rejects_no_samples() {
        let mut hc = sensor();
        let mut timer = MockTimer::new();
        assert_eq!(
            hc.calibrate_zero(&mut timer, 0, 10),
            Err(ActuateError::Invalid(HallCurrentFault::SampleCount))
        );
        assert_eq!(hc.adc_mut().conversions(), 0);
    }

    #[test]
    fn test_set_sensitivity_validates() {
        let mut hc = sensor();
        assert!(hc.set_sensitivity(0.185).is_ok());
        assert_eq!(
            hc.set_sensitivity(0.0),
            Err(ActuateError::Invalid(HallCurrentFault::Sensitivity))
        );
        assert_eq!(
            hc.set_sensitivity(f32::NAN),
            Err(ActuateError::Invalid(HallCurrentFault::Sensitivity))
        );
    }

    #[test]
    fn test_set_vref_passes_to_adc() {
        let mut hc = sensor();
        hc.set_vref(5.0).unwrap();
        hc.adc_mut().set_raw(4095);
        assert!((hc.read_voltage().unwrap() - 5.0).abs() < 1e-4);
        assert_eq!(
            hc.set_vref(-1.0),
            Err(PlatformError::Adc(AdcError::InvalidReference))
        );
    }

    #[test]
    fn test_overcurrent_pin_is_stable() {
        let mut hc = sensor();
        assert!(!hc.overcurrent());
        assert!(!hc.overcurrent());

        hc.fault.set_input_state(false);
        assert!(hc.overcurrent());
        assert!(hc.overcurrent());
    }

    #[test]
    fn test_init_requires_analog_pin() {
        let mut platform = MockPlatform::new();
        let result = HallCurrent::init(&mut platform, &HallCurrentConfig::default());
        assert!(matches!(
            result,
            Err(PlatformError::Adc(AdcError::InvalidPin))
        ));
    }

    #[test]
    fn test_init_mapped() {
        let mut platform = MockPlatform::new();
        let mut config = HallCurrentConfig::default();
        config.map_mikrobus(&platform.mikrobus(MikrobusSocket::One));

        let hc = HallCurrent::init(&mut platform, &config).unwrap();
        assert!(platform.is_claimed(26));
        assert!(platform.is_claimed(7));
        assert_eq!(hc.fault.mode(), GpioMode::InputPullUp);
    }
}
