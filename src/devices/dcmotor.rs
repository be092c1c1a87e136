//! DC Motor Click driver
//!
//! Single brushed-motor H-bridge. Speed comes from the PWM line, direction
//! from IN1/IN2, SLP (active low) parks the bridge and nFAULT reports
//! over-current or over-temperature.
//!
//! ## Truth Table
//!
//! | IN1 | IN2 | PWM        | Motor State                         |
//! |-----|-----|------------|-------------------------------------|
//! | 0   | 0   | 0          | Coast (outputs High-Z)              |
//! | 1   | 0   | \|speed\|  | Forward                             |
//! | 0   | 1   | \|speed\|  | Reverse                             |
//! | 1   | 1   | 1          | Brake (both terminals shorted)      |

use super::{error::ActuateError, traits::ClickDriver};
use crate::platform::{
    traits::{
        GpioInterface, GpioMode, MikrobusPinout, PinName, Platform, PwmConfig, PwmInterface,
    },
    Result,
};

/// Log every Nth speed update
const SPEED_LOG_INTERVAL: u32 = 100;

/// Reasons a motor request is rejected before touching the pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DcMotorFault {
    /// Speed outside [-1.0, +1.0]
    Speed,
    /// Bridge is in sleep mode
    Sleeping,
}

/// Result of a DC Motor operation
pub type DcMotorResult<T> = core::result::Result<T, ActuateError<DcMotorFault>>;

/// Bridge state after the last command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// Freewheeling
    Coast,
    /// Driving forward
    Forward,
    /// Driving in reverse
    Reverse,
    /// Short brake
    Brake,
}

/// DC Motor Click configuration
#[derive(Debug, Clone, Copy)]
pub struct DcMotorConfig {
    /// Speed PWM
    pub pwm: PinName,
    /// Bridge input 1
    pub in1: PinName,
    /// Bridge input 2
    pub in2: PinName,
    /// Sleep (active low)
    pub slp: PinName,
    /// Fault output (active low)
    pub fault: PinName,
    /// PWM frequency in Hz
    pub pwm_frequency: u32,
}

impl Default for DcMotorConfig {
    fn default() -> Self {
        Self {
            pwm: PinName::Unconnected,
            in1: PinName::Unconnected,
            in2: PinName::Unconnected,
            slp: PinName::Unconnected,
            fault: PinName::Unconnected,
            pwm_frequency: 5_000,
        }
    }
}

impl DcMotorConfig {
    /// Take the motor lines from a MikroBUS socket
    ///
    /// IN1 sits on AN, IN2 on RST, SLP on CS and nFAULT on INT.
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.pwm = pinout.pwm;
        self.in1 = pinout.an;
        self.in2 = pinout.rst;
        self.slp = pinout.cs;
        self.fault = pinout.int;
    }
}

/// DC Motor Click driver
pub struct DcMotor<P: PwmInterface, G: GpioInterface> {
    pwm: P,
    in1: G,
    in2: G,
    slp: G,
    fault: G,
    state: MotorState,
    updates: u32,
}

impl<P: PwmInterface, G: GpioInterface> DcMotor<P, G> {
    /// Open the PWM and control lines; the bridge starts awake and coasting
    pub fn init<PL>(platform: &mut PL, config: &DcMotorConfig) -> Result<Self>
    where
        PL: Platform<Pwm = P, Gpio = G>,
    {
        let pwm = platform.create_pwm(
            config.pwm,
            PwmConfig {
                frequency: config.pwm_frequency,
                duty_cycle: 0.0,
            },
        )?;
        let in1 = platform.create_gpio(config.in1, GpioMode::OutputPushPull)?;
        let in2 = platform.create_gpio(config.in2, GpioMode::OutputPushPull)?;
        let slp = platform.create_gpio(config.slp, GpioMode::OutputPushPull)?;
        let fault = platform.create_gpio(config.fault, GpioMode::InputPullUp)?;

        let mut motor = Self::new(pwm, in1, in2, slp, fault);
        motor.coast()?;
        motor.wake()?;
        crate::log_info!("DC Motor Click ready");
        Ok(motor)
    }

    /// Wrap already configured lines without driving them
    pub fn new(pwm: P, in1: G, in2: G, slp: G, fault: G) -> Self {
        Self {
            pwm,
            in1,
            in2,
            slp,
            fault,
            state: MotorState::Coast,
            updates: 0,
        }
    }

    fn drive(&mut self, in1: bool, in2: bool, duty: f32) -> Result<()> {
        self.in1.write(in1)?;
        self.in2.write(in2)?;
        self.pwm.set_duty_cycle(duty)?;
        if duty > 0.0 {
            self.pwm.enable();
        } else {
            self.pwm.disable();
        }
        Ok(())
    }

    /// Set speed and direction, `-1.0..=1.0`; zero coasts
    ///
    /// # Errors
    ///
    /// `DcMotorFault::Speed` for out-of-range or NaN input and
    /// `DcMotorFault::Sleeping` while the bridge sleeps. No pin changes in
    /// either case.
    pub fn set_speed(&mut self, speed: f32) -> DcMotorResult<()> {
        if !(-1.0..=1.0).contains(&speed) {
            return Err(ActuateError::Invalid(DcMotorFault::Speed));
        }
        if self.is_sleeping() {
            return Err(ActuateError::Invalid(DcMotorFault::Sleeping));
        }

        if self.updates % SPEED_LOG_INTERVAL == 0 {
            crate::log_debug!("Motor set_speed: {}", speed);
        }
        self.updates = self.updates.wrapping_add(1);

        if speed > 0.0 {
            self.drive(true, false, speed)?;
            self.state = MotorState::Forward;
        } else if speed < 0.0 {
            self.drive(false, true, -speed)?;
            self.state = MotorState::Reverse;
        } else {
            self.coast()?;
        }
        Ok(())
    }

    /// Let the motor freewheel
    pub fn coast(&mut self) -> Result<()> {
        self.drive(false, false, 0.0)?;
        self.state = MotorState::Coast;
        Ok(())
    }

    /// Short both motor terminals
    pub fn brake(&mut self) -> Result<()> {
        self.drive(true, true, 1.0)?;
        self.state = MotorState::Brake;
        Ok(())
    }

    /// Put the bridge to sleep (outputs High-Z)
    pub fn sleep(&mut self) -> Result<()> {
        self.coast()?;
        self.slp.set_low()
    }

    /// Wake the bridge
    pub fn wake(&mut self) -> Result<()> {
        self.slp.set_high()
    }

    /// Whether SLP is asserted
    pub fn is_sleeping(&self) -> bool {
        !self.slp.read()
    }

    /// Whether the bridge reports a fault
    pub fn fault(&self) -> bool {
        !self.fault.read()
    }

    /// State requested by the last command
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Underlying PWM channel
    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

impl<P: PwmInterface, G: GpioInterface> ClickDriver for DcMotor<P, G> {
    fn name(&self) -> &'static str {
        "DC Motor Click"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{PlatformError, PwmError};
    use crate::platform::mock::{MockGpio, MockPlatform, MockPwm, PwmEvent};
    use crate::platform::traits::MikrobusSocket;

    fn motor() -> DcMotor<MockPwm, MockGpio> {
        let mut fault = MockGpio::new(GpioMode::InputPullUp);
        fault.set_input_state(true);
        let mut slp = MockGpio::new_output();
        slp.set_high().unwrap();
        DcMotor::new(
            MockPwm::new(PwmConfig::default()),
            MockGpio::new_output(),
            MockGpio::new_output(),
            slp,
            fault,
        )
    }

    #[test]
    fn test_forward() {
        let mut m = motor();
        m.set_speed(0.75).unwrap();

        assert!(m.in1.read());
        assert!(!m.in2.read());
        assert_eq!(m.pwm.duty_cycle(), 0.75);
        assert!(m.pwm.is_enabled());
        assert_eq!(m.state(), MotorState::Forward);
    }

    #[test]
    fn test_reverse() {
        let mut m = motor();
        m.set_speed(-0.5).unwrap();

        assert!(!m.in1.read());
        assert!(m.in2.read());
        assert_eq!(m.pwm.duty_cycle(), 0.5);
        assert_eq!(m.state(), MotorState::Reverse);
    }

    #[test]
    fn test_zero_speed_coasts() {
        let mut m = motor();
        m.set_speed(1.0).unwrap();
        m.set_speed(0.0).unwrap();

        assert!(!m.in1.read());
        assert!(!m.in2.read());
        assert_eq!(m.pwm.duty_cycle(), 0.0);
        assert!(!m.pwm.is_enabled());
        assert_eq!(m.state(), MotorState::Coast);
    }

    #[test]
    fn test_brake() {
        let mut m = motor();
        m.brake().unwrap();

        assert!(m.in1.read());
        assert!(m.in2.read());
        assert_eq!(m.pwm.duty_cycle(), 1.0);
        assert_eq!(m.state(), MotorState::Brake);
    }

    #[test]
    fn test_pwm_sequence_follows_truth_table() {
        let mut m = motor();
        m.set_speed(0.4).unwrap();
        m.set_speed(-0.8).unwrap();
        m.brake().unwrap();
        m.coast().unwrap();

        assert_eq!(
            m.pwm.events(),
            [
                PwmEvent::Duty(0.4),
                PwmEvent::Enabled,
                PwmEvent::Duty(0.8),
                PwmEvent::Enabled,
                PwmEvent::Duty(1.0),
                PwmEvent::Enabled,
                PwmEvent::Duty(0.0),
                PwmEvent::Disabled,
            ]
        );
    }

    #[test]
    fn test_sleeping_motor_leaves_pwm_untouched() {
        let mut m = motor();
        m.sleep().unwrap();
        m.pwm.clear_events();

        assert!(m.set_speed(0.5).is_err());
        assert!(m.set_speed(2.0).is_err());
        assert!(m.pwm.events().is_empty());
    }

    #[test]
    fn test_invalid_speed_changes_nothing() {
        let mut m = motor();
        for speed in [1.5, -1.5, 2.0, f32::NAN] {
            assert_eq!(
                m.set_speed(speed),
                Err(ActuateError::Invalid(DcMotorFault::Speed))
            );
        }
        assert_eq!(m.in1.write_count(), 0);
        assert_eq!(m.in2.write_count(), 0);
    }

    #[test]
    fn test_sleep_blocks_speed() {
        let mut m = motor();
        m.sleep().unwrap();
        assert!(m.is_sleeping());
        assert_eq!(
            m.set_speed(0.3),
            Err(ActuateError::Invalid(DcMotorFault::Sleeping))
        );

        m.wake().unwrap();
        assert!(m.set_speed(0.3).is_ok());
    }

    #[test]
    fn test_fault_pin_read_is_idempotent() {
        let mut m = motor();
        assert!(!m.fault());
        assert!(!m.fault());

        m.fault.set_input_state(false);
        assert!(m.fault());
        assert!(m.fault());
    }

    #[test]
    fn test_init_without_pwm_pin() {
        let mut platform = MockPlatform::new();
        let result = DcMotor::init(&mut platform, &DcMotorConfig::default());
        assert!(matches!(
            result,
            Err(PlatformError::Pwm(PwmError::ChannelUnavailable))
        ));
    }

    #[test]
    fn test_init_mapped_starts_awake_and_coasting() {
        let mut platform = MockPlatform::new();
        let mut config = DcMotorConfig::default();
        config.map_mikrobus(&platform.mikrobus(MikrobusSocket::Two));

        let m = DcMotor::init(&mut platform, &config).unwrap();
        assert!(!m.is_sleeping());
        assert_eq!(m.state(), MotorState::Coast);
        assert_eq!(m.pwm().frequency(), 5_000);
        assert!(platform.is_claimed(13));
    }
}
