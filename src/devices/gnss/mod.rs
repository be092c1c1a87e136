//! GNSS Click driver (Quectel L76-class receiver)
//!
//! NMEA over UART with RST and WAKEUP control lines. The receiver streams
//! sentences on its own; the driver offers three ways to consume them:
//!
//! - [`Gnss::generic_read`] hands back raw bytes for the caller to buffer,
//!   after which [`parse_field`] extracts a single field by sentence name
//!   and index
//! - [`Gnss::read_fix`] decodes GGA and RMC sentences into a [`GnssFix`]
//! - [`Gnss::send_command`] frames a `$PMTK...` style command with its
//!   checksum
//!
//! # Example
//!
//! ```ignore
//! let mut config = GnssConfig::default();
//! config.map_mikrobus(&platform.mikrobus(MikrobusSocket::Two));
//! let mut gnss = Gnss::init(&mut platform, &config)?;
//!
//! let mut buf = [0u8; 256];
//! let n = gnss.generic_read(&mut buf)?;
//! if let Ok(lat) = parse_field(&buf[..n], "GNGGA", 2) {
//!     log_info!("Latitude: {}", lat);
//! }
//! ```

pub mod parser;

pub use parser::{checksum, frame_command, parse_field};

use super::{error::CommandError, gsm::write_all, traits::ClickDriver};
use crate::platform::{
    traits::{
        GpioInterface, GpioMode, MikrobusPinout, PinName, Platform, TimerInterface, UartConfig,
        UartInterface, UartPins,
    },
    Result,
};
use nmea0183::{ParseResult, Parser};

/// Knots to metres per second
const KNOTS_TO_MPS: f32 = 0.514_444;

/// GNSS fix type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FixType {
    /// Horizontal position only
    Fix2D,
    /// Position and altitude
    Fix3D,
}

/// Position and motion decoded from the NMEA stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GnssFix {
    /// Degrees, north positive
    pub latitude: f64,
    /// Degrees, east positive
    pub longitude: f64,
    /// Metres above mean sea level, when reported
    pub altitude: Option<f32>,
    /// Satellites used in the solution
    pub satellites: u8,
    /// Ground speed in m/s, once an RMC sentence has been seen
    pub speed: Option<f32>,
    /// Course over ground in degrees, when moving
    pub course: Option<f32>,
    /// 2D or 3D
    pub fix_type: FixType,
}

/// Accumulates GGA and RMC data between sentences
#[derive(Debug, Clone, Copy, Default)]
struct FixState {
    position: Option<(f64, f64)>,
    altitude: Option<f32>,
    satellites: u8,
    speed: Option<f32>,
    course: Option<f32>,
}

impl FixState {
    fn update_from_gga(&mut self, gga: &nmea0183::GGA) {
        self.position = Some((gga.latitude.as_f64(), gga.longitude.as_f64()));
        self.altitude = gga.altitude.as_ref().map(|a| a.meters);
        self.satellites = gga.sat_in_use;
    }

    /// GGA without a solution; whatever position was held is stale now
    fn lose_position(&mut self) {
        self.position = None;
        self.altitude = None;
        self.satellites = 0;
    }

    fn update_from_rmc(&mut self, rmc: &nmea0183::RMC) {
        self.speed = Some(rmc.speed.as_knots() * KNOTS_TO_MPS);
        if let Some(course) = &rmc.course {
            self.course = Some(course.degrees);
        }
    }

    fn fix(&self) -> Option<GnssFix> {
        let (latitude, longitude) = self.position?;
        Some(GnssFix {
            latitude,
            longitude,
            altitude: self.altitude,
            satellites: self.satellites,
            speed: self.speed,
            course: self.course,
            fix_type: if self.altitude.is_some() {
                FixType::Fix3D
            } else {
                FixType::Fix2D
            },
        })
    }
}

/// GNSS Click configuration
#[derive(Debug, Clone, Copy)]
pub struct GnssConfig {
    /// UART transmit (MCU side)
    pub tx: PinName,
    /// UART receive (MCU side)
    pub rx: PinName,
    /// Reset (active low)
    pub rst: PinName,
    /// Wake-up / force-on
    pub wakeup: PinName,
    /// UART baud rate
    pub baud_rate: u32,
    /// Reset hold time
    pub reset_pulse_ms: u32,
    /// Wake-up pulse length
    pub wakeup_pulse_ms: u32,
}

impl Default for GnssConfig {
    fn default() -> Self {
        Self {
            tx: PinName::Unconnected,
            rx: PinName::Unconnected,
            rst: PinName::Unconnected,
            wakeup: PinName::Unconnected,
            baud_rate: 9600,
            reset_pulse_ms: 100,
            wakeup_pulse_ms: 100,
        }
    }
}

impl GnssConfig {
    /// Take UART, RST and WAKEUP (AN position) from a MikroBUS socket
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.tx = pinout.tx;
        self.rx = pinout.rx;
        self.rst = pinout.rst;
        self.wakeup = pinout.an;
    }
}

/// GNSS Click driver
pub struct Gnss<U: UartInterface, G: GpioInterface> {
    uart: U,
    rst: G,
    wakeup: G,
    parser: Parser,
    state: FixState,
    reset_pulse_ms: u32,
    wakeup_pulse_ms: u32,
}

impl<U: UartInterface, G: GpioInterface> Gnss<U, G> {
    /// Open the UART and control lines; reset released, wake-up idle
    pub fn init<P>(platform: &mut P, config: &GnssConfig) -> Result<Self>
    where
        P: Platform<Uart = U, Gpio = G>,
    {
        let uart = platform.create_uart(
            UartPins {
                tx: config.tx,
                rx: config.rx,
            },
            UartConfig::eight_n_one(config.baud_rate),
        )?;
        let mut rst = platform.create_gpio(config.rst, GpioMode::OutputPushPull)?;
        let mut wakeup = platform.create_gpio(config.wakeup, GpioMode::OutputPushPull)?;
        rst.set_high()?;
        wakeup.set_low()?;

        crate::log_info!("GNSS Click ready at {} baud", config.baud_rate);
        Ok(Self::new(uart, rst, wakeup, config))
    }

    /// Wrap already configured lines, taking timing from `config`
    pub fn new(uart: U, rst: G, wakeup: G, config: &GnssConfig) -> Self {
        Self {
            uart,
            rst,
            wakeup,
            parser: Parser::new(),
            state: FixState::default(),
            reset_pulse_ms: config.reset_pulse_ms,
            wakeup_pulse_ms: config.wakeup_pulse_ms,
        }
    }

    /// Generic UART write; returns bytes queued
    pub fn generic_write(&mut self, data: &[u8]) -> Result<usize> {
        self.uart.write(data)
    }

    /// Generic non-blocking UART read; returns bytes actually read
    pub fn generic_read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.uart.read(buffer)
    }

    /// Send a sentence body as `$<body>*<CS>\r\n`
    ///
    /// # Errors
    ///
    /// `CommandError::Overflow` if the framed sentence does not fit; nothing
    /// is transmitted in that case.
    pub fn send_command(&mut self, body: &str) -> core::result::Result<(), CommandError> {
        let line = frame_command(body)?;
        crate::log_trace!("GNSS tx: {}", line.as_str());
        write_all(&mut self.uart, line.as_bytes())?;
        Ok(())
    }

    /// Drain pending bytes through the NMEA decoder
    ///
    /// Returns the merged fix when a GGA or RMC sentence completed during
    /// this call and a position is known, `None` otherwise.
    pub fn read_fix(&mut self) -> core::result::Result<Option<GnssFix>, CommandError> {
        let mut chunk = [0u8; 64];
        let mut updated = false;

        loop {
            let n = self.uart.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            for &byte in &chunk[..n] {
                match self.parser.parse_from_byte(byte) {
                    Some(Ok(ParseResult::GGA(Some(gga)))) => {
                        self.state.update_from_gga(&gga);
                        updated = true;
                    }
                    Some(Ok(ParseResult::GGA(None))) => {
                        crate::log_debug!("GNSS fix lost");
                        self.state.lose_position();
                        updated = true;
                    }
                    Some(Ok(ParseResult::RMC(Some(rmc)))) => {
                        self.state.update_from_rmc(&rmc);
                        updated = true;
                    }
                    Some(Err(_)) => crate::log_debug!("GNSS sentence rejected"),
                    _ => {}
                }
            }
        }

        Ok(if updated { self.state.fix() } else { None })
    }

    /// Last decoded fix without touching the UART
    pub fn current_fix(&self) -> Option<GnssFix> {
        self.state.fix()
    }

    /// Hardware reset: hold RST low for the configured time
    pub fn reset<T: TimerInterface>(&mut self, timer: &mut T) -> Result<()> {
        self.rst.set_low()?;
        timer.delay_ms(self.reset_pulse_ms)?;
        self.rst.set_high()?;
        self.state = FixState::default();
        crate::log_info!("GNSS reset");
        Ok(())
    }

    /// Pulse WAKEUP to bring the receiver out of standby
    pub fn wakeup<T: TimerInterface>(&mut self, timer: &mut T) -> Result<()> {
        self.wakeup.set_high()?;
        timer.delay_ms(self.wakeup_pulse_ms)?;
        self.wakeup.set_low()
    }

    /// Underlying UART
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }
}

impl<U: UartInterface, G: GpioInterface> ClickDriver for Gnss<U, G> {
    fn name(&self) -> &'static str {
        "GNSS Click"
    }
}
