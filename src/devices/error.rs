//! Driver error families
//!
//! Drivers fall into three shapes and each shape has its own error type:
//! sensors fail on the bus or on a frame check, actuators additionally
//! reject out-of-range arguments before touching the bus, and
//! command/response drivers can time out, overflow a command buffer, or
//! fail to find what they were asked to parse.

use crate::platform::PlatformError;
use bitflags::bitflags;
use core::fmt;

/// Errors from sensor-style drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SenseError {
    /// Bus or pin failure
    Bus(PlatformError),
    /// Frame checksum did not verify
    Checksum {
        /// Value the frame should have produced
        expected: u8,
        /// Value actually computed
        actual: u8,
    },
    /// Device reported a fault condition (driver-specific bits)
    Fault(u8),
}

impl From<PlatformError> for SenseError {
    fn from(err: PlatformError) -> Self {
        SenseError::Bus(err)
    }
}

impl fmt::Display for SenseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenseError::Bus(e) => write!(f, "bus error: {}", e),
            SenseError::Checksum { expected, actual } => write!(
                f,
                "checksum mismatch: expected {:#04x}, got {:#04x}",
                expected, actual
            ),
            SenseError::Fault(bits) => write!(f, "device fault: {:#04x}", bits),
        }
    }
}

/// Errors from actuator-style drivers
///
/// `V` names the argument that was rejected, e.g. a channel or volume out of
/// range. Rejected arguments never reach the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuateError<V> {
    /// Bus or pin failure
    Bus(PlatformError),
    /// Argument outside the device's range, or device in the wrong state
    Invalid(V),
}

impl<V> From<PlatformError> for ActuateError<V> {
    fn from(err: PlatformError) -> Self {
        ActuateError::Bus(err)
    }
}

impl<V: fmt::Debug> fmt::Display for ActuateError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuateError::Bus(e) => write!(f, "bus error: {}", e),
            ActuateError::Invalid(v) => write!(f, "invalid argument: {:?}", v),
        }
    }
}

bitflags! {
    /// Which stage of response parsing failed
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParseFlags: u8 {
        /// No sentence start (`$`) in the buffer
        const REFERENCE = 0b0000_0001;
        /// Requested sentence or command header not found
        const COMMAND = 0b0000_0010;
        /// Requested field missing or malformed
        const DATA = 0b0000_0100;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ParseFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ParseFlags({=u8:#x})", self.bits())
    }
}

/// Errors from command/response drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Bus or pin failure
    Bus(PlatformError),
    /// No terminal response within the polling budget
    Timeout,
    /// Command does not fit the transmit buffer; nothing was sent
    Overflow,
    /// Device answered with an error response
    Rejected,
    /// Response could not be parsed
    Parse(ParseFlags),
}

impl From<PlatformError> for CommandError {
    fn from(err: PlatformError) -> Self {
        CommandError::Bus(err)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Bus(e) => write!(f, "bus error: {}", e),
            CommandError::Timeout => write!(f, "response timeout"),
            CommandError::Overflow => write!(f, "command too long"),
            CommandError::Rejected => write!(f, "command rejected by device"),
            CommandError::Parse(flags) => write!(f, "parse error: {:#04x}", flags.bits()),
        }
    }
}
