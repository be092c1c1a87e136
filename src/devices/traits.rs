//! Common driver traits

use super::error::SenseError;

/// Identity shared by every Click driver
pub trait ClickDriver {
    /// Board name as printed on the Click
    fn name(&self) -> &'static str;
}

/// A driver that produces one scalar reading per call
///
/// Lets an application loop poll heterogeneous sensors through one
/// interface.
pub trait Sensor: ClickDriver {
    /// Unit of [`Sensor::read`], for logging
    fn unit(&self) -> &'static str;

    /// Take one measurement
    fn read(&mut self) -> Result<f32, SenseError>;
}
