//! Click board drivers
//!
//! Each driver is written only against the platform traits and follows the
//! same lifecycle: `XxxConfig::default()`, `map_mikrobus`, `Xxx::init`, then
//! generic and domain operations. Drivers are grouped by interaction shape:
//!
//! - Sense: [`airvelocity`], [`thermo`], [`hallcurrent`], [`rtc2`] reads
//! - Actuate: [`audioamp4`], [`dcmotor`], [`rtc2`] writes
//! - Command/response: [`gsm`], [`gnss`]

pub mod bus;
pub mod convert;
pub mod error;
pub mod traits;

pub mod airvelocity;
pub mod audioamp4;
pub mod dcmotor;
pub mod gnss;
pub mod gsm;
pub mod hallcurrent;
pub mod rtc2;
pub mod thermo;

pub use error::{ActuateError, CommandError, ParseFlags, SenseError};
pub use traits::{ClickDriver, Sensor};
