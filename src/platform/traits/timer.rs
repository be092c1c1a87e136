//! Timer interface trait
//!
//! Blocking delays used to satisfy device timing (power-up pulses, reset
//! hold times, inter-byte gaps) plus a monotonic clock.

use crate::platform::Result;

/// Timer interface trait
pub trait TimerInterface {
    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()>;

    /// Monotonic timestamp in microseconds since platform initialization
    fn now_us(&self) -> u64;

    /// Monotonic timestamp in milliseconds since platform initialization
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
