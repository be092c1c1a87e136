//! Delay adapter for `embedded-hal` delay providers

use crate::platform::{traits::TimerInterface, Result};
use embedded_hal::delay::DelayNs;

/// Delay wrapper
///
/// `DelayNs` has no clock, so `now_us` reports the total time spent in
/// delays issued through this wrapper.
pub struct HalDelay<D: DelayNs> {
    delay: D,
    elapsed_us: u64,
}

impl<D: DelayNs> HalDelay<D> {
    /// Wrap a delay provider
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            elapsed_us: 0,
        }
    }
}

impl<D: DelayNs> TimerInterface for HalDelay<D> {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.delay.delay_us(us);
        self.elapsed_us = self.elapsed_us.wrapping_add(us as u64);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay.delay_ms(ms);
        self.elapsed_us = self.elapsed_us.wrapping_add(ms as u64 * 1000);
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.elapsed_us
    }
}
