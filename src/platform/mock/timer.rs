//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};

/// Mock Timer implementation
///
/// Delays advance a simulated clock instead of sleeping, so tests can
/// assert on how long a driver would have blocked.
#[derive(Debug)]
pub struct MockTimer {
    now_us: u64,
    delay_calls: usize,
}

impl MockTimer {
    /// Create a new mock timer
    pub fn new() -> Self {
        Self {
            now_us: 0,
            delay_calls: 0,
        }
    }

    /// Number of delay calls issued so far
    pub fn delay_calls(&self) -> usize {
        self.delay_calls
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.now_us = self.now_us.wrapping_add(us as u64);
        self.delay_calls += 1;
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
