//! Application superloop
//!
//! Firmware built on these drivers runs one `init` followed by an endless
//! `task` loop. The loop is owned by the caller: an [`Application`] holds its
//! drivers, and [`run`] drives it with a platform timer between iterations.
//!
//! # Example
//!
//! ```ignore
//! struct Logger<I: I2cInterface> {
//!     sensor: AirVelocity<I>,
//! }
//!
//! impl<I: I2cInterface> Application for Logger<I> {
//!     type Error = SenseError;
//!
//!     fn init(&mut self) -> Result<(), SenseError> {
//!         Ok(())
//!     }
//!
//!     fn task(&mut self) -> Result<(), SenseError> {
//!         let mps = self.sensor.get_air_velocity()?;
//!         log_info!("Air velocity: {} m/s", mps);
//!         Ok(())
//!     }
//! }
//!
//! let exit = run(&mut app, platform.timer_mut(), LoopConfig::default());
//! ```

use crate::platform::traits::TimerInterface;

/// Application driven by the superloop
pub trait Application {
    /// Error surfaced by init or a task iteration
    type Error;

    /// One-time bring-up (driver init, device configuration)
    fn init(&mut self) -> Result<(), Self::Error>;

    /// One pass of the application loop
    fn task(&mut self) -> Result<(), Self::Error>;
}

/// Loop pacing
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Delay after each task pass in milliseconds
    pub period_ms: u32,
    /// Stop after this many passes (`None` runs forever)
    pub max_iterations: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            max_iterations: None,
        }
    }
}

/// Why the loop returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit<E> {
    /// `init` failed; no task ran
    InitFailed(E),
    /// A task pass failed
    TaskFailed {
        /// Zero-based pass that failed
        iteration: u32,
        /// Error returned by the task
        error: E,
    },
    /// The configured number of passes completed
    Completed {
        /// Passes run
        iterations: u32,
    },
}

/// Run `app` as a superloop
///
/// Returns instead of spinning on failure so the caller decides how the
/// firmware halts (blink an LED, reset, park the core).
pub fn run<A, T>(app: &mut A, timer: &mut T, config: LoopConfig) -> LoopExit<A::Error>
where
    A: Application,
    T: TimerInterface,
{
    if let Err(error) = app.init() {
        crate::log_error!("Application init failed");
        return LoopExit::InitFailed(error);
    }
    crate::log_info!("Application init complete");

    let mut iteration: u32 = 0;
    loop {
        if config.max_iterations.is_some_and(|max| iteration >= max) {
            return LoopExit::Completed {
                iterations: iteration,
            };
        }

        if let Err(error) = app.task() {
            crate::log_error!("Application task failed at iteration {}", iteration);
            return LoopExit::TaskFailed { iteration, error };
        }

        // A missing delay only shortens the period; keep looping
        if timer.delay_ms(config.period_ms).is_err() {
            crate::log_warn!("Loop delay failed");
        }
        iteration = iteration.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockTimer;

    struct Counter {
        inits: u32,
        passes: u32,
        fail_init: bool,
        fail_at: Option<u32>,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                inits: 0,
                passes: 0,
                fail_init: false,
                fail_at: None,
            }
        }
    }

    impl Application for Counter {
        type Error = &'static str;

        fn init(&mut self) -> Result<(), &'static str> {
            self.inits += 1;
            if self.fail_init {
                Err("no hardware")
            } else {
                Ok(())
            }
        }

        fn task(&mut self) -> Result<(), &'static str> {
            if self.fail_at == Some(self.passes) {
                return Err("bus error");
            }
            self.passes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_run_completes_bounded_loop() {
        let mut app = Counter::new();
        let mut timer = MockTimer::new();
        let exit = run(
            &mut app,
            &mut timer,
            LoopConfig {
                period_ms: 100,
                max_iterations: Some(3),
            },
        );

        assert_eq!(exit, LoopExit::Completed { iterations: 3 });
        assert_eq!(app.inits, 1);
        assert_eq!(app.passes, 3);
        assert_eq!(timer.now_ms(), 300);
    }

    #[test]
    fn test_run_stops_on_init_failure() {
        let mut app = Counter::new();
        app.fail_init = true;
        let mut timer = MockTimer::new();

        let exit = run(&mut app, &mut timer, LoopConfig::default());
        assert_eq!(exit, LoopExit::InitFailed("no hardware"));
        assert_eq!(app.passes, 0);
        assert_eq!(timer.now_us(), 0);
    }

    #[test]
    fn test_run_reports_failing_iteration() {
        let mut app = Counter::new();
        app.fail_at = Some(2);
        let mut timer = MockTimer::new();

        let exit = run(&mut app, &mut timer, LoopConfig::default());
        assert_eq!(
            exit,
            LoopExit::TaskFailed {
                iteration: 2,
                error: "bus error"
            }
        );
    }
}
