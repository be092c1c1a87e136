//! Air Velocity Click superloop on the mock platform
//!
//! `cargo run --example airvelocity_loop`

use click_drivers::core::app::{run, Application, LoopConfig, LoopExit};
use click_drivers::devices::airvelocity::{AirVelocity, AirVelocityConfig};
use click_drivers::devices::{ClickDriver, SenseError, Sensor};
use click_drivers::platform::mock::{MockI2c, MockPlatform};
use click_drivers::platform::traits::{MikrobusSocket, Platform};

/// Simulated flow counts ramping through the calibration range
const COUNTS: [u16; 6] = [350, 915, 1800, 2700, 3500, 3900];

struct AirVelocityApp {
    sensor: AirVelocity<MockI2c>,
}

impl Application for AirVelocityApp {
    type Error = SenseError;

    fn init(&mut self) -> Result<(), SenseError> {
        for count in COUNTS {
            let mut frame = [0u8, (count >> 8) as u8, count as u8, 0, 0];
            let sum = frame.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
            frame[0] = 0u8.wrapping_sub(sum);
            self.sensor.i2c_mut().push_read_data(&frame);
        }
        println!("{} initialized", self.sensor.name());
        Ok(())
    }

    fn task(&mut self) -> Result<(), SenseError> {
        let value = self.sensor.read()?;
        println!("Air velocity: {:.2} {}", value, self.sensor.unit());
        Ok(())
    }
}

fn main() {
    let mut platform = MockPlatform::new();

    let mut config = AirVelocityConfig::default();
    config.map_mikrobus(&platform.mikrobus(MikrobusSocket::One));

    let sensor = match AirVelocity::init(&mut platform, &config) {
        Ok(sensor) => sensor,
        Err(e) => {
            eprintln!("init failed: {}", e);
            return;
        }
    };

    let mut app = AirVelocityApp { sensor };
    let exit = run(
        &mut app,
        platform.timer_mut(),
        LoopConfig {
            period_ms: 1000,
            max_iterations: Some(COUNTS.len() as u32),
        },
    );

    match exit {
        LoopExit::Completed { iterations } => println!("done after {} readings", iterations),
        LoopExit::InitFailed(e) => eprintln!("init failed: {}", e),
        LoopExit::TaskFailed { iteration, error } => {
            eprintln!("reading {} failed: {}", iteration, error)
        }
    }
}
