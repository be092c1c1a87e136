#![cfg_attr(not(test), no_std)]

//! click_drivers - MikroBUS Click board drivers
//!
//! Platform-independent drivers for MikroBUS add-on boards. Every driver
//! follows the same lifecycle: build a config with datasheet defaults, map
//! the pins of a MikroBUS socket onto it, initialize against a [`Platform`],
//! then call the driver's read/write and domain operations from a
//! caller-owned loop.
//!
//! ```ignore
//! use click_drivers::devices::airvelocity::{AirVelocity, AirVelocityConfig};
//! use click_drivers::platform::traits::{MikrobusSocket, Platform};
//!
//! let mut config = AirVelocityConfig::default();
//! config.map_mikrobus(&platform.mikrobus(MikrobusSocket::One));
//! let mut sensor = AirVelocity::init(&mut platform, &config)?;
//! let mps = sensor.get_air_velocity()?;
//! ```
//!
//! [`Platform`]: platform::traits::Platform

#[cfg(any(test, feature = "mock"))]
extern crate std;

// Bus, GPIO, analog and timer abstraction
pub mod platform;

// Click board drivers
pub mod devices;

// Logging and application loop
pub mod core;
