//! Core runtime support
//!
//! Logging macros and the caller-owned application loop.

pub mod app;
pub mod logging;
