//! Periodic LED FSM driver.
//!
//! Each LED is a small state machine (idle, fade in/out, blink, fade-blink)
//! advanced by [`LedEngine::handle`] at a fixed tick.  Outputs are either
//! plain GPIO pins or PWM timer channels behind the port traits in
//! [`app::ports`].  All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module; host builds run the
//! same engine against in-memory simulations.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod led;
pub mod pins;

pub mod adapters;
pub mod drivers;

pub use config::EngineConfig;
pub use error::{Error, GeneralError, InitError, Result};
pub use led::{BlinkCount, FadeConfig, LedConfig, LedEngine, LedState, Mode, OutputDriver, Polarity};
