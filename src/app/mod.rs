//! Application boundary: everything the outside world uses to talk to
//! the LED engine.
//!
//! Hardware enters through the **port traits** in [`ports`]; other
//! execution contexts (button handlers, RPC, timers) hand over work as
//! [`commands::LedCommand`] values queued for the control loop.

pub mod commands;
pub mod ports;
