//! Timer drivers feeding the LED control loop.

pub mod hw_timer;
