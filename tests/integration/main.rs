//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one part of the LED
//! engine against mock ports.  All tests run on the host (x86_64) with no
//! real hardware required.

mod blink_tests;
mod control_loop_tests;
mod mock_hw;
mod output_tests;
