//! Adapters: concrete implementations of the LED port traits.
//!
//! | Adapter | Implements           | Connects to                    |
//! |---------|----------------------|--------------------------------|
//! | `ledc`  | GpioPort, TimerPort  | ESP32 GPIO + LEDC PWM          |
//! | `hal`   | GpioPort, TimerPort  | any `embedded-hal` 1.0 HAL     |

pub mod hal;
pub mod ledc;
