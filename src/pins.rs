//! LED pin assignments for the reference board.
//!
//! Single source of truth: the LEDC adapter, the GPIO adapter and the
//! board LED table all read from here.  Change a pin here and it
//! propagates everywhere.

use crate::led::{LedConfig, LedState, Polarity};

// ---------------------------------------------------------------------------
// Discrete LEDs (plain GPIO, on/off only)
// ---------------------------------------------------------------------------

/// Power indicator, sinks current through the pin (active LOW).
pub const LED_POWER_GPIO: u8 = 13;
/// Fault indicator (active HIGH).
pub const LED_FAULT_GPIO: u8 = 14;

// ---------------------------------------------------------------------------
// Dimmable LEDs (LEDC PWM)
// ---------------------------------------------------------------------------

/// Front status LED on LEDC channel 0.
pub const LED_STATUS_GPIO: i32 = 11;
pub const LED_STATUS_LEDC_CH: u8 = 0;

/// Backlight strip driver on LEDC channel 1.
pub const LED_BACKLIGHT_GPIO: i32 = 12;
pub const LED_BACKLIGHT_LEDC_CH: u8 = 1;

/// PWM carrier for every LED channel.  High enough to be flicker-free.
pub const LED_PWM_FREQ_HZ: u32 = 5_000;
/// LEDC duty resolution (bits).  10 bits gives 1024 steps per ramp.
pub const LED_PWM_RESOLUTION_BITS: u32 = 10;

/// GPIO pins driven as plain outputs.
pub const GPIO_LED_PINS: [u8; 2] = [LED_POWER_GPIO, LED_FAULT_GPIO];

/// GPIO number behind each LEDC channel, indexed by channel.
pub const LEDC_LED_GPIOS: [i32; 2] = [LED_STATUS_GPIO, LED_BACKLIGHT_GPIO];

/// Number of LEDs on the board.
pub const BOARD_LED_COUNT: usize = 4;

/// Board LED table in engine channel order.
pub const BOARD_LEDS: [LedConfig; BOARD_LED_COUNT] = [
    LedConfig::gpio(LED_POWER_GPIO, Polarity::ActiveLow, LedState::On),
    LedConfig::gpio(LED_FAULT_GPIO, Polarity::ActiveHigh, LedState::Off),
    LedConfig::timer(LED_STATUS_LEDC_CH, Polarity::ActiveHigh, LedState::Off),
    LedConfig::timer(LED_BACKLIGHT_LEDC_CH, Polarity::ActiveLow, LedState::Off),
];

/// Engine channel index of each LED in [`BOARD_LEDS`].
pub const POWER_LED: usize = 0;
pub const FAULT_LED: usize = 1;
pub const STATUS_LED: usize = 2;
pub const BACKLIGHT_LED: usize = 3;
