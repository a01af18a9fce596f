//! Port traits: the boundary between the LED engine and the board.
//!
//! ```text
//!   GpioPort / TimerPort adapter ◀── LedEngine ──▶ LedConfigProvider
//! ```
//!
//! Driver adapters (ESP LEDC, embedded-hal pins, test mocks) implement these
//! traits.  The [`LedEngine`](crate::led::LedEngine) consumes them via
//! generics, so the FSM core never touches registers directly.

use crate::led::board::LedConfig;

/// GPIO pin number as the board numbers it.
pub type GpioPin = u8;

/// PWM timer channel index.
pub type TimerChannel = u8;

// ───────────────────────────────────────────────────────────────
// GPIO port
// ───────────────────────────────────────────────────────────────

/// Digital output driver.
pub trait GpioPort {
    /// Bring the driver up.  Called from `LedEngine::init`.
    fn init(&mut self) -> Result<(), DriverError>;

    /// Whether the driver finished initialising.
    fn is_init(&self) -> bool;

    /// Drive `pin` to the given electrical level.
    fn set(&mut self, pin: GpioPin, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Timer / PWM port
// ───────────────────────────────────────────────────────────────

/// PWM timer driver.  Supplying one unlocks the fade operations.
pub trait TimerPort {
    /// Bring the timer up.  Called from `LedEngine::init`.
    fn init(&mut self) -> Result<(), DriverError>;

    /// Whether the timer finished initialising.
    fn is_init(&self) -> bool;

    /// Set `channel` to `percent` (0–100) of the PWM period.
    fn set_duty(&mut self, channel: TimerChannel, percent: f32);
}

// ───────────────────────────────────────────────────────────────
// Config provider
// ───────────────────────────────────────────────────────────────

/// Supplies the per-LED board table, one entry per engine channel.
///
/// Returning `None` is a fatal initialisation error.
pub trait LedConfigProvider {
    fn led_table(&self) -> Option<&[LedConfig]>;
}

impl<const N: usize> LedConfigProvider for [LedConfig; N] {
    fn led_table(&self) -> Option<&[LedConfig]> {
        Some(self)
    }
}

impl LedConfigProvider for &[LedConfig] {
    fn led_table(&self) -> Option<&[LedConfig]> {
        Some(self)
    }
}

impl<P: LedConfigProvider> LedConfigProvider for Option<P> {
    fn led_table(&self) -> Option<&[LedConfig]> {
        self.as_ref().and_then(LedConfigProvider::led_table)
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors reported by [`GpioPort`] / [`TimerPort`] initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Peripheral did not respond or is not present.
    NotReady,
    /// Vendor driver returned an error code.
    Hardware(i32),
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotReady => write!(f, "not ready"),
            Self::Hardware(rc) => write!(f, "hardware error (rc={})", rc),
        }
    }
}
