//! Unified error types for the LED engine.
//!
//! Every public engine operation returns [`Result`].  All variants are `Copy`
//! so they can be handed back from the periodic handler without allocation.
//! A failed operation never leaves a channel partially updated.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level engine error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid argument or unmet precondition.
    General(GeneralError),
    /// Engine not initialised, or a driver failed to come up.
    Init(InitError),
    /// Engine configuration rejected at construction.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General(e) => write!(f, "general: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// General (argument / precondition) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralError {
    /// Channel index is outside the configured table.
    InvalidChannel(usize),
    /// Channel is running a timed command and is not `Normal`.
    Busy,
    /// Blink on-time must be shorter than the period, both finite and positive.
    InvalidTiming,
    /// Fade parameters out of range.  The `&'static str` names the field.
    InvalidFadeConfig(&'static str),
    /// Fade commands need a PWM timer, and this engine has none.
    FadeUnsupported,
}

impl fmt::Display for GeneralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel(n) => write!(f, "invalid channel {n}"),
            Self::Busy => write!(f, "channel busy"),
            Self::InvalidTiming => write!(f, "invalid blink timing"),
            Self::InvalidFadeConfig(msg) => write!(f, "invalid fade config: {msg}"),
            Self::FadeUnsupported => write!(f, "fade requires a PWM timer"),
        }
    }
}

impl From<GeneralError> for Error {
    fn from(e: GeneralError) -> Self {
        Self::General(e)
    }
}

// ---------------------------------------------------------------------------
// Initialisation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// Operation requires a prior successful `init()`.
    NotInitialised,
    /// The config provider returned no table.
    MissingConfigTable,
    /// Table length differs from the engine's channel count.
    ConfigTableSize { expected: usize, found: usize },
    /// GPIO driver failed to initialise or reports not-ready.
    GpioNotReady,
    /// PWM timer driver failed to initialise or reports not-ready.
    TimerNotReady,
    /// A channel is wired to a GPIO pin but the engine has no GPIO driver.
    NoGpioForChannel(usize),
    /// A channel is wired to a timer channel but the engine has no timer.
    NoTimerForChannel(usize),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialised => write!(f, "engine not initialised"),
            Self::MissingConfigTable => write!(f, "LED config table missing"),
            Self::ConfigTableSize { expected, found } => {
                write!(f, "LED config table has {found} entries, expected {expected}")
            }
            Self::GpioNotReady => write!(f, "GPIO driver not ready"),
            Self::TimerNotReady => write!(f, "timer driver not ready"),
            Self::NoGpioForChannel(n) => write!(f, "channel {n} needs GPIO, none supplied"),
            Self::NoTimerForChannel(n) => write!(f, "channel {n} needs a timer, none supplied"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
