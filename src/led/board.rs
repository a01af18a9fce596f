//! Board LED table.
//!
//! One [`LedConfig`] per LED: which driver feeds it, its polarity and the
//! state it takes on at init.  The engine copies the table once in
//! `init()` and never writes to it.
//!
//! [`BoardTable`] is a fixed-capacity holder that implements
//! [`LedConfigProvider`].  Boards either build it in code or decode it
//! from a JSON document or a postcard blob kept in flash.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::app::ports::{GpioPin, LedConfigProvider, TimerChannel};

/// Largest LED table a [`BoardTable`] can hold.
pub const MAX_LEDS: usize = 16;

/// Low-level output an LED is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputDriver {
    /// Plain digital pin: on at full duty, off otherwise.
    Gpio(GpioPin),
    /// PWM timer channel: follows duty continuously.
    Timer(TimerChannel),
}

/// Electrical level that lights the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

/// Logical on/off state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LedState {
    #[default]
    Off,
    On,
}

impl From<bool> for LedState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Static configuration of one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedConfig {
    pub driver: OutputDriver,
    pub polarity: Polarity,
    pub initial: LedState,
}

impl LedConfig {
    pub const fn gpio(pin: GpioPin, polarity: Polarity, initial: LedState) -> Self {
        Self {
            driver: OutputDriver::Gpio(pin),
            polarity,
            initial,
        }
    }

    pub const fn timer(channel: TimerChannel, polarity: Polarity, initial: LedState) -> Self {
        Self {
            driver: OutputDriver::Timer(channel),
            polarity,
            initial,
        }
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self::gpio(0, Polarity::ActiveHigh, LedState::Off)
    }
}

// ── BoardTable ────────────────────────────────────────────────

/// Fixed-capacity LED table.  Stack-allocated, no heap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardTable {
    leds: Vec<LedConfig, MAX_LEDS>,
}

impl BoardTable {
    pub fn new() -> Self {
        Self { leds: Vec::new() }
    }

    pub fn from_slice(leds: &[LedConfig]) -> Result<Self, BoardError> {
        let leds = Vec::from_slice(leds).map_err(|()| BoardError::TooManyLeds)?;
        Ok(Self { leds })
    }

    /// Decode a JSON array of [`LedConfig`] objects.
    pub fn from_json(bytes: &[u8]) -> Result<Self, BoardError> {
        let leds: Vec<LedConfig, MAX_LEDS> =
            serde_json::from_slice(bytes).map_err(|_| BoardError::Decode)?;
        Ok(Self { leds })
    }

    /// Decode a postcard blob produced by [`BoardTable::to_postcard`].
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, BoardError> {
        let leds: Vec<LedConfig, MAX_LEDS> =
            postcard::from_bytes(bytes).map_err(|_| BoardError::Decode)?;
        Ok(Self { leds })
    }

    /// Encode the table for storage in flash.
    pub fn to_postcard(&self) -> Result<std::vec::Vec<u8>, BoardError> {
        postcard::to_allocvec(&self.leds).map_err(|_| BoardError::Encode)
    }

    pub fn push(&mut self, led: LedConfig) -> Result<(), BoardError> {
        self.leds.push(led).map_err(|_| BoardError::TooManyLeds)
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub fn as_slice(&self) -> &[LedConfig] {
        &self.leds
    }
}

impl LedConfigProvider for BoardTable {
    fn led_table(&self) -> Option<&[LedConfig]> {
        Some(self.as_slice())
    }
}

/// Errors building or decoding a [`BoardTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// More than [`MAX_LEDS`] entries.
    TooManyLeds,
    /// Input was not a valid LED table (or overflowed capacity).
    Decode,
    /// Serialisation failed.
    Encode,
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooManyLeds => write!(f, "more than {} LEDs", MAX_LEDS),
            Self::Decode => write!(f, "LED table decode failed"),
            Self::Encode => write!(f, "LED table encode failed"),
        }
    }
}
