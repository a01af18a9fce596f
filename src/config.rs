//! Engine configuration parameters.
//!
//! Everything the LED engine treats as a tunable constant lives here: the
//! handler tick, the duty scale, default fade times and the bounds used to
//! validate runtime fade configuration.  The struct is serde-enabled so a
//! board can ship it as JSON or a postcard blob next to its LED table.

use serde::{Deserialize, Serialize};

/// Core engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // --- Timing ---
    /// Period at which the caller invokes the handler (seconds).
    pub tick_period_s: f32,
    /// Ceiling for every accumulated time counter (seconds).
    pub time_limit_s: f32,

    // --- Duty ---
    /// Full-scale duty value (100.0 for percent, 1.0 for a unit range).
    pub duty_scale: f32,

    // --- Fade ---
    /// Fade-in duration applied to every channel on init (seconds).
    pub default_fade_in_s: f32,
    /// Fade-out duration applied to every channel on init (seconds).
    pub default_fade_out_s: f32,
    /// Fade durations passed to `set_fade_config` must exceed this (seconds).
    pub fade_time_min_s: f32,
    /// Fade durations passed to `set_fade_config` must stay below this (seconds).
    pub fade_time_max_s: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_period_s: 0.01, // 100 Hz
            time_limit_s: 1.0e5,

            // Duty
            duty_scale: 100.0,

            // Fade
            default_fade_in_s: 1.0,
            default_fade_out_s: 1.0,
            fade_time_min_s: 0.1,
            fade_time_max_s: 10.0,
        }
    }
}

impl EngineConfig {
    /// Reject values the engine cannot run with.
    ///
    /// Invalid ranges are reported, never clamped.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.tick_period_s.is_finite() && self.tick_period_s > 0.0) {
            return Err("tick_period_s must be positive");
        }
        if !(self.time_limit_s.is_finite() && self.time_limit_s > self.tick_period_s) {
            return Err("time_limit_s must exceed tick_period_s");
        }
        // Counters stop growing once a tick falls below half an f32 step.
        if self.time_limit_s + self.tick_period_s <= self.time_limit_s {
            return Err("time_limit_s too large for tick_period_s to register");
        }
        if !(self.duty_scale.is_finite() && self.duty_scale > 0.0) {
            return Err("duty_scale must be positive");
        }
        if !(self.fade_time_min_s.is_finite() && self.fade_time_min_s >= 0.0) {
            return Err("fade_time_min_s must be non-negative");
        }
        if !(self.fade_time_max_s.is_finite() && self.fade_time_max_s > self.fade_time_min_s) {
            return Err("fade_time_max_s must exceed fade_time_min_s");
        }
        if !(self.default_fade_in_s.is_finite() && self.default_fade_in_s > 0.0) {
            return Err("default_fade_in_s must be positive");
        }
        if !(self.default_fade_out_s.is_finite() && self.default_fade_out_s > 0.0) {
            return Err("default_fade_out_s must be positive");
        }
        Ok(())
    }

    /// Handler period in whole milliseconds.
    pub fn tick_period_ms(&self) -> u32 {
        (self.tick_period_s * 1000.0).round() as u32
    }

    /// Handler period in microseconds, as the ESP timer API wants it.
    pub fn tick_period_us(&self) -> u64 {
        (f64::from(self.tick_period_s) * 1_000_000.0).round() as u64
    }

    /// Whether `secs` is an acceptable runtime fade duration.
    pub fn fade_time_in_range(&self, secs: f32) -> bool {
        secs > self.fade_time_min_s && secs < self.fade_time_max_s
    }
}
