//! Per-LED state record and its FSM steps.
//!
//! ```text
//!            set_smooth(On)            ramp done
//!   Normal ─────────────────▶ FadeIn ───────────▶ Normal
//!     │      set_smooth(Off)           ramp done
//!     ├─────────────────────▶ FadeOut ──────────▶ Normal
//!     │      blink()                   count spent
//!     ├─────────────────────▶ Blink ────────────▶ Normal
//!     │      blink_smooth()            count spent
//!     └─────────────────────▶ FadeBlink ────────▶ Normal
//!
//!   set() / toggle() from any mode ─────────────▶ Normal
//! ```
//!
//! All arithmetic assumes the handler runs every [`Clock::tick`] seconds;
//! there is no internal time source.

use serde::{Deserialize, Serialize};

use super::board::LedState;
use crate::config::EngineConfig;

/// Fade-out counts as finished once duty is within this of the floor.
pub const FADE_OUT_EPSILON: f32 = 0.001;

/// Current FSM state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    FadeIn,
    FadeOut,
    /// Reserved; the handler treats it like `Normal`.
    FadeToggle,
    Blink,
    FadeBlink,
}

/// How many blink cycles remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlinkCount {
    /// `n` further cycles after the one in progress.
    Repeat(u8),
    /// Blink until overridden by `set`/`toggle`.
    Continuous,
}

impl BlinkCount {
    /// A single on/off cycle.
    pub const fn once() -> Self {
        Self::Repeat(0)
    }
}

impl Default for BlinkCount {
    fn default() -> Self {
        Self::once()
    }
}

/// Fixed handler timing shared by every channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    /// Handler period (seconds).
    pub tick: f32,
    /// Ceiling for accumulated counters (seconds).
    pub limit: f32,
}

impl Clock {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            tick: config.tick_period_s,
            limit: config.time_limit_s,
        }
    }

    /// `t` advanced by one tick, clamped to the ceiling.
    fn advance(&self, t: f32) -> f32 {
        (t + self.tick).min(self.limit)
    }
}

/// Quadratic ramp coefficient: `2·span / duration²`.
pub fn fade_rate(span: f32, duration: f32) -> f32 {
    2.0 * span / (duration * duration)
}

/// State of one LED channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedChannel {
    pub(crate) duty: f32,
    pub(crate) max_duty: f32,
    pub(crate) min_duty: f32,
    pub(crate) fade_elapsed: f32,
    pub(crate) fade_in_rate: f32,
    pub(crate) fade_out_rate: f32,
    pub(crate) fade_out_duration: f32,
    pub(crate) blink_period: f32,
    pub(crate) period_elapsed: f32,
    pub(crate) on_duration: f32,
    pub(crate) active_duration: f32,
    pub(crate) mode: Mode,
    pub(crate) blink_count: BlinkCount,
}

impl LedChannel {
    /// All-zero record, as held before `init()`.
    pub const ZERO: Self = Self {
        duty: 0.0,
        max_duty: 0.0,
        min_duty: 0.0,
        fade_elapsed: 0.0,
        fade_in_rate: 0.0,
        fade_out_rate: 0.0,
        fade_out_duration: 0.0,
        blink_period: 0.0,
        period_elapsed: 0.0,
        on_duration: 0.0,
        active_duration: 0.0,
        mode: Mode::Normal,
        blink_count: BlinkCount::Repeat(0),
    };

    /// Defaults applied on init: full range, default fade times, idle.
    pub fn with_defaults(config: &EngineConfig) -> Self {
        let span = config.duty_scale;
        Self {
            max_duty: config.duty_scale,
            fade_in_rate: fade_rate(span, config.default_fade_in_s),
            fade_out_rate: fade_rate(span, config.default_fade_out_s),
            fade_out_duration: config.default_fade_out_s,
            ..Self::ZERO
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn duty(&self) -> f32 {
        self.duty
    }

    pub fn max_duty(&self) -> f32 {
        self.max_duty
    }

    pub fn min_duty(&self) -> f32 {
        self.min_duty
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn blink_count(&self) -> BlinkCount {
        self.blink_count
    }

    pub fn active_duration(&self) -> f32 {
        self.active_duration
    }

    pub fn fade_elapsed(&self) -> f32 {
        self.fade_elapsed
    }

    pub fn period_elapsed(&self) -> f32 {
        self.period_elapsed
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Normal
    }

    /// Lit or transitioning: busy, or idle at non-zero duty.
    pub fn is_on(&self) -> bool {
        !self.is_idle() || self.duty != 0.0
    }

    // ── Commands ──────────────────────────────────────────────

    /// Jump straight to the bright or dim bound and go idle.
    pub(crate) fn apply_state(&mut self, state: LedState) {
        self.mode = Mode::Normal;
        self.duty = match state {
            LedState::On => self.max_duty,
            LedState::Off => self.min_duty,
        };
    }

    pub(crate) fn toggle(&mut self) {
        let next = if self.duty >= self.max_duty {
            LedState::Off
        } else {
            LedState::On
        };
        self.apply_state(next);
    }

    pub(crate) fn start_fade(&mut self, state: LedState) {
        self.fade_elapsed = 0.0;
        self.mode = match state {
            LedState::On => Mode::FadeIn,
            LedState::Off => Mode::FadeOut,
        };
    }

    pub(crate) fn start_blink(&mut self, mode: Mode, on_time: f32, period: f32, count: BlinkCount) {
        self.mode = mode;
        self.on_duration = on_time;
        self.blink_period = period;
        self.period_elapsed = 0.0;
        self.fade_elapsed = 0.0;
        self.blink_count = count;
    }

    /// Install new bounds and ramp coefficients, keeping duty in range.
    pub(crate) fn configure_fade(&mut self, fade_in_s: f32, fade_out_s: f32, max_duty: f32, min_duty: f32) {
        let span = max_duty - min_duty;
        self.max_duty = max_duty;
        self.min_duty = min_duty;
        self.fade_in_rate = fade_rate(span, fade_in_s);
        self.fade_out_rate = fade_rate(span, fade_out_s);
        self.fade_out_duration = fade_out_s;
        self.duty = self.duty.clamp(min_duty, max_duty);
    }

    // ── Periodic steps ────────────────────────────────────────

    /// Run the state action for the current mode.
    pub(crate) fn step(&mut self, clock: &Clock) {
        match self.mode {
            Mode::Normal | Mode::FadeToggle => {}
            Mode::FadeIn => self.fade_in(Mode::Normal, clock),
            Mode::FadeOut => self.fade_out(Mode::Normal, clock),
            Mode::Blink => self.blink(),
            Mode::FadeBlink => self.fade_blink(clock),
        }
    }

    /// Accelerating ramp: the step grows linearly with ramp time.
    fn fade_in(&mut self, exit: Mode, clock: &Clock) {
        self.duty += self.fade_in_rate * self.fade_elapsed * clock.tick;

        if self.duty <= self.max_duty {
            self.fade_elapsed = clock.advance(self.fade_elapsed);
        } else {
            self.duty = self.max_duty;
            self.fade_elapsed = 0.0;
            self.mode = exit;
        }
    }

    /// Decelerating ramp: the step shrinks with the time remaining.
    fn fade_out(&mut self, exit: Mode, clock: &Clock) {
        let remaining = self.fade_out_duration - self.fade_elapsed;

        if remaining > 0.0 {
            self.duty -= self.fade_out_rate * remaining * clock.tick;
        } else {
            self.duty = self.min_duty;
        }

        if self.duty > self.min_duty + FADE_OUT_EPSILON {
            self.fade_elapsed = clock.advance(self.fade_elapsed);
        } else {
            self.duty = self.min_duty;
            self.fade_elapsed = 0.0;
            self.mode = exit;
        }
    }

    fn blink(&mut self) {
        self.duty = if self.in_on_phase() {
            self.max_duty
        } else {
            self.min_duty
        };
        self.count_blink();
    }

    fn fade_blink(&mut self, clock: &Clock) {
        if self.in_on_phase() {
            self.fade_in(Mode::FadeBlink, clock);
        } else {
            self.fade_out(Mode::FadeBlink, clock);
        }
        self.count_blink();
    }

    fn in_on_phase(&self) -> bool {
        self.period_elapsed < self.on_duration
    }

    fn at_period_end(&self) -> bool {
        self.period_elapsed >= self.blink_period
    }

    /// On period rollover: finish when the count is spent, else count down.
    fn count_blink(&mut self) {
        if !self.at_period_end() {
            return;
        }
        match self.blink_count {
            BlinkCount::Continuous => {}
            BlinkCount::Repeat(0) => self.mode = Mode::Normal,
            BlinkCount::Repeat(n) => self.blink_count = BlinkCount::Repeat(n - 1),
        }
    }

    /// Blink period clock; wraps to zero on rollover.
    pub(crate) fn advance_period(&mut self, clock: &Clock) {
        if self.at_period_end() {
            self.period_elapsed = 0.0;
        } else {
            self.period_elapsed += clock.tick;
        }
    }

    /// Time spent at or above half brightness.
    pub(crate) fn advance_active_time(&mut self, clock: &Clock) {
        if self.duty >= self.max_duty / 2.0 {
            self.active_duration = clock.advance(self.active_duration);
        } else {
            self.active_duration = 0.0;
        }
    }
}
