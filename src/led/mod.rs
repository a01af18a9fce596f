//! LED engine: one FSM record per LED, driven by a fixed-rate handler.
//!
//! ```text
//!  set / toggle / blink ──▶ ┌──────────────────────┐ ──▶ GpioPort
//!  set_smooth / fade cfg ──▶│  LedEngine           │
//!                           │  [LedChannel; N]     │ ──▶ TimerPort
//!  handle() every tick ────▶└──────────────────────┘
//! ```
//!
//! Commands only arm a channel; all timing happens in [`LedEngine::handle`],
//! which the caller must invoke every `tick_period_s` from a single context.
//! The engine holds no locks.  Wrap it in [`shared::SharedLedEngine`] when
//! more than one context needs it.

pub mod board;
pub mod channel;
pub mod output;
pub mod shared;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::commands::LedCommand;
use crate::app::ports::{LedConfigProvider, TimerPort};
use crate::config::EngineConfig;
use crate::error::{Error, GeneralError, InitError, Result};

pub use board::{BoardTable, LedConfig, LedState, OutputDriver, Polarity, MAX_LEDS};
pub use channel::{BlinkCount, Clock, LedChannel, Mode};
pub use output::{GpioOutput, NoGpio, NoTimer, TimerOutput};

/// Runtime fade parameters for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeConfig {
    /// Seconds from `min_duty` to `max_duty`.
    pub fade_in_s: f32,
    /// Seconds from `max_duty` to `min_duty`.
    pub fade_out_s: f32,
    pub max_duty: f32,
    pub min_duty: f32,
}

/// The LED engine.
///
/// `G` and `T` are the GPIO and timer slots ([`NoGpio`] / [`NoTimer`] when
/// the board lacks one); `N` is the number of LEDs.
pub struct LedEngine<G, T, const N: usize> {
    gpio: G,
    timer: T,
    config: EngineConfig,
    clock: Clock,
    leds: [LedConfig; N],
    channels: [LedChannel; N],
    initialised: bool,
}

impl<G: GpioOutput, const N: usize> LedEngine<G, NoTimer, N> {
    /// Engine for boards with GPIO LEDs only.  No fade operations.
    pub fn gpio_only(gpio: G, config: EngineConfig) -> Result<Self> {
        Self::new(gpio, NoTimer, config)
    }
}

impl<T: TimerOutput, const N: usize> LedEngine<NoGpio, T, N> {
    /// Engine for boards whose LEDs all sit on PWM timer channels.
    pub fn timer_only(timer: T, config: EngineConfig) -> Result<Self> {
        Self::new(NoGpio, timer, config)
    }
}

impl<G: GpioOutput, T: TimerOutput, const N: usize> LedEngine<G, T, N> {
    /// Construct an uninitialised engine.  Rejects an invalid config.
    pub fn new(gpio: G, timer: T, config: EngineConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        Ok(Self {
            gpio,
            timer,
            clock: Clock::from_config(&config),
            config,
            leds: [LedConfig::default(); N],
            channels: [LedChannel::ZERO; N],
            initialised: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Load the LED table, bring up the drivers and light every LED in its
    /// initial state.  A second call while initialised does nothing.
    pub fn init(&mut self, provider: &impl LedConfigProvider) -> Result<()> {
        if self.initialised {
            return Ok(());
        }

        let table = provider.led_table().ok_or(InitError::MissingConfigTable)?;
        if table.len() != N {
            return Err(InitError::ConfigTableSize {
                expected: N,
                found: table.len(),
            }
            .into());
        }
        for (idx, led) in table.iter().enumerate() {
            match led.driver {
                OutputDriver::Gpio(_) if !G::PRESENT => {
                    return Err(InitError::NoGpioForChannel(idx).into());
                }
                OutputDriver::Timer(_) if !T::PRESENT => {
                    return Err(InitError::NoTimerForChannel(idx).into());
                }
                _ => {}
            }
        }

        if let Err(e) = self.gpio.bring_up() {
            warn!("led: GPIO init failed: {}", e);
            return Err(InitError::GpioNotReady.into());
        }
        if !self.gpio.ready() {
            return Err(InitError::GpioNotReady.into());
        }
        if let Err(e) = self.timer.bring_up() {
            warn!("led: timer init failed: {}", e);
            return Err(InitError::TimerNotReady.into());
        }
        if !self.timer.ready() {
            return Err(InitError::TimerNotReady.into());
        }

        self.leds.copy_from_slice(table);
        self.initialised = true;

        let scale = self.config.duty_scale;
        for (ch, led) in self.channels.iter_mut().zip(self.leds.iter()) {
            *ch = LedChannel::with_defaults(&self.config);
            ch.apply_state(led.initial);
            output::drive(&mut self.gpio, &mut self.timer, led, ch, scale);
        }

        info!(
            "led: {} channel(s) up (tick={}ms, scale={})",
            N,
            self.config.tick_period_ms(),
            scale
        );
        Ok(())
    }

    /// Return every channel to its configured initial state and drop the
    /// initialised flag.  Outputs are left as they are.
    pub fn deinit(&mut self) {
        if !self.initialised {
            return;
        }
        for (ch, led) in self.channels.iter_mut().zip(self.leds.iter()) {
            *ch = LedChannel::with_defaults(&self.config);
            ch.apply_state(led.initial);
        }
        self.initialised = false;
        info!("led: deinitialised");
    }

    pub fn is_init(&self) -> bool {
        self.initialised
    }

    // ── Immediate control ─────────────────────────────────────

    /// Jump to full or minimum duty, cancelling any fade or blink.
    pub fn set(&mut self, num: usize, state: LedState) -> Result<()> {
        let ch = self.channel_mut(num)?;
        ch.apply_state(state);
        debug!("led{}: set {:?}", num, state);
        Ok(())
    }

    /// Flip between full and minimum duty, cancelling any fade or blink.
    pub fn toggle(&mut self, num: usize) -> Result<()> {
        let ch = self.channel_mut(num)?;
        ch.toggle();
        debug!("led{}: toggled to {}", num, ch.duty());
        Ok(())
    }

    pub fn is_idle(&self, num: usize) -> Result<bool> {
        Ok(self.channel(num)?.is_idle())
    }

    pub fn is_on(&self, num: usize) -> Result<bool> {
        Ok(self.channel(num)?.is_on())
    }

    /// Seconds the LED has continuously held at least half brightness.
    pub fn active_time(&self, num: usize) -> Result<f32> {
        Ok(self.channel(num)?.active_duration())
    }

    pub fn duty(&self, num: usize) -> Result<f32> {
        Ok(self.channel(num)?.duty())
    }

    pub fn mode(&self, num: usize) -> Result<Mode> {
        Ok(self.channel(num)?.mode())
    }

    // ── Blink control ─────────────────────────────────────────

    /// Hard on/off blinking: `on_s` lit out of every `period_s`.
    pub fn blink(&mut self, num: usize, on_s: f32, period_s: f32, count: BlinkCount) -> Result<()> {
        self.arm_blink(num, Mode::Blink, on_s, period_s, count)
    }

    // ── Periodic handler ──────────────────────────────────────

    /// Advance every channel by one tick and refresh its output.
    pub fn handle(&mut self) -> Result<()> {
        if !self.initialised {
            return Err(InitError::NotInitialised.into());
        }

        let scale = self.config.duty_scale;
        let clock = self.clock;
        for (idx, (ch, led)) in self.channels.iter_mut().zip(self.leds.iter()).enumerate() {
            let before = ch.mode();
            ch.step(&clock);
            if ch.mode() != before {
                debug!("led{}: {:?} -> {:?}", idx, before, ch.mode());
            }

            output::drive(&mut self.gpio, &mut self.timer, led, ch, scale);
            ch.advance_period(&clock);
            ch.advance_active_time(&clock);
        }
        Ok(())
    }

    // ── Commands ──────────────────────────────────────────────

    /// Run a queued [`LedCommand`].  Fade commands fail with
    /// [`GeneralError::FadeUnsupported`] on engines without a timer.
    pub fn execute(&mut self, cmd: LedCommand) -> Result<()> {
        self.check_channel(cmd.led())?;
        if cmd.needs_timer() && !T::PRESENT {
            return Err(GeneralError::FadeUnsupported.into());
        }
        match cmd {
            LedCommand::Set { led, state } => self.set(led, state),
            LedCommand::Toggle { led } => self.toggle(led),
            LedCommand::Blink {
                led,
                on_s,
                period_s,
                count,
            } => self.blink(led, on_s, period_s, count),
            LedCommand::SetSmooth { led, state } => self.arm_fade(led, state),
            LedCommand::BlinkSmooth {
                led,
                on_s,
                period_s,
                count,
            } => self.arm_blink(led, Mode::FadeBlink, on_s, period_s, count),
            LedCommand::SetFadeConfig { led, config } => self.apply_fade_config(led, config),
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    /// Read-only view of a channel's full state.
    pub fn channel(&self, num: usize) -> Result<&LedChannel> {
        self.check_channel(num)?;
        Ok(&self.channels[num])
    }

    pub const fn channel_count(&self) -> usize {
        N
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    // ── Internal ──────────────────────────────────────────────

    fn check_channel(&self, num: usize) -> Result<()> {
        if !self.initialised {
            return Err(InitError::NotInitialised.into());
        }
        if num >= N {
            return Err(GeneralError::InvalidChannel(num).into());
        }
        Ok(())
    }

    fn channel_mut(&mut self, num: usize) -> Result<&mut LedChannel> {
        self.check_channel(num)?;
        Ok(&mut self.channels[num])
    }

    /// Channel that may accept a timed command.
    fn idle_channel_mut(&mut self, num: usize) -> Result<&mut LedChannel> {
        let ch = self.channel_mut(num)?;
        if !ch.is_idle() {
            debug!("led{}: busy in {:?}, command rejected", num, ch.mode());
            return Err(GeneralError::Busy.into());
        }
        Ok(ch)
    }

    fn arm_blink(&mut self, num: usize, mode: Mode, on_s: f32, period_s: f32, count: BlinkCount) -> Result<()> {
        self.check_channel(num)?;
        let timing_ok = on_s.is_finite() && period_s.is_finite() && on_s >= 0.0 && on_s < period_s;
        if !timing_ok {
            return Err(GeneralError::InvalidTiming.into());
        }
        let ch = self.idle_channel_mut(num)?;
        ch.start_blink(mode, on_s, period_s, count);
        debug!(
            "led{}: {:?} on={}s period={}s count={:?}",
            num, mode, on_s, period_s, count
        );
        Ok(())
    }

    fn arm_fade(&mut self, num: usize, state: LedState) -> Result<()> {
        let ch = self.idle_channel_mut(num)?;
        ch.start_fade(state);
        debug!("led{}: fading {:?} from {}", num, state, ch.duty());
        Ok(())
    }

    fn apply_fade_config(&mut self, num: usize, fade: FadeConfig) -> Result<()> {
        self.check_channel(num)?;
        self.validate_fade(&fade)?;
        let ch = self.idle_channel_mut(num)?;
        ch.configure_fade(fade.fade_in_s, fade.fade_out_s, fade.max_duty, fade.min_duty);
        debug!("led{}: fade config {:?}", num, fade);
        Ok(())
    }

    fn validate_fade(&self, fade: &FadeConfig) -> Result<()> {
        if !self.config.fade_time_in_range(fade.fade_in_s) {
            return Err(bad_fade("fade_in_s out of range"));
        }
        if !self.config.fade_time_in_range(fade.fade_out_s) {
            return Err(bad_fade("fade_out_s out of range"));
        }
        if !(fade.min_duty.is_finite() && fade.min_duty >= 0.0) {
            return Err(bad_fade("min_duty below zero"));
        }
        if !(fade.max_duty.is_finite() && fade.max_duty <= self.config.duty_scale) {
            return Err(bad_fade("max_duty above scale"));
        }
        if fade.min_duty >= fade.max_duty {
            return Err(bad_fade("min_duty not below max_duty"));
        }
        Ok(())
    }
}

fn bad_fade(field: &'static str) -> Error {
    GeneralError::InvalidFadeConfig(field).into()
}

/// Fade operations, available only when a real PWM timer was supplied.
impl<G: GpioOutput, T: TimerPort, const N: usize> LedEngine<G, T, N> {
    /// Ramp towards full (`On`) or minimum (`Off`) duty from the current
    /// level.  Rejected unless the channel is idle.
    pub fn set_smooth(&mut self, num: usize, state: LedState) -> Result<()> {
        self.arm_fade(num, state)
    }

    /// Install fade durations and duty bounds.  Rejected unless idle.
    pub fn set_fade_config(&mut self, num: usize, fade: FadeConfig) -> Result<()> {
        self.apply_fade_config(num, fade)
    }

    /// Blink using the fade ramps for both edges.
    pub fn blink_smooth(&mut self, num: usize, on_s: f32, period_s: f32, count: BlinkCount) -> Result<()> {
        self.arm_blink(num, Mode::FadeBlink, on_s, period_s, count)
    }
}
