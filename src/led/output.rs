//! Per-LED output stage: duty → GPIO level or PWM percentage.
//!
//! The engine is generic over a GPIO type and a timer type.  Boards that
//! lack one of them plug in [`NoGpio`] / [`NoTimer`] instead, and `init()`
//! refuses any LED table that routes a channel to the missing driver.
//! Fade operations are only exposed when the timer type is a real
//! [`TimerPort`].

use log::error;

use super::board::{LedConfig, OutputDriver, Polarity};
use super::channel::LedChannel;
use crate::app::ports::{DriverError, GpioPin, GpioPort, TimerChannel, TimerPort};

// ── Driver slots ──────────────────────────────────────────────

/// GPIO slot of an engine: a [`GpioPort`] or [`NoGpio`].
pub trait GpioOutput {
    /// `false` only for [`NoGpio`].
    const PRESENT: bool;

    fn bring_up(&mut self) -> Result<(), DriverError>;
    fn ready(&self) -> bool;
    fn write_level(&mut self, pin: GpioPin, high: bool);
}

/// Timer slot of an engine: a [`TimerPort`] or [`NoTimer`].
pub trait TimerOutput {
    /// `false` only for [`NoTimer`].
    const PRESENT: bool;

    fn bring_up(&mut self) -> Result<(), DriverError>;
    fn ready(&self) -> bool;
    fn write_duty(&mut self, channel: TimerChannel, percent: f32);
}

impl<P: GpioPort> GpioOutput for P {
    const PRESENT: bool = true;

    fn bring_up(&mut self) -> Result<(), DriverError> {
        self.init()
    }

    fn ready(&self) -> bool {
        self.is_init()
    }

    fn write_level(&mut self, pin: GpioPin, high: bool) {
        self.set(pin, high);
    }
}

impl<P: TimerPort> TimerOutput for P {
    const PRESENT: bool = true;

    fn bring_up(&mut self) -> Result<(), DriverError> {
        self.init()
    }

    fn ready(&self) -> bool {
        self.is_init()
    }

    fn write_duty(&mut self, channel: TimerChannel, percent: f32) {
        self.set_duty(channel, percent);
    }
}

/// Placeholder for boards without LED GPIOs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGpio;

impl GpioOutput for NoGpio {
    const PRESENT: bool = false;

    fn bring_up(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn ready(&self) -> bool {
        true
    }

    fn write_level(&mut self, pin: GpioPin, _high: bool) {
        // init() rejects tables that route a channel here.
        debug_assert!(false, "GPIO write to pin {pin} without a GPIO driver");
        error!("led: GPIO write to pin {} without a GPIO driver", pin);
    }
}

/// Placeholder for boards without a PWM timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTimer;

impl TimerOutput for NoTimer {
    const PRESENT: bool = false;

    fn bring_up(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn ready(&self) -> bool {
        true
    }

    fn write_duty(&mut self, channel: TimerChannel, _percent: f32) {
        // init() rejects tables that route a channel here.
        debug_assert!(false, "PWM write to channel {channel} without a timer");
        error!("led: PWM write to channel {} without a timer", channel);
    }
}

// ── Conversion ────────────────────────────────────────────────

/// PWM percentage for a timer-driven LED.
///
/// Active-low channels invert against the full scale, floored at the
/// channel's dim bound.
pub fn timer_percent(duty: f32, min_duty: f32, scale: f32, polarity: Polarity) -> f32 {
    let level = match polarity {
        Polarity::ActiveHigh => duty,
        Polarity::ActiveLow => (scale - duty).max(min_duty),
    };
    (level / scale * 100.0).clamp(0.0, 100.0)
}

/// Pin level for a GPIO-driven LED.  Lit only at exactly full duty.
pub fn gpio_level(duty: f32, max_duty: f32, polarity: Polarity) -> bool {
    let lit = duty >= max_duty;
    match polarity {
        Polarity::ActiveHigh => lit,
        Polarity::ActiveLow => !lit,
    }
}

/// Push one channel's duty to its configured driver.
pub(crate) fn drive<G: GpioOutput, T: TimerOutput>(
    gpio: &mut G,
    timer: &mut T,
    led: &LedConfig,
    channel: &LedChannel,
    scale: f32,
) {
    match led.driver {
        OutputDriver::Timer(ch) => {
            let percent = timer_percent(channel.duty(), channel.min_duty(), scale, led.polarity);
            timer.write_duty(ch, percent);
        }
        OutputDriver::Gpio(pin) => {
            gpio.write_level(pin, gpio_level(channel.duty(), channel.max_duty(), led.polarity));
        }
    }
}
