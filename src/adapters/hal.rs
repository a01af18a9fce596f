//! Ports over `embedded-hal` 1.0 pins and PWM channels.
//!
//! Any HAL that implements [`OutputPin`] / [`SetDutyCycle`] can drive the
//! engine without a board-specific adapter.  Pin numbers in the LED table
//! are looked up in the `(number, pin)` list handed to [`HalGpio::new`];
//! timer channel numbers index the PWM array directly.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use log::{error, warn};

use crate::app::ports::{DriverError, GpioPin, GpioPort, TimerChannel, TimerPort};

/// GPIO port over `N` HAL output pins.
pub struct HalGpio<P, const N: usize> {
    pins: [(GpioPin, P); N],
}

impl<P: OutputPin, const N: usize> HalGpio<P, N> {
    pub fn new(pins: [(GpioPin, P); N]) -> Self {
        Self { pins }
    }

    pub fn into_inner(self) -> [(GpioPin, P); N] {
        self.pins
    }
}

impl<P: OutputPin, const N: usize> GpioPort for HalGpio<P, N> {
    // HAL pins are configured when the HAL hands them out.
    fn init(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn is_init(&self) -> bool {
        true
    }

    fn set(&mut self, pin: GpioPin, high: bool) {
        let Some((_, p)) = self.pins.iter_mut().find(|(n, _)| *n == pin) else {
            error!("hal: GPIO {} is not an LED pin", pin);
            return;
        };
        if p.set_state(PinState::from(high)).is_err() {
            warn!("hal: GPIO {} write failed", pin);
        }
    }
}

/// Timer port over `N` HAL PWM channels.
pub struct HalPwm<C, const N: usize> {
    channels: [C; N],
}

impl<C: SetDutyCycle, const N: usize> HalPwm<C, N> {
    pub fn new(channels: [C; N]) -> Self {
        Self { channels }
    }

    pub fn into_inner(self) -> [C; N] {
        self.channels
    }
}

impl<C: SetDutyCycle, const N: usize> TimerPort for HalPwm<C, N> {
    fn init(&mut self) -> Result<(), DriverError> {
        if self.channels.iter().any(|c| c.max_duty_cycle() == 0) {
            return Err(DriverError::NotReady);
        }
        Ok(())
    }

    fn is_init(&self) -> bool {
        true
    }

    fn set_duty(&mut self, channel: TimerChannel, percent: f32) {
        let Some(c) = self.channels.get_mut(usize::from(channel)) else {
            error!("hal: PWM channel {} out of range", channel);
            return;
        };
        let max = c.max_duty_cycle();
        let raw = (percent.clamp(0.0, 100.0) / 100.0 * f32::from(max)).round() as u16;
        if c.set_duty_cycle(raw.min(max)).is_err() {
            warn!("hal: PWM channel {} write failed", channel);
        }
    }
}
