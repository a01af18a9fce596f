//! ESP32 LED outputs: plain GPIO pins and LEDC PWM channels.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: configures and drives the peripherals with raw sys calls.
//! On host/test: records the last level/duty in memory so the control
//! loop can run in simulation.

use log::info;
#[cfg(feature = "espidf")]
use log::warn;

use crate::app::ports::{DriverError, GpioPin, GpioPort, TimerChannel, TimerPort};

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

// ── GPIO ──────────────────────────────────────────────────────

/// Output-only GPIO driver for `N` LED pins.
pub struct EspGpio<const N: usize> {
    pins: [GpioPin; N],
    levels: [bool; N],
    ready: bool,
}

impl<const N: usize> EspGpio<N> {
    pub const fn new(pins: [GpioPin; N]) -> Self {
        Self {
            pins,
            levels: [false; N],
            ready: false,
        }
    }

    fn slot(&self, pin: GpioPin) -> Option<usize> {
        self.pins.iter().position(|&p| p == pin)
    }

    /// Last level written to `pin`, if the pin belongs to this driver.
    pub fn level(&self, pin: GpioPin) -> Option<bool> {
        self.slot(pin).map(|i| self.levels[i])
    }
}

impl<const N: usize> GpioPort for EspGpio<N> {
    fn init(&mut self) -> Result<(), DriverError> {
        #[cfg(feature = "espidf")]
        for &pin in &self.pins {
            let cfg = gpio_config_t {
                pin_bit_mask: 1u64 << pin,
                mode: gpio_mode_t_GPIO_MODE_OUTPUT,
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
                pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
                intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            };
            // SAFETY: called once from LedEngine::init on the main task.
            let ret = unsafe { gpio_config(&cfg) };
            if ret != ESP_OK {
                return Err(DriverError::Hardware(ret));
            }
        }
        self.ready = true;
        info!("ledc: {} GPIO LED pin(s) configured", N);
        Ok(())
    }

    fn is_init(&self) -> bool {
        self.ready
    }

    fn set(&mut self, pin: GpioPin, high: bool) {
        let Some(i) = self.slot(pin) else {
            log::error!("ledc: GPIO {} is not an LED pin", pin);
            return;
        };
        self.levels[i] = high;

        #[cfg(feature = "espidf")]
        {
            // SAFETY: pin was configured as an output in init().
            let ret = unsafe { gpio_set_level(i32::from(pin), u32::from(high)) };
            if ret != ESP_OK {
                warn!("ledc: gpio_set_level({}) failed (rc={})", pin, ret);
            }
        }
    }
}

// ── LEDC PWM ──────────────────────────────────────────────────

/// LEDC timer plus `N` channels, channel `i` routed to `gpios[i]`.
pub struct EspLedc<const N: usize> {
    gpios: [i32; N],
    freq_hz: u32,
    resolution_bits: u32,
    duty: [u32; N],
    ready: bool,
}

impl<const N: usize> EspLedc<N> {
    pub const fn new(gpios: [i32; N], freq_hz: u32, resolution_bits: u32) -> Self {
        Self {
            gpios,
            freq_hz,
            resolution_bits,
            duty: [0; N],
            ready: false,
        }
    }

    /// Full-scale raw duty for the configured resolution.
    pub fn max_raw(&self) -> u32 {
        (1u32 << self.resolution_bits) - 1
    }

    /// `percent` (0–100) as a raw duty register value.
    pub fn raw_duty(&self, percent: f32) -> u32 {
        let max = self.max_raw();
        ((percent.clamp(0.0, 100.0) / 100.0) * max as f32).round() as u32
    }

    /// Last raw duty written to `channel`.
    pub fn duty(&self, channel: TimerChannel) -> Option<u32> {
        self.duty.get(usize::from(channel)).copied()
    }
}

impl<const N: usize> TimerPort for EspLedc<N> {
    fn init(&mut self) -> Result<(), DriverError> {
        if !(1..=14).contains(&self.resolution_bits) {
            return Err(DriverError::NotReady);
        }

        #[cfg(feature = "espidf")]
        {
            let timer = ledc_timer_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                timer_num: ledc_timer_t_LEDC_TIMER_0,
                duty_resolution: self.resolution_bits,
                freq_hz: self.freq_hz,
                clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
                ..Default::default()
            };
            // SAFETY: called once from LedEngine::init on the main task.
            let ret = unsafe { ledc_timer_config(&timer) };
            if ret != ESP_OK {
                return Err(DriverError::Hardware(ret));
            }

            for (i, &gpio) in self.gpios.iter().enumerate() {
                let ch = ledc_channel_config_t {
                    speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                    channel: ledc_channel_t_LEDC_CHANNEL_0 + i as u32,
                    timer_sel: ledc_timer_t_LEDC_TIMER_0,
                    gpio_num: gpio,
                    duty: 0,
                    hpoint: 0,
                    ..Default::default()
                };
                // SAFETY: as above.
                let ret = unsafe { ledc_channel_config(&ch) };
                if ret != ESP_OK {
                    return Err(DriverError::Hardware(ret));
                }
            }
        }

        self.ready = true;
        info!(
            "ledc: {} channel(s) @ {}Hz, {}-bit (gpios {:?})",
            N, self.freq_hz, self.resolution_bits, self.gpios
        );
        Ok(())
    }

    fn is_init(&self) -> bool {
        self.ready
    }

    fn set_duty(&mut self, channel: TimerChannel, percent: f32) {
        let raw = self.raw_duty(percent);
        let Some(slot) = self.duty.get_mut(usize::from(channel)) else {
            log::error!("ledc: channel {} out of range", channel);
            return;
        };
        *slot = raw;

        #[cfg(feature = "espidf")]
        {
            // SAFETY: channel was configured in init(); only the control
            // loop writes duty registers.
            unsafe {
                ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, u32::from(channel), raw);
                ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, u32::from(channel));
            }
        }
    }
}
