//! LED controller firmware: main entry point.
//!
//! ```text
//! ┌──────────────┐  signal_tick   ┌──────────────────────────────┐
//! │ esp_timer    │───────────────▶│  Control loop                │
//! └──────────────┘                │   1. drain COMMAND_QUEUE     │
//! ┌──────────────┐  post_command  │   2. handle() × pending ticks│──▶ EspGpio / EspLedc
//! │ other tasks  │───────────────▶│   3. sleep one tick          │
//! └──────────────┘                └──────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use ledfsm::adapters::ledc::{EspGpio, EspLedc};
use ledfsm::app::commands::{next_command, post_command, LedCommand};
use ledfsm::drivers::hw_timer;
use ledfsm::led::{BoardTable, FadeConfig, LedEngine};
use ledfsm::{events, pins, BlinkCount, EngineConfig, LedState};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ledfsm v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Engine + board table ───────────────────────────────
    let config = EngineConfig::default();
    let board = BoardTable::from_slice(&pins::BOARD_LEDS).map_err(|e| anyhow::anyhow!("board table: {e}"))?;

    let gpio = EspGpio::new(pins::GPIO_LED_PINS);
    let ledc = EspLedc::new(pins::LEDC_LED_GPIOS, pins::LED_PWM_FREQ_HZ, pins::LED_PWM_RESOLUTION_BITS);
    let mut leds: LedEngine<_, _, { pins::BOARD_LED_COUNT }> =
        LedEngine::new(gpio, ledc, config.clone()).map_err(|e| anyhow::anyhow!("{e}"))?;
    leds.init(&board).map_err(|e| anyhow::anyhow!("{e}"))?;

    // ── 3. Boot pattern ───────────────────────────────────────
    let boot = [
        LedCommand::SetFadeConfig {
            led: pins::BACKLIGHT_LED,
            config: FadeConfig {
                fade_in_s: 2.0,
                fade_out_s: 2.0,
                max_duty: config.duty_scale * 0.8,
                min_duty: 0.0,
            },
        },
        LedCommand::SetSmooth {
            led: pins::BACKLIGHT_LED,
            state: LedState::On,
        },
        LedCommand::BlinkSmooth {
            led: pins::STATUS_LED,
            on_s: 1.0,
            period_s: 3.0,
            count: BlinkCount::Continuous,
        },
    ];
    for cmd in boot {
        if !post_command(cmd) {
            warn!("boot command dropped: {:?}", cmd);
        }
    }

    // ── 4. Tick source ────────────────────────────────────────
    hw_timer::start_tick_timer(config.tick_period_us()).map_err(|e| anyhow::anyhow!("tick timer: {e}"))?;

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let mut reported_drops = 0;
    loop {
        while let Some(cmd) = next_command() {
            if let Err(e) = leds.execute(cmd) {
                warn!("led{}: {:?} rejected: {}", cmd.led(), cmd, e);
            }
        }

        for _ in 0..events::take_ticks() {
            if let Err(e) = leds.handle() {
                warn!("led handler: {}", e);
            }
        }

        let dropped = events::dropped_ticks();
        if dropped != reported_drops {
            warn!("{} LED ticks dropped since boot", dropped);
            reported_drops = dropped;
        }

        FreeRtos::delay_ms(config.tick_period_ms());
    }
}
