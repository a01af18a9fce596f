//! The firmware control loop on host: queued commands and timer ticks
//! feeding a real LED engine over the simulated LEDC adapter.

use ledfsm::adapters::ledc::{EspGpio, EspLedc};
use ledfsm::app::commands::{next_command, post_command, LedCommand};
use ledfsm::drivers::hw_timer;
use ledfsm::led::{BoardTable, LedEngine};
use ledfsm::{events, pins, BlinkCount, EngineConfig, LedState, Mode};

type BoardEngine = LedEngine<EspGpio<2>, EspLedc<2>, { pins::BOARD_LED_COUNT }>;

/// One pass of the firmware loop body.
fn service(e: &mut BoardEngine) -> usize {
    while let Some(cmd) = next_command() {
        let _ = e.execute(cmd);
    }
    let ticks = events::take_ticks();
    for _ in 0..ticks {
        e.handle().unwrap();
    }
    ticks as usize
}

// The command queue and tick counter are process-wide statics; this is the
// only test in the binary that touches them.
#[test]
fn board_runs_from_queue_and_ticks() {
    let config = EngineConfig::default();
    let board = BoardTable::from_slice(&pins::BOARD_LEDS).unwrap();
    let gpio = EspGpio::new(pins::GPIO_LED_PINS);
    let ledc = EspLedc::new(pins::LEDC_LED_GPIOS, pins::LED_PWM_FREQ_HZ, pins::LED_PWM_RESOLUTION_BITS);
    let mut e: BoardEngine = LedEngine::new(gpio, ledc, config.clone()).unwrap();
    e.init(&board).unwrap();
    hw_timer::start_tick_timer(config.tick_period_us()).unwrap();

    while next_command().is_some() {}
    events::take_ticks();

    // Power LED is active-low and starts on.
    assert_eq!(e.gpio().level(pins::LED_POWER_GPIO), Some(false));
    // Backlight is active-low and starts off: full PWM.
    assert_eq!(e.timer().duty(pins::LED_BACKLIGHT_LEDC_CH), Some(1023));

    assert!(post_command(LedCommand::SetSmooth {
        led: pins::STATUS_LED,
        state: LedState::On,
    }));
    assert!(post_command(LedCommand::Blink {
        led: pins::FAULT_LED,
        on_s: 0.05,
        period_s: 0.1,
        count: BlinkCount::Repeat(1),
    }));

    // Feed ticks in timer-sized batches the way the loop sees them.
    let mut total = 0;
    while total < 150 {
        hw_timer::simulate_ticks(10);
        total += service(&mut e);
    }

    assert_eq!(e.mode(pins::STATUS_LED), Ok(Mode::Normal));
    assert_eq!(e.duty(pins::STATUS_LED), Ok(100.0));
    assert_eq!(e.timer().duty(pins::LED_STATUS_LEDC_CH), Some(1023));
    assert_eq!(e.mode(pins::FAULT_LED), Ok(Mode::Normal));
    assert_eq!(e.gpio().level(pins::LED_FAULT_GPIO), Some(false));

    // A backlog beyond the cap is trimmed, not replayed.
    let queued = hw_timer::simulate_ticks(events::MAX_PENDING_TICKS + 5);
    assert_eq!(queued, events::MAX_PENDING_TICKS);
    assert_eq!(service(&mut e), events::MAX_PENDING_TICKS as usize);

    hw_timer::stop_tick_timer();
}
