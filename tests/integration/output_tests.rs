//! Duty → pin level / PWM percentage through the engine.

use crate::mock_hw::{engine, run, MockGpio, MockTimer, TestEngine};

use ledfsm::app::commands::LedCommand;
use ledfsm::led::{FadeConfig, LedConfig, LedEngine, LedState, Mode, NoTimer, Polarity};
use ledfsm::{BlinkCount, EngineConfig, Error, GeneralError};

#[test]
fn active_low_timer_output_is_inverted() {
    let mut e = engine([LedConfig::timer(2, Polarity::ActiveLow, LedState::Off)]);
    assert_eq!(e.timer().duty(2), Some(100.0));

    e.set(0, LedState::On).unwrap();
    run(&mut e, 1);
    assert_eq!(e.timer().duty(2), Some(0.0));

    e.set(0, LedState::Off).unwrap();
    e.set_smooth(0, LedState::On).unwrap();
    run(&mut e, 50);
    let duty = e.duty(0).unwrap();
    let pct = e.timer().duty(2).unwrap();
    assert!((pct - (100.0 - duty)).abs() < 1e-3, "pct {pct} vs duty {duty}");
}

#[test]
fn timer_output_follows_every_tick() {
    let mut e = engine([LedConfig::timer(0, Polarity::ActiveHigh, LedState::Off)]);
    e.set_smooth(0, LedState::On).unwrap();
    for _ in 0..40 {
        e.handle().unwrap();
        let pct = e.timer().duty(0).unwrap();
        assert!((pct - e.duty(0).unwrap()).abs() < 1e-3);
    }
    // One write per tick plus the one from init.
    assert_eq!(e.timer().writes.len(), 41);
}

#[test]
fn gpio_is_lit_only_at_full_duty() {
    let mut e = engine([
        LedConfig::gpio(3, Polarity::ActiveHigh, LedState::Off),
        LedConfig::timer(0, Polarity::ActiveHigh, LedState::Off),
    ]);
    e.set_smooth(0, LedState::On).unwrap();
    run(&mut e, 60);
    assert!(e.duty(0).unwrap() > 0.0);
    assert_eq!(e.gpio().level(3), Some(false), "partial duty leaves the pin off");

    run(&mut e, 60);
    assert_eq!(e.gpio().level(3), Some(true));
}

#[test]
fn unit_duty_scale() {
    let cfg = EngineConfig {
        duty_scale: 1.0,
        ..EngineConfig::default()
    };
    let mut e: TestEngine<1> = LedEngine::new(MockGpio::default(), MockTimer::default(), cfg).unwrap();
    e.init(&[LedConfig::timer(0, Polarity::ActiveHigh, LedState::On)]).unwrap();

    assert_eq!(e.duty(0), Ok(1.0));
    assert_eq!(e.timer().duty(0), Some(100.0));

    e.set_smooth(0, LedState::Off).unwrap();
    run(&mut e, 150);
    assert_eq!(e.duty(0), Ok(0.0));
    assert_eq!(e.timer().duty(0), Some(0.0));

    let err = e.set_fade_config(
        0,
        FadeConfig {
            fade_in_s: 1.0,
            fade_out_s: 1.0,
            max_duty: 2.0,
            min_duty: 0.0,
        },
    );
    assert!(matches!(err, Err(Error::General(GeneralError::InvalidFadeConfig(_)))));
}

#[test]
fn commands_dispatch_through_execute() {
    let mut e = engine([
        LedConfig::timer(0, Polarity::ActiveHigh, LedState::Off),
        LedConfig::gpio(7, Polarity::ActiveHigh, LedState::Off),
    ]);

    e.execute(LedCommand::Set {
        led: 1,
        state: LedState::On,
    })
    .unwrap();
    e.execute(LedCommand::Toggle { led: 1 }).unwrap();
    assert_eq!(e.duty(1), Ok(0.0));

    e.execute(LedCommand::SetFadeConfig {
        led: 0,
        config: FadeConfig {
            fade_in_s: 0.5,
            fade_out_s: 0.5,
            max_duty: 60.0,
            min_duty: 0.0,
        },
    })
    .unwrap();
    e.execute(LedCommand::SetSmooth {
        led: 0,
        state: LedState::On,
    })
    .unwrap();
    assert_eq!(e.mode(0), Ok(Mode::FadeIn));
    run(&mut e, 80);
    assert_eq!(e.duty(0), Ok(60.0));

    e.execute(LedCommand::BlinkSmooth {
        led: 0,
        on_s: 0.6,
        period_s: 1.2,
        count: BlinkCount::once(),
    })
    .unwrap();
    assert_eq!(e.mode(0), Ok(Mode::FadeBlink));

    e.execute(LedCommand::Blink {
        led: 1,
        on_s: 0.1,
        period_s: 0.3,
        count: BlinkCount::Continuous,
    })
    .unwrap();
    assert_eq!(e.mode(1), Ok(Mode::Blink));

    let busy = e.execute(LedCommand::SetSmooth {
        led: 0,
        state: LedState::Off,
    });
    assert_eq!(busy, Err(Error::General(GeneralError::Busy)));
}

#[test]
fn gpio_only_engine_refuses_fade_commands() {
    let mut e: LedEngine<MockGpio, NoTimer, 1> =
        LedEngine::gpio_only(MockGpio::default(), EngineConfig::default()).unwrap();
    e.init(&[LedConfig::gpio(2, Polarity::ActiveLow, LedState::Off)]).unwrap();
    assert_eq!(e.gpio().level(2), Some(true));

    let unsupported = Err(Error::General(GeneralError::FadeUnsupported));
    assert_eq!(
        e.execute(LedCommand::SetSmooth {
            led: 0,
            state: LedState::On
        }),
        unsupported
    );
    assert_eq!(
        e.execute(LedCommand::BlinkSmooth {
            led: 0,
            on_s: 0.1,
            period_s: 0.2,
            count: BlinkCount::once()
        }),
        unsupported
    );

    // Hard blink works without a timer.
    e.execute(LedCommand::Blink {
        led: 0,
        on_s: 0.1,
        period_s: 0.2,
        count: BlinkCount::once(),
    })
    .unwrap();
    run_gpio(&mut e, 5);
    assert_eq!(e.gpio().level(2), Some(false), "active-low pin pulled low while lit");
}

fn run_gpio(e: &mut LedEngine<MockGpio, NoTimer, 1>, n: usize) {
    for _ in 0..n {
        e.handle().unwrap();
    }
}
