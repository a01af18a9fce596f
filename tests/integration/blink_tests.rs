//! Hard and smooth blinking: cycle counting, rejection rules, outputs.

use crate::mock_hw::{engine, run, ticks_until, TestEngine};

use ledfsm::led::{LedConfig, LedState, Mode, Polarity};
use ledfsm::{BlinkCount, Error, GeneralError};

const TABLE: [LedConfig; 2] = [
    LedConfig::timer(0, Polarity::ActiveHigh, LedState::Off),
    LedConfig::gpio(9, Polarity::ActiveHigh, LedState::Off),
];

/// Tick `n` times, counting transitions into full duty.
fn count_on_phases(e: &mut TestEngine<2>, num: usize, n: usize) -> usize {
    let max = e.channel(num).unwrap().max_duty();
    let mut lit = e.duty(num).unwrap() >= max;
    let mut phases = 0;
    for _ in 0..n {
        e.handle().unwrap();
        let now = e.duty(num).unwrap() >= max;
        if now && !lit {
            phases += 1;
        }
        lit = now;
    }
    phases
}

#[test]
fn repeat_count_gives_count_plus_one_cycles() {
    let mut e = engine(TABLE);
    e.blink(0, 1.0, 3.0, BlinkCount::Repeat(2)).unwrap();
    assert_eq!(e.mode(0), Ok(Mode::Blink));

    // Three 3 s cycles at 100 Hz, plus slack.
    assert_eq!(count_on_phases(&mut e, 0, 1000), 3);
    assert_eq!(e.mode(0), Ok(Mode::Normal));
    assert_eq!(e.duty(0), Ok(0.0));
    assert_eq!(e.timer().duty(0), Some(0.0));
}

#[test]
fn single_blink_finishes_after_one_period() {
    let mut e = engine(TABLE);
    e.blink(0, 0.2, 0.5, BlinkCount::once()).unwrap();

    let done = ticks_until(&mut e, 100, |e| e.is_idle(0).unwrap()).expect("blink ends");
    assert!((50..=52).contains(&done), "finished after {done} ticks");
    assert_eq!(e.duty(0), Ok(0.0));
}

#[test]
fn on_phase_matches_on_time() {
    let mut e = engine(TABLE);
    e.blink(0, 0.3, 1.0, BlinkCount::once()).unwrap();

    let mut lit_ticks = 0;
    for _ in 0..100 {
        e.handle().unwrap();
        if e.duty(0).unwrap() == 100.0 {
            lit_ticks += 1;
        }
    }
    assert!((29..=31).contains(&lit_ticks), "lit for {lit_ticks} ticks");
}

#[test]
fn continuous_blink_never_stops_by_itself() {
    let mut e = engine(TABLE);
    e.blink(0, 0.1, 0.2, BlinkCount::Continuous).unwrap();
    let phases = count_on_phases(&mut e, 0, 2000);
    assert!(phases >= 85, "only {phases} cycles in 20 s");
    assert_eq!(e.mode(0), Ok(Mode::Blink));
    assert_eq!(e.channel(0).unwrap().blink_count(), BlinkCount::Continuous);
}

#[test]
fn busy_channel_rejects_timed_commands() {
    let mut e = engine(TABLE);
    e.blink(0, 0.5, 1.0, BlinkCount::Continuous).unwrap();
    run(&mut e, 7);
    let before = *e.channel(0).unwrap();

    let busy = Err(Error::General(GeneralError::Busy));
    assert_eq!(e.blink(0, 0.1, 0.2, BlinkCount::once()), busy);
    assert_eq!(e.blink_smooth(0, 0.1, 0.2, BlinkCount::once()), busy);
    assert_eq!(e.set_smooth(0, LedState::On), busy);

    assert_eq!(*e.channel(0).unwrap(), before, "rejected commands leave no trace");
}

#[test]
fn invalid_timing_is_rejected() {
    let mut e = engine(TABLE);
    let invalid = Err(Error::General(GeneralError::InvalidTiming));

    assert_eq!(e.blink(0, 1.0, 1.0, BlinkCount::once()), invalid);
    assert_eq!(e.blink(0, 2.0, 1.0, BlinkCount::once()), invalid);
    assert_eq!(e.blink(0, -0.1, 1.0, BlinkCount::once()), invalid);
    assert_eq!(e.blink(0, f32::NAN, 1.0, BlinkCount::once()), invalid);
    assert_eq!(e.blink(0, 0.5, f32::INFINITY, BlinkCount::once()), invalid);
    assert_eq!(e.blink_smooth(0, 1.0, 0.5, BlinkCount::once()), invalid);
    assert_eq!(e.mode(0), Ok(Mode::Normal));
}

#[test]
fn zero_on_time_stays_dark() {
    let mut e = engine(TABLE);
    e.blink(0, 0.0, 0.5, BlinkCount::Repeat(1)).unwrap();
    assert_eq!(count_on_phases(&mut e, 0, 200), 0);
    assert_eq!(e.mode(0), Ok(Mode::Normal));
}

#[test]
fn gpio_blink_toggles_the_pin() {
    let mut e = engine(TABLE);
    e.blink(1, 0.05, 0.1, BlinkCount::Repeat(3)).unwrap();
    run(&mut e, 100);

    let levels: Vec<bool> = e.gpio().writes.iter().filter(|(p, _)| *p == 9).map(|&(_, l)| l).collect();
    let rising = levels.windows(2).filter(|w| !w[0] && w[1]).count();
    assert_eq!(rising, 4);
    assert_eq!(e.gpio().level(9), Some(false));
}

#[test]
fn active_time_tracks_the_on_phase() {
    let mut e = engine(TABLE);
    e.blink(0, 0.5, 1.0, BlinkCount::Continuous).unwrap();

    run(&mut e, 40);
    let t = e.active_time(0).unwrap();
    assert!((t - 0.4).abs() < 0.02, "active for {t}s");

    run(&mut e, 30); // into the off phase
    assert_eq!(e.active_time(0), Ok(0.0));
}

#[test]
fn smooth_blink_ramps_both_edges() {
    let mut e = engine(TABLE);
    e.blink_smooth(0, 1.5, 3.0, BlinkCount::once()).unwrap();
    assert_eq!(e.mode(0), Ok(Mode::FadeBlink));

    run(&mut e, 50);
    let rising = e.duty(0).unwrap();
    assert!(rising > 0.0 && rising < 100.0, "mid-ramp duty {rising}");

    run(&mut e, 80); // 1.3 s: ramp (1 s) done, still in the on phase
    assert_eq!(e.duty(0), Ok(100.0));
    assert_eq!(e.mode(0), Ok(Mode::FadeBlink));

    run(&mut e, 40); // 1.7 s: ramping down
    let falling = e.duty(0).unwrap();
    assert!(falling > 0.0 && falling < 100.0, "mid-ramp duty {falling}");

    let done = ticks_until(&mut e, 300, |e| e.is_idle(0).unwrap()).expect("smooth blink ends");
    assert!(done < 140, "ended {done} ticks after the down ramp began");
    assert_eq!(e.duty(0), Ok(0.0));
}
