//! Fuzz target: LED engine command stream
//!
//! Decodes fuzz bytes into a sequence of (command, tick count) pairs and
//! drives them through a three-channel engine, verifying:
//! - No panics for any command or argument value (NaN, ±inf included)
//! - Duty stays finite and inside each channel's bounds
//! - Rejected commands never change the channel they target
//!
//! cargo fuzz run fuzz_led_commands

#![no_main]

use libfuzzer_sys::fuzz_target;
use ledfsm::adapters::ledc::{EspGpio, EspLedc};
use ledfsm::app::commands::LedCommand;
use ledfsm::led::{BlinkCount, FadeConfig, LedConfig, LedEngine, LedState, Polarity};
use ledfsm::EngineConfig;

const TABLE: [LedConfig; 3] = [
    LedConfig::timer(0, Polarity::ActiveHigh, LedState::Off),
    LedConfig::timer(1, Polarity::ActiveLow, LedState::On),
    LedConfig::gpio(5, Polarity::ActiveHigh, LedState::Off),
];

/// Pull an f32 from the stream.  Raw bit patterns reach NaN and infinities.
fn next_f32(data: &mut &[u8]) -> Option<f32> {
    let (head, rest) = data.split_first_chunk::<4>()?;
    *data = rest;
    Some(f32::from_le_bytes(*head))
}

fn next_u8(data: &mut &[u8]) -> Option<u8> {
    let (&b, rest) = data.split_first()?;
    *data = rest;
    Some(b)
}

fn next_command(data: &mut &[u8]) -> Option<LedCommand> {
    let op = next_u8(data)?;
    let led = usize::from(next_u8(data)? % 4);
    let state = LedState::from(op & 0x80 != 0);
    let cmd = match op % 6 {
        0 => LedCommand::Set { led, state },
        1 => LedCommand::Toggle { led },
        2 => LedCommand::SetSmooth { led, state },
        3 | 4 => {
            let on_s = next_f32(data)?;
            let period_s = next_f32(data)?;
            let n = next_u8(data)?;
            let count = if n == 0xFF {
                BlinkCount::Continuous
            } else {
                BlinkCount::Repeat(n % 8)
            };
            if op % 6 == 3 {
                LedCommand::Blink { led, on_s, period_s, count }
            } else {
                LedCommand::BlinkSmooth { led, on_s, period_s, count }
            }
        }
        _ => LedCommand::SetFadeConfig {
            led,
            config: FadeConfig {
                fade_in_s: next_f32(data)?,
                fade_out_s: next_f32(data)?,
                max_duty: next_f32(data)?,
                min_duty: next_f32(data)?,
            },
        },
    };
    Some(cmd)
}

fuzz_target!(|data: &[u8]| {
    let mut data = data;
    let mut e: LedEngine<EspGpio<1>, EspLedc<2>, 3> =
        LedEngine::new(EspGpio::new([5]), EspLedc::new([11, 12], 5_000, 10), EngineConfig::default()).unwrap();
    e.init(&TABLE).unwrap();

    while let Some(cmd) = next_command(&mut data) {
        let target = cmd.led();
        let before = e.channel(target).ok().copied();

        if e.execute(cmd).is_err() {
            if let Some(before) = before {
                assert_eq!(e.channel(target).ok().copied(), Some(before), "rejected {cmd:?} changed led{target}");
            }
        }

        let ticks = next_u8(&mut data).unwrap_or(1);
        for _ in 0..ticks {
            e.handle().unwrap();
            for n in 0..3 {
                let ch = e.channel(n).unwrap();
                assert!(ch.duty().is_finite(), "led{n} duty not finite after {cmd:?}");
                assert!(
                    ch.duty() >= ch.min_duty() && ch.duty() <= ch.max_duty(),
                    "led{n} duty {} outside [{}, {}]",
                    ch.duty(),
                    ch.min_duty(),
                    ch.max_duty()
                );
            }
        }
    }
});
