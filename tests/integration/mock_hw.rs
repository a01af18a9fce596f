//! Mock GPIO and PWM ports for integration tests.
//!
//! Record every write so tests can assert on the full output history
//! without touching real GPIO/PWM registers.

use ledfsm::app::ports::{DriverError, GpioPin, GpioPort, TimerChannel, TimerPort};
use ledfsm::led::{LedConfig, LedEngine};
use ledfsm::EngineConfig;

// ── MockGpio ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockGpio {
    pub writes: Vec<(GpioPin, bool)>,
    /// Make `init()` fail.
    pub fail_init: bool,
    ready: bool,
}

#[allow(dead_code)]
impl MockGpio {
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    /// Last level written to `pin`.
    pub fn level(&self, pin: GpioPin) -> Option<bool> {
        self.writes.iter().rev().find(|(p, _)| *p == pin).map(|&(_, high)| high)
    }
}

impl GpioPort for MockGpio {
    fn init(&mut self) -> Result<(), DriverError> {
        if self.fail_init {
            return Err(DriverError::Hardware(-1));
        }
        self.ready = true;
        Ok(())
    }

    fn is_init(&self) -> bool {
        self.ready
    }

    fn set(&mut self, pin: GpioPin, high: bool) {
        self.writes.push((pin, high));
    }
}

// ── MockTimer ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockTimer {
    pub writes: Vec<(TimerChannel, f32)>,
    /// Make `init()` fail.
    pub fail_init: bool,
    /// `init()` succeeds but the timer never reports ready.
    pub stuck: bool,
    ready: bool,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    pub fn stuck() -> Self {
        Self {
            stuck: true,
            ..Self::default()
        }
    }

    /// Last percentage written to `channel`.
    pub fn duty(&self, channel: TimerChannel) -> Option<f32> {
        self.writes.iter().rev().find(|(c, _)| *c == channel).map(|&(_, pct)| pct)
    }
}

impl TimerPort for MockTimer {
    fn init(&mut self) -> Result<(), DriverError> {
        if self.fail_init {
            return Err(DriverError::NotReady);
        }
        self.ready = !self.stuck;
        Ok(())
    }

    fn is_init(&self) -> bool {
        self.ready
    }

    fn set_duty(&mut self, channel: TimerChannel, percent: f32) {
        self.writes.push((channel, percent));
    }
}

// ── Engine helpers ────────────────────────────────────────────

pub type TestEngine<const N: usize> = LedEngine<MockGpio, MockTimer, N>;

/// Engine over fresh mocks with default config, initialised with `table`.
#[allow(dead_code)]
pub fn engine<const N: usize>(table: [LedConfig; N]) -> TestEngine<N> {
    let mut e = TestEngine::new(MockGpio::default(), MockTimer::default(), EngineConfig::default())
        .expect("default config is valid");
    e.init(&table).expect("init with matching table");
    e
}

/// Run `n` handler ticks.
#[allow(dead_code)]
pub fn run<const N: usize>(e: &mut TestEngine<N>, n: usize) {
    for _ in 0..n {
        e.handle().expect("handler runs after init");
    }
}

/// Tick until `done` holds, returning the number of ticks taken.
/// Gives up after `limit` ticks and returns `None`.
#[allow(dead_code)]
pub fn ticks_until<const N: usize>(
    e: &mut TestEngine<N>,
    limit: usize,
    mut done: impl FnMut(&TestEngine<N>) -> bool,
) -> Option<usize> {
    for t in 1..=limit {
        e.handle().expect("handler runs after init");
        if done(e) {
            return Some(t);
        }
    }
    None
}
