//! Inbound LED commands and the queue that carries them.
//!
//! Producers (button handlers, RPC, other tasks) post a [`LedCommand`];
//! the control loop drains the queue between handler ticks and hands each
//! command to [`LedEngine::execute`](crate::led::LedEngine::execute).
//!
//! ```text
//! ┌──────────────┐  LedCommand  ┌──────────────┐
//! │  Producers   │─────────────▶│ Control Loop │──▶ LedEngine
//! └──────────────┘ COMMAND_QUEUE └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use serde::{Deserialize, Serialize};

use crate::led::{BlinkCount, FadeConfig, LedState};

/// One engine operation, addressed to a channel index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LedCommand {
    Set { led: usize, state: LedState },
    Toggle { led: usize },
    /// Ramp to `state`.  Needs a PWM timer.
    SetSmooth { led: usize, state: LedState },
    Blink {
        led: usize,
        on_s: f32,
        period_s: f32,
        count: BlinkCount,
    },
    /// Blink with faded edges.  Needs a PWM timer.
    BlinkSmooth {
        led: usize,
        on_s: f32,
        period_s: f32,
        count: BlinkCount,
    },
    /// Install fade times and duty bounds.  Needs a PWM timer.
    SetFadeConfig { led: usize, config: FadeConfig },
}

impl LedCommand {
    /// Target channel index.
    pub fn led(&self) -> usize {
        match *self {
            Self::Set { led, .. }
            | Self::Toggle { led }
            | Self::SetSmooth { led, .. }
            | Self::Blink { led, .. }
            | Self::BlinkSmooth { led, .. }
            | Self::SetFadeConfig { led, .. } => led,
        }
    }

    /// Whether the command only makes sense on a timer-driven engine.
    pub fn needs_timer(&self) -> bool {
        matches!(
            self,
            Self::SetSmooth { .. } | Self::BlinkSmooth { .. } | Self::SetFadeConfig { .. }
        )
    }
}

/// Queue depth.
const COMMAND_DEPTH: usize = 8;

/// Commands waiting for the control loop.
pub static COMMAND_QUEUE: Channel<CriticalSectionRawMutex, LedCommand, COMMAND_DEPTH> = Channel::new();

/// Queue a command without blocking.  Returns `false` if the queue is full
/// (command dropped).
pub fn post_command(cmd: LedCommand) -> bool {
    COMMAND_QUEUE.try_send(cmd).is_ok()
}

/// Next queued command, if any.
pub fn next_command() -> Option<LedCommand> {
    COMMAND_QUEUE.try_receive().ok()
}
