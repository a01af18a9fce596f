//! Tick events from the periodic timer to the control loop.
//!
//! The timer callback only bumps a pending-tick counter; the control loop
//! takes the whole backlog and runs the LED handler once per tick.  Keeping
//! the handler out of the callback means commands and ticks are never
//! interleaved mid-update.
//!
//! ```text
//! ┌─────────────┐  signal_tick  ┌──────────────┐  take_ticks  ┌──────────────┐
//! │ esp_timer   │──────────────▶│ PENDING_TICKS│─────────────▶│  Main Loop   │
//! │ callback    │               │  (atomic)    │              │ handle() × n │
//! └─────────────┘               └──────────────┘              └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

/// Backlog ceiling.  A loop that fell this far behind drops the excess
/// rather than replaying it in a burst.
pub const MAX_PENDING_TICKS: u32 = 16;

static PENDING_TICKS: AtomicU32 = AtomicU32::new(0);
static DROPPED_TICKS: AtomicU32 = AtomicU32::new(0);

/// Record one elapsed tick.  Safe from timer-task or ISR context.
/// Returns `false` if the backlog is full (tick dropped).
pub fn signal_tick() -> bool {
    let queued = PENDING_TICKS.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
        (n < MAX_PENDING_TICKS).then_some(n + 1)
    });
    if queued.is_err() {
        DROPPED_TICKS.fetch_add(1, Ordering::Relaxed);
    }
    queued.is_ok()
}

/// Take every pending tick, leaving the counter at zero.
pub fn take_ticks() -> u32 {
    PENDING_TICKS.swap(0, Ordering::AcqRel)
}

pub fn pending_ticks() -> u32 {
    PENDING_TICKS.load(Ordering::Acquire)
}

/// Ticks lost to a full backlog since boot.
pub fn dropped_ticks() -> u32 {
    DROPPED_TICKS.load(Ordering::Relaxed)
}
