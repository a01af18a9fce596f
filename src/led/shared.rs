//! Engine instance shared between a timer context and a control loop.
//!
//! The engine itself holds no locks.  When the periodic handler and the
//! command issuers run in different contexts, wrap the engine here: every
//! access goes through a critical-section mutex, so a command never
//! observes a half-advanced tick.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::{GpioOutput, LedEngine, TimerOutput};
use crate::error::Result;

pub struct SharedLedEngine<G, T, const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<LedEngine<G, T, N>>>,
}

impl<G: GpioOutput, T: TimerOutput, const N: usize> SharedLedEngine<G, T, N> {
    pub fn new(engine: LedEngine<G, T, N>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    ///
    /// Do not call `lock` again from inside `f`.
    pub fn lock<R>(&self, f: impl FnOnce(&mut LedEngine<G, T, N>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// One handler tick under the lock.
    pub fn handle(&self) -> Result<()> {
        self.lock(LedEngine::handle)
    }

    pub fn into_inner(self) -> LedEngine<G, T, N> {
        self.inner.into_inner().into_inner()
    }
}
