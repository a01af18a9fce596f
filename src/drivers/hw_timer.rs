//! Periodic LED tick timer using ESP-IDF's esp_timer API.
//!
//! The callback runs in the ESP timer task (not ISR) and only calls
//! [`signal_tick`], which is a single atomic update.  The control loop
//! drains the backlog and runs the LED handler.  On host builds nothing
//! is started; the caller paces the loop itself.

use crate::app::ports::DriverError;
use crate::events::signal_tick;

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(feature = "espidf")]
use log::info;

#[cfg(feature = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before the
/// callback can fire.  Only called from the single main task.
#[cfg(feature = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t {
    unsafe { TICK_TIMER }
}

#[cfg(feature = "espidf")]
unsafe extern "C" fn led_tick_cb(_arg: *mut core::ffi::c_void) {
    if !signal_tick() {
        log::warn!("hw_timer: tick backlog full, tick dropped");
    }
}

/// Start the periodic LED tick at `period_us` microseconds.
#[cfg(feature = "espidf")]
pub fn start_tick_timer(period_us: u64) -> Result<(), DriverError> {
    // SAFETY: TICK_TIMER is written here once at boot from the single
    // main-task context before the callback can fire.
    unsafe {
        if !tick_timer().is_null() {
            return Ok(());
        }
        let args = esp_timer_create_args_t {
            callback: Some(led_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"led_tick\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={})", ret);
            return Err(DriverError::Hardware(ret));
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, period_us);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return Err(DriverError::Hardware(ret));
        }
    }
    info!("hw_timer: LED tick every {}us", period_us);
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn start_tick_timer(period_us: u64) -> Result<(), DriverError> {
    log::info!("hw_timer(sim): {}us tick not started, caller drives ticks", period_us);
    Ok(())
}

/// Stop the tick timer.  Pending ticks stay queued.
#[cfg(feature = "espidf")]
pub fn stop_tick_timer() {
    // SAFETY: tick_timer() contract, main task only.  Null check covers a
    // timer that never started.
    unsafe {
        let t = tick_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(feature = "espidf"))]
pub fn stop_tick_timer() {}

/// Host stand-in for the timer callback: queue `n` ticks.
#[cfg(not(feature = "espidf"))]
pub fn simulate_ticks(n: u32) -> u32 {
    (0..n).filter(|_| signal_tick()).count() as u32
}
