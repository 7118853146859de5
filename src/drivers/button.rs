//! ISR-debounced push-button edge detector.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  The GPIO interrupt fires on
//! the falling edge and calls [`ButtonEdgeDetector::on_falling_edge`] with
//! the current uptime.
//!
//! ## ISR contract
//!
//! The callback only touches two atomics: the debounce timestamp and the
//! pending flag.  No locks, no allocation, no logging.  An edge within
//! the debounce window of the last accepted edge is dropped.  Accepting
//! an edge is a compare-and-swap on the timestamp, so two overlapping
//! invocations cannot both accept the same press.
//!
//! The main loop consumes presses with [`take_pending`](ButtonEdgeDetector::take_pending),
//! a single atomic swap.  Presses that arrive before the previous one was
//! consumed coalesce into one.
//!
//! The timestamp starts at 0, so an edge within the first debounce window
//! after boot is treated as bounce.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub const DEFAULT_DEBOUNCE_MS: u32 = 200;

pub struct ButtonEdgeDetector {
    pending: AtomicBool,
    last_edge_ms: AtomicU32,
    window_ms: AtomicU32,
}

impl Default for ButtonEdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonEdgeDetector {
    /// `const` so the firmware can place the detector in a `static` that
    /// the ISR reaches through its argument pointer.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            last_edge_ms: AtomicU32::new(0),
            window_ms: AtomicU32::new(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Set the debounce window.  Call before the ISR is attached.
    pub fn set_window(&self, window_ms: u32) {
        self.window_ms.store(window_ms, Ordering::Relaxed);
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms.load(Ordering::Relaxed)
    }

    /// ISR handler body.  Returns whether the edge was accepted.
    pub fn on_falling_edge(&self, now_ms: u32) -> bool {
        let last = self.last_edge_ms.load(Ordering::Acquire);
        if now_ms.wrapping_sub(last) <= self.window_ms() {
            return false;
        }
        if self
            .last_edge_ms
            .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.pending.store(true, Ordering::Release);
        true
    }

    /// Read-and-clear the pending flag in one step.
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}
