//! Shared millisecond tick counter
//!
//! One hardware timer interrupt increments the counter once per
//! millisecond; the cooperative loop reads it through
//! [`crate::traits::MillisTimer`]. Single writer, relaxed ordering: the
//! design assumes a single-core target with non-nesting same-priority
//! interrupts, and `portable-atomic` keeps the 64-bit counter sound on
//! cores without native 64-bit atomics.

use portable_atomic::{AtomicU64, Ordering};

/// Monotonic millisecond counter shared between interrupt and loop context
#[derive(Debug, Default)]
pub struct TickCounter {
    ticks: AtomicU64,
}

impl TickCounter {
    /// Create a counter at zero, suitable for a `static`
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
        }
    }

    /// Advance by one millisecond. Called from the timer interrupt only.
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Milliseconds elapsed since power-on
    pub fn now_ms(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}
