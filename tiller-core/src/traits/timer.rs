//! Millisecond timer trait

/// A started periodic timer that exposes elapsed wall time in milliseconds.
///
/// Implementations wrap a hardware timer whose interrupt increments a
/// [`crate::clock::TickCounter`] once per millisecond; `now_ms` reads that
/// counter. The counter never resets except at power-on.
pub trait MillisTimer {
    /// Error reported when the underlying timer cannot be started
    type Error;

    /// Start the periodic tick. Failure here is a boot-time fatal
    /// condition; the caller cannot run the scheduler without a tick.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Milliseconds elapsed since power-on
    fn now_ms(&self) -> u64;
}
