//! Clock source abstraction.
//!
//! The timer never owns a hardware counter. It reads two free-running tick
//! counters through [`Clock`]: milliseconds and microseconds since boot, each
//! wrapping at `u32::MAX` on its own period (about 49.7 days and 71.6 minutes
//! respectively).

use core::cell::Cell;

/// Monotonic millisecond and microsecond tick source.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`.
    fn millis(&self) -> u32;

    /// Microseconds since the same epoch, wrapping at `u32::MAX`.
    fn micros(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn millis(&self) -> u32 {
        (**self).millis()
    }

    fn micros(&self) -> u32 {
        (**self).micros()
    }
}

/// Controllable clock for host testing.
///
/// Time only moves when the test moves it, which makes boundary behaviour
/// deterministic. Both counters derive from one 64-bit microsecond total and
/// wrap exactly like hardware counters would.
///
/// ```
/// use lapse_core::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// clock.advance_millis(1500);
/// assert_eq!(clock.millis(), 1500);
/// assert_eq!(clock.micros(), 1_500_000);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    total_us: Cell<u64>,
}

impl MockClock {
    /// Creates a clock reading zero on both counters.
    pub const fn new() -> Self {
        Self {
            total_us: Cell::new(0),
        }
    }

    /// Creates a clock whose millisecond counter starts at `ms`.
    pub fn starting_at_millis(ms: u32) -> Self {
        Self {
            total_us: Cell::new(u64::from(ms) * 1000),
        }
    }

    /// Moves both counters forward by `ms` milliseconds.
    pub fn advance_millis(&self, ms: u32) {
        self.advance_micros_wide(u64::from(ms) * 1000);
    }

    /// Moves both counters forward by `us` microseconds.
    pub fn advance_micros(&self, us: u32) {
        self.advance_micros_wide(u64::from(us));
    }

    /// Jumps to an absolute millisecond reading.
    pub fn set_millis(&self, ms: u32) {
        self.total_us.set(u64::from(ms) * 1000);
    }

    fn advance_micros_wide(&self, us: u64) {
        self.total_us.set(self.total_us.get().wrapping_add(us));
    }
}

impl Clock for MockClock {
    fn millis(&self) -> u32 {
        (self.total_us.get() / 1000) as u32
    }

    fn micros(&self) -> u32 {
        self.total_us.get() as u32
    }
}
