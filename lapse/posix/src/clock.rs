//! Monotonic host clock
//!
//! Backed by `std::time::Instant`. The counters wrap at `u32::MAX` exactly as
//! a microcontroller's `millis()`/`micros()` would, which is what the timer
//! arithmetic expects.

use std::time::Instant;

use lapse_core::Clock;

/// Wrapping millisecond/microsecond counters over the host monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    epoch: Instant,
    offset_us: u64,
}

impl HostClock {
    /// Counters start at zero now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            offset_us: 0,
        }
    }

    /// Counters start at `ms` milliseconds now.
    ///
    /// Starting just below `u32::MAX` exercises millisecond wraparound
    /// without waiting 49 days.
    pub fn starting_at_millis(ms: u32) -> Self {
        Self {
            epoch: Instant::now(),
            offset_us: u64::from(ms) * 1000,
        }
    }

    fn total_us(&self) -> u64 {
        let elapsed = self.epoch.elapsed().as_micros() as u64;
        elapsed.wrapping_add(self.offset_us)
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for HostClock {
    fn millis(&self) -> u32 {
        (self.total_us() / 1000) as u32
    }

    fn micros(&self) -> u32 {
        self.total_us() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_clock_advances() {
        let clock = HostClock::new();
        let start = clock.millis();
        thread::sleep(Duration::from_millis(20));
        let elapsed = clock.millis().wrapping_sub(start);
        assert!(elapsed >= 20, "Expected at least 20ms, got {}", elapsed);
    }

    #[test]
    fn test_offset_wraps() {
        let clock = HostClock::starting_at_millis(u32::MAX - 5);
        thread::sleep(Duration::from_millis(10));
        assert!(clock.millis() < 1_000);
    }
}
