//! Blocking waits.
//!
//! Everything else in this crate returns immediately. The helpers here spin
//! on the clock until a duration has passed; the caller gives up
//! responsiveness for that long.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::clock::Clock;

/// One-shot millisecond deadline measured from its creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: u32,
    duration: u32,
}

impl Deadline {
    /// Starts a deadline `duration_ms` from now.
    pub fn after<C: Clock + ?Sized>(clock: &C, duration_ms: u32) -> Self {
        Self {
            start: clock.millis(),
            duration: duration_ms,
        }
    }

    /// `Ok` once the deadline has passed, `WouldBlock` before.
    pub fn poll<C: Clock + ?Sized>(&self, clock: &C) -> nb::Result<(), Infallible> {
        if clock.millis().wrapping_sub(self.start) >= self.duration {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

/// Busy-waits for `duration_ms` milliseconds.
pub fn wait<C: Clock + ?Sized>(clock: &C, duration_ms: u32) {
    let deadline = Deadline::after(clock, duration_ms);
    let _ = nb::block!(deadline.poll(clock));
}

/// [`DelayNs`] implementation that spins on the microsecond counter.
///
/// Resolution is one microsecond; sub-microsecond requests round up.
#[derive(Debug)]
pub struct SpinDelay<C: Clock> {
    clock: C,
}

impl<C: Clock> SpinDelay<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn release(self) -> C {
        self.clock
    }

    fn spin_micros(&self, us: u32) {
        let start = self.clock.micros();
        while self.clock.micros().wrapping_sub(start) < us {
            core::hint::spin_loop();
        }
    }
}

impl<C: Clock> DelayNs for SpinDelay<C> {
    fn delay_ns(&mut self, ns: u32) {
        self.spin_micros(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.spin_micros(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        // Split so each chunk stays inside one microsecond wrap period.
        for _ in 0..ms / 1000 {
            self.spin_micros(1_000_000);
        }
        self.spin_micros((ms % 1000) * 1000);
    }
}
