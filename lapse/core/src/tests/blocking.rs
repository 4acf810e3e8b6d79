use std::cell::Cell;

use embedded_hal::delay::DelayNs;

use crate::blocking::{wait, Deadline, SpinDelay};
use crate::{Clock, MockClock};

/// Clock that moves forward by a fixed step every time it is read.
struct SteppingClock {
    now_us: Cell<u64>,
    step_us: u64,
    reads: Cell<u32>,
}

impl SteppingClock {
    fn new(step_us: u64) -> Self {
        Self {
            now_us: Cell::new(0),
            step_us,
            reads: Cell::new(0),
        }
    }

    fn tick(&self) -> u64 {
        self.reads.set(self.reads.get() + 1);
        let now = self.now_us.get();
        self.now_us.set(now + self.step_us);
        now
    }
}

impl Clock for SteppingClock {
    fn millis(&self) -> u32 {
        (self.tick() / 1000) as u32
    }

    fn micros(&self) -> u32 {
        self.tick() as u32
    }
}

#[test]
fn deadline_polls_against_clock() {
    let clock = MockClock::new();
    let deadline = Deadline::after(&clock, 10);
    assert_eq!(deadline.poll(&clock), Err(nb::Error::WouldBlock));
    clock.advance_millis(10);
    assert_eq!(deadline.poll(&clock), Ok(()));
}

#[test]
fn wait_spins_until_duration_passes() {
    let clock = SteppingClock::new(1_000);
    wait(&clock, 25);
    assert!(clock.now_us.get() >= 25_000);
    // One read to start, then one per millisecond step.
    assert_eq!(clock.reads.get(), 26);
}

#[test]
fn zero_wait_returns_immediately() {
    let clock = SteppingClock::new(1_000);
    wait(&clock, 0);
    assert_eq!(clock.reads.get(), 2);
}

#[test]
fn spin_delay_rounds_nanoseconds_up() {
    let clock = SteppingClock::new(1);
    let mut delay = SpinDelay::new(&clock);
    delay.delay_ns(1_500);
    // 2 us of steps plus the starting read.
    assert!(clock.now_us.get() >= 2);
    assert!(clock.now_us.get() <= 4);
}

#[test]
fn spin_delay_milliseconds() {
    let clock = SteppingClock::new(100);
    let mut delay = SpinDelay::new(&clock);
    delay.delay_ms(3);
    assert!(clock.now_us.get() >= 3_000);
    let clock = delay.release();
    assert!(clock.reads.get() > 30);
}
