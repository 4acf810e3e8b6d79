//! Interval timer state machine.

use core::convert::Infallible;
use core::fmt::{self, Write};

use crate::callback::{CallbackOrder, Callbacks, DurationCallback, TickCallback};
use crate::clock::Clock;
use crate::config::TimerConfig;
use crate::samples::{SampleRing, SAMPLE_CAPACITY};
use crate::time::{sec_to_time, write_hms, TimeString};

/// Polled interval timer.
///
/// The timer is edge-triggered: [`check`](Self::check) reports at most one
/// event per call, however many intervals passed since the previous call, so
/// the caller has to poll at least once per interval to see every boundary.
///
/// ```
/// use lapse_core::{IntervalTimer, MockClock};
///
/// let clock = MockClock::new();
/// let mut timer = IntervalTimer::with_interval(&clock, 100);
///
/// clock.advance_millis(99);
/// assert!(!timer.check());
/// clock.advance_millis(1);
/// assert!(timer.check());
/// assert_eq!(timer.event_count(), 1);
/// ```
#[derive(Debug)]
pub struct IntervalTimer<'a, C: Clock> {
    clock: C,
    interval: u32,
    running: bool,
    last_tick: u32,
    last_tick_micros: u32,
    start_tick: u32,
    event_count: u32,
    repeat_limit: u32,
    last_event_duration: u32,
    samples: SampleRing,
    callbacks: Callbacks<'a>,
}

impl<'a, C: Clock> IntervalTimer<'a, C> {
    /// Creates a running timer with a zero interval.
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, TimerConfig::default())
    }

    /// Creates a running timer with the given interval.
    pub fn with_interval(clock: C, interval: u32) -> Self {
        Self::with_config(clock, TimerConfig::builder().interval(interval).build())
    }

    /// Creates a timer with an explicit running flag and interval reference.
    ///
    /// `last_tick` seeds the reference the first interval is measured from;
    /// the creation reference is still the current clock reading.
    pub fn with_state(clock: C, interval: u32, running: bool, last_tick: u32) -> Self {
        let mut timer = Self::with_interval(clock, interval);
        timer.running = running;
        timer.last_tick = last_tick;
        timer
    }

    /// Creates a timer from a [`TimerConfig`].
    pub fn with_config(clock: C, config: TimerConfig) -> Self {
        let now = clock.millis();
        let now_us = clock.micros();
        Self {
            clock,
            interval: config.interval,
            running: config.running,
            last_tick: now,
            last_tick_micros: now_us,
            start_tick: now,
            event_count: 0,
            repeat_limit: config.repeat_limit,
            last_event_duration: 0,
            samples: SampleRing::new(),
            callbacks: Callbacks {
                on_tick: None,
                on_duration: None,
                order: config.callback_order,
            },
        }
    }

    /// The clock this timer reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ---------------------------------------------------------------------
    // Interval detection
    // ---------------------------------------------------------------------

    /// Reports whether the interval has elapsed, consuming the event if so.
    ///
    /// A paused timer always returns `false` and changes nothing.
    pub fn check(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let now = self.clock.millis();
        let elapsed = now.wrapping_sub(self.last_tick);
        if elapsed < self.interval {
            return false;
        }
        self.last_tick = now;
        self.last_tick_micros = self.clock.micros();
        self.record_event(elapsed);
        true
    }

    /// Like [`check`](Self::check) but at whole-second granularity.
    ///
    /// Counts the second boundaries crossed since the last event and compares
    /// them against the interval truncated to seconds, so an interval below
    /// 1000 ms fires on every call. The recorded duration is the whole-second
    /// difference in milliseconds.
    pub fn check_seconds(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let now = self.clock.millis();
        // Boundaries are counted from the reference's sub-second offset so a
        // counter wrap (not a multiple of 1000) cannot skew the result.
        let elapsed_ms = now.wrapping_sub(self.last_tick);
        let elapsed_secs =
            ((u64::from(self.last_tick % 1000) + u64::from(elapsed_ms)) / 1000) as u32;
        if elapsed_secs < self.interval / 1000 {
            return false;
        }
        self.last_tick = now;
        self.last_tick_micros = self.clock.micros();
        self.record_event(elapsed_secs.wrapping_mul(1000));
        true
    }

    /// Like [`check`](Self::check) but against the microsecond clock.
    ///
    /// The interval is read as microseconds here. The recorded duration is
    /// still in milliseconds (truncated).
    pub fn check_micros(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let now_us = self.clock.micros();
        let elapsed_us = now_us.wrapping_sub(self.last_tick_micros);
        if elapsed_us < self.interval {
            return false;
        }
        self.last_tick_micros = now_us;
        self.last_tick = self.clock.millis();
        self.record_event(elapsed_us / 1000);
        true
    }

    /// Runs `action` when [`check`](Self::check) reports an event.
    pub fn check_and_run<F: FnOnce()>(&mut self, action: F) {
        if self.check() {
            action();
        }
    }

    /// Non-blocking form of [`check`](Self::check) for use with `nb::block!`.
    ///
    /// Blocking on a paused timer never returns.
    pub fn poll(&mut self) -> nb::Result<(), Infallible> {
        if self.check() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Re-armable countdown. Returns the ticks left, or 0 once it expires.
    ///
    /// A paused timer arms itself with `duration` as its interval and starts
    /// running. On expiry it pauses, so the next call arms it again; whatever
    /// `duration` that call passes wins. A timer that is already running is
    /// not re-armed and keeps counting toward its current interval.
    pub fn countdown(&mut self, duration: u32) -> u32 {
        self.countdown_inner(duration, None::<fn()>)
    }

    /// [`countdown`](Self::countdown) that runs `on_zero` on the call that
    /// observes expiry.
    pub fn countdown_with<F: FnOnce()>(&mut self, duration: u32, on_zero: F) -> u32 {
        self.countdown_inner(duration, Some(on_zero))
    }

    fn countdown_inner<F: FnOnce()>(&mut self, duration: u32, on_zero: Option<F>) -> u32 {
        if !self.running {
            self.last_tick = self.clock.millis();
            self.interval = duration;
            self.running = true;
            lapse_trace!("countdown armed for {} ms", duration);
        }

        let elapsed = self.clock.millis().wrapping_sub(self.last_tick);
        if elapsed >= self.interval {
            self.running = false;
            lapse_trace!("countdown expired after {} ms", elapsed);
            if let Some(f) = on_zero {
                f();
            }
            return 0;
        }
        self.interval - elapsed
    }

    /// Ticks left in the current interval.
    ///
    /// Returns 0 when paused or when the interval is already due. This runs
    /// [`check`](Self::check), so a due interval is consumed as an event.
    pub fn remaining_time(&mut self) -> u32 {
        if !self.running || self.check() {
            return 0;
        }
        let elapsed = self.clock.millis().wrapping_sub(self.last_tick);
        self.interval.saturating_sub(elapsed)
    }

    /// Event bookkeeping shared by every check flavour and interrupt dispatch.
    fn record_event(&mut self, duration_ms: u32) {
        self.last_event_duration = duration_ms;
        self.samples.push(duration_ms);
        self.event_count = self.event_count.wrapping_add(1);
        lapse_trace!("event {} after {} ms", self.event_count, duration_ms);
        self.callbacks.fire(duration_ms);
        self.stop_if_limit_reached();
    }

    /// Pauses once a nonzero repeat limit is reached. Returns whether it did.
    fn stop_if_limit_reached(&mut self) -> bool {
        if self.repeat_limit > 0 && self.event_count >= self.repeat_limit {
            self.running = false;
            lapse_debug!("repeat limit {} reached, pausing", self.repeat_limit);
            true
        } else {
            false
        }
    }

    /// Interrupt-side event: counts, stamps, fires and then either pauses at
    /// the repeat limit or resumes a paused timer.
    ///
    /// Does nothing unless a zero-argument callback is installed. Returns
    /// whether an event was recorded.
    pub(crate) fn interrupt_event(&mut self) -> bool {
        if self.callbacks.on_tick.is_none() {
            return false;
        }
        let duration = self.elapsed_since_last_event();
        self.last_tick = self.clock.millis();
        self.last_tick_micros = self.clock.micros();
        self.last_event_duration = duration;
        self.samples.push(duration);
        self.event_count = self.event_count.wrapping_add(1);
        self.callbacks.fire(duration);
        if !self.stop_if_limit_reached() {
            self.resume_from_interrupt();
        }
        true
    }

    // ---------------------------------------------------------------------
    // State management
    // ---------------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Pauses the timer.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resumes the timer without touching its references.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Flips between running and paused.
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Resumes the timer if it is paused.
    pub fn resume_from_interrupt(&mut self) {
        if !self.running {
            self.resume();
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
    }

    /// Adds a signed adjustment to the interval, clamping at zero.
    pub fn adjust_interval(&mut self, adjustment: i32) {
        self.interval = self.interval.saturating_add_signed(adjustment);
    }

    /// Events before auto-pause, 0 for unbounded.
    pub fn repeat_limit(&self) -> u32 {
        self.repeat_limit
    }

    pub fn set_repeat_limit(&mut self, limit: u32) {
        self.repeat_limit = limit;
    }

    /// Switches between unbounded (0) and single-shot (1).
    pub fn toggle_repeat(&mut self) {
        self.repeat_limit = if self.repeat_limit == 0 { 1 } else { 0 };
    }

    /// Arms a single event and resumes.
    pub fn run_once(&mut self) {
        self.repeat_limit = 1;
        self.resume();
    }

    /// Events left before the repeat limit pauses the timer.
    ///
    /// 0 when unbounded or already reached.
    pub fn remaining_count(&self) -> u32 {
        if self.repeat_limit > 0 && self.event_count < self.repeat_limit {
            self.repeat_limit - self.event_count
        } else {
            0
        }
    }

    /// Events since the last reset.
    pub fn event_count(&self) -> u32 {
        self.event_count
    }

    /// Restarts the interval from now and clears the counters and samples.
    ///
    /// Keeps the interval, repeat limit and running flag.
    pub fn reset(&mut self) {
        self.last_tick = self.clock.millis();
        self.last_tick_micros = self.clock.micros();
        self.event_count = 0;
        self.last_event_duration = 0;
        self.samples.clear();
    }

    /// [`reset`](Self::reset) followed by [`resume`](Self::resume).
    pub fn restart(&mut self) {
        self.reset();
        self.resume();
    }

    /// Starts a fresh epoch, including the creation reference, and runs.
    pub fn full_reset(&mut self) {
        self.start_tick = self.clock.millis();
        self.reset();
        self.last_tick = self.start_tick;
        self.running = true;
    }

    /// Overrides the creation reference used by [`total_elapsed`](Self::total_elapsed).
    pub fn set_start_tick(&mut self, start_tick: u32) {
        self.start_tick = start_tick;
    }

    /// Stops the timer and returns how long the current interval had run.
    pub fn pause_and_get_elapsed(&mut self) -> u32 {
        let elapsed = self.elapsed_since_last_event();
        self.stop();
        elapsed
    }

    /// Pause/resume pair that carries progress through `stash`.
    ///
    /// While running, stores the elapsed time in `stash` and pauses. While
    /// paused with a nonzero `stash`, backdates the reference by `stash`,
    /// resumes and zeroes `stash`. A paused timer with an empty stash is left
    /// alone.
    pub fn pause_and_resume_later(&mut self, stash: &mut u32) {
        if self.running {
            *stash = self.elapsed_since_last_event();
            self.stop();
        } else if *stash > 0 {
            self.last_tick = self.clock.millis().wrapping_sub(*stash);
            self.last_tick_micros = self.clock.micros();
            self.resume();
            *stash = 0;
        }
    }

    // ---------------------------------------------------------------------
    // Callbacks
    // ---------------------------------------------------------------------

    /// Installs the zero-argument event callback.
    pub fn set_callback(&mut self, callback: impl Into<TickCallback<'a>>) {
        self.callbacks.on_tick = Some(callback.into());
    }

    /// Installs a plain function as the zero-argument callback.
    ///
    /// Function items and non-capturing closures coerce here without a cast.
    pub fn set_callback_fn(&mut self, callback: fn()) {
        self.set_callback(callback);
    }

    /// Installs the callback that receives each event's duration.
    pub fn set_duration_callback(&mut self, callback: impl Into<DurationCallback<'a>>) {
        self.callbacks.on_duration = Some(callback.into());
    }

    /// Installs a plain function as the duration callback.
    pub fn set_duration_callback_fn(&mut self, callback: fn(u32)) {
        self.set_duration_callback(callback);
    }

    /// Removes both callbacks.
    pub fn clear_callbacks(&mut self) {
        self.callbacks.on_tick = None;
        self.callbacks.on_duration = None;
    }

    pub fn callback_order(&self) -> CallbackOrder {
        self.callbacks.order
    }

    pub fn set_callback_order(&mut self, order: CallbackOrder) {
        self.callbacks.order = order;
    }

    // ---------------------------------------------------------------------
    // Time queries
    // ---------------------------------------------------------------------

    /// Time since the last event or reset; 0 while paused.
    pub fn elapsed_since_last_event(&self) -> u32 {
        if self.running {
            self.clock.millis().wrapping_sub(self.last_tick)
        } else {
            0
        }
    }

    /// Time since creation or the last full reset, paused or not.
    pub fn total_elapsed(&self) -> u32 {
        self.clock.millis().wrapping_sub(self.start_tick)
    }

    /// Duration of the most recent event; 0 before the first one.
    pub fn last_event_duration(&self) -> u32 {
        self.last_event_duration
    }

    /// Whether a full interval has passed since an external `reference` tick.
    pub fn elapsed_since(&self, reference: u32) -> bool {
        self.clock.millis().wrapping_sub(reference) >= self.interval
    }

    /// Whether `interval` has passed since the last event, without consuming it.
    pub fn elapsed_interval(&self, interval: u32) -> bool {
        self.clock.millis().wrapping_sub(self.last_tick) >= interval
    }

    /// Whether the timer has gone more than two intervals without an event,
    /// i.e. the caller is not polling fast enough.
    pub fn is_overdue(&self) -> bool {
        self.running
            && self.clock.millis().wrapping_sub(self.last_tick) > self.interval.saturating_mul(2)
    }

    /// Whether `timeout` has passed since creation or the last full reset.
    pub fn is_time_up(&self, timeout: u32) -> bool {
        self.total_elapsed() >= timeout
    }

    /// Whole seconds on the clock.
    pub fn uptime_secs(&self) -> u32 {
        self.clock.millis() / 1000
    }

    // ---------------------------------------------------------------------
    // Formatting & statistics
    // ---------------------------------------------------------------------

    /// Mean duration of the most recent events.
    ///
    /// Uses `min(samples, event_count, 10)` entries; 0 before the first event.
    pub fn average_event_duration(&self, samples: usize) -> u32 {
        if self.event_count == 0 {
            return 0;
        }
        let n = samples
            .min(SAMPLE_CAPACITY)
            .min(self.event_count as usize);
        self.samples.average_recent(n)
    }

    /// Formats whole seconds; see [`sec_to_time`].
    pub fn print_time(&self, secs: u32) -> TimeString {
        sec_to_time(secs)
    }

    /// Formats the clock's uptime.
    pub fn print_run_time(&self) -> TimeString {
        sec_to_time(self.uptime_secs())
    }

    /// Writes the time since the last event as `HH:MM:SS`.
    pub fn format_elapsed_time<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_hms(out, self.elapsed_since_last_event() / 1000)
    }

    /// [`format_elapsed_time`](Self::format_elapsed_time) into an owned string.
    pub fn elapsed_time_string(&self) -> TimeString {
        let mut out = TimeString::new();
        // At most 1193 hours fit in u32 milliseconds, well within capacity.
        let _ = self.format_elapsed_time(&mut out);
        out
    }
}
