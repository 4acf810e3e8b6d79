//! Behavioural properties of the interval timer.

use std::sync::atomic::{AtomicU32, Ordering};

use lapse_core::{sec_to_time, IntervalTimer, MockClock};

#[test]
fn fires_exactly_once_per_boundary() {
    for interval in [1u32, 7, 100, 1_000] {
        let clock = MockClock::new();
        let mut timer = IntervalTimer::with_interval(&clock, interval);

        for boundary in 1..=5u32 {
            for _ in 1..interval {
                clock.advance_millis(1);
                assert!(!timer.check(), "early event at interval {interval}");
            }
            clock.advance_millis(1);
            assert!(timer.check(), "missed boundary at interval {interval}");
            assert!(!timer.check(), "double event at interval {interval}");
            assert_eq!(timer.event_count(), boundary);
        }
    }
}

#[test]
fn remaining_time_counts_down_and_refills() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::with_interval(&clock, 100);

    let mut previous = timer.remaining_time();
    assert_eq!(previous, 100);
    for _ in 0..99 {
        clock.advance_millis(1);
        let now = timer.remaining_time();
        assert!(now <= previous);
        previous = now;
    }
    assert_eq!(previous, 1);

    // Crossing the boundary is consumed as an event and reports zero.
    clock.advance_millis(1);
    assert_eq!(timer.remaining_time(), 0);
    assert_eq!(timer.event_count(), 1);
    assert_eq!(timer.remaining_time(), 100);
}

#[test]
fn remaining_time_is_zero_when_paused() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::with_interval(&clock, 100);
    timer.stop();
    assert_eq!(timer.remaining_time(), 0);
}

#[test]
fn average_of_uniform_events() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::with_interval(&clock, 100);
    assert_eq!(timer.average_event_duration(3), 0);

    for _ in 0..3 {
        clock.advance_millis(100);
        assert!(timer.check());
    }
    for n in 1..=3 {
        assert_eq!(timer.average_event_duration(n), 100);
    }
    // Asking for more samples than events uses what exists.
    assert_eq!(timer.average_event_duration(10), 100);
}

#[test]
fn average_uses_most_recent_ten() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::with_interval(&clock, 0);

    // Durations 10, 20, ..., 150.
    for step in 1..=15u32 {
        clock.advance_millis(step * 10);
        assert!(timer.check());
    }
    assert_eq!(timer.last_event_duration(), 150);
    assert_eq!(timer.average_event_duration(1), 150);
    assert_eq!(timer.average_event_duration(2), 145);
    // 60..=150
    assert_eq!(timer.average_event_duration(10), 105);
    assert_eq!(timer.average_event_duration(50), 105);
    assert_eq!(timer.average_event_duration(0), 0);
}

#[test]
fn repeat_limit_pauses_after_limit() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::with_interval(&clock, 10);
    timer.set_repeat_limit(3);

    for n in 1..=3 {
        clock.advance_millis(10);
        assert!(timer.check());
        assert_eq!(timer.is_running(), n < 3);
    }

    clock.advance_millis(10);
    assert!(!timer.check());
    assert_eq!(timer.event_count(), 3);
    assert_eq!(timer.last_event_duration(), 10);
}

#[test]
fn negative_adjustment_clamps_at_zero() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::with_interval(&clock, 500);
    timer.adjust_interval(-1_000);
    assert_eq!(timer.interval(), 0);

    timer.adjust_interval(250);
    assert_eq!(timer.interval(), 250);
    timer.adjust_interval(-50);
    assert_eq!(timer.interval(), 200);

    timer.set_interval(u32::MAX - 1);
    timer.adjust_interval(10);
    assert_eq!(timer.interval(), u32::MAX);
}

#[test]
fn countdown_arms_expires_and_rearms() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::new(&clock);
    timer.stop();
    let fired = AtomicU32::new(0);
    let on_zero = || {
        fired.fetch_add(1, Ordering::Relaxed);
    };

    assert_eq!(timer.countdown_with(5_000, on_zero), 5_000);
    assert!(timer.is_running());

    clock.advance_millis(1_200);
    assert_eq!(timer.countdown_with(5_000, on_zero), 3_800);
    assert_eq!(fired.load(Ordering::Relaxed), 0);

    clock.advance_millis(3_800);
    assert_eq!(timer.countdown_with(5_000, on_zero), 0);
    assert_eq!(fired.load(Ordering::Relaxed), 1);
    assert!(!timer.is_running());

    // The next call arms again from now.
    clock.advance_millis(700);
    assert_eq!(timer.countdown_with(5_000, on_zero), 5_000);
    assert_eq!(fired.load(Ordering::Relaxed), 1);
}

#[test]
fn countdown_rearm_takes_latest_duration() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::new(&clock);
    timer.stop();

    assert_eq!(timer.countdown(100), 100);
    clock.advance_millis(100);
    assert_eq!(timer.countdown(100), 0);

    assert_eq!(timer.countdown(40), 40);
    assert_eq!(timer.interval(), 40);
    // While running, a different duration does not re-arm.
    clock.advance_millis(10);
    assert_eq!(timer.countdown(1_000), 30);
}

#[test]
fn countdown_on_fresh_running_timer_uses_current_interval() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::new(&clock);
    // Running with a zero interval: expires at once, then arms next call.
    assert_eq!(timer.countdown(250), 0);
    assert_eq!(timer.countdown(250), 250);
}

#[test]
fn formats_days_hours_minutes_seconds() {
    assert_eq!(sec_to_time(90_061).as_str(), "1:01:01:01");
    assert_eq!(sec_to_time(3_661).as_str(), "01:01:01");
}

#[test]
fn toggle_repeat_flips_between_unbounded_and_single() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::new(&clock);
    assert_eq!(timer.repeat_limit(), 0);
    for expected in [1, 0, 1, 0] {
        timer.toggle_repeat();
        assert_eq!(timer.repeat_limit(), expected);
    }

    timer.set_repeat_limit(7);
    timer.toggle_repeat();
    assert_eq!(timer.repeat_limit(), 0);
}

#[test]
fn overdue_only_past_twice_the_interval() {
    let clock = MockClock::new();
    let mut timer = IntervalTimer::with_interval(&clock, 100);

    clock.advance_millis(500);
    assert!(timer.is_overdue());
    timer.reset();
    assert!(!timer.is_overdue());

    clock.advance_millis(200);
    assert!(!timer.is_overdue());
    clock.advance_millis(1);
    assert!(timer.is_overdue());

    timer.stop();
    timer.restart();
    assert!(!timer.is_overdue());
}
