//! Timer configuration.

use crate::callback::CallbackOrder;

/// Initial settings for an [`IntervalTimer`](crate::IntervalTimer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Interval in milliseconds (microseconds when driven by `check_micros`)
    pub interval: u32,
    /// Whether the timer starts running
    pub running: bool,
    /// Events before auto-pause, 0 for unbounded
    pub repeat_limit: u32,
    /// Firing order of the two callback slots
    pub callback_order: CallbackOrder,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            interval: 0,
            running: true,
            repeat_limit: 0,
            callback_order: CallbackOrder::TickFirst,
        }
    }
}

impl TimerConfig {
    /// Creates a new timer configuration builder.
    pub fn builder() -> TimerConfigBuilder {
        TimerConfigBuilder::default()
    }
}

/// Builder for ergonomic timer configuration construction.
#[derive(Debug, Clone, Default)]
pub struct TimerConfigBuilder {
    config: TimerConfig,
}

impl TimerConfigBuilder {
    /// Sets the interval.
    pub fn interval(mut self, interval: u32) -> Self {
        self.config.interval = interval;
        self
    }

    /// Starts the timer paused.
    pub fn paused(mut self) -> Self {
        self.config.running = false;
        self
    }

    /// Sets the number of events before the timer pauses itself.
    pub fn repeat_limit(mut self, limit: u32) -> Self {
        self.config.repeat_limit = limit;
        self
    }

    /// Shorthand for a repeat limit of one.
    pub fn once(self) -> Self {
        self.repeat_limit(1)
    }

    /// Sets which callback slot fires first.
    pub fn callback_order(mut self, order: CallbackOrder) -> Self {
        self.config.callback_order = order;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> TimerConfig {
        self.config
    }
}
