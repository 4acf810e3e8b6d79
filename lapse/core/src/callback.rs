//! Event callbacks.
//!
//! A timer carries two independent slots: one that takes no arguments and one
//! that receives the duration of the event in milliseconds. Either slot holds
//! a plain function or a borrowed closure. Closures must be `Send` so a timer
//! holding them can live in a `static` [`ActiveTimer`](crate::ActiveTimer).
//!
//! Callbacks installed on a timer that also serves interrupt dispatch run in
//! interrupt context and must not block.

use core::fmt;

/// Zero-argument event callback
pub enum TickCallback<'a> {
    /// Plain function
    Fn(fn()),
    /// Borrowed closure
    Closure(&'a mut (dyn FnMut() + Send + 'a)),
}

impl TickCallback<'_> {
    pub(crate) fn invoke(&mut self) {
        match self {
            Self::Fn(f) => f(),
            Self::Closure(f) => f(),
        }
    }
}

impl<'a> From<fn()> for TickCallback<'a> {
    fn from(f: fn()) -> Self {
        Self::Fn(f)
    }
}

impl<'a, F> From<&'a mut F> for TickCallback<'a>
where
    F: FnMut() + Send + 'a,
{
    fn from(f: &'a mut F) -> Self {
        Self::Closure(f)
    }
}

impl fmt::Debug for TickCallback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fn(_) => f.write_str("TickCallback::Fn"),
            Self::Closure(_) => f.write_str("TickCallback::Closure"),
        }
    }
}

/// Event callback receiving the event duration in milliseconds
pub enum DurationCallback<'a> {
    /// Plain function
    Fn(fn(u32)),
    /// Borrowed closure
    Closure(&'a mut (dyn FnMut(u32) + Send + 'a)),
}

impl DurationCallback<'_> {
    pub(crate) fn invoke(&mut self, duration_ms: u32) {
        match self {
            Self::Fn(f) => f(duration_ms),
            Self::Closure(f) => f(duration_ms),
        }
    }
}

impl<'a> From<fn(u32)> for DurationCallback<'a> {
    fn from(f: fn(u32)) -> Self {
        Self::Fn(f)
    }
}

impl<'a, F> From<&'a mut F> for DurationCallback<'a>
where
    F: FnMut(u32) + Send + 'a,
{
    fn from(f: &'a mut F) -> Self {
        Self::Closure(f)
    }
}

impl fmt::Debug for DurationCallback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fn(_) => f.write_str("DurationCallback::Fn"),
            Self::Closure(_) => f.write_str("DurationCallback::Closure"),
        }
    }
}

/// Which callback slot fires first on an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackOrder {
    /// Zero-argument callback, then the duration callback
    #[default]
    TickFirst,
    /// Duration callback, then the zero-argument callback
    DurationFirst,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CallbackOrder {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::TickFirst => defmt::write!(fmt, "TickFirst"),
            Self::DurationFirst => defmt::write!(fmt, "DurationFirst"),
        }
    }
}

/// The pair of callback slots plus their firing order.
#[derive(Debug, Default)]
pub(crate) struct Callbacks<'a> {
    pub(crate) on_tick: Option<TickCallback<'a>>,
    pub(crate) on_duration: Option<DurationCallback<'a>>,
    pub(crate) order: CallbackOrder,
}

impl Callbacks<'_> {
    /// Fires whichever slots are populated, in the configured order.
    pub(crate) fn fire(&mut self, duration_ms: u32) {
        match self.order {
            CallbackOrder::TickFirst => {
                self.fire_tick();
                self.fire_duration(duration_ms);
            }
            CallbackOrder::DurationFirst => {
                self.fire_duration(duration_ms);
                self.fire_tick();
            }
        }
    }

    fn fire_tick(&mut self) {
        if let Some(cb) = self.on_tick.as_mut() {
            cb.invoke();
        }
    }

    fn fire_duration(&mut self, duration_ms: u32) {
        if let Some(cb) = self.on_duration.as_mut() {
            cb.invoke(duration_ms);
        }
    }
}
