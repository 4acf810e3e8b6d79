//! Active-timer slot for interrupt dispatch and global pause.
//!
//! Interrupt handlers on most platforms are bare `fn()` with no context
//! argument, so the timer they drive has to be reachable from a static. An
//! [`ActiveTimer`] is that static: the host declares one, installs the timer
//! it wants driven, and points its interrupt trampoline at
//! [`ActiveTimer::dispatch`]. Only code that opts into interrupt dispatch
//! ever touches it.
//!
//! The slot holds a single timer. Installing a new one replaces the previous
//! occupant, which no longer receives interrupts or global pauses.
//!
//! Callbacks run while the slot is borrowed. From inside one,
//! [`pause_all`](ActiveTimer::pause_all) still works (the pause lands as soon
//! as the callbacks return), while [`with`](ActiveTimer::with),
//! [`dispatch`](ActiveTimer::dispatch) and [`take`](ActiveTimer::take) find
//! the slot busy and do nothing.
//!
//! ```
//! use lapse_core::{ActiveTimer, IntervalTimer, MockClock};
//!
//! let clock = MockClock::new();
//! let active = ActiveTimer::new();
//! let mut timer = IntervalTimer::with_interval(&clock, 50);
//! timer.set_callback_fn(|| {});
//! active.install(timer);
//!
//! assert!(active.dispatch());
//! assert_eq!(active.with(|t| t.event_count()), Some(1));
//! ```

use core::cell::{Cell, RefCell};

use critical_section::Mutex;

use crate::clock::Clock;
use crate::timer::IntervalTimer;
use crate::{TimerError, TimerResult};

/// Trigger condition of an external interrupt line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// While the line is low
    Low,
    /// While the line is high
    High,
    /// Any level change
    Change,
    /// Low to high
    Rising,
    /// High to low
    Falling,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Edge {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(fmt, "Low"),
            Self::High => defmt::write!(fmt, "High"),
            Self::Change => defmt::write!(fmt, "Change"),
            Self::Rising => defmt::write!(fmt, "Rising"),
            Self::Falling => defmt::write!(fmt, "Falling"),
        }
    }
}

/// Platform facility that binds an interrupt line to a handler.
pub trait InterruptAttach {
    /// Routes interrupts on `pin` matching `edge` to `handler`.
    fn attach(&mut self, pin: u8, edge: Edge, handler: fn()) -> TimerResult<()>;
}

/// Single-timer slot shared between the main loop and an interrupt handler.
///
/// Every access runs inside a critical section, so main-loop access through
/// [`with`](Self::with) cannot interleave with [`dispatch`](Self::dispatch).
/// Callbacks fired from either path therefore run with interrupts masked.
pub struct ActiveTimer<'a, C: Clock> {
    slot: Mutex<RefCell<Option<IntervalTimer<'a, C>>>>,
    pause_pending: Mutex<Cell<bool>>,
}

impl<'a, C: Clock> ActiveTimer<'a, C> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
            pause_pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Makes `timer` the active timer, returning the one it replaces.
    ///
    /// # Panics
    ///
    /// If called from a callback of the installed timer.
    pub fn install(&self, timer: IntervalTimer<'a, C>) -> Option<IntervalTimer<'a, C>> {
        lapse_debug!("active timer installed");
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).replace(timer))
    }

    /// Empties the slot, handing the timer back. `None` when empty or busy.
    pub fn take(&self) -> Option<IntervalTimer<'a, C>> {
        critical_section::with(|cs| self.slot.borrow(cs).try_borrow_mut().ok()?.take())
    }

    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| {
            // A busy slot is borrowed by its own timer's callback.
            self.slot
                .borrow(cs)
                .try_borrow()
                .map(|slot| slot.is_some())
                .unwrap_or(true)
        })
    }

    /// Runs `f` on the active timer.
    ///
    /// Returns `None` when the slot is empty, or busy because this is a
    /// callback of the active timer. A pause requested from such a callback
    /// is applied once `f` returns.
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut IntervalTimer<'a, C>) -> R,
    {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow(cs).try_borrow_mut().ok()?;
            let timer = slot.as_mut()?;
            let result = f(timer);
            if self.pause_pending.borrow(cs).replace(false) {
                timer.stop();
                lapse_debug!("deferred global pause applied");
            }
            Some(result)
        })
    }

    /// Interrupt entry point.
    ///
    /// Records an event on the active timer exactly like a successful
    /// `check`, then either pauses it at its repeat limit or resumes it if it
    /// was paused. Nothing happens unless the timer has a zero-argument
    /// callback installed. Returns whether an event was recorded.
    pub fn dispatch(&self) -> bool {
        let fired = self.with(|timer| timer.interrupt_event()).unwrap_or(false);
        if fired {
            lapse_trace!("interrupt dispatched");
        }
        fired
    }

    /// Pauses the active timer, if any. Returns whether one was paused.
    ///
    /// Called from one of the active timer's own callbacks, the pause is
    /// deferred until the callbacks return, so it wins over the resume an
    /// interrupt dispatch would otherwise apply.
    pub fn pause_all(&self) -> bool {
        let paused = critical_section::with(|cs| match self.slot.borrow(cs).try_borrow_mut() {
            Ok(mut slot) => slot.as_mut().map(|timer| timer.stop()).is_some(),
            Err(_) => {
                self.pause_pending.borrow(cs).set(true);
                true
            }
        });
        if paused {
            lapse_debug!("active timer paused globally");
        }
        paused
    }

    /// Binds `pin` on `platform` to `handler`.
    ///
    /// `handler` is the host's trampoline, normally a plain function that
    /// calls [`dispatch`](Self::dispatch) on this slot. Requires a timer to
    /// be installed first.
    pub fn attach<P>(&self, platform: &mut P, pin: u8, edge: Edge, handler: fn()) -> TimerResult<()>
    where
        P: InterruptAttach + ?Sized,
    {
        if !self.is_installed() {
            return Err(TimerError::NoActiveTimer);
        }
        platform.attach(pin, edge, handler)?;
        lapse_debug!("interrupt attached on pin {}", pin);
        Ok(())
    }
}

impl<C: Clock> Default for ActiveTimer<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}
