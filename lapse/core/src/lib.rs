#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # Lapse Core
//!
//! Non-blocking interval timing for polled embedded control loops.
//!
//! An [`IntervalTimer`] watches a monotonic [`Clock`] and reports when its
//! configured interval has passed. Each completed interval is an *event*:
//! it bumps the event counter, records its duration in a fixed ten-entry
//! sample ring, fires the optional callbacks and, when a repeat limit is
//! set, pauses the timer once the limit is reached.
//!
//! ## Module Overview
//! - [`clock`]    – Clock source trait and a controllable mock clock.
//! - [`timer`]    – The interval timer state machine.
//! - [`callback`] – Callback slots and firing order.
//! - [`config`]   – Builder-style timer configuration.
//! - [`samples`]  – Fixed-capacity ring of recent event durations.
//! - [`registry`] – Active-timer slot for interrupt dispatch and global pause.
//! - [`time`]     – Time constants, unit conversion and `HH:MM:SS` formatting.
//! - [`blocking`] – The one blocking utility: busy-wait and a `DelayNs` spinner.
//!
//! All tick arithmetic is wrapping `u32` subtraction. It stays correct across
//! a single wraparound of the clock between two samples, not across several.

use core::fmt;

#[macro_use]
mod trace;

pub mod blocking;
pub mod callback;
pub mod clock;
pub mod config;
pub mod registry;
pub mod samples;
pub mod time;
pub mod timer;

pub use callback::{CallbackOrder, DurationCallback, TickCallback};
pub use clock::{Clock, MockClock};
pub use config::{TimerConfig, TimerConfigBuilder};
pub use registry::{ActiveTimer, Edge, InterruptAttach};
pub use samples::SAMPLE_CAPACITY;
pub use time::*;
pub use timer::IntervalTimer;

#[cfg(test)]
mod tests;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used by the fallible seams of the crate
pub type TimerResult<T> = Result<T, TimerError>;

/// Errors raised at the platform seams.
///
/// Timer operations themselves never fail; only binding to an interrupt
/// source can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The platform refused to bind the handler
    AttachFailed,
    /// The pin cannot be used as an interrupt source
    InvalidPin(u8),
    /// No timer is installed in the active slot
    NoActiveTimer,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::AttachFailed => write!(f, "Interrupt attach failed"),
            TimerError::InvalidPin(pin) => write!(f, "Pin {} cannot raise interrupts", pin),
            TimerError::NoActiveTimer => write!(f, "No active timer installed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimerError {}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TimerError::AttachFailed => defmt::write!(fmt, "AttachFailed"),
            TimerError::InvalidPin(pin) => defmt::write!(fmt, "InvalidPin({})", pin),
            TimerError::NoActiveTimer => defmt::write!(fmt, "NoActiveTimer"),
        }
    }
}
