//! Host port for running `lapse` timers on Linux/Unix.
//!
//! Provides what a microcontroller board would: a monotonic [`HostClock`]
//! with wrapping millisecond and microsecond counters, [`SoftInterrupts`]
//! standing in for external interrupt pins, and a [`Pulser`] thread that
//! calls an interrupt handler at a fixed rate. Critical sections are backed
//! by the `critical-section` std implementation, so a `static`
//! [`ActiveTimer`](lapse_core::ActiveTimer) can be shared between the main
//! thread and the pulser.

use thiserror::Error;

pub mod clock;
pub mod interrupt;
pub mod pulse;

pub use clock::HostClock;
pub use interrupt::{SoftInterrupts, MAX_PINS};
pub use lapse_core::TimerError;
pub use pulse::Pulser;

/// Errors raised by the host port.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    #[error("pin {0} is out of range")]
    PinOutOfRange(u8),
    #[error("no handler attached to pin {0}")]
    NotAttached(u8),
    #[error("pulse period must be nonzero")]
    ZeroPeriod,
    #[error(transparent)]
    Timer(#[from] TimerError),
}

/// Result type for host port operations
pub type PortResult<T> = Result<T, PortError>;
