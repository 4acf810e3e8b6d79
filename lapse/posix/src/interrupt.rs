//! Software interrupt lines
//!
//! A host has no external interrupt pins, so [`SoftInterrupts`] models a bank
//! of them. Handlers are bound through the [`InterruptAttach`] trait like on a
//! board; tests and demos then drive line levels with [`SoftInterrupts::drive`]
//! and the bound handler runs when the transition matches its [`Edge`].

use lapse_core::{Edge, InterruptAttach, TimerError, TimerResult};
use log::{debug, trace};

use crate::{PortError, PortResult};

/// Number of software interrupt lines
pub const MAX_PINS: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Binding {
    edge: Edge,
    handler: fn(),
}

/// Bank of software interrupt lines, all initially low and unbound.
#[derive(Debug)]
pub struct SoftInterrupts {
    bindings: [Option<Binding>; MAX_PINS],
    levels: [bool; MAX_PINS],
}

impl SoftInterrupts {
    pub fn new() -> Self {
        Self {
            bindings: [None; MAX_PINS],
            levels: [false; MAX_PINS],
        }
    }

    /// Sets the level of `pin`, running its handler if the transition
    /// matches the bound edge. Returns whether the handler ran.
    pub fn drive(&mut self, pin: u8, high: bool) -> PortResult<bool> {
        let idx = Self::index(pin)?;
        let was_high = self.levels[idx];
        self.levels[idx] = high;

        let Some(binding) = self.bindings[idx] else {
            return Ok(false);
        };
        let matched = match binding.edge {
            Edge::Low => !high,
            Edge::High => high,
            Edge::Change => was_high != high,
            Edge::Rising => !was_high && high,
            Edge::Falling => was_high && !high,
        };
        if matched {
            trace!("pin {} {:?} interrupt", pin, binding.edge);
            (binding.handler)();
        }
        Ok(matched)
    }

    /// Drives a low-high-low pulse on `pin`. Returns how many times the
    /// handler ran.
    pub fn pulse(&mut self, pin: u8) -> PortResult<u32> {
        let mut runs = 0;
        for level in [true, false] {
            if self.drive(pin, level)? {
                runs += 1;
            }
        }
        Ok(runs)
    }

    /// Runs the handler bound to `pin` regardless of its level.
    pub fn trigger(&self, pin: u8) -> PortResult<()> {
        let idx = Self::index(pin)?;
        let binding = self.bindings[idx].ok_or(PortError::NotAttached(pin))?;
        (binding.handler)();
        Ok(())
    }

    /// Unbinds `pin`. Returns whether anything was bound.
    pub fn detach(&mut self, pin: u8) -> PortResult<bool> {
        let idx = Self::index(pin)?;
        Ok(self.bindings[idx].take().is_some())
    }

    pub fn is_attached(&self, pin: u8) -> bool {
        Self::index(pin)
            .map(|idx| self.bindings[idx].is_some())
            .unwrap_or(false)
    }

    pub fn level(&self, pin: u8) -> PortResult<bool> {
        Ok(self.levels[Self::index(pin)?])
    }

    fn index(pin: u8) -> PortResult<usize> {
        let idx = usize::from(pin);
        if idx < MAX_PINS {
            Ok(idx)
        } else {
            Err(PortError::PinOutOfRange(pin))
        }
    }
}

impl Default for SoftInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptAttach for SoftInterrupts {
    fn attach(&mut self, pin: u8, edge: Edge, handler: fn()) -> TimerResult<()> {
        let idx = Self::index(pin).map_err(|_| TimerError::InvalidPin(pin))?;
        if self.bindings[idx].is_some() {
            debug!("pin {} rebound, previous handler dropped", pin);
        }
        self.bindings[idx] = Some(Binding { edge, handler });
        debug!("pin {} bound on {:?}", pin, edge);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_edges_match() {
        static RUNS: AtomicU32 = AtomicU32::new(0);
        fn handler() {
            RUNS.fetch_add(1, Ordering::SeqCst);
        }

        let mut lines = SoftInterrupts::new();
        lines.attach(0, Edge::Rising, handler).unwrap();
        lines.attach(1, Edge::Falling, handler).unwrap();
        lines.attach(2, Edge::Change, handler).unwrap();

        assert_eq!(lines.pulse(0).unwrap(), 1);
        assert_eq!(lines.pulse(1).unwrap(), 1);
        assert_eq!(lines.pulse(2).unwrap(), 2);
        assert!(!lines.drive(0, false).unwrap());
        assert_eq!(RUNS.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_out_of_range_pin() {
        fn handler() {}
        let mut lines = SoftInterrupts::new();
        assert_eq!(
            lines.attach(MAX_PINS as u8, Edge::High, handler),
            Err(TimerError::InvalidPin(MAX_PINS as u8))
        );
        assert_eq!(lines.drive(200, true), Err(PortError::PinOutOfRange(200)));
        assert!(!lines.is_attached(200));
    }

    #[test]
    fn test_trigger_unbound_pin() {
        fn handler() {}
        let mut lines = SoftInterrupts::new();
        assert_eq!(lines.trigger(3), Err(PortError::NotAttached(3)));
        lines.attach(3, Edge::Low, handler).unwrap();
        assert!(lines.trigger(3).is_ok());
        assert!(lines.detach(3).unwrap());
        assert!(!lines.is_attached(3));
    }
}
