//! Periodic interrupt source
//!
//! Spawns a thread that calls an interrupt handler at a fixed period, the
//! host counterpart of a hardware timer or a signal generator wired to an
//! interrupt pin. Uses absolute deadlines on the monotonic clock so the
//! pulse train does not drift.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::{PortError, PortResult};

/// Running pulse generator. Stops when dropped.
#[derive(Debug)]
pub struct Pulser {
    running: Arc<AtomicBool>,
    pulses: Arc<AtomicU32>,
    handle: Option<JoinHandle<()>>,
}

impl Pulser {
    /// Starts calling `handler` every `period`.
    pub fn start(period: Duration, handler: fn()) -> PortResult<Self> {
        if period.is_zero() {
            return Err(PortError::ZeroPeriod);
        }

        let running = Arc::new(AtomicBool::new(true));
        let pulses = Arc::new(AtomicU32::new(0));
        let handle = {
            let running = running.clone();
            let pulses = pulses.clone();
            thread::spawn(move || pulse_thread(period, handler, &running, &pulses))
        };
        debug!("pulser started, period {:?}", period);

        Ok(Self {
            running,
            pulses,
            handle: Some(handle),
        })
    }

    /// Pulses delivered so far.
    pub fn pulses(&self) -> u32 {
        self.pulses.load(Ordering::SeqCst)
    }

    /// Stops the thread and returns the total number of pulses delivered.
    pub fn stop(mut self) -> u32 {
        self.shutdown();
        self.pulses()
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("pulser thread panicked");
            }
        }
    }
}

impl Drop for Pulser {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pulse_thread(period: Duration, handler: fn(), running: &AtomicBool, pulses: &AtomicU32) {
    let mut next = Instant::now();

    while running.load(Ordering::Relaxed) {
        next += period;

        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        }
        if !running.load(Ordering::Relaxed) {
            break;
        }

        handler();
        pulses.fetch_add(1, Ordering::SeqCst);
    }
}
