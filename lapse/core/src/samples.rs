//! Fixed-capacity ring of recent event durations.

use heapless::HistoryBuffer;

/// Number of event durations retained for averaging
pub const SAMPLE_CAPACITY: usize = 10;

/// Circular buffer of the last [`SAMPLE_CAPACITY`] event durations.
///
/// Writes past capacity overwrite the oldest entry; the buffer never grows.
#[derive(Debug, Clone)]
pub(crate) struct SampleRing {
    buf: HistoryBuffer<u32, SAMPLE_CAPACITY>,
}

impl SampleRing {
    pub(crate) const fn new() -> Self {
        Self {
            buf: HistoryBuffer::new(),
        }
    }

    /// Records a duration, evicting the oldest one when full.
    pub(crate) fn push(&mut self, duration_ms: u32) {
        self.buf.write(duration_ms);
    }

    pub(crate) fn clear(&mut self) {
        self.buf = HistoryBuffer::new();
    }

    /// Mean of the `n` most recent samples, or 0 when `n` is 0 or nothing
    /// has been recorded. `n` is clamped to the number of stored samples.
    pub(crate) fn average_recent(&self, n: usize) -> u32 {
        let n = n.min(self.buf.len());
        if n == 0 {
            return 0;
        }
        let skip = self.buf.len() - n;
        let sum: u64 = self
            .buf
            .oldest_ordered()
            .skip(skip)
            .map(|&d| u64::from(d))
            .sum();
        (sum / n as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_most_recent_only() {
        let mut ring = SampleRing::new();
        for d in [10, 20, 30, 40] {
            ring.push(d);
        }
        assert_eq!(ring.average_recent(2), 35);
        assert_eq!(ring.average_recent(4), 25);
        assert_eq!(ring.average_recent(99), 25);
    }

    #[test]
    fn overwrites_oldest_past_capacity() {
        let mut ring = SampleRing::new();
        for d in 1..=12 {
            ring.push(d * 10);
        }
        assert_eq!(ring.buf.len(), SAMPLE_CAPACITY);
        assert_eq!(ring.buf.recent(), Some(&120));
        // 30..=120
        assert_eq!(ring.average_recent(SAMPLE_CAPACITY), 75);
    }

    #[test]
    fn empty_ring_averages_to_zero() {
        let ring = SampleRing::new();
        assert_eq!(ring.buf.len(), 0);
        assert_eq!(ring.average_recent(5), 0);
    }

    #[test]
    fn wide_sum_does_not_overflow() {
        let mut ring = SampleRing::new();
        for _ in 0..SAMPLE_CAPACITY {
            ring.push(u32::MAX);
        }
        assert_eq!(ring.average_recent(SAMPLE_CAPACITY), u32::MAX);
    }
}
