//! Latest-value hand-off of heart rate samples into the scheduler

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

/// Single-slot, last-value-wins cell for rate samples.
///
/// Producers overwrite the slot and never wait. The scheduler takes the
/// pending value, if any, on its own timeline. Samples overwritten before
/// the scheduler looks are lost.
#[derive(Debug, Default)]
pub struct RateCell {
    bpm: AtomicU32,
    dirty: AtomicBool,
}

impl RateCell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a sample in beats per minute.
    ///
    /// The sample is truncated to whole beats. Samples that are not finite or
    /// truncate to zero carry no rate and are ignored; returns whether the
    /// sample was accepted.
    pub fn submit(&self, sample: f64) -> bool {
        if !sample.is_finite() || sample < 1.0 {
            return false;
        }

        // Saturates above u32::MAX
        let bpm = sample.trunc() as u32;
        self.bpm.store(bpm, Ordering::Relaxed);
        self.dirty.store(true, Ordering::Release);
        true
    }

    /// Take the pending sample, if one arrived since the last take
    pub fn take(&self) -> Option<u32> {
        if self.dirty.swap(false, Ordering::Acquire) {
            Some(self.bpm.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Whether a sample is waiting
    pub fn is_pending(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

/// Pulse interval for a heart rate: `60000 / bpm` milliseconds, truncated,
/// never shorter than one millisecond.
pub fn interval_for(bpm: u32) -> Duration {
    let millis = 60_000 / bpm.max(1);
    Duration::from_millis(u64::from(millis.max(1)))
}
