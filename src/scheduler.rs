//! Elapsed-time cadence gates for the cooperative tick loop.
//!
//! ```text
//!   tick ─▶ Cadence::fire_if_due(now) ─▶ true  → run the periodic job
//!                                     └─▶ false → skip this tick
//! ```
//!
//! A [`Cadence`] re-arms from the moment it fired, not from when the job
//! finished, so a slow or failing job cannot make the next slot come sooner
//! (no poll storms) and a long job cannot push every later slot back by its
//! own duration.

/// Fixed-interval gate driven by a monotonic millisecond clock.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval_ms: u64,
    /// `None` until the first fire, so the first check is always due.
    last_fire_ms: Option<u64>,
}

impl Cadence {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
        }
    }

    /// A cadence whose first slot opens `interval_ms` after `now_ms`.
    pub fn starting_at(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: Some(now_ms),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_fire_ms(&self) -> Option<u64> {
        self.last_fire_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.last_fire_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms)
    }

    /// If due, record `now_ms` as the fire time and return `true`.
    pub fn fire_if_due(&mut self, now_ms: u64) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.last_fire_ms = Some(now_ms);
        true
    }
}
