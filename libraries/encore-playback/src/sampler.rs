//! Position sampling
//!
//! Rate limiter for reading the session clock. The sampler is bound to a
//! single session; once the manager rebinds or stops it, samples for the
//! old session are never taken again.

use crate::session::SessionId;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PositionSampler {
    interval: Duration,
    bound: Option<SessionId>,
    last_sample: Option<Instant>,
}

impl PositionSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            bound: None,
            last_sample: None,
        }
    }

    /// Bind to a session; the first poll afterwards is due immediately
    pub fn start(&mut self, id: SessionId) {
        self.bound = Some(id);
        self.last_sample = None;
    }

    /// Unbind from the current session
    pub fn stop(&mut self) {
        self.bound = None;
        self.last_sample = None;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a sample for `id` is due at `now`; records the sample if so
    pub fn poll(&mut self, id: SessionId, now: Instant) -> bool {
        if self.bound != Some(id) {
            return false;
        }
        let due = match self.last_sample {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if due {
            self.last_sample = Some(now);
        }
        due
    }
}
