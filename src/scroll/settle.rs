use std::time::{Duration, Instant};

/// Detects when scroll motion has paused for at least `delay`.
///
/// Each pause produces exactly one settle event; any motion re-arms the detector.
#[derive(Clone, Debug)]
pub struct SettleDetector {
    delay: Duration,
    last_motion: Option<Instant>,
}

impl SettleDetector {
    /// Create a detector that fires `delay` after the last observed motion.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_motion: None,
        }
    }

    /// Configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record scroll motion at `now`.
    pub fn note_motion(&mut self, now: Instant) {
        self.last_motion = Some(now);
    }

    /// Whether motion was observed and has not settled yet.
    pub fn is_armed(&self) -> bool {
        self.last_motion.is_some()
    }

    /// Returns `true` once per pause, when `now` is at least `delay` past the last motion.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_motion {
            Some(t) if now.saturating_duration_since(t) >= self.delay => {
                self.last_motion = None;
                true
            }
            _ => false,
        }
    }

    /// Forget pending motion without firing.
    pub fn reset(&mut self) {
        self.last_motion = None;
    }
}
