use std::time::{Duration, Instant};

/// Quiet period before edited journal notes are sent.
pub const NOTES_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Collapses a burst of values into the last one, released once no new value
/// has arrived for the quiet period.
///
/// Time is passed in by the caller, so the owner decides when to poll.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    pending: Option<(T, Option<Instant>)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, Some(now)));
    }

    /// Put back a value whose send failed. It stays pending for `flush` but
    /// is not ready again until the next `push`.
    pub fn hold(&mut self, value: T) {
        self.pending = Some((value, None));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        match &self.pending {
            Some((_, Some(at))) => now.saturating_duration_since(*at) >= self.quiet_period,
            _ => false,
        }
    }

    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        if self.is_ready(now) {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Release the pending value regardless of the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}
