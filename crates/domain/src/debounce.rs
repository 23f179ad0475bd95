use chrono::{DateTime, Duration, Utc};

pub const SEARCH_DEBOUNCE_MILLIS: i64 = 500;

/// Holds back a rapidly changing value until it has been stable for a quiet period.
///
/// The caller drives the clock, so the same state works with any timer implementation.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, DateTime<Utc>)>,
}

impl<T> Debounce<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn update(&mut self, value: T, now: DateTime<Utc>) {
        self.pending = Some((value, now));
    }

    /// Returns the pending value once the quiet period has elapsed, at most once per update.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        let settled = self
            .pending
            .as_ref()
            .is_some_and(|(_, updated)| now - *updated >= self.delay);
        if settled {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Time left until the pending value settles.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, updated)| (*updated + self.delay - now).max(Duration::zero()))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new(Duration::milliseconds(SEARCH_DEBOUNCE_MILLIS))
    }
}
