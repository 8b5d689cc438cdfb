use std::time::{Duration, Instant};

/// The single pending debounced repaint.
///
/// One slot: scheduling any document replaces whatever was pending, so
/// at most one repaint fires per quiet period. Callers pass `now`
/// explicitly, which keeps firing behavior testable without sleeping.
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    uri: String,
    deadline: Instant,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Start (or restart) the quiet period for `uri` from `now`.
    pub fn schedule(&mut self, uri: &str, now: Instant) {
        self.pending = Some(Pending {
            uri: uri.to_string(),
            deadline: now + self.window,
        });
    }

    /// Drop the pending repaint, whatever it targets.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Drop the pending repaint only if it targets `uri`.
    pub fn cancel_for(&mut self, uri: &str) {
        if self.pending.as_ref().is_some_and(|p| p.uri == uri) {
            self.pending = None;
        }
    }

    /// Time left until the pending deadline. Zero once the deadline has
    /// passed, `None` when nothing is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Take the pending uri if its deadline has passed. Returns a value
    /// at most once per schedule.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            self.pending.take().map(|p| p.uri)
        } else {
            None
        }
    }
}
