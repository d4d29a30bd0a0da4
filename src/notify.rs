//! Transient error notifications.
//!
//! Each pushed message stays visible for a fixed time and then disappears on
//! its own, independent of any other message on screen.

use crate::constants::ERROR_HIDE_TIMEOUT_MS;
use crate::schedule::TimerQueue;
use web_time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Notification {
    id: u64,
    message: String,
}

/// Shows error messages for a limited time.
#[derive(Debug)]
pub struct ErrorDisplayer {
    lifetime: Duration,
    next_id: u64,
    shown: Vec<Notification>,
    expiry: TimerQueue<u64>,
}

impl Default for ErrorDisplayer {
    fn default() -> Self {
        Self::new(Duration::from_millis(ERROR_HIDE_TIMEOUT_MS))
    }
}

impl ErrorDisplayer {
    /// Creates a displayer whose messages live for `lifetime`.
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            next_id: 0,
            shown: Vec::new(),
            expiry: TimerQueue::new(),
        }
    }

    /// Shows `message` starting at `now`.
    pub fn push(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        log::debug!("showing error: {message}");
        let id = self.next_id;
        self.next_id += 1;
        self.expiry.schedule(now, self.lifetime, id);
        self.shown.push(Notification { id, message });
    }

    /// Removes every message whose time is up at `now`.
    pub fn expire(&mut self, now: Instant) {
        let expired = self.expiry.drain_due(now);
        if !expired.is_empty() {
            self.shown.retain(|n| !expired.contains(&n.id));
        }
    }

    /// Messages currently on screen, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.shown.iter().map(|n| n.message.as_str())
    }

    /// Number of messages on screen.
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// Whether nothing is on screen.
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// When the oldest message will disappear.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.expiry.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_expire_independently() {
        let start = Instant::now();
        let mut errors = ErrorDisplayer::default();
        errors.push("first", start);
        errors.push("second", start + Duration::from_millis(1000));
        assert_eq!(errors.messages().collect::<Vec<_>>(), vec!["first", "second"]);

        errors.expire(start + Duration::from_millis(3999));
        assert_eq!(errors.len(), 2);

        errors.expire(start + Duration::from_millis(4000));
        assert_eq!(errors.messages().collect::<Vec<_>>(), vec!["second"]);
        assert_eq!(errors.next_deadline(), Some(start + Duration::from_millis(5000)));

        errors.expire(start + Duration::from_millis(5000));
        assert!(errors.is_empty());
    }

    #[test]
    fn identical_messages_are_separate_entries() {
        let start = Instant::now();
        let mut errors = ErrorDisplayer::new(Duration::from_millis(10));
        errors.push("same", start);
        errors.push("same", start + Duration::from_millis(5));

        errors.expire(start + Duration::from_millis(10));
        assert_eq!(errors.len(), 1);
    }
}
