//! Player-facing story text: a bounded scrolling log plus one timed speech
//! overlay. The overlay carries an explicit expiry on the session clock and
//! is checked by whoever reads it; nothing clears it in the background.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Local};

pub const LOG_CAPACITY: usize = 200;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Speech {
    text: String,
    expires_at: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct Narrative {
    entries: VecDeque<LogEntry>,
    speech: Option<Speech>,
}

impl Narrative {
    pub fn append_line<S: Into<String>>(&mut self, text: S) {
        self.entries.push_back(LogEntry {
            at: Local::now(),
            text: text.into(),
        });
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn show_transient_message<S: Into<String>>(&mut self, text: S, duration: Duration, now: Duration) {
        self.speech = Some(Speech {
            text: text.into(),
            expires_at: now.saturating_add(duration),
        });
    }

    pub fn has_active_message(&self, now: Duration) -> bool {
        self.active_message(now).is_some()
    }

    pub fn active_message(&self, now: Duration) -> Option<&str> {
        self.speech
            .as_ref()
            .filter(|speech| now < speech.expires_at)
            .map(|speech| speech.text.as_str())
    }

    /// Drops the overlay once its time is up.
    pub fn expire(&mut self, now: Duration) {
        if self.speech.as_ref().is_some_and(|speech| now >= speech.expires_at) {
            self.speech = None;
        }
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last_line(&self) -> Option<&str> {
        self.entries.back().map(|entry| entry.text.as_str())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.text.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
