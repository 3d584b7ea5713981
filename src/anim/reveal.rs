//! Typewriter-style heading reveal.

use std::time::Duration;

/// Time between two revealed characters.
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(60);

/// Shows a growing prefix of `text`, one character per interval.
///
/// Each instance is one running timer. Restarting a reveal means dropping the
/// old instance and creating a new one, so two timers can never write the
/// same heading.
#[derive(Debug, Clone)]
pub struct CharacterReveal {
    text: String,
    /// Byte offset of every character boundary after the first char.
    boundaries: Vec<usize>,
    shown: usize,
    interval: Duration,
    pending: Duration,
}

impl CharacterReveal {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_interval(text, REVEAL_INTERVAL)
    }

    pub fn with_interval(text: impl Into<String>, interval: Duration) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        Self {
            text,
            boundaries,
            shown: 0,
            interval,
            pending: Duration::ZERO,
        }
    }

    /// Advance the timer. Returns true when the visible prefix changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.is_complete() {
            return false;
        }
        if self.interval.is_zero() {
            self.shown = self.boundaries.len();
            return true;
        }
        self.pending += dt;
        let before = self.shown;
        while self.pending >= self.interval && self.shown < self.boundaries.len() {
            self.pending -= self.interval;
            self.shown += 1;
        }
        if self.is_complete() {
            self.pending = Duration::ZERO;
        }
        self.shown != before
    }

    /// The currently visible prefix; always ends on a char boundary.
    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }

    pub fn shown_chars(&self) -> usize {
        self.shown
    }

    pub fn is_complete(&self) -> bool {
        self.shown >= self.boundaries.len()
    }
}
