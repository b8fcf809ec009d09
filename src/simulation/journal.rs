//! Bounded decision journal
//!
//! Append-only record of planning, reroute, and incident events surfaced to
//! observers. Ring semantics: once full, the oldest entry is discarded.

use std::collections::VecDeque;

/// Maximum retained journal entries
pub const JOURNAL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

/// A single journal line, stamped with simulated minutes
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub at_minutes: f32,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DecisionJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
}

impl Default for DecisionJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionJournal {
    pub fn new() -> Self {
        Self::with_capacity(JOURNAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, discarding the oldest once capacity is exceeded
    pub fn push(&mut self, at_minutes: f32, severity: Severity, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            at_minutes,
            severity,
            message: message.into(),
        });
    }

    /// Entries most recent first
    pub fn iter(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
