//! Bounded local mirror of the conversation.
//!
//! The hosted thread is the source of truth and keeps its own context; this
//! store exists only so the front end can show what was said. It never
//! feeds back into a request.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::types::Role;

/// Default bound on mirrored entries (25 user/assistant pairs).
pub const MAX_CONVERSATION_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub recorded_at: DateTime<Local>,
}

impl HistoryEntry {
    /// First `max_chars` characters of the content, with `...` when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Ordered entries, oldest first, truncated from the front past `limit`.
///
/// The limit is always even and at least 2, so truncation never splits a
/// user/assistant pair.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl HistoryStore {
    /// `limit` is rounded down to an even number, with a floor of 2.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(2) & !1;
        Self {
            entries: VecDeque::with_capacity(limit.saturating_add(2)),
            limit,
        }
    }

    /// Push one entry. Does not truncate; see `truncate_to_limit`.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.entries.push_back(HistoryEntry {
            role,
            content: content.into(),
            recorded_at: Local::now(),
        });
    }

    /// Drop the oldest entries until at most `limit` remain.
    pub fn truncate_to_limit(&mut self) {
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Record a successful turn: both halves first, then truncate.
    pub fn record_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.append(Role::User, user);
        self.append(Role::Assistant, assistant);
        self.truncate_to_limit();
    }

    pub fn all(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(MAX_CONVERSATION_LENGTH)
    }
}
