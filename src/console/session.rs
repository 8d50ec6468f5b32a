//! Console session history
//!
//! Bounded record of prompt/response exchanges for the current session,
//! backing the `/history` and `/status` commands.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum number of exchanges kept in memory
const MAX_HISTORY_SIZE: usize = 100;

/// Record of one prompt/response exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRecord {
    pub id: Uuid,
    pub prompt: String,
    pub response: String,
    pub success: bool,
    pub duration_ms: u64,
    pub timestamp: i64,
}

impl AskRecord {
    /// Build a record stamped with the current time
    pub fn new(prompt: String, response: String, success: bool, duration_ms: u64) -> Self {
        AskRecord {
            id: Uuid::new_v4(),
            prompt,
            response,
            success,
            duration_ms,
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// Session history (FIFO, bounded)
pub struct SessionHistory {
    records: VecDeque<AskRecord>,
    ask_count: usize,
    session_start: i64,
}

impl SessionHistory {
    pub fn new() -> Self {
        SessionHistory {
            records: VecDeque::with_capacity(MAX_HISTORY_SIZE),
            ask_count: 0,
            session_start: Utc::now().timestamp(),
        }
    }

    /// Record a completed exchange, evicting the oldest at capacity
    pub fn record(&mut self, record: AskRecord) {
        if self.records.len() >= MAX_HISTORY_SIZE {
            self.records.pop_front();
        }
        self.records.push_back(record);
        self.ask_count += 1;
    }

    /// Most recent exchanges, newest first
    pub fn recent(&self, limit: usize) -> Vec<&AskRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    /// Total exchanges this session (including evicted ones)
    pub fn ask_count(&self) -> usize {
        self.ask_count
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records
    pub fn reset(&mut self) {
        self.records.clear();
        self.ask_count = 0;
    }

    /// Unix timestamp of session start
    pub fn session_start(&self) -> i64 {
        self.session_start
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prompt: &str) -> AskRecord {
        AskRecord::new(prompt.to_string(), "response".to_string(), true, 10)
    }

    #[test]
    fn test_empty_history() {
        let history = SessionHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.ask_count(), 0);
        assert!(history.recent(10).is_empty());
    }

    #[test]
    fn test_record_and_recent() {
        let mut history = SessionHistory::new();
        history.record(record("first"));
        history.record(record("second"));

        let recent = history.recent(10);
        assert_eq!(recent.len(), 2);
        // Newest first
        assert_eq!(recent[0].prompt, "second");
        assert_eq!(recent[1].prompt, "first");
        assert_eq!(history.ask_count(), 2);
    }

    #[test]
    fn test_recent_respects_limit() {
        let mut history = SessionHistory::new();
        for i in 0..5 {
            history.record(record(&format!("prompt {}", i)));
        }
        assert_eq!(history.recent(3).len(), 3);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = SessionHistory::new();
        for i in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(record(&format!("prompt {}", i)));
        }
        assert_eq!(history.recent(usize::MAX).len(), MAX_HISTORY_SIZE);
        // Count keeps the true total
        assert_eq!(history.ask_count(), MAX_HISTORY_SIZE + 10);
        // Oldest entries were evicted
        assert_eq!(
            history.recent(usize::MAX).last().unwrap().prompt,
            "prompt 10"
        );
    }

    #[test]
    fn test_reset() {
        let mut history = SessionHistory::new();
        history.record(record("prompt"));
        history.reset();
        assert!(history.is_empty());
        assert_eq!(history.ask_count(), 0);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = record("same");
        let b = record("same");
        assert_ne!(a.id, b.id);
    }
}
