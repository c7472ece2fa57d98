//! Leaderboard
//!
//! Persisted to LocalStorage as a plain JSON array, keeps the top 5 scores.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Maximum number of scores to keep
pub const MAX_ENTRIES: usize = 5;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u64,
    /// ISO-8601 timestamp of the run
    pub date: String,
}

/// Best scores, sorted descending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "pangolin-leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score; returns the rank achieved (1-indexed) or None
    ///
    /// A new score ranks below existing entries with the same score.
    pub fn add_score(&mut self, score: u64, date: impl Into<String>) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = LeaderboardEntry {
            score,
            date: date.into(),
        };

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_ENTRIES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from storage; anything unreadable counts as an empty board
    pub fn load() -> Self {
        match storage::load_json::<Leaderboard>(Self::STORAGE_KEY) {
            Some(mut board) => {
                board.normalize();
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Leaderboard saved ({} entries)", self.entries.len());
        }
    }

    /// Wipe the stored board
    pub fn clear() {
        storage::remove(Self::STORAGE_KEY);
    }

    /// Record a finished run and persist it
    pub fn record(score: u64) -> Option<usize> {
        let mut board = Self::load();
        let rank = board.add_score(score, crate::platform::now_iso8601());
        board.save();
        rank
    }

    /// Re-sort and trim data that came from outside
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}
