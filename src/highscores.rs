//! High score table
//!
//! Top 10 scores, persisted to LocalStorage on wasm. Recorded once per
//! session when a run ends.

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Level the run ended on
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_invaders_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a score would make the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score if it qualifies; returns the 1-indexed rank achieved.
    pub fn add_score(&mut self, score: u32, level: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from LocalStorage (wasm only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        Self::new()
    }

    /// Save to LocalStorage (wasm only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(10));
    }

    #[test]
    fn entries_stay_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 2, 0.0), Some(1));
        assert_eq!(scores.add_score(300, 4, 1.0), Some(1));
        assert_eq!(scores.add_score(200, 3, 2.0), Some(2));
        assert_eq!(scores.top_score(), Some(300));

        let values: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![300, 200, 100]);
    }

    #[test]
    fn table_truncates_at_capacity() {
        let mut scores = HighScores::new();
        for i in 1..=15u32 {
            scores.add_score(i * 10, 1, i as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // The weakest surviving entry is the 10th best
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));
        assert!(!scores.qualifies(50));
        assert!(scores.qualifies(70));
    }
}
