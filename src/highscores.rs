//! Local best-times board
//!
//! Tracks the top 10 fastest winning runs per game mode, persisted as JSON.
//! Loading falls back to an empty board on a missing or corrupt file; losing
//! a score file is never fatal.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::portal::GameMode;

/// Maximum entries kept per mode
pub const MAX_ENTRIES_PER_MODE: usize = 10;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to write score file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode scores: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single winning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub mode: GameMode,
    /// Time from mount to the terminal win, seconds
    pub time_secs: f32,
}

/// Best-times board, kept sorted fastest-first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    fn mode_times(&self, mode: GameMode) -> impl Iterator<Item = f32> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.mode == mode)
            .map(|e| e.time_secs)
    }

    /// Check if a time would make the board for its mode
    pub fn qualifies(&self, mode: GameMode, time_secs: f32) -> bool {
        if !time_secs.is_finite() || time_secs <= 0.0 {
            return false;
        }
        let mut times: Vec<f32> = self.mode_times(mode).collect();
        if times.len() < MAX_ENTRIES_PER_MODE {
            return true;
        }
        times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        times.last().is_none_or(|worst| time_secs < *worst)
    }

    /// Record a winning time. Returns the rank achieved within its mode
    /// (1-indexed) or None if it didn't qualify.
    pub fn add_time(&mut self, mode: GameMode, time_secs: f32) -> Option<usize> {
        if !self.qualifies(mode, time_secs) {
            return None;
        }

        let rank = self.mode_times(mode).filter(|t| *t < time_secs).count() + 1;
        self.entries.push(HighScoreEntry { mode, time_secs });
        self.entries.sort_by(|a, b| {
            a.time_secs
                .partial_cmp(&b.time_secs)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Drop the slowest overflow entry per mode
        let mut kept: HashMap<GameMode, usize> = HashMap::new();
        self.entries.retain(|e| {
            let count = kept.entry(e.mode).or_insert(0);
            *count += 1;
            *count <= MAX_ENTRIES_PER_MODE
        });

        Some(rank)
    }

    /// Fastest recorded win for a mode
    pub fn best(&self, mode: GameMode) -> Option<f32> {
        self.mode_times(mode)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the board, falling back to empty on absence or corruption
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} best times", scores.entries.len());
                    scores
                }
                Err(err) => {
                    log::warn!("Corrupt score file {}: {err}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No best times found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ScoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Best times saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_time_ranks_fastest_first() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_time(GameMode::Racing, 30.0), Some(1));
        assert_eq!(scores.add_time(GameMode::Racing, 20.0), Some(1));
        assert_eq!(scores.add_time(GameMode::Racing, 25.0), Some(2));
        assert_eq!(scores.best(GameMode::Racing), Some(20.0));
    }

    #[test]
    fn test_modes_rank_independently() {
        let mut scores = HighScores::new();
        scores.add_time(GameMode::Racing, 30.0);
        assert_eq!(scores.add_time(GameMode::Obby, 99.0), Some(1));
        assert_eq!(scores.best(GameMode::Obby), Some(99.0));
        assert_eq!(scores.best(GameMode::Tycoon), None);
    }

    #[test]
    fn test_board_truncates_per_mode() {
        let mut scores = HighScores::new();
        for i in 0..MAX_ENTRIES_PER_MODE {
            assert!(scores.add_time(GameMode::Battle, 10.0 + i as f32).is_some());
        }

        // Slower than the whole board: rejected
        assert_eq!(scores.add_time(GameMode::Battle, 100.0), None);

        // Faster: admitted, slowest entry dropped
        assert_eq!(scores.add_time(GameMode::Battle, 5.0), Some(1));
        let battle_count = scores
            .entries
            .iter()
            .filter(|e| e.mode == GameMode::Battle)
            .count();
        assert_eq!(battle_count, MAX_ENTRIES_PER_MODE);
        assert_eq!(scores.best(GameMode::Battle), Some(5.0));
    }

    #[test]
    fn test_nonsense_times_do_not_qualify() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(GameMode::Obby, 0.0));
        assert!(!scores.qualifies(GameMode::Obby, -3.0));
        assert!(!scores.qualifies(GameMode::Obby, f32::NAN));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut scores = HighScores::new();
        scores.add_time(GameMode::Tycoon, 240.0);
        scores.add_time(GameMode::Racing, 31.5);

        let path = std::env::temp_dir().join(format!("gp_scores_{}.json", std::process::id()));
        scores.save(&path).unwrap();
        let loaded = HighScores::load(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.entries, scores.entries);
    }
}
