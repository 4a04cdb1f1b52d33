//! Append-only review history, one JSONL file per deck.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fsrs::ReviewLog;

/// A committed review: which card, and the log of the chosen outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub card_id: String,
    #[serde(flatten)]
    pub log: ReviewLog,
}

/// JSONL review history under `{base}/{deck_id}.jsonl`.
#[derive(Debug, Clone)]
pub struct ReviewHistory {
    base_path: PathBuf,
}

impl ReviewHistory {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn deck_path(&self, deck_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", deck_id))
    }

    /// Append one entry to the deck's log.
    pub fn append(&self, deck_id: &str, entry: &HistoryEntry) -> Result<()> {
        let path = self.deck_path(deck_id);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", serde_json::to_string(entry)?)?;
        Ok(())
    }

    /// Load every entry for a deck, oldest first.
    pub fn load(&self, deck_id: &str) -> Result<Vec<HistoryEntry>> {
        let path = self.deck_path(deck_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                entries.push(serde_json::from_str(&line)?);
            }
        }
        Ok(entries)
    }

    /// Remove a deck's history, e.g. when the deck is deleted.
    pub fn remove(&self, deck_id: &str) -> Result<()> {
        let path = self.deck_path(deck_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsrs::{Rating, State};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn entry(card_id: &str, rating: Rating, scheduled_days: u32) -> HistoryEntry {
        HistoryEntry {
            card_id: card_id.to_string(),
            log: ReviewLog::new(
                rating,
                scheduled_days,
                3,
                Utc.with_ymd_and_hms(2024, 2, 2, 7, 0, 0).unwrap(),
                State::Review,
            ),
        }
    }

    #[test]
    fn test_append_and_load() {
        let temp = TempDir::new().unwrap();
        let history = ReviewHistory::new(temp.path()).unwrap();

        history.append("deck", &entry("c1", Rating::Good, 12)).unwrap();
        history.append("deck", &entry("c2", Rating::Again, 0)).unwrap();

        let loaded = history.load("deck").unwrap();
        assert_eq!(loaded, vec![entry("c1", Rating::Good, 12), entry("c2", Rating::Again, 0)]);
    }

    #[test]
    fn test_load_missing_deck_is_empty() {
        let temp = TempDir::new().unwrap();
        let history = ReviewHistory::new(temp.path()).unwrap();
        assert!(history.load("nothing").unwrap().is_empty());
    }

    #[test]
    fn test_entries_are_one_line_each() {
        let temp = TempDir::new().unwrap();
        let history = ReviewHistory::new(temp.path()).unwrap();
        history.append("deck", &entry("c1", Rating::Easy, 30)).unwrap();

        let raw = fs::read_to_string(temp.path().join("deck.jsonl")).unwrap();
        assert_eq!(raw.lines().count(), 1);
        assert!(raw.contains("\"card_id\":\"c1\""));
        assert!(raw.contains("\"rating\":\"Easy\""));
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let history = ReviewHistory::new(temp.path()).unwrap();
        history.append("deck", &entry("c1", Rating::Hard, 2)).unwrap();
        history.remove("deck").unwrap();
        assert!(history.load("deck").unwrap().is_empty());
        history.remove("deck").unwrap();
    }
}
