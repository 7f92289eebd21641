use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

pub const SCHEMA_VERSION: u32 = 1;

/// Best local result for one mode bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub points: u32,
    pub wpm: f64,
    pub acc: f64,
}

/// Per-mode local highscores ("words", "sentences", code language keys).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HighscoresData {
    pub schema_version: u32,
    #[serde(default)]
    pub best: HashMap<String, HighscoreEntry>,
}

impl Default for HighscoresData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            best: HashMap::new(),
        }
    }
}

impl HighscoresData {
    /// Loaded data from an incompatible schema is discarded, not migrated.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn best_for(&self, mode: &str) -> Option<&HighscoreEntry> {
        self.best.get(mode)
    }

    /// Keep the higher-points entry. Returns true when the submission is a
    /// new best for its bucket.
    pub fn submit(&mut self, mode: &str, entry: HighscoreEntry) -> bool {
        match self.best.get(mode) {
            Some(existing) if existing.points >= entry.points => false,
            _ => {
                self.best.insert(mode.to_string(), entry);
                true
            }
        }
    }
}

/// Session history, newest last.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    #[serde(default)]
    pub sessions: Vec<SessionResult>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

impl HistoryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(points: u32) -> HighscoreEntry {
        HighscoreEntry {
            name: "kim".to_string(),
            points,
            wpm: 60.0,
            acc: 95.0,
        }
    }

    #[test]
    fn test_submit_keeps_higher_points() {
        let mut hs = HighscoresData::default();
        assert!(hs.submit("words", entry(100)));
        assert!(!hs.submit("words", entry(80)));
        assert_eq!(hs.best_for("words").unwrap().points, 100);
        assert!(hs.submit("words", entry(120)));
        assert_eq!(hs.best_for("words").unwrap().points, 120);
    }

    #[test]
    fn test_buckets_are_independent() {
        let mut hs = HighscoresData::default();
        hs.submit("words", entry(100));
        assert!(hs.best_for("py").is_none());
        hs.submit("py", entry(50));
        assert_eq!(hs.best_for("words").unwrap().points, 100);
        assert_eq!(hs.best_for("py").unwrap().points, 50);
    }

    #[test]
    fn test_equal_points_do_not_replace() {
        let mut hs = HighscoresData::default();
        hs.submit("words", entry(100));
        let mut challenger = entry(100);
        challenger.name = "alex".to_string();
        assert!(!hs.submit("words", challenger));
        assert_eq!(hs.best_for("words").unwrap().name, "kim");
    }
}
