pub mod schema;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{HighscoresData, HistoryData};

/// JSON persistence under the app data directory. Loads fall back to
/// defaults on missing or unparsable files; saves go through a temp file
/// and rename so a crash never leaves a torn file behind.
pub struct ScoreStore {
    base_dir: PathBuf,
}

impl ScoreStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qwertype");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_highscores(&self) -> HighscoresData {
        let data: HighscoresData = self.load("highscores.json");
        if data.needs_reset() {
            HighscoresData::default()
        } else {
            data
        }
    }

    pub fn save_highscores(&self, data: &HighscoresData) -> Result<()> {
        self.save("highscores.json", data)
    }

    pub fn load_history(&self) -> HistoryData {
        let data: HistoryData = self.load("session_history.json");
        if data.needs_reset() {
            HistoryData::default()
        } else {
            data
        }
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save("session_history.json", data)
    }
}
