use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::keywords;
use crate::sync::DEFAULT_SERVER_URL;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_session_secs")]
    pub session_secs: u64,
    #[serde(default = "default_ghost_wpm")]
    pub ghost_wpm: u32,
    #[serde(default = "default_sync_enabled")]
    pub sync_enabled: bool,
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_language() -> String {
    "de".to_string()
}
fn default_keyboard_layout() -> String {
    "qwertz".to_string()
}
fn default_mode() -> String {
    "words".to_string()
}
fn default_theme() -> String {
    "qwertype-dark".to_string()
}
fn default_session_secs() -> u64 {
    60
}
fn default_ghost_wpm() -> u32 {
    120
}
fn default_sync_enabled() -> bool {
    true
}
fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            language: default_language(),
            keyboard_layout: default_keyboard_layout(),
            mode: default_mode(),
            theme: default_theme(),
            session_secs: default_session_secs(),
            ghost_wpm: default_ghost_wpm(),
            sync_enabled: default_sync_enabled(),
            server_url: default_server_url(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qwertype")
            .join("config.toml")
    }

    /// Clamp and reset stale values after deserialization.
    pub fn validate(&mut self) {
        if !["de", "en"].contains(&self.language.as_str()) {
            self.language = default_language();
        }
        if !["qwertz", "qwerty"].contains(&self.keyboard_layout.as_str()) {
            self.keyboard_layout = default_keyboard_layout();
        }
        let mode_ok = ["words", "sentences"].contains(&self.mode.as_str())
            || keywords::is_code_mode(&self.mode);
        if !mode_ok {
            self.mode = default_mode();
        }
        self.session_secs = self.session_secs.clamp(15, 300);
        self.ghost_wpm = self.ghost_wpm.clamp(10, 600);
        if self.server_url.trim().is_empty() {
            self.server_url = default_server_url();
        }
        self.username = normalize_name(&self.username);
    }
}

const MAX_NAME_LEN: usize = 24;

const BLOCKED_NAMES: &[&str] = &[
    "fuck", "shit", "bitch", "asshole", "dick", "cunt", "ficker", "fotze", "hurensohn",
    "arschloch", "scheisse", "nazi", "hitler", "wichser", "schlampe", "wanker", "bastard",
];

/// Trim, collapse runs of whitespace, cap the length.
pub fn normalize_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_NAME_LEN).collect()
}

/// Leaderboard-name policy: at least two characters after normalization and
/// no blocked word hidden inside.
pub fn is_name_allowed(name: &str) -> bool {
    let n = normalize_name(name);
    if n.chars().count() < 2 {
        return false;
    }
    let cleaned: String = n
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        return false;
    }
    !BLOCKED_NAMES.iter().any(|bad| cleaned.contains(bad))
}
