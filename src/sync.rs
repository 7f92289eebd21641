use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "https://qwertype.morina-solutions.com";

#[cfg(feature = "network")]
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// One score queued for upload.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreUpload {
    pub username: String,
    pub mode: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub points: u32,
    pub completion_pct: Option<f64>,
}

/// One row of the server leaderboard.
#[derive(Clone, Debug, Deserialize)]
pub struct LeaderboardRow {
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub wpm: f64,
    #[serde(default)]
    pub accuracy: f64,
}

/// Best-effort leaderboard client.
///
/// Scores are saved locally before they ever reach this queue, so upload
/// failures are dropped silently. Fetches return `None` on any failure and
/// the UI shows local bests instead. Without the `network` feature both
/// directions are no-ops.
pub struct ServerSync {
    base_url: String,
    pending: Vec<ScoreUpload>,
}

impl ServerSync {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            pending: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn add_score(&mut self, upload: ScoreUpload) {
        self.pending.push(upload);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drain the queue onto a background thread that posts each score.
    /// The thread owns its data; nothing here is shared with the UI loop.
    pub fn sync_now(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let scores = std::mem::take(&mut self.pending);
        Self::post_scores_in_background(self.base_url.clone(), scores);
    }

    #[cfg(feature = "network")]
    fn post_scores_in_background(base_url: String, scores: Vec<ScoreUpload>) {
        std::thread::spawn(move || {
            let Ok(client) = reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
            else {
                return;
            };
            for score in scores {
                let _ = client
                    .post(format!("{base_url}/api/scores"))
                    .json(&score)
                    .send()
                    .and_then(|r| r.error_for_status());
            }
        });
    }

    #[cfg(not(feature = "network"))]
    fn post_scores_in_background(_base_url: String, _scores: Vec<ScoreUpload>) {}

    /// Fetch a leaderboard page. Blocking; run it on a worker thread and
    /// deliver the result through the app event channel.
    #[cfg(feature = "network")]
    pub fn fetch_leaderboard(
        base_url: &str,
        mode: &str,
        period: &str,
        limit: usize,
    ) -> Option<Vec<LeaderboardRow>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .ok()?;
        let url = format!(
            "{}/api/leaderboard/{mode}?period={period}&limit={limit}",
            base_url.trim_end_matches('/')
        );
        let response = client.get(url).send().ok()?.error_for_status().ok()?;
        response.json().ok()
    }

    #[cfg(not(feature = "network"))]
    pub fn fetch_leaderboard(
        _base_url: &str,
        _mode: &str,
        _period: &str,
        _limit: usize,
    ) -> Option<Vec<LeaderboardRow>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_on_sync() {
        let mut sync = ServerSync::new("http://localhost:9");
        sync.add_score(ScoreUpload {
            username: "kim".to_string(),
            mode: "words".to_string(),
            wpm: 62.0,
            accuracy: 97.5,
            points: 600,
            completion_pct: None,
        });
        assert_eq!(sync.pending_count(), 1);
        sync.sync_now();
        assert_eq!(sync.pending_count(), 0);
        // Idempotent with an empty queue
        sync.sync_now();
    }

    #[test]
    fn test_base_url_is_normalized() {
        let sync = ServerSync::new("https://example.com/");
        assert_eq!(sync.base_url(), "https://example.com");
    }

    #[test]
    fn test_upload_serializes_expected_fields() {
        let upload = ScoreUpload {
            username: "kim".to_string(),
            mode: "py".to_string(),
            wpm: 55.0,
            accuracy: 92.0,
            points: 505,
            completion_pct: Some(88.0),
        };
        let json = serde_json::to_string(&upload).unwrap();
        for field in ["username", "mode", "wpm", "accuracy", "points", "completion_pct"] {
            assert!(json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_leaderboard_row_tolerates_missing_fields() {
        let row: LeaderboardRow = serde_json::from_str(r#"{"username": "kim"}"#).unwrap();
        assert_eq!(row.username, "kim");
        assert_eq!(row.rank, 0);
        assert_eq!(row.points, 0);
    }
}
