use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::coach::TypingCoach;

/// Final metrics of one timed trainer session. Persisted to history and
/// offered to the leaderboard sync queue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionResult {
    pub mode: String,
    pub points: u32,
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: u32,
    pub total: u32,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub completion_pct: Option<f64>,
}

impl SessionResult {
    pub fn from_coach(coach: &TypingCoach, mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            points: coach.score_points(),
            wpm: coach.wpm(),
            accuracy: coach.accuracy(),
            errors: coach.mistakes(),
            total: coach.total(),
            elapsed_secs: coach.elapsed_secs(),
            timestamp: Utc::now(),
            completion_pct: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coach_snapshot() {
        let mut coach = TypingCoach::new(vec!["ab".to_string()]);
        coach.feed('a');
        coach.feed('x');
        coach.finish();

        let result = SessionResult::from_coach(&coach, "words");
        assert_eq!(result.mode, "words");
        assert_eq!(result.total, 2);
        assert_eq!(result.errors, 1);
        assert!((result.accuracy - 50.0).abs() < f64::EPSILON);
        assert!(result.completion_pct.is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let result = SessionResult {
            mode: "py".to_string(),
            points: 420,
            wpm: 61.5,
            accuracy: 97.2,
            errors: 3,
            total: 140,
            elapsed_secs: 60.0,
            timestamp: Utc::now(),
            completion_pct: Some(100.0),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, "py");
        assert_eq!(back.points, 420);
        assert_eq!(back.completion_pct, Some(100.0));
    }
}
