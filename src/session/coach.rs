use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Outcome of feeding one keystroke to the coach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub expected: char,
}

/// Drill state for one timed trainer session: serves random items from a
/// list and scores keystrokes against the expected character.
pub struct TypingCoach {
    items: Vec<String>,
    rng: SmallRng,
    current: Vec<char>,
    index: usize,
    total: u32,
    mistakes: u32,
    per_char_hit: HashMap<char, u32>,
    per_char_miss: HashMap<char, u32>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

impl TypingCoach {
    pub fn new(items: Vec<String>) -> Self {
        let mut items: Vec<String> = items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            items.push("typing".to_string());
        }
        let mut rng = SmallRng::from_entropy();
        let current: Vec<char> = items[rng.gen_range(0..items.len())].chars().collect();
        Self {
            items,
            rng,
            current,
            index: 0,
            total: 0,
            mistakes: 0,
            per_char_hit: HashMap::new(),
            per_char_miss: HashMap::new(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn reset(&mut self) {
        self.next_item();
        self.total = 0;
        self.mistakes = 0;
        self.per_char_hit.clear();
        self.per_char_miss.clear();
        self.started_at = None;
        self.finished_at = None;
    }

    pub fn current_item(&self) -> String {
        self.current.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    fn next_item(&mut self) {
        self.current = self.items[self.rng.gen_range(0..self.items.len())]
            .chars()
            .collect();
        self.index = 0;
    }

    pub fn expected_char(&self) -> Option<char> {
        self.current.get(self.index).copied()
    }

    /// Classify one keystroke. A match advances the cursor (rolling over to
    /// a fresh item at the end); a miss stays put so the user retries.
    pub fn feed(&mut self, ch: char) -> Feedback {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        if self.expected_char().is_none() {
            self.next_item();
        }
        // Item strings are non-empty, so expected is always present here.
        let expected = self.expected_char().unwrap_or(' ');

        self.total += 1;

        if ch == expected {
            *self.per_char_hit.entry(expected).or_insert(0) += 1;
            self.index += 1;
            if self.index >= self.current.len() {
                self.next_item();
            }
            Feedback {
                correct: true,
                expected,
            }
        } else {
            self.mistakes += 1;
            *self.per_char_miss.entry(expected).or_insert(0) += 1;
            Feedback {
                correct: false,
                expected,
            }
        }
    }

    /// Freeze the clock when the session ends.
    pub fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Instant::now());
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        ((self.total - self.mistakes) as f64 / self.total as f64 * 100.0).max(0.0)
    }

    pub fn wpm(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed < 0.1 {
            return 0.0;
        }
        (self.total as f64 / 5.0) / (elapsed / 60.0)
    }

    /// Session score: wpm weighted by accuracy, scaled to whole points.
    pub fn score_points(&self) -> u32 {
        let pts = (self.wpm() * (self.accuracy() / 100.0) * 10.0).round();
        pts.max(0.0) as u32
    }

    /// Most-missed characters, worst first.
    pub fn weak_spots(&self, limit: usize) -> Vec<String> {
        let mut missed: Vec<(char, u32)> = self
            .per_char_miss
            .iter()
            .map(|(&ch, &miss)| (ch, miss))
            .collect();
        missed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        missed
            .into_iter()
            .take(limit)
            .map(|(ch, miss)| {
                let hit = self.per_char_hit.get(&ch).copied().unwrap_or(0);
                format!("'{ch}' errors: {miss}, hits: {hit}")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach_for(item: &str) -> TypingCoach {
        // Single-item list makes the random pick deterministic.
        TypingCoach::new(vec![item.to_string()])
    }

    #[test]
    fn test_accuracy_starts_at_100() {
        let coach = coach_for("abc");
        assert_eq!(coach.accuracy(), 100.0);
        assert_eq!(coach.total(), 0);
    }

    #[test]
    fn test_correct_feed_advances() {
        let mut coach = coach_for("ab");
        let fb = coach.feed('a');
        assert!(fb.correct);
        assert_eq!(fb.expected, 'a');
        assert_eq!(coach.cursor(), 1);
        assert_eq!(coach.expected_char(), Some('b'));
    }

    #[test]
    fn test_incorrect_feed_stays_put() {
        let mut coach = coach_for("ab");
        let fb = coach.feed('x');
        assert!(!fb.correct);
        assert_eq!(fb.expected, 'a');
        assert_eq!(coach.cursor(), 0);
        assert_eq!(coach.mistakes(), 1);
    }

    #[test]
    fn test_finishing_item_rolls_to_next() {
        let mut coach = coach_for("ab");
        coach.feed('a');
        coach.feed('b');
        // Single-item list: the next item is "ab" again, cursor reset.
        assert_eq!(coach.cursor(), 0);
        assert_eq!(coach.expected_char(), Some('a'));
    }

    #[test]
    fn test_accuracy_math() {
        let mut coach = coach_for("aaaa");
        coach.feed('a');
        coach.feed('x');
        coach.feed('a');
        coach.feed('a');
        assert_eq!(coach.total(), 4);
        assert_eq!(coach.mistakes(), 1);
        assert!((coach.accuracy() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weak_spots_sorted_by_misses() {
        let mut coach = coach_for("ba");
        coach.feed('x'); // miss 'b'
        coach.feed('x'); // miss 'b'
        coach.feed('b'); // hit 'b'
        coach.feed('z'); // miss 'a'
        let spots = coach.weak_spots(5);
        assert_eq!(spots.len(), 2);
        assert!(spots[0].starts_with("'b'"));
        assert!(spots[0].contains("errors: 2"));
        assert!(spots[0].contains("hits: 1"));
        assert!(spots[1].starts_with("'a'"));
    }

    #[test]
    fn test_empty_item_list_falls_back() {
        let mut coach = TypingCoach::new(vec!["  ".to_string(), String::new()]);
        assert!(coach.expected_char().is_some());
        coach.feed('t');
        assert_eq!(coach.total(), 1);
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut coach = coach_for("ab");
        coach.feed('a');
        coach.feed('x');
        coach.reset();
        assert_eq!(coach.total(), 0);
        assert_eq!(coach.mistakes(), 0);
        assert_eq!(coach.cursor(), 0);
        assert!(coach.weak_spots(5).is_empty());
    }

    #[test]
    fn test_score_is_zero_before_typing() {
        let coach = coach_for("ab");
        assert_eq!(coach.score_points(), 0);
    }
}
