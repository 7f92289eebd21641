use std::time::{Duration, Instant};

use crate::course::spec::{Content, GhostSpec, Segment};

/// Floor for the tick interval so extreme wpm values cannot spin the loop.
const MIN_TICK_MS: u64 = 8;

/// Tick interval for a wpm rate, assuming the usual five chars per word.
pub fn interval_for_wpm(wpm: u32) -> Duration {
    let wpm = wpm.max(1) as u64;
    Duration::from_millis((60_000 / wpm / 5).max(MIN_TICK_MS))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostEvent {
    /// One more character revealed; payload is the count typed so far.
    Typed(usize),
    /// End of text reached; the typer is idle again.
    Finished,
}

/// Simulated typist revealing a target string one character per tick.
///
/// The machine holds no timer. The caller advances it with [`GhostTyper::tick`],
/// normally driven by a [`TickDriver`] off the event loop, so playback is
/// deterministic and testable without real time.
#[derive(Debug)]
pub struct GhostTyper {
    text: Vec<char>,
    pos: usize,
    running: bool,
    interval: Duration,
}

impl GhostTyper {
    pub fn new(wpm: u32) -> Self {
        Self {
            text: Vec::new(),
            pos: 0,
            running: false,
            interval: interval_for_wpm(wpm),
        }
    }

    pub fn set_wpm(&mut self, wpm: u32) {
        self.interval = interval_for_wpm(wpm);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begin a run. Any in-progress run is cancelled first; position resets
    /// to zero. Empty text is fine, the first tick reports `Finished`.
    pub fn start(&mut self, text: &str) {
        self.stop();
        self.text = text.chars().collect();
        self.pos = 0;
        self.running = true;
    }

    /// Cancel without a `Finished` event. Idempotent, never blocks.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Characters revealed so far.
    pub fn typed(&self) -> String {
        self.text[..self.pos].iter().collect()
    }

    pub fn tick(&mut self) -> Option<GhostEvent> {
        if !self.running {
            return None;
        }
        if self.pos >= self.text.len() {
            self.running = false;
            return Some(GhostEvent::Finished);
        }
        self.pos += 1;
        Some(GhostEvent::Typed(self.pos))
    }
}

/// Converts wall-clock time into due tick counts for a fixed cadence.
///
/// The event loop polls this with `Instant::now()`; tests inject synthetic
/// instants instead.
#[derive(Debug)]
pub struct TickDriver {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// Number of ticks that have come due since the last poll.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut count = 0;
        while due <= now {
            count += 1;
            due += self.interval;
        }
        self.next_due = Some(due);
        count
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoPhase {
    /// Nothing played yet (or reset for replay).
    Ready,
    /// Characters are being revealed.
    Typing,
    /// A segment finished; the next one waits for a run request.
    AwaitingNext,
    /// All content played; the next run request replays from the start.
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoEvent {
    /// One more character is visible.
    Progress,
    /// A segment finished; more segments remain.
    SegmentComplete,
    /// The whole demo finished.
    DemoComplete,
}

/// Step-level ghost demo playback over a [`GhostSpec`].
///
/// Single mode plays `final_code` flat. Segmented mode plays segment by
/// segment: completed segments accumulate into a base text so earlier
/// segments stay visible, and each segment's explanation is available
/// before its characters appear.
pub struct DemoPlayer {
    typer: GhostTyper,
    segments: Vec<Segment>,
    segment_index: usize,
    base_text: String,
    segment_text: String,
    single_text: String,
    complete: bool,
}

impl DemoPlayer {
    pub fn from_spec(spec: &GhostSpec, wpm: u32) -> Self {
        Self {
            typer: GhostTyper::new(wpm),
            segments: spec.segments.clone(),
            segment_index: 0,
            base_text: String::new(),
            segment_text: String::new(),
            single_text: spec.final_code.clone(),
            complete: false,
        }
    }

    pub fn is_segmented(&self) -> bool {
        !self.segments.is_empty()
    }

    pub fn interval(&self) -> Duration {
        self.typer.interval()
    }

    pub fn is_running(&self) -> bool {
        self.typer.is_running()
    }

    pub fn phase(&self) -> DemoPhase {
        if self.typer.is_running() {
            DemoPhase::Typing
        } else if self.is_segmented() {
            if self.segment_index >= self.segments.len() {
                DemoPhase::Complete
            } else if self.segment_index == 0 && self.base_text.is_empty() {
                DemoPhase::Ready
            } else {
                DemoPhase::AwaitingNext
            }
        } else if self.complete {
            DemoPhase::Complete
        } else {
            DemoPhase::Ready
        }
    }

    /// Explanation of the segment that plays on the next run request.
    pub fn current_explanation(&self) -> Option<&Content> {
        self.segments
            .get(self.segment_index)
            .and_then(|s| s.explanation())
    }

    /// Start (or continue, or replay) playback.
    ///
    /// In segmented mode past the last segment this is the replay request:
    /// the accumulator and segment index reset before the first segment
    /// starts again.
    pub fn run(&mut self) {
        if self.is_segmented() {
            if self.segment_index >= self.segments.len() {
                self.base_text.clear();
                self.segment_index = 0;
            }
            self.segment_text = self.segments[self.segment_index].code.clone();
            let text = self.segment_text.clone();
            self.typer.start(&text);
        } else {
            self.complete = false;
            let text = self.single_text.clone();
            self.typer.start(&text);
        }
    }

    /// Cancel playback. Accumulated base text is kept.
    pub fn stop(&mut self) {
        self.typer.stop();
    }

    /// Everything currently visible: completed segments plus the typed
    /// prefix of the active one.
    pub fn visible_text(&self) -> String {
        let mut out = self.base_text.clone();
        out.push_str(&self.typer.typed());
        out
    }

    pub fn tick(&mut self) -> Option<DemoEvent> {
        match self.typer.tick()? {
            GhostEvent::Typed(_) => Some(DemoEvent::Progress),
            GhostEvent::Finished => {
                if self.is_segmented() {
                    self.base_text.push_str(&self.segment_text);
                    self.segment_text.clear();
                    self.segment_index += 1;
                    if self.segment_index < self.segments.len() {
                        Some(DemoEvent::SegmentComplete)
                    } else {
                        Some(DemoEvent::DemoComplete)
                    }
                } else {
                    self.complete = true;
                    Some(DemoEvent::DemoComplete)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(typer: &mut GhostTyper) -> Vec<GhostEvent> {
        let mut events = Vec::new();
        while let Some(e) = typer.tick() {
            events.push(e);
        }
        events
    }

    #[test]
    fn test_interval_formula() {
        assert_eq!(interval_for_wpm(60), Duration::from_millis(200));
        assert_eq!(interval_for_wpm(120), Duration::from_millis(100));
        // Floored, never zero
        assert_eq!(interval_for_wpm(10_000), Duration::from_millis(8));
        assert_eq!(interval_for_wpm(0), Duration::from_millis(12_000));
    }

    #[test]
    fn test_playback_emits_counts_then_finished() {
        let mut typer = GhostTyper::new(60);
        typer.start("abc");
        let events = drain(&mut typer);
        assert_eq!(
            events,
            vec![
                GhostEvent::Typed(1),
                GhostEvent::Typed(2),
                GhostEvent::Typed(3),
                GhostEvent::Finished,
            ]
        );
        assert!(!typer.is_running());
        assert_eq!(typer.typed(), "abc");
    }

    #[test]
    fn test_restart_replays_from_zero() {
        let mut typer = GhostTyper::new(60);
        typer.start("abc");
        drain(&mut typer);
        typer.start("abc");
        assert_eq!(typer.tick(), Some(GhostEvent::Typed(1)));
        assert_eq!(typer.typed(), "a");
    }

    #[test]
    fn test_stop_discards_pending_ticks() {
        let mut typer = GhostTyper::new(60);
        typer.start("long old text");
        typer.tick();
        typer.tick();
        typer.stop();
        assert_eq!(typer.tick(), None);

        typer.start("ab");
        let events = drain(&mut typer);
        assert_eq!(
            events,
            vec![GhostEvent::Typed(1), GhostEvent::Typed(2), GhostEvent::Finished]
        );
    }

    #[test]
    fn test_empty_text_finishes_with_zero_typed_events() {
        let mut typer = GhostTyper::new(60);
        typer.start("");
        assert_eq!(typer.tick(), Some(GhostEvent::Finished));
        assert_eq!(typer.tick(), None);
    }

    #[test]
    fn test_stop_when_idle_is_a_no_op() {
        let mut typer = GhostTyper::new(60);
        typer.stop();
        typer.stop();
        assert_eq!(typer.tick(), None);
    }

    #[test]
    fn test_tick_driver_counts_due_ticks() {
        let interval = Duration::from_millis(100);
        let mut driver = TickDriver::new(interval);
        let t0 = Instant::now();

        assert_eq!(driver.due_ticks(t0), 0); // not armed

        driver.arm(t0);
        assert_eq!(driver.due_ticks(t0 + Duration::from_millis(50)), 0);
        assert_eq!(driver.due_ticks(t0 + Duration::from_millis(100)), 1);
        assert_eq!(driver.due_ticks(t0 + Duration::from_millis(450)), 3);
        assert_eq!(driver.due_ticks(t0 + Duration::from_millis(460)), 0);

        driver.disarm();
        assert_eq!(driver.due_ticks(t0 + Duration::from_secs(10)), 0);
    }

    fn segmented_spec() -> GhostSpec {
        serde_json::from_str(
            r#"{"segments": [
                {"code": "<p>", "explain": "open"},
                {"code": "hi</p>", "explain": "close"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_single_mode_plays_final_code() {
        let spec: GhostSpec = serde_json::from_str(r#"{"final_code": "ab"}"#).unwrap();
        let mut demo = DemoPlayer::from_spec(&spec, 60);
        assert_eq!(demo.phase(), DemoPhase::Ready);

        demo.run();
        assert_eq!(demo.tick(), Some(DemoEvent::Progress));
        assert_eq!(demo.visible_text(), "a");
        assert_eq!(demo.tick(), Some(DemoEvent::Progress));
        assert_eq!(demo.tick(), Some(DemoEvent::DemoComplete));
        assert_eq!(demo.phase(), DemoPhase::Complete);

        // Replay starts over
        demo.run();
        assert_eq!(demo.phase(), DemoPhase::Typing);
        assert_eq!(demo.tick(), Some(DemoEvent::Progress));
        assert_eq!(demo.visible_text(), "a");
    }

    #[test]
    fn test_segmented_mode_accumulates_base_text() {
        let mut demo = DemoPlayer::from_spec(&segmented_spec(), 60);
        assert!(demo.is_segmented());
        assert_eq!(demo.current_explanation().unwrap().joined(), "open");

        demo.run();
        demo.tick();
        demo.tick();
        demo.tick();
        assert_eq!(demo.tick(), Some(DemoEvent::SegmentComplete));
        assert_eq!(demo.visible_text(), "<p>");
        assert_eq!(demo.phase(), DemoPhase::AwaitingNext);
        assert_eq!(demo.current_explanation().unwrap().joined(), "close");

        demo.run();
        for _ in 0..6 {
            assert_eq!(demo.tick(), Some(DemoEvent::Progress));
        }
        assert_eq!(demo.tick(), Some(DemoEvent::DemoComplete));
        assert_eq!(demo.visible_text(), "<p>hi</p>");
        assert_eq!(demo.phase(), DemoPhase::Complete);
    }

    #[test]
    fn test_segmented_replay_resets_accumulator() {
        let mut demo = DemoPlayer::from_spec(&segmented_spec(), 60);
        demo.run();
        while demo.tick() != Some(DemoEvent::SegmentComplete) {}
        demo.run();
        while demo.tick() != Some(DemoEvent::DemoComplete) {}

        // Past the end: the next run is a replay from segment zero.
        demo.run();
        assert_eq!(demo.phase(), DemoPhase::Typing);
        assert_eq!(demo.tick(), Some(DemoEvent::Progress));
        assert_eq!(demo.visible_text(), "<");
    }

    #[test]
    fn test_mid_segment_progress_includes_base() {
        let mut demo = DemoPlayer::from_spec(&segmented_spec(), 60);
        demo.run();
        while demo.tick() != Some(DemoEvent::SegmentComplete) {}
        demo.run();
        demo.tick();
        demo.tick();
        assert_eq!(demo.visible_text(), "<p>hi");
    }
}
