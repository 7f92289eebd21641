use std::collections::HashSet;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use rust_i18n::t;

use crate::config::{Config, is_name_allowed, normalize_name};
use crate::course::StepKind;
use crate::course::engine::CourseEngine;
use crate::course::ghost::{DemoEvent, DemoPlayer, TickDriver};
use crate::course::library::{CourseEntry, CourseLibrary};
use crate::course::progress::{Badge, badge_for_ratio};
use crate::course::spec::flatten_course_steps;
use crate::course::validate::validate_step;
use crate::event::AppEvent;
use crate::generator::keywords;
use crate::generator::wordlist::WordBank;
use crate::session::coach::TypingCoach;
use crate::session::result::SessionResult;
use crate::store::ScoreStore;
use crate::store::schema::{HighscoreEntry, HighscoresData, HistoryData};
use crate::sync::{LeaderboardRow, ScoreUpload, ServerSync};
use crate::ui::components::menu::Menu;
use crate::ui::components::toast::Toast;
use crate::ui::theme::Theme;

const HISTORY_CAP: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Trainer,
    TrainerResult,
    Scores,
    Settings,
    CourseSelect,
    Course,
}

/// Live state of one open course window.
pub struct CourseSession {
    pub title: String,
    pub engine: CourseEngine,
    pub demo: Option<DemoPlayer>,
    pub demo_driver: TickDriver,
    pub editor: String,
    pub editor_locked: bool,
    pub explain_override: Option<String>,
    pub last_badge: Option<Badge>,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub toast: Toast,

    // Trainer
    pub coach: Option<TypingCoach>,
    pub session_deadline: Option<Instant>,
    pub last_wrong: Option<char>,
    pub last_result: Option<SessionResult>,
    pub last_result_was_best: bool,

    // Persistence
    pub store: Option<ScoreStore>,
    pub highscores: HighscoresData,
    pub history: HistoryData,

    // Leaderboard sync
    pub sync: ServerSync,
    pub server_rows: Option<Vec<LeaderboardRow>>,
    pub fetching_leaderboard: bool,

    // Courses
    pub library: CourseLibrary,
    pub course_selected: usize,
    pub course: Option<CourseSession>,

    // Settings
    pub settings_selected: usize,

    pub depressed_keys: HashSet<char>,
    pub last_key_time: Option<Instant>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let mut config = Config::load().unwrap_or_default();
        config.validate();
        rust_i18n::set_locale(&config.language);

        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let store = ScoreStore::new().ok();
        let (highscores, history) = if let Some(ref s) = store {
            (s.load_highscores(), s.load_history())
        } else {
            (HighscoresData::default(), HistoryData::default())
        };

        let sync = ServerSync::new(&config.server_url);
        let library = CourseLibrary::discover();

        Self {
            screen: AppScreen::Menu,
            config,
            theme,
            menu,
            toast: Toast::default(),
            coach: None,
            session_deadline: None,
            last_wrong: None,
            last_result: None,
            last_result_was_best: false,
            store,
            highscores,
            history,
            sync,
            server_rows: None,
            fetching_leaderboard: false,
            library,
            course_selected: 0,
            course: None,
            settings_selected: 0,
            depressed_keys: HashSet::new(),
            last_key_time: None,
            should_quit: false,
        }
    }

    /// Primary notification sink. The toast view falls back to the footer
    /// status line when its strip has no room.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.toast.show(msg);
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    // ----- Trainer -----

    fn items_for_mode(&self) -> Vec<String> {
        let bank = WordBank::load(&self.config.language);
        match self.config.mode.as_str() {
            "words" => bank.words(),
            "sentences" => bank.sentences(),
            key if keywords::is_code_mode(key) => keywords::keywords_for(key),
            _ => bank.words(),
        }
    }

    pub fn mode_label(&self) -> String {
        match self.config.mode.as_str() {
            "words" => t!("mode_words").to_string(),
            "sentences" => t!("mode_sentences").to_string(),
            key => keywords::display_name(key).unwrap_or(key).to_string(),
        }
    }

    pub fn start_trainer(&mut self) {
        self.coach = Some(TypingCoach::new(self.items_for_mode()));
        self.session_deadline = None;
        self.last_wrong = None;
        self.screen = AppScreen::Trainer;
    }

    /// Seconds left in the running session; full length before the first
    /// keystroke starts the clock.
    pub fn session_secs_left(&self) -> u64 {
        match self.session_deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .as_secs(),
            None => self.config.session_secs,
        }
    }

    pub fn trainer_type_char(&mut self, ch: char) {
        let Some(coach) = self.coach.as_mut() else {
            return;
        };
        if self.session_deadline.is_none() {
            self.session_deadline =
                Some(Instant::now() + Duration::from_secs(self.config.session_secs));
        }
        let feedback = coach.feed(ch);
        self.last_wrong = (!feedback.correct).then_some(ch);
    }

    fn finish_trainer_session(&mut self) {
        let Some(coach) = self.coach.as_mut() else {
            return;
        };
        coach.finish();
        let result = SessionResult::from_coach(coach, &self.config.mode);

        let name = if self.config.username.is_empty() {
            "anon".to_string()
        } else {
            self.config.username.clone()
        };

        self.last_result_was_best = self.highscores.submit(
            &result.mode,
            HighscoreEntry {
                name: name.clone(),
                points: result.points,
                wpm: result.wpm,
                acc: result.accuracy,
            },
        );

        self.history.sessions.push(result.clone());
        if self.history.sessions.len() > HISTORY_CAP {
            let overflow = self.history.sessions.len() - HISTORY_CAP;
            self.history.sessions.drain(..overflow);
        }

        if let Some(ref store) = self.store {
            let _ = store.save_highscores(&self.highscores);
            let _ = store.save_history(&self.history);
        }

        if self.config.sync_enabled {
            self.sync.add_score(ScoreUpload {
                username: name,
                mode: result.mode.clone(),
                wpm: result.wpm,
                accuracy: result.accuracy,
                points: result.points,
                completion_pct: result.completion_pct,
            });
            self.sync.sync_now();
        }

        self.last_result = Some(result);
        self.session_deadline = None;
        self.screen = AppScreen::TrainerResult;
        self.notify(t!("session_finished").to_string());
    }

    // ----- Event-loop ticks -----

    pub fn on_tick(&mut self, now: Instant) {
        self.toast.expire();

        // Fallback: clear depressed keys if no Release event arrived
        if let Some(last) = self.last_key_time
            && last.elapsed() > Duration::from_millis(150)
            && !self.depressed_keys.is_empty()
        {
            self.depressed_keys.clear();
            self.last_key_time = None;
        }

        if self.screen == AppScreen::Trainer
            && let Some(deadline) = self.session_deadline
            && now >= deadline
        {
            self.finish_trainer_session();
        }

        if self.screen == AppScreen::Course {
            self.drive_course_demo(now);
        }
    }

    // ----- Leaderboard -----

    pub fn refresh_leaderboard(&mut self, sender: mpsc::Sender<AppEvent>) {
        if self.fetching_leaderboard || !self.config.sync_enabled {
            return;
        }
        self.fetching_leaderboard = true;
        let base_url = self.sync.base_url().to_string();
        let mode = self.config.mode.clone();
        std::thread::spawn(move || {
            let rows = ServerSync::fetch_leaderboard(&base_url, &mode, "alltime", 30);
            let _ = sender.send(AppEvent::Leaderboard(rows));
        });
    }

    pub fn on_leaderboard(&mut self, rows: Option<Vec<LeaderboardRow>>) {
        self.fetching_leaderboard = false;
        self.server_rows = rows;
    }

    // ----- Courses -----

    pub fn open_selected_course(&mut self) {
        if self.library.entries.is_empty() {
            self.notify(t!("courses_none").to_string());
            return;
        }
        let idx = self.course_selected.min(self.library.entries.len() - 1);
        let entry = &self.library.entries[idx];
        match Self::session_from_entry(entry, self.config.ghost_wpm) {
            Some(session) => {
                self.course = Some(session);
                self.screen = AppScreen::Course;
                self.course_apply_step();
            }
            None => self.notify(t!("courses_none").to_string()),
        }
    }

    pub fn open_course_entry(&mut self, entry: &CourseEntry) {
        match Self::session_from_entry(entry, self.config.ghost_wpm) {
            Some(session) => {
                self.course = Some(session);
                self.screen = AppScreen::Course;
                self.course_apply_step();
            }
            None => self.notify(t!("courses_none").to_string()),
        }
    }

    fn session_from_entry(entry: &CourseEntry, ghost_wpm: u32) -> Option<CourseSession> {
        let steps = flatten_course_steps(&entry.doc);
        let engine = CourseEngine::new(steps).ok()?;
        Some(CourseSession {
            title: entry.title.clone(),
            engine,
            demo: None,
            demo_driver: TickDriver::new(crate::course::ghost::interval_for_wpm(ghost_wpm)),
            editor: String::new(),
            editor_locked: false,
            explain_override: None,
            last_badge: None,
        })
    }

    pub fn close_course(&mut self) {
        if let Some(session) = self.course.as_mut() {
            if let Some(demo) = session.demo.as_mut() {
                demo.stop();
            }
            session.demo_driver.disarm();
        }
        self.course = None;
        self.screen = AppScreen::CourseSelect;
    }

    /// Reset the workspace for the current step: demo player for ghost
    /// steps, starter code for interactive ones, read-only otherwise.
    pub fn course_apply_step(&mut self) {
        let ghost_wpm = self.config.ghost_wpm;
        let Some(session) = self.course.as_mut() else {
            return;
        };
        session.demo_driver.disarm();
        session.explain_override = None;
        session.editor.clear();
        session.editor_locked = true;
        session.demo = None;

        let step = session.engine.current().clone();
        match step.kind {
            StepKind::GhostDemo => {
                let player = step
                    .ghost
                    .as_ref()
                    .filter(|g| !g.segments.is_empty() || !g.final_code.is_empty())
                    .map(|g| DemoPlayer::from_spec(g, ghost_wpm));
                if let Some(ref player) = player
                    && let Some(explain) = player.current_explanation()
                {
                    session.explain_override = Some(explain.joined());
                }
                session.demo = player;
            }
            kind if kind.is_interactive() => {
                session.editor = step.starter_code.clone();
                session.editor_locked = session.engine.state().completed;
            }
            _ => {}
        }

        self.course_update_badge();
    }

    pub fn course_continue(&mut self) {
        let Some(session) = self.course.as_mut() else {
            return;
        };
        if !session.engine.can_continue() {
            self.notify(t!("course_solve_first").to_string());
            return;
        }
        if session.engine.next() {
            self.course_apply_step();
        } else {
            self.notify(t!("course_finished").to_string());
            self.close_course();
        }
    }

    pub fn course_back(&mut self) {
        let Some(session) = self.course.as_mut() else {
            return;
        };
        if session.engine.back() {
            self.course_apply_step();
        }
    }

    pub fn course_check(&mut self) {
        let Some(session) = self.course.as_mut() else {
            return;
        };
        let step = session.engine.current().clone();
        if !step.kind.is_interactive() {
            self.notify(t!("course_nothing_to_check").to_string());
            return;
        }
        if session.engine.state().completed {
            return;
        }
        let (ok, msg) = validate_step(&step, &session.editor);
        session.engine.mark_attempt(ok, None);
        if ok {
            session.editor_locked = true;
            self.notify(msg);
        } else {
            let prefix = t!("course_error_prefix").to_string();
            self.notify(format!("{prefix}{msg}"));
        }
        self.course_update_badge();
    }

    fn course_update_badge(&mut self) {
        let Some(session) = self.course.as_mut() else {
            return;
        };
        let badge = badge_for_ratio(session.engine.progress_ratio());
        if let Some(b) = badge
            && session.last_badge != Some(b)
        {
            session.last_badge = Some(b);
            let msg = t!("badge_unlocked", badge = b.as_str()).to_string();
            self.notify(msg);
        }
    }

    pub fn course_run_demo(&mut self, now: Instant) {
        let Some(session) = self.course.as_mut() else {
            return;
        };
        if session.engine.current().kind != StepKind::GhostDemo {
            self.notify(t!("course_no_demo").to_string());
            return;
        }
        let Some(demo) = session.demo.as_mut() else {
            self.notify(t!("course_no_demo").to_string());
            return;
        };
        demo.run();
        if let Some(explain) = demo.current_explanation() {
            session.explain_override = Some(explain.joined());
        }
        session.demo_driver.arm(now);
    }

    fn drive_course_demo(&mut self, now: Instant) {
        let Some(session) = self.course.as_mut() else {
            return;
        };
        let Some(demo) = session.demo.as_mut() else {
            return;
        };

        let ticks = session.demo_driver.due_ticks(now);
        let mut message: Option<String> = None;
        for _ in 0..ticks {
            match demo.tick() {
                Some(DemoEvent::Progress) => {}
                Some(DemoEvent::SegmentComplete) => {
                    session.demo_driver.disarm();
                    if let Some(explain) = demo.current_explanation() {
                        session.explain_override = Some(explain.joined());
                    }
                    message = Some(t!("course_segment_done").to_string());
                    break;
                }
                Some(DemoEvent::DemoComplete) => {
                    session.demo_driver.disarm();
                    message = Some(t!("course_demo_finished").to_string());
                    break;
                }
                None => {
                    session.demo_driver.disarm();
                    break;
                }
            }
        }
        if let Some(msg) = message {
            self.notify(msg);
        }
    }

    pub fn course_type_char(&mut self, ch: char) {
        if let Some(session) = self.course.as_mut()
            && !session.editor_locked
        {
            session.editor.push(ch);
        }
    }

    pub fn course_newline(&mut self) {
        if let Some(session) = self.course.as_mut()
            && !session.editor_locked
        {
            session.editor.push('\n');
        }
    }

    pub fn course_backspace(&mut self) {
        if let Some(session) = self.course.as_mut()
            && !session.editor_locked
        {
            session.editor.pop();
        }
    }

    pub fn course_editor_active(&self) -> bool {
        self.course
            .as_ref()
            .is_some_and(|s| s.engine.current().kind.is_interactive() && !s.editor_locked)
    }

    // ----- Settings -----

    pub const SETTINGS_FIELDS: usize = 6;

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            1 => {
                self.config.language = if self.config.language == "de" {
                    "en".to_string()
                } else {
                    "de".to_string()
                };
                rust_i18n::set_locale(&self.config.language);
                self.menu = Menu::new(self.theme);
            }
            2 => {
                self.config.keyboard_layout = if self.config.keyboard_layout == "qwertz" {
                    "qwerty".to_string()
                } else {
                    "qwertz".to_string()
                };
            }
            3 => {
                let mut modes: Vec<String> =
                    vec!["words".to_string(), "sentences".to_string()];
                modes.extend(keywords::CODE_LANGUAGES.iter().map(|(k, _)| k.to_string()));
                let current = modes
                    .iter()
                    .position(|m| *m == self.config.mode)
                    .unwrap_or(0);
                let next = if forward {
                    (current + 1) % modes.len()
                } else {
                    (current + modes.len() - 1) % modes.len()
                };
                self.config.mode = modes[next].clone();
            }
            4 => {
                let mut themes = Theme::available_themes();
                themes.sort();
                if themes.is_empty() {
                    return;
                }
                let current = themes
                    .iter()
                    .position(|name| *name == self.config.theme)
                    .unwrap_or(0);
                let next = if forward {
                    (current + 1) % themes.len()
                } else {
                    (current + themes.len() - 1) % themes.len()
                };
                self.config.theme = themes[next].clone();
                if let Some(theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(theme));
                    self.theme = theme;
                    self.menu = Menu::new(theme);
                }
            }
            5 => {
                self.config.sync_enabled = !self.config.sync_enabled;
            }
            _ => {}
        }
    }

    pub fn settings_name_push(&mut self, ch: char) {
        if self.settings_selected == 0 && self.config.username.chars().count() < 24 {
            self.config.username.push(ch);
        }
    }

    pub fn settings_name_backspace(&mut self) {
        if self.settings_selected == 0 {
            self.config.username.pop();
        }
    }

    pub fn settings_save(&mut self) {
        self.config.username = normalize_name(&self.config.username);
        if !self.config.username.is_empty() && !is_name_allowed(&self.config.username) {
            self.config.username.clear();
            self.notify(t!("name_invalid").to_string());
        }
        self.config.validate();
        let _ = self.config.save();
        self.go_to_menu();
    }
}
