mod app;
mod config;
mod course;
mod event;
mod generator;
mod keyboard;
mod session;
mod store;
mod sync;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use app::{App, AppScreen};
use course::library::CourseLibrary;
use event::{AppEvent, EventHandler};
use keyboard::layout::LayoutKind;
use ui::components::course_view::CourseView;
use ui::components::hand_hint::HandHint;
use ui::components::keyboard_diagram::KeyboardDiagram;
use ui::components::leaderboard::LeaderboardView;
use ui::components::menu::MenuAction;
use ui::components::toast::ToastView;
use ui::components::typing_area::TypingArea;
use ui::layout::AppLayout;

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(
    name = "qwertype",
    version,
    about = "Terminal typing tutor with courses and leaderboards"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short = 'k', long, help = "Keyboard layout (qwertz, qwerty)")]
    layout: Option<String>,

    #[arg(short, long, help = "UI language (de, en)")]
    lang: Option<String>,

    #[arg(short, long, help = "Drill mode (words, sentences, py, js, cpp, rs, java)")]
    mode: Option<String>,

    #[arg(long, help = "Open a course JSON file directly")]
    course: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();

    if let Some(lang) = cli.lang {
        app.config.language = lang;
        app.config.validate();
        rust_i18n::set_locale(&app.config.language);
        app.menu = ui::components::menu::Menu::new(app.theme);
    }
    if let Some(layout) = cli.layout {
        app.config.keyboard_layout = layout;
        app.config.validate();
    }
    if let Some(mode) = cli.mode {
        app.config.mode = mode;
        app.config.validate();
    }
    if let Some(theme_name) = cli.theme
        && let Some(theme) = ui::theme::Theme::load(&theme_name)
    {
        let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
        app.theme = theme;
        app.menu = ui::components::menu::Menu::new(theme);
    }
    if let Some(path) = cli.course {
        let entry = CourseLibrary::load_file(&path)?;
        app.open_course_entry(&entry);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Try to enable keyboard enhancement for Release event support
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, events),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::Leaderboard(rows) => app.on_leaderboard(rows),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    // Track depressed keys for the keyboard diagram
    match (&key.code, key.kind) {
        (KeyCode::Char(ch), KeyEventKind::Press) => {
            app.depressed_keys.insert(ch.to_lowercase().next().unwrap_or(*ch));
            app.last_key_time = Some(Instant::now());
        }
        (KeyCode::Char(ch), KeyEventKind::Release) => {
            app.depressed_keys.remove(&ch.to_lowercase().next().unwrap_or(*ch));
            return; // Don't process Release events as input
        }
        (_, KeyEventKind::Release) => return,
        _ => {}
    }

    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key, events),
        AppScreen::Trainer => handle_trainer_key(app, key),
        AppScreen::TrainerResult => handle_result_key(app, key, events),
        AppScreen::Scores => handle_scores_key(app, key, events),
        AppScreen::Settings => handle_settings_key(app, key),
        AppScreen::CourseSelect => handle_course_select_key(app, key),
        AppScreen::Course => handle_course_key(app, key),
    }
}

fn dispatch_menu_action(app: &mut App, action: MenuAction, events: &EventHandler) {
    match action {
        MenuAction::Trainer => app.start_trainer(),
        MenuAction::Courses => app.screen = AppScreen::CourseSelect,
        MenuAction::Scores => {
            app.screen = AppScreen::Scores;
            app.refresh_leaderboard(events.sender());
        }
        MenuAction::Settings => app.screen = AppScreen::Settings,
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            dispatch_menu_action(app, action, events);
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                dispatch_menu_action(app, action, events);
            }
        }
        _ => {}
    }
}

fn handle_trainer_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char(ch) => app.trainer_type_char(ch),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match key.code {
        KeyCode::Char('r') => app.start_trainer(),
        KeyCode::Char('l') => {
            app.screen = AppScreen::Scores;
            app.refresh_leaderboard(events.sender());
        }
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_scores_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match key.code {
        KeyCode::Char('r') => app.refresh_leaderboard(events.sender()),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.settings_save(),
        KeyCode::Up => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.settings_selected < App::SETTINGS_FIELDS - 1 {
                app.settings_selected += 1;
            }
        }
        KeyCode::Right | KeyCode::Enter => app.settings_cycle(true),
        KeyCode::Left => app.settings_cycle(false),
        KeyCode::Backspace => app.settings_name_backspace(),
        KeyCode::Char(ch) => {
            if app.settings_selected == 0 {
                app.settings_name_push(ch);
            } else {
                match ch {
                    'k' => app.settings_selected = app.settings_selected.saturating_sub(1),
                    'j' => {
                        if app.settings_selected < App::SETTINGS_FIELDS - 1 {
                            app.settings_selected += 1;
                        }
                    }
                    'h' => app.settings_cycle(false),
                    'l' => app.settings_cycle(true),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn handle_course_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.course_selected = app.course_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !app.library.entries.is_empty()
                && app.course_selected < app.library.entries.len() - 1
            {
                app.course_selected += 1;
            }
        }
        KeyCode::Enter => app.open_selected_course(),
        _ => {}
    }
}

fn handle_course_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if key.code == KeyCode::Esc {
        app.close_course();
        return;
    }

    // Ctrl chords work in both modes
    if ctrl {
        match key.code {
            KeyCode::Char('k') => app.course_check(),
            KeyCode::Char('n') => app.course_continue(),
            KeyCode::Char('b') => app.course_back(),
            KeyCode::Char('d') => app.course_run_demo(Instant::now()),
            _ => {}
        }
        return;
    }

    if app.course_editor_active() {
        match key.code {
            KeyCode::Enter => app.course_newline(),
            KeyCode::Backspace => app.course_backspace(),
            KeyCode::Tab => {
                app.course_type_char(' ');
                app.course_type_char(' ');
            }
            KeyCode::Char(ch) => app.course_type_char(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('n') | KeyCode::Right => app.course_continue(),
        KeyCode::Char('b') | KeyCode::Left => app.course_back(),
        KeyCode::Char('d') => app.course_run_demo(Instant::now()),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Trainer => render_trainer(frame, app),
        AppScreen::TrainerResult => render_trainer_result(frame, app),
        AppScreen::Scores => render_scores(frame, app),
        AppScreen::Settings => render_settings(frame, app),
        AppScreen::CourseSelect => render_course_select(frame, app),
        AppScreen::Course => render_course(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " qwerType ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(
    frame: &mut ratatui::Frame,
    app: &App,
    area: ratatui::layout::Rect,
    hint: &str,
) {
    let colors = &app.theme.colors;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {hint} "),
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, rows[0]);

    // Toast strip; falls back to covering nothing when inactive
    let toast = ToastView {
        toast: &app.toast,
        theme: app.theme,
    };
    frame.render_widget(toast, rows[1]);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    let name = if app.config.username.is_empty() {
        "-".to_string()
    } else {
        app.config.username.clone()
    };
    let info = format!(" {} | {} | {}", name, app.mode_label(), app.config.keyboard_layout);
    render_header(frame, app, layout.header, &info);

    let menu_area = ui::layout::centered_rect(50, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);

    render_footer(frame, app, layout.footer, "[↑↓] Select  [Enter] Open");
}

fn render_trainer(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let area = frame.area();

    let Some(coach) = app.coach.as_ref() else {
        return;
    };

    let info = if app.session_deadline.is_some() {
        t!(
            "trainer_stats",
            wpm = format!("{:.0}", coach.wpm()),
            acc = format!("{:.1}", coach.accuracy()),
            err = coach.mistakes(),
            left = app.session_secs_left()
        )
        .to_string()
    } else {
        t!("trainer_get_ready").to_string()
    };
    render_header(frame, app, layout.header, &format!(" {} | {}", app.mode_label(), info));

    let show_kbd = layout.tier.show_keyboard(area.height);
    let mut constraints: Vec<Constraint> = vec![Constraint::Min(5)];
    if show_kbd {
        constraints.push(Constraint::Length(6));
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(layout.main);

    frame.render_widget(
        TypingArea::new(coach, app.last_wrong, app.theme),
        main_layout[0],
    );

    if show_kbd {
        let layout_kind = LayoutKind::from_name(&app.config.keyboard_layout);
        let next = coach.expected_char();
        frame.render_widget(
            KeyboardDiagram::new(layout_kind, next, &app.depressed_keys, app.theme),
            main_layout[1],
        );
        frame.render_widget(HandHint::new(layout_kind, next, app.theme), main_layout[2]);
    }

    render_footer(frame, app, layout.footer, "[ESC] End session");
}

fn render_trainer_result(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(60, 70, frame.area());

    let Some(result) = app.last_result.as_ref() else {
        return;
    };

    let block = Block::bordered()
        .title(format!(" {} ", t!("result_title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}: {}", t!("result_points"), result.points),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}: {:.1}", t!("result_wpm"), result.wpm),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            format!("  {}: {:.1}%", t!("result_accuracy"), result.accuracy),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            format!("  {}: {}", t!("result_errors"), result.errors),
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
    ];

    if app.last_result_was_best {
        lines.push(Line::from(Span::styled(
            format!("  {}", t!("result_new_best")),
            Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    if let Some(coach) = app.coach.as_ref() {
        let spots = coach.weak_spots(5);
        if spots.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", t!("weak_spots_empty")),
                Style::default().fg(colors.text_pending()),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("  {}", t!("weak_spots")),
                Style::default().fg(colors.warning()),
            )));
            for spot in spots {
                lines.push(Line::from(Span::styled(
                    format!("    {spot}"),
                    Style::default().fg(colors.text_pending()),
                )));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", t!("result_hint")),
        Style::default().fg(colors.accent()),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_scores(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    render_header(frame, app, layout.header, &format!(" {}", t!("leaderboard")));

    let view = LeaderboardView {
        highscores: &app.highscores,
        server_rows: app.server_rows.as_deref(),
        fetching: app.fetching_leaderboard,
        mode: &app.config.mode,
        theme: app.theme,
    };
    frame.render_widget(view, layout.main);

    render_footer(frame, app, layout.footer, &t!("lb_hint"));
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(60, 80, frame.area());

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings_title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let sync_value = if app.config.sync_enabled {
        t!("settings_on")
    } else {
        t!("settings_off")
    };
    let name_value = if app.config.username.is_empty() {
        "_".to_string()
    } else {
        app.config.username.clone()
    };

    let fields: Vec<(String, String)> = vec![
        (t!("settings_name").to_string(), name_value),
        (t!("settings_lang").to_string(), app.config.language.clone()),
        (
            t!("settings_layout").to_string(),
            app.config.keyboard_layout.clone(),
        ),
        (t!("settings_mode").to_string(), app.mode_label()),
        (t!("settings_theme").to_string(), app.config.theme.clone()),
        (t!("settings_sync").to_string(), sync_value.to_string()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings_hint")),
        Style::default().fg(colors.text_pending()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            fields
                .iter()
                .map(|_| Constraint::Length(2))
                .collect::<Vec<_>>(),
        )
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        let lines = vec![Line::from(vec![
            Span::styled(format!("{indicator}{label}: "), label_style),
            Span::styled(
                format!("< {value} >"),
                Style::default().fg(colors.text_pending()),
            ),
        ])];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    // Toast shares the bottom strip
    let toast = ToastView {
        toast: &app.toast,
        theme: app.theme,
    };
    frame.render_widget(toast, layout[3]);
}

fn render_course_select(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area());

    render_header(frame, app, layout.header, &format!(" {}", t!("courses_title")));

    let area = ui::layout::centered_rect(60, 80, layout.main);
    let block = Block::bordered()
        .title(format!(" {} ", t!("courses_title")))
        .border_style(Style::default().fg(colors.border()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    if app.library.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            t!("courses_none").to_string(),
            Style::default().fg(colors.text_pending()),
        )));
    } else {
        for (i, entry) in app.library.entries.iter().enumerate() {
            let is_selected = i == app.course_selected;
            let indicator = if is_selected { ">" } else { " " };
            lines.push(Line::from(Span::styled(
                format!(" {indicator} {}", entry.title),
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            )));
        }
    }
    frame.render_widget(Paragraph::new(lines), inner);

    render_footer(frame, app, layout.footer, &t!("courses_hint"));
}

fn render_course(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    let Some(session) = app.course.as_ref() else {
        return;
    };

    render_header(frame, app, layout.header, &format!(" {}", session.title));

    frame.render_widget(
        CourseView {
            session,
            theme: app.theme,
        },
        layout.main,
    );

    let hint = if app.course_editor_active() {
        t!("course_hint_editor")
    } else if session.engine.current().kind == course::StepKind::GhostDemo {
        t!("course_hint_demo")
    } else {
        t!("course_hint_reading")
    };
    render_footer(frame, app, layout.footer, &hint);
}
