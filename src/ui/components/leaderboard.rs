use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::generator::keywords::CODE_LANGUAGES;
use crate::store::schema::{HighscoreEntry, HighscoresData};
use crate::sync::LeaderboardRow;
use crate::ui::theme::Theme;

/// Local bests on the left, server rankings for the current mode on the
/// right. Server data is optional; without it the panel explains itself.
pub struct LeaderboardView<'a> {
    pub highscores: &'a HighscoresData,
    pub server_rows: Option<&'a [LeaderboardRow]>,
    pub fetching: bool,
    pub mode: &'a str,
    pub theme: &'a Theme,
}

fn format_entry(entry: &HighscoreEntry) -> String {
    format!(
        "{} — {} pts (WPM {:.1}, ACC {:.1}%)",
        entry.name, entry.points, entry.wpm, entry.acc
    )
}

impl LeaderboardView<'_> {
    fn local_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let mut lines = Vec::new();

        let mut block = |title: String, key: &str| {
            lines.push(Line::from(Span::styled(
                title,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            let body = match self.highscores.best_for(key) {
                Some(e) => format_entry(e),
                None => t!("lb_none").to_string(),
            };
            lines.push(Line::from(Span::styled(
                body,
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(""));
        };

        block(t!("lb_words").to_string(), "words");
        block(t!("lb_sentences").to_string(), "sentences");

        lines.push(Line::from(Span::styled(
            t!("lb_langs").to_string(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )));
        for (key, name) in CODE_LANGUAGES {
            let body = match self.highscores.best_for(key) {
                Some(e) => format_entry(e),
                None => t!("lb_none").to_string(),
            };
            lines.push(Line::from(Span::styled(
                format!("• {name}: {body}"),
                Style::default().fg(colors.fg()),
            )));
        }

        lines
    }

    fn server_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;

        if self.fetching {
            return vec![Line::from(Span::styled(
                t!("lb_fetching").to_string(),
                Style::default().fg(colors.text_pending()),
            ))];
        }

        let Some(rows) = self.server_rows else {
            return vec![Line::from(Span::styled(
                t!("leaderboard_offline").to_string(),
                Style::default().fg(colors.text_pending()),
            ))];
        };

        if rows.is_empty() {
            return vec![Line::from(Span::styled(
                t!("lb_none").to_string(),
                Style::default().fg(colors.text_pending()),
            ))];
        }

        let mut lines = vec![Line::from(Span::styled(
            format!("{:<5} {:<14} {:>6} {:>5} {:>5}", "Rank", "User", "PTS", "WPM", "ACC"),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))];

        for row in rows {
            let style = match row.rank {
                1 => Style::default()
                    .fg(colors.gold())
                    .add_modifier(Modifier::BOLD),
                2 => Style::default()
                    .fg(colors.silver())
                    .add_modifier(Modifier::BOLD),
                3 => Style::default()
                    .fg(colors.bronze())
                    .add_modifier(Modifier::BOLD),
                _ => Style::default().fg(colors.fg()),
            };
            let user: String = row.username.chars().take(12).collect();
            lines.push(Line::from(Span::styled(
                format!(
                    "#{:<4} {:<14} {:>6} {:>5.0} {:>4.0}%",
                    row.rank, user, row.points, row.wpm, row.accuracy
                ),
                style,
            )));
        }

        lines
    }
}

impl Widget for LeaderboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let local_block = Block::bordered()
            .title(format!(" {} ", t!("lb_local_bests")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(self.local_lines())
            .block(local_block)
            .render(halves[0], buf);

        let server_block = Block::bordered()
            .title(format!(" {} ({}) ", t!("lb_server"), self.mode))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(self.server_lines())
            .block(server_block)
            .render(halves[1], buf);
    }
}
