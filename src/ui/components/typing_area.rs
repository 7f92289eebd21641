use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::coach::TypingCoach;
use crate::ui::theme::Theme;

/// The trainer prompt: typed prefix, cursor char, pending rest of the
/// current drill item.
pub struct TypingArea<'a> {
    coach: &'a TypingCoach,
    last_wrong: Option<char>,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(coach: &'a TypingCoach, last_wrong: Option<char>, theme: &'a Theme) -> Self {
        Self {
            coach,
            last_wrong,
            theme,
        }
    }
}

/// Split a drill item into (typed, cursor, pending) pieces for styling.
fn split_item(item: &str, cursor: usize) -> (String, Option<char>, String) {
    let chars: Vec<char> = item.chars().collect();
    let typed: String = chars[..cursor.min(chars.len())].iter().collect();
    let at = chars.get(cursor).copied();
    let pending: String = if cursor + 1 <= chars.len() {
        chars[cursor + 1..].iter().collect()
    } else {
        String::new()
    };
    (typed, at, pending)
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let item = self.coach.current_item();
        let (typed, at, pending) = split_item(&item, self.coach.cursor());

        let cursor_style = if self.last_wrong.is_some() {
            Style::default()
                .fg(colors.text_cursor_fg())
                .bg(colors.text_incorrect())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(colors.text_cursor_fg())
                .bg(colors.text_cursor_bg())
        };

        let mut spans = vec![Span::styled(
            typed,
            Style::default().fg(colors.text_correct()),
        )];
        if let Some(ch) = at {
            // Make a space cursor visible
            let display = if ch == ' ' { '\u{00b7}' } else { ch };
            spans.push(Span::styled(display.to_string(), cursor_style));
        }
        spans.push(Span::styled(
            pending,
            Style::default().fg(colors.text_pending()),
        ));

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(spans)])
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(ratatui::layout::Alignment::Center);

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_start() {
        let (typed, at, pending) = split_item("abc", 0);
        assert_eq!(typed, "");
        assert_eq!(at, Some('a'));
        assert_eq!(pending, "bc");
    }

    #[test]
    fn test_split_mid() {
        let (typed, at, pending) = split_item("abc", 1);
        assert_eq!(typed, "a");
        assert_eq!(at, Some('b'));
        assert_eq!(pending, "c");
    }

    #[test]
    fn test_split_at_end() {
        let (typed, at, pending) = split_item("abc", 3);
        assert_eq!(typed, "abc");
        assert_eq!(at, None);
        assert_eq!(pending, "");
    }

    #[test]
    fn test_split_handles_multibyte() {
        let (typed, at, pending) = split_item("größe", 2);
        assert_eq!(typed, "gr");
        assert_eq!(at, Some('ö'));
        assert_eq!(pending, "ße");
    }
}
