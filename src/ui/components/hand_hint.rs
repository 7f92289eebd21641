use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::keyboard::finger::{self, Hand};
use crate::keyboard::layout::LayoutKind;
use crate::ui::theme::Theme;

/// Text replacement for the original's animated hands: names the hand and
/// finger for the next expected key and nudges the matching side.
pub struct HandHint<'a> {
    pub layout: LayoutKind,
    pub next_key: Option<char>,
    pub theme: &'a Theme,
}

impl<'a> HandHint<'a> {
    pub fn new(layout: LayoutKind, next_key: Option<char>, theme: &'a Theme) -> Self {
        Self {
            layout,
            next_key,
            theme,
        }
    }
}

impl Widget for HandHint<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(key) = self.next_key else {
            return;
        };
        let assignment = finger::finger_for(self.layout, key);

        let display = if key == ' ' { "space".to_string() } else { key.to_string() };
        let (left_mark, right_mark) = match assignment.hand {
            Hand::Left => ("((", "  "),
            Hand::Right => ("  ", "))"),
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {left_mark} L "),
                Style::default().fg(if assignment.hand == Hand::Left {
                    colors.accent()
                } else {
                    colors.text_pending()
                }),
            ),
            Span::styled(
                format!("  {display} \u{2192} {} {}  ", assignment.hand.label(), assignment.finger.label()),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" R {right_mark} "),
                Style::default().fg(if assignment.hand == Hand::Right {
                    colors.accent()
                } else {
                    colors.text_pending()
                }),
            ),
        ]);

        Paragraph::new(line)
            .alignment(ratatui::layout::Alignment::Center)
            .render(inner, buf);
    }
}
