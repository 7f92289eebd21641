use std::collections::HashSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::keyboard::finger::{self, Finger, Hand};
use crate::keyboard::layout::{self, LayoutKind};
use crate::ui::theme::Theme;

/// Keycap rows with finger-group coloring, next-key highlight and
/// depressed-key feedback.
pub struct KeyboardDiagram<'a> {
    pub layout: LayoutKind,
    pub next_key: Option<char>,
    pub depressed_keys: &'a HashSet<char>,
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        layout: LayoutKind,
        next_key: Option<char>,
        depressed_keys: &'a HashSet<char>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            layout,
            next_key,
            depressed_keys,
            theme,
        }
    }
}

fn finger_color(layout: LayoutKind, ch: char) -> Color {
    let assignment = finger::finger_for(layout, ch);
    match (assignment.hand, assignment.finger) {
        (Hand::Left, Finger::Pinky) => Color::Rgb(180, 100, 100),
        (Hand::Left, Finger::Ring) => Color::Rgb(180, 140, 80),
        (Hand::Left, Finger::Middle) => Color::Rgb(120, 160, 80),
        (Hand::Left, Finger::Index) => Color::Rgb(80, 140, 180),
        (Hand::Right, Finger::Index) => Color::Rgb(100, 140, 200),
        (Hand::Right, Finger::Middle) => Color::Rgb(120, 160, 80),
        (Hand::Right, Finger::Ring) => Color::Rgb(180, 140, 80),
        (Hand::Right, Finger::Pinky) => Color::Rgb(180, 100, 100),
        _ => Color::Rgb(120, 120, 120),
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.layout.as_str()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 30 {
            return;
        }

        let next = self.next_key.and_then(|c| c.to_lowercase().next());

        let key_width: u16 = 4;
        let offsets: &[u16] = &[0, 2, 4];

        for (row_idx, row) in layout::rows(self.layout).iter().enumerate() {
            let y = inner.y + row_idx as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let offset = offsets.get(row_idx).copied().unwrap_or(0);

            for (col_idx, &key) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * key_width;
                if x + key_width > inner.x + inner.width {
                    break;
                }

                let is_next = next == Some(key);
                let is_depressed = self.depressed_keys.contains(&key);

                let style = if is_next {
                    Style::default().fg(colors.bg()).bg(colors.accent())
                } else if is_depressed {
                    Style::default().fg(colors.bg()).bg(colors.warning())
                } else {
                    Style::default()
                        .fg(colors.fg())
                        .bg(finger_color(self.layout, key))
                };

                buf.set_string(x, y, format!("[{key}]"), style);
            }
        }

        // Space bar on the last line when there is room
        let space_y = inner.y + 3;
        if space_y < inner.y + inner.height {
            let style = if next == Some(' ') {
                Style::default().fg(colors.bg()).bg(colors.accent())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            let bar = "[        space        ]";
            let x = inner.x + (inner.width.saturating_sub(bar.len() as u16)) / 2;
            buf.set_string(x, space_y, bar, style);
        }
    }
}
