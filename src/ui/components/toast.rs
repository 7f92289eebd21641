use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

const DEFAULT_TTL: Duration = Duration::from_millis(2500);

/// Timed one-line notification. The primary sink in the notification
/// fallback chain; when its strip cannot render (zero-height area) the
/// message is still available via [`Toast::active`] for the footer
/// status line.
#[derive(Default)]
pub struct Toast {
    message: Option<(String, Instant)>,
}

impl Toast {
    pub fn show(&mut self, msg: impl Into<String>) {
        self.message = Some((msg.into(), Instant::now() + DEFAULT_TTL));
    }

    pub fn active(&self) -> Option<&str> {
        match &self.message {
            Some((msg, deadline)) if Instant::now() < *deadline => Some(msg),
            _ => None,
        }
    }

    pub fn expire(&mut self) {
        if let Some((_, deadline)) = &self.message
            && Instant::now() >= *deadline
        {
            self.message = None;
        }
    }
}

pub struct ToastView<'a> {
    pub toast: &'a Toast,
    pub theme: &'a Theme,
}

impl Widget for ToastView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(msg) = self.toast.active() else {
            return;
        };
        if area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;
        let line = Line::from(Span::styled(
            format!(" {msg} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ));
        Paragraph::new(line)
            .alignment(ratatui::layout::Alignment::Center)
            .render(area, buf);
    }
}
