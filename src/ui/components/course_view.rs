use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::app::CourseSession;
use crate::course::StepKind;
use crate::course::ghost::DemoPhase;
use crate::course::progress::{Badge, badge_for_ratio};
use crate::ui::theme::Theme;

/// Two-panel course screen: lesson content on the left, workspace (editor
/// or ghost mirror) on the right.
pub struct CourseView<'a> {
    pub session: &'a CourseSession,
    pub theme: &'a Theme,
}

impl CourseView<'_> {
    fn workspace_title(kind: StepKind) -> String {
        match kind {
            StepKind::GhostDemo => t!("course_workspace_demo").to_string(),
            StepKind::NowYou => t!("course_workspace_now_you").to_string(),
            StepKind::Quiz => t!("course_workspace_quiz").to_string(),
            StepKind::FixTheCode => t!("course_workspace_fix").to_string(),
            StepKind::Reflection => t!("course_workspace_reflection").to_string(),
            StepKind::DeepRead => t!("course_workspace_deep_read").to_string(),
            _ => t!("course_workspace_reading").to_string(),
        }
    }

    fn demo_label(&self) -> Option<String> {
        let demo = self.session.demo.as_ref()?;
        let label = if !demo.is_segmented() {
            match demo.phase() {
                DemoPhase::Complete => t!("course_replay"),
                _ => t!("course_run_demo"),
            }
        } else {
            match demo.phase() {
                DemoPhase::Ready => t!("course_run_segment"),
                DemoPhase::AwaitingNext => t!("course_next_segment"),
                DemoPhase::Complete => t!("course_replay"),
                DemoPhase::Typing => t!("course_run_demo"),
            }
        };
        Some(label.to_string())
    }

    fn badge_color(&self, badge: Badge) -> ratatui::style::Color {
        let colors = &self.theme.colors;
        match badge {
            Badge::Gold => colors.gold(),
            Badge::Silver => colors.silver(),
            Badge::Bronze => colors.bronze(),
        }
    }
}

impl Widget for CourseView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;
        let step = session.engine.current();

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        // Left: lesson content
        let lesson_block = Block::bordered()
            .title(format!(" {} ", session.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let lesson_inner = lesson_block.inner(panels[0]);
        lesson_block.render(panels[0], buf);

        let meta = t!(
            "course_step_meta",
            chapter = step.chapter_title,
            current = session.engine.index() + 1,
            total = session.engine.len(),
            kind = step.kind.as_str()
        );

        let mut lines = vec![
            Line::from(Span::styled(
                step.title.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                meta.to_string(),
                Style::default().fg(colors.text_pending()),
            )),
            Line::from(""),
        ];

        let content = session
            .explain_override
            .clone()
            .unwrap_or_else(|| step.content.joined());
        for text_line in content.lines() {
            lines.push(Line::from(Span::styled(
                text_line.to_string(),
                Style::default().fg(colors.fg()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(lesson_inner, buf);

        // Right: workspace
        let ratio = session.engine.progress_ratio();
        let mut title_spans = vec![Span::styled(
            format!(" {} — {:.0}% ", Self::workspace_title(step.kind), ratio * 100.0),
            Style::default().fg(colors.fg()),
        )];
        if let Some(badge) = badge_for_ratio(ratio) {
            title_spans.push(Span::styled(
                format!("[{}] ", badge.as_str()),
                Style::default()
                    .fg(self.badge_color(badge))
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let work_block = Block::bordered()
            .title(Line::from(title_spans))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let work_inner = work_block.inner(panels[1]);
        work_block.render(panels[1], buf);

        let work_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(1)])
            .split(work_inner);

        // Workspace body: ghost mirror during demos, editor otherwise
        let body = if step.kind == StepKind::GhostDemo {
            session
                .demo
                .as_ref()
                .map(|d| d.visible_text())
                .unwrap_or_default()
        } else {
            session.editor.clone()
        };

        let body_style = if session.editor_locked && step.kind != StepKind::GhostDemo {
            Style::default().fg(colors.text_pending())
        } else {
            Style::default().fg(colors.fg())
        };
        let mut body_lines: Vec<Line> = body
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), body_style)))
            .collect();
        // Trailing newline still shows an empty edit line
        if body.ends_with('\n') || body.is_empty() {
            body_lines.push(Line::from(""));
        }
        Paragraph::new(body_lines)
            .wrap(Wrap { trim: false })
            .render(work_layout[0], buf);

        // Action strip: demo label and completion marker
        let mut strip = Vec::new();
        if let Some(label) = self.demo_label() {
            strip.push(Span::styled(
                format!("[d] {label}  "),
                Style::default().fg(colors.accent()),
            ));
        }
        if session.engine.state().completed {
            strip.push(Span::styled(
                "\u{2713}",
                Style::default().fg(colors.success()),
            ));
        }
        if !strip.is_empty() {
            Paragraph::new(Line::from(strip)).render(work_layout[1], buf);
        }
    }
}
