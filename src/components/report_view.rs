// ABOUTME: Executive report pane rendering the streamed markdown report

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::markdown::render_markdown;
use crate::app::state::FocusedPane;
use crate::app::AppState;
use crate::streaming::StreamState;

pub struct ReportViewComponent;

impl ReportViewComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let title = if state.report.is_streaming() {
            let (phase, label) = if state.report.is_empty() {
                (StreamState::Pending, "connecting...")
            } else {
                (StreamState::Streaming, "writing...")
            };
            format!("Executive Report {} {} [x] stop", phase.indicator(), label)
        } else if state.report.is_empty() {
            "Executive Report".to_string()
        } else {
            "Executive Report [g] refresh [e] email".to_string()
        };
        let border_color = if state.focused_pane == FocusedPane::Report {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let paragraph = if state.report.is_empty() {
            let hint = if state.report.is_streaming() {
                "Analyzing churn drivers..."
            } else {
                "Press g to generate an AI executive report for these results"
            };
            Paragraph::new(hint)
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
        } else {
            Paragraph::new(render_markdown(state.report.text())).scroll((state.report_scroll, 0))
        };

        frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
    }
}

impl Default for ReportViewComponent {
    fn default() -> Self {
        Self::new()
    }
}
