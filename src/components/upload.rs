// ABOUTME: Upload screen - dataset path entry, upload progress and upload errors

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::api::DATASET_EXTENSIONS;
use crate::app::AppState;

pub struct UploadComponent;

impl UploadComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Intro
                Constraint::Length(3), // Path input
                Constraint::Min(0),    // Status
            ])
            .split(area);

        let accepted = DATASET_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ");
        let intro = Paragraph::new(vec![
            Line::from(Span::styled(
                "Predict customer churn",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Enter the path of a customer dataset ({}) and press Enter.",
                accepted
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title("Churn Desk"))
        .wrap(Wrap { trim: true });
        frame.render_widget(intro, chunks[0]);

        let border = if state.upload.uploading {
            Color::Gray
        } else {
            Color::Yellow
        };
        let input = Paragraph::new(format!("{}▏", state.upload.path_input)).block(
            Block::default()
                .title("Dataset path")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(input, chunks[1]);

        let status = if state.upload.uploading {
            Paragraph::new("Analyzing dataset... this can take up to 30 seconds.")
                .style(Style::default().fg(Color::Blue))
        } else if let Some(error) = &state.upload.error {
            Paragraph::new(format!("✗ {}", error))
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        } else if state.prediction.is_some() {
            Paragraph::new("Esc returns to the current results.")
                .style(Style::default().fg(Color::Gray))
        } else {
            Paragraph::new("").style(Style::default().fg(Color::Gray))
        };
        frame.render_widget(status.wrap(Wrap { trim: true }), chunks[2]);
    }
}

impl Default for UploadComponent {
    fn default() -> Self {
        Self::new()
    }
}
