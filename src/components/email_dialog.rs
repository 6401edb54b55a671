// ABOUTME: Email dialog overlay collecting the address the report is sent to

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::help::centered_rect;
use crate::app::state::EmailDialogState;

pub struct EmailDialogComponent;

impl EmailDialogComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, dialog: &EmailDialogState) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let status = if dialog.sending {
            Line::from(Span::styled("Sending...", Style::default().fg(Color::Blue)))
        } else if let Some(error) = &dialog.error {
            Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                "Enter to send, Esc to cancel",
                Style::default().fg(Color::Gray),
            ))
        };

        let body = Paragraph::new(vec![
            Line::from("Enter your email address to receive the PDF report."),
            Line::default(),
            Line::from(Span::styled(
                format!("> {}▏", dialog.input),
                Style::default().fg(Color::Yellow),
            )),
            Line::default(),
            status,
        ])
        .block(
            Block::default()
                .title("Email Report")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });

        frame.render_widget(body, popup_area);
    }
}

impl Default for EmailDialogComponent {
    fn default() -> Self {
        Self::new()
    }
}
