// ABOUTME: Chat panel showing the advisor conversation and the message input line

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::markdown::render_markdown;
use crate::app::state::FocusedPane;
use crate::app::AppState;
use crate::models::{Exchange, Role};
use chrono::Local;

pub struct ChatPanelComponent;

impl ChatPanelComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.focused_pane == FocusedPane::Chat;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Transcript
                Constraint::Length(3), // Input
            ])
            .split(area);

        let lines = Self::transcript_lines(state);
        let visible = chunks[0].height.saturating_sub(2) as usize;
        // Keep the newest messages in view
        let offset = u16::try_from(lines.len().saturating_sub(visible)).unwrap_or(u16::MAX);

        let transcript = Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Persona - AI Data Scientist")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::Gray })),
            )
            .wrap(Wrap { trim: false })
            .scroll((offset, 0));
        frame.render_widget(transcript, chunks[0]);

        let (input_text, input_style) = if state.is_chat_streaming() {
            ("Esc to stop the reply".to_string(), Style::default().fg(Color::Gray))
        } else if focused {
            (format!("{}▏", state.chat_input), Style::default().fg(Color::White))
        } else {
            ("Press c to ask about your churn results".to_string(), Style::default().fg(Color::Gray))
        };
        let input = Paragraph::new(input_text).style(input_style).block(
            Block::default()
                .title("Message")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::Gray })),
        );
        frame.render_widget(input, chunks[1]);
    }

    fn transcript_lines(state: &AppState) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for exchange in state.transcript.exchanges() {
            match exchange.role {
                Role::User => {
                    lines.push(Self::heading("You", Color::Yellow, exchange));
                    lines.extend(exchange.text.lines().map(|l| Line::from(l.to_string())));
                }
                Role::Assistant => {
                    lines.push(Self::heading("Persona", Color::Cyan, exchange));
                    if exchange.is_open() && exchange.text.is_empty() {
                        lines.push(Line::from(Span::styled(
                            "thinking...",
                            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                        )));
                    } else {
                        lines.extend(render_markdown(&exchange.text));
                    }
                }
            }
            lines.push(Line::default());
        }
        lines
    }

    fn heading(name: &'static str, color: Color, exchange: &Exchange) -> Line<'static> {
        let time = exchange.created_at.with_timezone(&Local).format("%H:%M");
        Line::from(vec![
            Span::styled(name, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", time), Style::default().fg(Color::DarkGray)),
        ])
    }
}

impl Default for ChatPanelComponent {
    fn default() -> Self {
        Self::new()
    }
}
