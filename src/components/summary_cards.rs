// ABOUTME: Summary cards - total customers, churn rate with health label, at-risk count

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::models::PredictionSummary;

pub struct SummaryCardsComponent;

impl SummaryCardsComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, summary: &PredictionSummary) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let health_color = if summary.is_critical() {
            Color::Red
        } else {
            Color::Green
        };

        Self::card(
            frame,
            cards[0],
            "Total Customers",
            summary.total_customers.to_string(),
            Span::styled("Analyzed in this dataset", Style::default().fg(Color::Gray)),
        );
        Self::card(
            frame,
            cards[1],
            "Churn Rate",
            summary.churn_rate_percent(),
            Span::styled(summary.health_label(), Style::default().fg(health_color)),
        );
        Self::card(
            frame,
            cards[2],
            "At-Risk Customers",
            summary.high_risk_count.to_string(),
            Span::styled("Predicted to churn", Style::default().fg(Color::Gray)),
        );
    }

    fn card(frame: &mut Frame, area: Rect, label: &str, value: String, subtext: Span<'_>) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(subtext),
        ])
        .block(
            Block::default()
                .title(label)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);

        frame.render_widget(card, area);
    }
}

impl Default for SummaryCardsComponent {
    fn default() -> Self {
        Self::new()
    }
}
