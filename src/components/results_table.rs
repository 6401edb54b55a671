// ABOUTME: Results table showing the highest-risk customers first

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::state::FocusedPane;
use crate::app::AppState;

pub struct ResultsTableComponent {
    table_state: TableState,
}

impl Default for ResultsTableComponent {
    fn default() -> Self {
        Self {
            table_state: TableState::default().with_selected(Some(0)),
        }
    }
}

impl ResultsTableComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = state.table_rows();
        let border_color = if state.focused_pane == FocusedPane::Table {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::default()
            .title(format!("Top {} High-Risk Customers", rows.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        if rows.is_empty() {
            let empty = Paragraph::new("No prediction results")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(["Customer ID", "Contract", "Tenure", "Risk", "Status"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let body: Vec<Row> = rows
            .iter()
            .map(|view| {
                let (risk_color, status_color) = if view.is_at_risk() {
                    (Color::Red, Color::Red)
                } else {
                    (Color::White, Color::Green)
                };
                Row::new(vec![
                    Cell::from(view.customer_id()),
                    Cell::from(view.contract()),
                    Cell::from(view.tenure()),
                    Cell::from(view.probability_percent()).style(Style::default().fg(risk_color)),
                    Cell::from(view.status_label())
                        .style(Style::default().fg(status_color).add_modifier(Modifier::BOLD)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(18),
            Constraint::Percentage(14),
            Constraint::Percentage(18),
        ];
        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        self.table_state
            .select(Some(state.selected_row.min(rows.len() - 1)));
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}
