// ABOUTME: Main layout component arranging the upload screen, results dashboard, overlays and menu bar

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{
    ChatPanelComponent, EmailDialogComponent, HelpComponent, ReportViewComponent,
    ResultsTableComponent, SummaryCardsComponent, UploadComponent,
};
use crate::app::state::View;
use crate::app::{AppState, NotificationType};

pub struct LayoutComponent {
    upload: UploadComponent,
    summary: SummaryCardsComponent,
    results_table: ResultsTableComponent,
    report_view: ReportViewComponent,
    chat_panel: ChatPanelComponent,
    email_dialog: EmailDialogComponent,
    help: HelpComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            upload: UploadComponent::new(),
            summary: SummaryCardsComponent::new(),
            results_table: ResultsTableComponent::new(),
            report_view: ReportViewComponent::new(),
            chat_panel: ChatPanelComponent::new(),
            email_dialog: EmailDialogComponent::new(),
            help: HelpComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let screen = frame.size();
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Bottom menu bar
            ])
            .split(screen);

        match (&state.current_view, &state.prediction) {
            (View::Results, Some(prediction)) => {
                let rows = u16::try_from(state.table_rows().len()).unwrap_or(u16::MAX);
                let content_chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(4), // Summary cards
                        Constraint::Min(0),    // Dashboard body
                    ])
                    .split(main_chunks[0]);

                self.summary.render(frame, content_chunks[0], &prediction.summary);

                let body_chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Percentage(60), // Table and report
                        Constraint::Percentage(40), // Chat
                    ])
                    .split(content_chunks[1]);

                let left_chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(rows.saturating_add(3)),
                        Constraint::Min(0),
                    ])
                    .split(body_chunks[0]);

                self.results_table.render(frame, left_chunks[0], state);
                self.report_view.render(frame, left_chunks[1], state);
                self.chat_panel.render(frame, body_chunks[1], state);
            }
            _ => self.upload.render(frame, main_chunks[0], state),
        }

        self.render_menu_bar(frame, main_chunks[1], state);
        self.render_notifications(frame, screen, state);

        if state.help_visible {
            self.help.render(frame, screen);
        }

        if let Some(dialog) = &state.email_dialog {
            self.email_dialog.render(frame, screen, dialog);
        }
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let menu_text = match state.current_view {
            View::Upload => "[Enter]upload [Esc]back/quit [F1]help",
            View::Results => "[c]hat [g]enerate report [x]stop [e]mail [d]ownload CSV [u]pload [Tab]pane [?]help [q]uit",
        };

        let menu = Paragraph::new(menu_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);

        frame.render_widget(menu, area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let width = area.width.min(50);
        let mut y = area.y + 1;

        for notification in state.notifications.iter().rev().take(3) {
            if y + 3 > area.bottom() {
                break;
            }
            let color = match notification.notification_type {
                NotificationType::Success => Color::Green,
                NotificationType::Error => Color::Red,
                NotificationType::Info => Color::Blue,
            };
            let toast_area = Rect::new(area.right().saturating_sub(width + 1), y, width, 3);

            frame.render_widget(Clear, toast_area);
            frame.render_widget(
                Paragraph::new(format!("{} {}", notification.icon(), notification.message))
                    .style(Style::default().fg(color))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(color)),
                    )
                    .wrap(Wrap { trim: true }),
                toast_area,
            );
            y += 3;
        }
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
