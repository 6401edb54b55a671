// ABOUTME: Help overlay component displaying keyboard shortcuts and commands

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);

        let section = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Upload:").style(section),
            ListItem::new("  type path  Dataset to score (.csv, .xlsx, .xls)"),
            ListItem::new("  Enter      Upload and predict"),
            ListItem::new(""),
            ListItem::new("Results:").style(section),
            ListItem::new("  j/↓ k/↑    Move in table / scroll report"),
            ListItem::new("  Tab        Switch pane (table, report, chat)"),
            ListItem::new("  g          Generate or refresh the executive report"),
            ListItem::new("  x          Stop report generation"),
            ListItem::new("  e          Email the report"),
            ListItem::new("  d          Download ranked predictions as CSV"),
            ListItem::new("  u          Upload another dataset"),
            ListItem::new(""),
            ListItem::new("Chat:").style(section),
            ListItem::new("  c          Ask the AI advisor"),
            ListItem::new("  Enter      Send message"),
            ListItem::new("  Esc        Stop the reply / leave chat"),
            ListItem::new(""),
            ListItem::new("General:").style(section),
            ListItem::new("  ?/F1       Toggle this help"),
            ListItem::new("  q/Esc      Quit application"),
            ListItem::new("  Ctrl+C     Force quit"),
        ];

        let help_list = List::new(help_items).block(
            Block::default()
                .title("Help - Press ? or Esc to close")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(help_list, popup_area);
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Rectangle of the given percentage size centered in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
