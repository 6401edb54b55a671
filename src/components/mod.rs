// ABOUTME: UI components for the TUI interface: upload screen, results dashboard, chat and overlays

pub mod chat_panel;
pub mod email_dialog;
pub mod help;
pub mod layout;
pub mod markdown;
pub mod report_view;
pub mod results_table;
pub mod summary_cards;
pub mod upload;

pub use chat_panel::ChatPanelComponent;
pub use email_dialog::EmailDialogComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use report_view::ReportViewComponent;
pub use results_table::ResultsTableComponent;
pub use summary_cards::SummaryCardsComponent;
pub use upload::UploadComponent;
