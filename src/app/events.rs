// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::state::{AsyncAction, FocusedPane, View};
use crate::app::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    // Upload view
    UploadInputChar(char),
    UploadBackspace,
    UploadSubmit,
    ShowResults,
    // Results view
    CycleFocus,
    NextRow,
    PreviousRow,
    ScrollReportDown,
    ScrollReportUp,
    GenerateReport,
    CancelReport,
    DownloadCsv,
    OpenEmailDialog,
    NewUpload,
    // Chat pane
    FocusChat,
    ChatInputChar(char),
    ChatBackspace,
    ChatSubmit,
    CancelChat,
    LeaveChat,
    // Email dialog
    EmailInputChar(char),
    EmailBackspace,
    EmailSubmit,
    EmailCancel,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Quit);
        }

        // Email dialog captures all input while open
        if state.email_dialog.is_some() {
            return match key_event.code {
                KeyCode::Esc => Some(AppEvent::EmailCancel),
                KeyCode::Enter => Some(AppEvent::EmailSubmit),
                KeyCode::Backspace => Some(AppEvent::EmailBackspace),
                KeyCode::Char(ch) => Some(AppEvent::EmailInputChar(ch)),
                _ => None,
            };
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::F(1) => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        if key_event.code == KeyCode::F(1) {
            return Some(AppEvent::ToggleHelp);
        }

        match state.current_view {
            View::Upload => Self::handle_upload_keys(key_event, state),
            View::Results if state.focused_pane == FocusedPane::Chat => {
                Self::handle_chat_keys(key_event, state)
            }
            View::Results => Self::handle_results_keys(key_event, state),
        }
    }

    fn handle_upload_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc if state.prediction.is_some() => Some(AppEvent::ShowResults),
            KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Enter => Some(AppEvent::UploadSubmit),
            KeyCode::Backspace => Some(AppEvent::UploadBackspace),
            KeyCode::Char(ch) => Some(AppEvent::UploadInputChar(ch)),
            _ => None,
        }
    }

    fn handle_chat_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc if state.is_chat_streaming() => Some(AppEvent::CancelChat),
            KeyCode::Esc => Some(AppEvent::LeaveChat),
            KeyCode::Enter => Some(AppEvent::ChatSubmit),
            KeyCode::Backspace => Some(AppEvent::ChatBackspace),
            KeyCode::Tab => Some(AppEvent::CycleFocus),
            KeyCode::Char(ch) => Some(AppEvent::ChatInputChar(ch)),
            _ => None,
        }
    }

    fn handle_results_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        let on_report = state.focused_pane == FocusedPane::Report;
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Tab => Some(AppEvent::CycleFocus),
            KeyCode::Char('j') | KeyCode::Down if on_report => Some(AppEvent::ScrollReportDown),
            KeyCode::Char('k') | KeyCode::Up if on_report => Some(AppEvent::ScrollReportUp),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousRow),
            KeyCode::Char('c') => Some(AppEvent::FocusChat),
            KeyCode::Char('g') => Some(AppEvent::GenerateReport),
            KeyCode::Char('x') => Some(AppEvent::CancelReport),
            KeyCode::Char('d') => Some(AppEvent::DownloadCsv),
            KeyCode::Char('e') => Some(AppEvent::OpenEmailDialog),
            KeyCode::Char('u') => Some(AppEvent::NewUpload),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::UploadInputChar(ch) => {
                state.upload.path_input.push(ch);
                state.upload.error = None;
            }
            AppEvent::UploadBackspace => {
                state.upload.path_input.pop();
            }
            AppEvent::UploadSubmit => state.start_upload(),
            AppEvent::ShowResults => state.show_results(),
            AppEvent::CycleFocus => state.cycle_focus(),
            AppEvent::NextRow => state.next_row(),
            AppEvent::PreviousRow => state.previous_row(),
            AppEvent::ScrollReportDown => state.scroll_report(true),
            AppEvent::ScrollReportUp => state.scroll_report(false),
            AppEvent::GenerateReport => state.request_report(),
            AppEvent::CancelReport => {
                if state.report.is_streaming() {
                    state.pending_async_action = Some(AsyncAction::CancelReport);
                }
            }
            AppEvent::DownloadCsv => state.request_export(),
            AppEvent::OpenEmailDialog => state.open_email_dialog(),
            AppEvent::NewUpload => state.show_upload(),
            AppEvent::FocusChat => state.focused_pane = FocusedPane::Chat,
            AppEvent::ChatInputChar(ch) => state.chat_input.push(ch),
            AppEvent::ChatBackspace => {
                state.chat_input.pop();
            }
            AppEvent::ChatSubmit => state.submit_chat(),
            AppEvent::CancelChat => state.pending_async_action = Some(AsyncAction::CancelChat),
            AppEvent::LeaveChat => state.focused_pane = FocusedPane::Table,
            AppEvent::EmailInputChar(ch) => {
                if let Some(dialog) = state.email_dialog.as_mut() {
                    dialog.input.push(ch);
                    dialog.error = None;
                }
            }
            AppEvent::EmailBackspace => {
                if let Some(dialog) = state.email_dialog.as_mut() {
                    dialog.input.pop();
                }
            }
            AppEvent::EmailSubmit => state.submit_email(),
            AppEvent::EmailCancel => state.close_email_dialog(),
        }
    }
}
