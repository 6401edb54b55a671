// ABOUTME: Application state management, view switching, and the App driving async actions
// Stream events, uploads and email results all come back over one channel drained on tick

use super::advisor::ChatAdvisor;
use super::briefing::ReportBriefing;
use super::notification::Notification;
use crate::api::{ApiError, ChurnApiClient, SendReportResponse};
use crate::config::{AppConfig, ExportConfig, LimitsConfig};
use crate::export::{rank, CsvFormat, DirectorySaver, TabularExporter};
use crate::models::{
    ConversationTranscript, PredictionResponse, RecordView, ReportDraft, PROBABILITY_FIELD,
};
use crate::streaming::{
    ChannelObserver, PendingStream, StreamEvent, StreamId, StreamingTextConsumer,
};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Table,
    Report,
    Chat,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            Self::Table => Self::Report,
            Self::Report => Self::Chat,
            Self::Chat => Self::Table,
        }
    }
}

/// Work that needs the network or the App's resources, run on the next tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    UploadDataset(PathBuf),
    SendChat(String),
    CancelChat,
    GenerateReport,
    CancelReport,
    SendEmail(String),
    ExportCsv,
}

#[derive(Debug, Default)]
pub struct UploadState {
    pub path_input: String,
    pub uploading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct EmailDialogState {
    pub input: String,
    pub sending: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub current_view: View,
    pub focused_pane: FocusedPane,
    pub should_quit: bool,
    pub help_visible: bool,
    pub upload: UploadState,
    pub prediction: Option<PredictionResponse>,
    pub transcript: ConversationTranscript,
    pub chat_input: String,
    pub report: ReportDraft,
    pub email_dialog: Option<EmailDialogState>,
    pub notifications: Vec<Notification>,
    pub pending_async_action: Option<AsyncAction>,
    pub limits: LimitsConfig,
    pub selected_row: usize,
    pub report_scroll: u16,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LimitsConfig::default())
    }
}

impl AppState {
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            current_view: View::Upload,
            focused_pane: FocusedPane::Table,
            should_quit: false,
            help_visible: false,
            upload: UploadState::default(),
            prediction: None,
            transcript: ChatAdvisor::transcript(),
            chat_input: String::new(),
            report: ReportDraft::new(),
            email_dialog: None,
            notifications: Vec::new(),
            pending_async_action: None,
            limits,
            selected_row: 0,
            report_scroll: 0,
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn prune_notifications(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    /// Rows shown in the results table, highest risk first
    pub fn table_rows(&self) -> Vec<RecordView<'_>> {
        let Some(prediction) = self.prediction.as_ref() else {
            return Vec::new();
        };
        rank(&prediction.results, PROBABILITY_FIELD)
            .top(Some(self.limits.table_rows))
            .iter()
            .copied()
            .enumerate()
            .map(|(position, record)| RecordView::new(record, position))
            .collect()
    }

    pub fn next_row(&mut self) {
        let rows = self.table_rows().len();
        if rows > 0 {
            self.selected_row = (self.selected_row + 1) % rows;
        }
    }

    pub fn previous_row(&mut self) {
        let rows = self.table_rows().len();
        if rows > 0 {
            self.selected_row = if self.selected_row == 0 {
                rows - 1
            } else {
                self.selected_row - 1
            };
        }
    }

    pub fn scroll_report(&mut self, down: bool) {
        self.report_scroll = if down {
            self.report_scroll.saturating_add(1)
        } else {
            self.report_scroll.saturating_sub(1)
        };
    }

    pub fn cycle_focus(&mut self) {
        self.focused_pane = self.focused_pane.next();
    }

    pub fn is_chat_streaming(&self) -> bool {
        self.transcript.open_reply().is_some()
    }

    pub fn start_upload(&mut self) {
        if self.upload.uploading {
            return;
        }
        let path = self.upload.path_input.trim();
        if path.is_empty() {
            self.upload.error = Some("Enter the path of a .csv, .xlsx or .xls file.".to_string());
            return;
        }

        let path = PathBuf::from(path);
        if let Err(e) = ChurnApiClient::check_dataset(&path) {
            self.upload.error = Some(e.to_string());
            return;
        }

        self.upload.error = None;
        self.upload.uploading = true;
        self.pending_async_action = Some(AsyncAction::UploadDataset(path));
    }

    pub fn submit_chat(&mut self) {
        let message = self.chat_input.trim().to_string();
        if message.is_empty() {
            return;
        }
        if self.is_chat_streaming() {
            self.notify(Notification::info("Wait for the current reply to finish."));
            return;
        }
        self.chat_input.clear();
        self.pending_async_action = Some(AsyncAction::SendChat(message));
    }

    pub fn request_report(&mut self) {
        if self.prediction.is_none() {
            self.notify(Notification::info("Upload a dataset before generating a report."));
            return;
        }
        self.report_scroll = 0;
        self.pending_async_action = Some(AsyncAction::GenerateReport);
    }

    pub fn request_export(&mut self) {
        if self.prediction.as_ref().map_or(true, |p| p.results.is_empty()) {
            self.notify(Notification::info("There are no predictions to export."));
            return;
        }
        self.pending_async_action = Some(AsyncAction::ExportCsv);
    }

    pub fn open_email_dialog(&mut self) {
        if self.report.is_empty() || self.report.is_streaming() {
            self.notify(Notification::info("Generate a report before emailing it."));
            return;
        }
        self.email_dialog = Some(EmailDialogState::default());
    }

    pub fn submit_email(&mut self) {
        let Some(dialog) = self.email_dialog.as_mut() else {
            return;
        };
        if dialog.sending {
            return;
        }
        let email = dialog.input.trim().to_string();
        if let Err(e) = ChurnApiClient::validate_email(&email) {
            dialog.error = Some(e.to_string());
            return;
        }

        dialog.error = None;
        dialog.sending = true;
        self.pending_async_action = Some(AsyncAction::SendEmail(email));
    }

    pub fn close_email_dialog(&mut self) {
        self.email_dialog = None;
    }

    pub fn apply_prediction(&mut self, prediction: PredictionResponse) {
        info!(
            "Showing results for {} customers",
            prediction.summary.total_customers
        );
        self.notify(Notification::success(format!(
            "Analyzed {} customers",
            prediction.summary.total_customers
        )));

        self.prediction = Some(prediction);
        self.upload = UploadState::default();
        self.report.clear();
        self.current_view = View::Results;
        self.focused_pane = FocusedPane::Table;
        self.selected_row = 0;
        self.report_scroll = 0;
    }

    pub fn upload_failed(&mut self, message: String) {
        self.upload.uploading = false;
        self.upload.error = Some(message.clone());
        self.notify(Notification::error(message));
    }

    pub fn show_upload(&mut self) {
        self.current_view = View::Upload;
    }

    pub fn show_results(&mut self) {
        if self.prediction.is_some() {
            self.current_view = View::Results;
        }
    }
}

/// Everything that reaches the UI from background tasks
#[derive(Debug)]
pub enum AppMessage {
    Stream(StreamEvent),
    StreamOpened(Box<PendingStream>),
    PredictionReady(Box<PredictionResponse>),
    PredictionFailed(String),
    EmailSent(SendReportResponse),
    EmailFailed(String),
}

impl From<StreamEvent> for AppMessage {
    fn from(event: StreamEvent) -> Self {
        Self::Stream(event)
    }
}

pub struct App {
    pub state: AppState,
    api: ChurnApiClient,
    consumer: StreamingTextConsumer,
    exporter: TabularExporter,
    export: ExportConfig,
    advisor: ChatAdvisor,
    briefing: ReportBriefing,
    sender: mpsc::UnboundedSender<AppMessage>,
    receiver: mpsc::UnboundedReceiver<AppMessage>,
    ui_dirty: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        // Shared by uploads and streams; no overall timeout so long answers can finish
        let client = reqwest::Client::builder()
            .connect_timeout(config.api.connect_timeout())
            .build()?;

        let saver = config
            .export
            .directory
            .clone()
            .map_or_else(DirectorySaver::downloads, DirectorySaver::new);
        let format = CsvFormat {
            delimiter: config.export.delimiter,
            ..CsvFormat::default()
        };
        let (sender, receiver) = mpsc::unbounded_channel();

        Ok(Self {
            state: AppState::new(config.limits.clone()),
            api: ChurnApiClient::with_client(client.clone(), config.api.clone()),
            consumer: StreamingTextConsumer::with_client(client),
            exporter: TabularExporter::new(format, saver),
            export: config.export,
            advisor: ChatAdvisor::new(config.limits.chat_context_records),
            briefing: ReportBriefing::new(config.limits.report_context_records),
            sender,
            receiver,
            ui_dirty: false,
        })
    }

    /// Check the service health and queue the dataset given on the command line
    pub async fn init(&mut self, dataset: Option<PathBuf>) {
        let api = self.api.clone();
        tokio::spawn(async move {
            match api.health().await {
                Ok(health) => info!("Churn service health: {}", health.status),
                Err(e) => warn!("Churn service health check failed: {}", e),
            }
        });

        if let Some(path) = dataset {
            self.state.upload.path_input = path.display().to_string();
            self.state.start_upload();
        }
    }

    /// Sender for messages into the tick loop
    pub fn sender(&self) -> mpsc::UnboundedSender<AppMessage> {
        self.sender.clone()
    }

    pub fn needs_ui_refresh(&mut self) -> bool {
        std::mem::take(&mut self.ui_dirty)
    }

    pub async fn tick(&mut self) {
        if let Some(action) = self.state.pending_async_action.take() {
            self.process_async_action(action);
            self.ui_dirty = true;
        }

        while let Ok(message) = self.receiver.try_recv() {
            self.handle_message(message);
            self.ui_dirty = true;
        }

        self.state.prune_notifications();
    }

    fn process_async_action(&mut self, action: AsyncAction) {
        debug!("Processing {:?}", action);
        match action {
            AsyncAction::UploadDataset(path) => self.upload(path),
            AsyncAction::SendChat(message) => self.send_chat(&message),
            AsyncAction::CancelChat => {
                self.advisor.cancel(&mut self.state.transcript);
            }
            AsyncAction::GenerateReport => self.generate_report(),
            AsyncAction::CancelReport => {
                if self.briefing.cancel(&mut self.state.report) {
                    self.state.notify(Notification::info("Report generation stopped."));
                }
            }
            AsyncAction::SendEmail(email) => self.send_email(email),
            AsyncAction::ExportCsv => self.export_csv(),
        }
    }

    fn upload(&self, path: PathBuf) {
        let api = self.api.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let message = match api.predict(&path).await {
                Ok(prediction) => AppMessage::PredictionReady(Box::new(prediction)),
                Err(e) => {
                    warn!("Upload of {} failed: {}", path.display(), e);
                    AppMessage::PredictionFailed(e.user_message())
                }
            };
            if sender.send(message).is_err() {
                debug!("Upload result dropped, UI has shut down");
            }
        });
    }

    /// Hand a stream back to the tick loop once its headers arrive
    fn on_open(&self) -> impl FnOnce(PendingStream) + Send + 'static {
        let sender = self.sender.clone();
        move |pending| {
            let id = pending.id();
            if sender.send(AppMessage::StreamOpened(Box::new(pending))).is_err() {
                debug!("Stream {} opened after the UI shut down", id);
            }
        }
    }

    fn send_chat(&mut self, message: &str) {
        if let Err(e) = self.advisor.ask(&mut self.state.transcript, message) {
            self.state.notify(Notification::info(e.to_string()));
            return;
        }

        let request = {
            let prediction = self.state.prediction.as_ref();
            let context = prediction.map(|p| self.advisor.context(Some(p)));
            let metrics = prediction.map(|p| &p.summary);
            self.api.chat_request(message, metrics, context.as_deref())
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                self.advisor.transport_failed(&mut self.state.transcript, &e);
                return;
            }
        };

        let id = StreamId::new();
        let opening = self.consumer.open_detached(
            id,
            request,
            ChannelObserver::new(self.sender.clone()),
            self.on_open(),
        );
        if let Err(e) = self.advisor.begin(&mut self.state.transcript, opening) {
            warn!("Chat reply could not be opened: {}", e);
        }
    }

    fn generate_report(&mut self) {
        self.briefing.restart(&mut self.state.report);

        let request = {
            let Some(prediction) = self.state.prediction.as_ref() else {
                return;
            };
            let (top_risks, columns) = self.briefing.context(prediction);
            self.api.report_request(&prediction.summary, &top_risks, columns)
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                self.briefing.transport_failed(&mut self.state.report, &e);
                return;
            }
        };

        let id = StreamId::new();
        let opening = self.consumer.open_detached(
            id,
            request,
            ChannelObserver::new(self.sender.clone()),
            self.on_open(),
        );
        self.briefing.begin(&mut self.state.report, opening);
    }

    fn send_email(&self, email: String) {
        let api = self.api.clone();
        let sender = self.sender.clone();
        let report = self.state.report.text().to_string();
        tokio::spawn(async move {
            let message = match api.send_report(&email, &report).await {
                Ok(response) => AppMessage::EmailSent(response),
                Err(e) => {
                    warn!("Sending report to {} failed: {}", email, e);
                    AppMessage::EmailFailed(e.user_message())
                }
            };
            if sender.send(message).is_err() {
                debug!("Email result dropped, UI has shut down");
            }
        });
    }

    fn export_csv(&mut self) {
        let Some(prediction) = self.state.prediction.as_ref() else {
            return;
        };
        let summary = self.exporter.export(
            &prediction.results,
            PROBABILITY_FIELD,
            self.state.limits.export_limit,
            &self.export.filename,
        );
        self.state.notify(Notification::success(format!(
            "Exported {} rows to {}",
            summary.rows, summary.filename
        )));
    }

    fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Stream(event) => {
                let applied = self.advisor.handle(&mut self.state.transcript, &event)
                    || self.briefing.handle(&mut self.state.report, &event);
                if !applied {
                    debug!("Dropped event for inactive session {}", event.id());
                }
            }
            AppMessage::StreamOpened(pending) => {
                let id = pending.id();
                let observer = ChannelObserver::new(self.sender.clone());
                let attached = if self.advisor.owns(id) {
                    self.advisor.attach(*pending, observer)
                } else if self.briefing.owns(id) {
                    self.briefing.attach(*pending, observer)
                } else {
                    false
                };
                if !attached {
                    debug!("Dropped response for abandoned session {}", id);
                }
            }
            AppMessage::PredictionReady(prediction) => {
                self.briefing.restart(&mut self.state.report);
                self.state.apply_prediction(*prediction);
            }
            AppMessage::PredictionFailed(message) => self.state.upload_failed(message),
            AppMessage::EmailSent(response) => {
                info!("Report email: {} ({})", response.message, response.status);
                self.state.close_email_dialog();
                self.state.notify(Notification::success(response.message));
            }
            AppMessage::EmailFailed(message) => {
                if let Some(dialog) = self.state.email_dialog.as_mut() {
                    dialog.sending = false;
                    dialog.error = Some(message.clone());
                }
                self.state
                    .notify(Notification::error(format!("Failed to send email: {}", message)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::advisor::{FALLBACK_REPLY, STOPPED_NOTICE};
    use crate::app::briefing::REPORT_STOPPED;
    use crate::models::{PredictionSummary, TabularRecord};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Accepts one request, reads it and never answers
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            std::future::pending::<()>().await;
            drop(socket);
        });
        format!("http://{}", addr)
    }

    fn app_at(base: String, export_dir: &TempDir) -> App {
        let config = AppConfig::default()
            .with_overrides(Some(base), Some(export_dir.path().to_path_buf()));
        App::new(config).unwrap()
    }

    fn prediction() -> PredictionResponse {
        PredictionResponse {
            summary: PredictionSummary {
                total_customers: 3,
                churn_rate: 0.3333,
                high_risk_count: 1,
            },
            results: vec![
                TabularRecord::new().with("customerID", "A").with(PROBABILITY_FIELD, 0.2),
                TabularRecord::new().with("customerID", "B").with(PROBABILITY_FIELD, 0.9),
                TabularRecord::new().with("customerID", "C").with(PROBABILITY_FIELD, 0.5),
            ],
        }
    }

    fn test_app(export_dir: &TempDir) -> App {
        let config = AppConfig::default().with_overrides(
            Some("http://127.0.0.1:9".to_string()),
            Some(export_dir.path().to_path_buf()),
        );
        App::new(config).unwrap()
    }

    #[test]
    fn test_table_rows_ranked_and_capped() {
        let mut state = AppState::new(LimitsConfig {
            table_rows: 2,
            ..LimitsConfig::default()
        });
        state.apply_prediction(prediction());

        let ids: Vec<String> = state.table_rows().iter().map(RecordView::customer_id).collect();
        assert_eq!(ids, vec!["B", "C"]);
        assert_eq!(state.current_view, View::Results);

        state.previous_row();
        assert_eq!(state.selected_row, 1);
        state.next_row();
        assert_eq!(state.selected_row, 0);
    }

    #[test]
    fn test_upload_validation() {
        let mut state = AppState::default();
        state.start_upload();
        assert!(state.upload.error.is_some());
        assert!(state.pending_async_action.is_none());

        state.upload.path_input = "notes.txt".to_string();
        state.start_upload();
        assert!(state.pending_async_action.is_none());

        state.upload.path_input = " data/telco.csv ".to_string();
        state.start_upload();
        assert!(state.upload.uploading);
        assert_eq!(
            state.pending_async_action,
            Some(AsyncAction::UploadDataset(PathBuf::from("data/telco.csv")))
        );
    }

    #[test]
    fn test_chat_refused_while_reply_open() {
        let mut state = AppState::default();
        state.chat_input = "  hello ".to_string();
        state.submit_chat();
        assert_eq!(state.pending_async_action, Some(AsyncAction::SendChat("hello".into())));
        assert!(state.chat_input.is_empty());

        state.pending_async_action = None;
        state.transcript.push_user("hello").unwrap();
        state.transcript.begin_reply(StreamId::new()).unwrap();
        state.chat_input = "again".to_string();
        state.submit_chat();
        assert!(state.pending_async_action.is_none());
        assert_eq!(state.chat_input, "again");
    }

    #[test]
    fn test_email_dialog_requires_report_and_valid_address() {
        let mut state = AppState::default();
        state.open_email_dialog();
        assert!(state.email_dialog.is_none());

        state.report.set_unavailable("# Report");
        state.open_email_dialog();
        state.email_dialog.as_mut().unwrap().input = "nobody".to_string();
        state.submit_email();
        assert!(state.email_dialog.as_ref().unwrap().error.is_some());
        assert!(state.pending_async_action.is_none());

        state.email_dialog.as_mut().unwrap().input = "cfo@example.com".to_string();
        state.submit_email();
        assert_eq!(
            state.pending_async_action,
            Some(AsyncAction::SendEmail("cfo@example.com".into()))
        );
    }

    #[tokio::test]
    async fn test_export_writes_sorted_csv() {
        let export_dir = TempDir::new().unwrap();
        let mut app = test_app(&export_dir);
        app.state.apply_prediction(prediction());

        app.state.request_export();
        app.tick().await;

        let written = std::fs::read_to_string(
            export_dir.path().join("churn_predictions_full_sorted.csv"),
        )
        .unwrap();
        assert_eq!(
            written,
            "customerID,churn_probability\nB,0.9\nC,0.5\nA,0.2"
        );
        assert!(app.needs_ui_refresh());
    }

    #[tokio::test]
    async fn test_prediction_message_switches_view() {
        let export_dir = TempDir::new().unwrap();
        let mut app = test_app(&export_dir);
        app.state.upload.uploading = true;

        app.sender()
            .send(AppMessage::PredictionReady(Box::new(prediction())))
            .unwrap();
        app.tick().await;

        assert_eq!(app.state.current_view, View::Results);
        assert!(!app.state.upload.uploading);
        assert_eq!(app.state.table_rows().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_upload_surfaces_detail() {
        let export_dir = TempDir::new().unwrap();
        let mut app = test_app(&export_dir);
        app.state.upload.uploading = true;

        app.sender()
            .send(AppMessage::PredictionFailed("The uploaded file is empty.".into()))
            .unwrap();
        app.tick().await;

        assert_eq!(app.state.current_view, View::Upload);
        assert_eq!(app.state.upload.error.as_deref(), Some("The uploaded file is empty."));
        assert_eq!(app.state.notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_stream_events_are_dropped() {
        let export_dir = TempDir::new().unwrap();
        let mut app = test_app(&export_dir);
        let before = app.state.transcript.len();

        app.sender()
            .send(AppMessage::Stream(StreamEvent::Update {
                id: StreamId::new(),
                text: "orphan".into(),
            }))
            .unwrap();
        app.tick().await;

        assert_eq!(app.state.transcript.len(), before);
        assert!(app.state.report.is_empty());
    }

    #[tokio::test]
    async fn test_silent_chat_service_does_not_block_ui() {
        let export_dir = TempDir::new().unwrap();
        let mut app = app_at(silent_server().await, &export_dir);

        app.state.chat_input = "Who is most at risk?".to_string();
        app.state.submit_chat();
        tokio::time::timeout(Duration::from_secs(3), app.tick())
            .await
            .expect("tick waited on the chat service");
        assert!(app.state.is_chat_streaming());

        app.state.pending_async_action = Some(AsyncAction::CancelChat);
        app.tick().await;

        assert!(!app.state.is_chat_streaming());
        assert_eq!(app.state.transcript.last().unwrap().text, STOPPED_NOTICE);
    }

    #[tokio::test]
    async fn test_silent_report_service_can_be_stopped() {
        let export_dir = TempDir::new().unwrap();
        let mut app = app_at(silent_server().await, &export_dir);
        app.state.apply_prediction(prediction());

        app.state.request_report();
        tokio::time::timeout(Duration::from_secs(3), app.tick())
            .await
            .expect("tick waited on the report service");
        assert!(app.state.report.is_streaming());

        app.state.pending_async_action = Some(AsyncAction::CancelReport);
        app.tick().await;

        assert!(!app.state.report.is_streaming());
        assert_eq!(app.state.report.text(), REPORT_STOPPED);
    }

    #[tokio::test]
    async fn test_unreachable_chat_service_falls_back() {
        let export_dir = TempDir::new().unwrap();
        let mut app = test_app(&export_dir);

        app.state.chat_input = "Hello?".to_string();
        app.state.submit_chat();
        app.tick().await;

        for _ in 0..100 {
            if !app.state.is_chat_streaming() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            app.tick().await;
        }

        assert!(!app.state.is_chat_streaming());
        assert_eq!(app.state.transcript.last().unwrap().text, FALLBACK_REPLY);
        assert!(app.state.transcript.push_user("next").is_ok());
    }
}
