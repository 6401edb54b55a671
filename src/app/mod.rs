// ABOUTME: Main application structure and state management for the TUI

pub mod advisor;
pub mod briefing;
pub mod events;
pub mod notification;
pub mod state;

pub use advisor::ChatAdvisor;
pub use briefing::ReportBriefing;
pub use events::{AppEvent, EventHandler};
pub use notification::{Notification, NotificationType};
pub use state::{App, AppMessage, AppState};
