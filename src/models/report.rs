// ABOUTME: ReportDraft - the executive report buffer mirrored from one stream session

use crate::streaming::StreamId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    text: String,
    session: Option<StreamId>,
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_streaming(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<StreamId> {
        self.session
    }

    /// Bind to a new session, discarding the previous report
    pub fn bind(&mut self, session: StreamId) {
        self.text.clear();
        self.session = Some(session);
    }

    /// Mirror the bound session's accumulated text. Updates from any other
    /// session are ignored.
    pub fn sync(&mut self, session: StreamId, accumulated: &str) -> bool {
        if self.session != Some(session) {
            return false;
        }
        self.text.clear();
        self.text.push_str(accumulated);
        true
    }

    /// Release the binding; the text stays as the finished report
    pub fn finish(&mut self, session: StreamId) -> bool {
        if self.session != Some(session) {
            return false;
        }
        self.session = None;
        true
    }

    /// Release the binding after a failure, appending `notice` to any
    /// partial text
    pub fn fail(&mut self, session: StreamId, notice: &str) -> bool {
        if !self.finish(session) {
            return false;
        }
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(notice);
        true
    }

    /// Replace the draft with an error message when no session could start
    pub fn set_unavailable(&mut self, message: &str) {
        self.session = None;
        self.text = message.to_string();
    }

    pub fn clear(&mut self) {
        self.session = None;
        self.text.clear();
    }
}
