//! Snapshot of everything presentation renders.

use rizz_analysis::StageBoard;
use rizz_core::{AnalysisResult, ChatMessage, Contact, DirectoryMode, PickupCursor, Screen};
use serde::Serialize;

use crate::navigator::Navigator;

/// Directory listing as last applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryView {
    pub mode: DirectoryMode,
    pub query: String,
    pub contacts: Vec<Contact>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Outcome of the last send from the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SendStatus {
    Sent,
    Failed(String),
}

/// Published through a `tokio::sync::watch` channel on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    pub navigator: Navigator,
    /// Username of the current session, if any. Never the token.
    pub session_user: Option<String>,
    pub login_error: Option<String>,
    pub directory: DirectoryView,
    pub selected: Option<Contact>,
    /// Recent messages of the selected thread.
    pub thread: Vec<ChatMessage>,
    pub pipeline: Option<StageBoard>,
    pub result: Option<AnalysisResult>,
    pub cursor: PickupCursor,
    pub send_status: Option<SendStatus>,
}

impl AppSnapshot {
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.navigator.screen()
    }

    /// The pickup line currently shown, once a result exists.
    #[must_use]
    pub fn current_pickup_line(&self) -> Option<&str> {
        self.result
            .as_ref()
            .map(|result| self.cursor.current(&result.pickup_lines))
    }

    /// Drop everything tied to a selected contact.
    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        self.thread.clear();
        self.pipeline = None;
        self.result = None;
        self.cursor = PickupCursor::default();
        self.send_status = None;
    }
}
