//! Stage, status, directory-mode, and screen enums for rizz.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` so the
//! pipeline and navigator can enforce valid transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StageId
// ---------------------------------------------------------------------------

/// One logical stage of an analysis run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    ChatHistory,
    ProfileScan,
    AiGeneration,
}

impl StageId {
    /// All stages in the order a run visits them.
    pub const ALL: [Self; 3] = [Self::ChatHistory, Self::ProfileScan, Self::AiGeneration];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChatHistory => "chat_history",
            Self::ProfileScan => "profile_scan",
            Self::AiGeneration => "ai_generation",
        }
    }

    /// Human-readable label for progress displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChatHistory => "Chat history",
            Self::ProfileScan => "Profile scan",
            Self::AiGeneration => "AI generation",
        }
    }

    /// Position of the stage within a run (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::ChatHistory => 0,
            Self::ProfileScan => 1,
            Self::AiGeneration => 2,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StageStatus
// ---------------------------------------------------------------------------

/// Status of one pipeline stage within a single run.
///
/// ```text
/// pending → processing → complete
///                      → failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Processing,
    Complete,
    Failed,
}

impl StageStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing],
            Self::Processing => &[Self::Complete, Self::Failed],
            Self::Complete | Self::Failed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DirectoryMode
// ---------------------------------------------------------------------------

/// Which base listing the directory shows when no search query is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryMode {
    #[default]
    Inbox,
    Pending,
}

impl DirectoryMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for DirectoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Screens the navigator moves between.
///
/// ```text
/// login → directory → analysis → results
///           ↑  ↓ back    ↓ back    ↓ back / ↑ retry
/// login ← directory ← analysis / results
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Login,
    Directory,
    Analysis,
    Results,
}

impl Screen {
    /// Screens reachable by a forward (non-back) transition.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Login => &[Self::Directory],
            Self::Directory => &[Self::Analysis],
            Self::Analysis => &[Self::Results],
            Self::Results => &[Self::Analysis],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Screen reached by an explicit back action.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Login | Self::Directory => Self::Login,
            Self::Analysis | Self::Results => Self::Directory,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Directory => "directory",
            Self::Analysis => "analysis",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
