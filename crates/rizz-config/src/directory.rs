//! Directory listing configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_page_size() -> u32 {
    20
}

const fn default_inbox_score() -> u8 {
    70
}

const fn default_pending_score() -> u8 {
    50
}

const fn default_search_score() -> u8 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryConfig {
    /// Threads requested per inbox/pending fetch.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Recent messages fetched when a thread is opened.
    #[serde(default = "default_page_size")]
    pub message_window: u32,

    /// Score given to inbox contacts the backend did not score.
    #[serde(default = "default_inbox_score")]
    pub inbox_placeholder_score: u8,

    /// Score given to pending-thread contacts.
    #[serde(default = "default_pending_score")]
    pub pending_placeholder_score: u8,

    /// Score given to search and new-chat contacts.
    #[serde(default = "default_search_score")]
    pub search_placeholder_score: u8,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            message_window: default_page_size(),
            inbox_placeholder_score: default_inbox_score(),
            pending_placeholder_score: default_pending_score(),
            search_placeholder_score: default_search_score(),
        }
    }
}

impl DirectoryConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid("directory.page_size", "must be greater than 0"));
        }
        if self.message_window == 0 {
            return Err(ConfigError::invalid(
                "directory.message_window",
                "must be greater than 0",
            ));
        }
        for (field, score) in [
            ("directory.inbox_placeholder_score", self.inbox_placeholder_score),
            ("directory.pending_placeholder_score", self.pending_placeholder_score),
            ("directory.search_placeholder_score", self.search_placeholder_score),
        ] {
            if score > 100 {
                return Err(ConfigError::invalid(field, format!("{score} exceeds 100")));
            }
        }
        Ok(())
    }
}
