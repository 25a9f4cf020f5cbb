//! Analysis pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Progress percentages reported at each pipeline checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressCheckpoints {
    /// Run started, chat-history processing.
    pub start: u8,
    /// Chat-history complete.
    pub chat_history: u8,
    /// Profile-scan complete.
    pub profile_scan: u8,
    /// AI generation entered.
    pub generation: u8,
    /// Completion or terminal failure. Must be 100.
    pub done: u8,
}

impl Default for ProgressCheckpoints {
    fn default() -> Self {
        Self {
            start: 10,
            chat_history: 33,
            profile_scan: 66,
            generation: 90,
            done: 100,
        }
    }
}

impl ProgressCheckpoints {
    #[must_use]
    pub const fn as_array(self) -> [u8; 5] {
        [
            self.start,
            self.chat_history,
            self.profile_scan,
            self.generation,
            self.done,
        ]
    }

    fn validate(self) -> Result<(), ConfigError> {
        if self.done != 100 {
            return Err(ConfigError::invalid(
                "analysis.checkpoints.done",
                format!("must be 100, got {}", self.done),
            ));
        }
        let values = self.as_array();
        if values.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::invalid(
                "analysis.checkpoints",
                format!("must be strictly increasing, got {values:?}"),
            ));
        }
        Ok(())
    }
}

fn default_placeholder_line() -> String {
    "No pickup line available".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub checkpoints: ProgressCheckpoints,

    /// Shown when a result carries no pickup lines.
    #[serde(default = "default_placeholder_line")]
    pub placeholder_line: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            checkpoints: ProgressCheckpoints::default(),
            placeholder_line: default_placeholder_line(),
        }
    }
}

impl AnalysisConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.checkpoints.validate()?;
        if self.placeholder_line.trim().is_empty() {
            return Err(ConfigError::invalid(
                "analysis.placeholder_line",
                "must not be blank",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_checkpoints_are_canonical() {
        assert_eq!(ProgressCheckpoints::default().as_array(), [10, 33, 66, 90, 100]);
        AnalysisConfig::default().validate().expect("valid");
    }

    #[test]
    fn non_monotonic_checkpoints_are_rejected() {
        let config = AnalysisConfig {
            checkpoints: ProgressCheckpoints {
                profile_scan: 20,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn done_must_be_hundred() {
        let config = AnalysisConfig {
            checkpoints: ProgressCheckpoints {
                done: 95,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
