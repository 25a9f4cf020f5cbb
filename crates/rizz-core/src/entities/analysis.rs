use std::fmt;

use serde::{Deserialize, Serialize};

/// Insight recorded on a degraded result.
pub const DEGRADED_INSIGHT: &str = "Analysis failed";

/// Line substituted when a result carries no pickup lines.
pub const PLACEHOLDER_PICKUP_LINE: &str = "No pickup line available";

/// Clamp a backend score into 0–100. Non-finite values count as absent.
#[must_use]
// Clamped to 0..=100 before the cast.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_score(score: f64) -> Option<u8> {
    if score.is_finite() {
        Some(score.round().clamp(0.0, 100.0) as u8)
    } else {
        None
    }
}

/// One message in the analysed conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub sentiment: String,
}

/// Profile metadata extracted by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub dominant_colors: Vec<String>,
}

/// Ordered pickup lines that are never empty.
///
/// Construction widens an empty sequence to a single placeholder so that
/// index-based cycling is always defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PickupLines {
    lines: Vec<String>,
    placeholder: bool,
}

impl PickupLines {
    /// Build from `lines`, substituting `placeholder` when `lines` is empty.
    #[must_use]
    pub fn with_placeholder(lines: Vec<String>, placeholder: &str) -> Self {
        if lines.is_empty() {
            Self {
                lines: vec![placeholder.to_string()],
                placeholder: true,
            }
        } else {
            Self {
                lines,
                placeholder: false,
            }
        }
    }

    /// Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `true` when the only line is the substituted placeholder, which is
    /// never meant to be sent.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Line at `index`, wrapping around the sequence.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        &self.lines[index % self.lines.len()]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }
}

impl From<Vec<String>> for PickupLines {
    fn from(lines: Vec<String>) -> Self {
        Self::with_placeholder(lines, PLACEHOLDER_PICKUP_LINE)
    }
}

impl From<PickupLines> for Vec<String> {
    fn from(lines: PickupLines) -> Self {
        lines.lines
    }
}

/// Position of the displayed line within a result's [`PickupLines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupCursor {
    index: usize,
}

impl PickupCursor {
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(self, lines: &PickupLines) -> &str {
        lines.get(self.index)
    }

    /// Move to the next line, wrapping to 0 after the last one.
    pub fn advance(&mut self, lines: &PickupLines) {
        self.index = (self.index + 1) % lines.len();
    }
}

/// Letter grade derived from a rizz score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RizzGrade {
    S,
    A,
    B,
    C,
    D,
}

impl RizzGrade {
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::S,
            80..=89 => Self::A,
            70..=79 => Self::B,
            60..=69 => Self::C,
            _ => Self::D,
        }
    }
}

impl fmt::Display for RizzGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(letter)
    }
}

/// Canonical output of one analysis run. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub messages: Vec<ChatMessage>,
    pub profile: Profile,
    pub rizz_score: u8,
    pub insights: Vec<String>,
    pub pickup_lines: PickupLines,
    /// Set only on the result substituted for a failed run.
    #[serde(default)]
    pub degraded: bool,
}

impl AnalysisResult {
    /// Result used when a run fails: no content, score 0, a single
    /// failure insight, and the placeholder pickup line.
    #[must_use]
    pub fn degraded(placeholder_line: &str) -> Self {
        Self {
            messages: Vec::new(),
            profile: Profile::default(),
            rizz_score: 0,
            insights: vec![DEGRADED_INSIGHT.to_string()],
            pickup_lines: PickupLines::with_placeholder(Vec::new(), placeholder_line),
            degraded: true,
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether the displayed lines are real content that may be sent.
    #[must_use]
    pub const fn has_sendable_lines(&self) -> bool {
        !self.degraded && !self.pickup_lines.is_placeholder()
    }

    #[must_use]
    pub const fn grade(&self) -> RizzGrade {
        RizzGrade::from_score(self.rizz_score)
    }
}
