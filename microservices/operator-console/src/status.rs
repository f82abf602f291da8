//! Call status normalization
//!
//! The backend reports call status as free-form provider strings
//! (`"in-progress"`, `"no_answer"`, `"NoAnswer"`, ...). Everything that renders
//! a status goes through [`StatusKey::normalize`] and the label/severity
//! mapping below, so every surface shows the same thing for the same raw value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed vocabulary of call states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKey {
    Completed,
    InProgress,
    Busy,
    Failed,
    NoAnswer,
    Canceled,
    Queued,
    Initiated,
    Ringing,
    Unknown,
}

/// Visual weight of a status (icon colour on the rendering side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Positive,
    Warning,
    Error,
    Pending,
    Neutral,
}

impl StatusKey {
    pub const ALL: [StatusKey; 10] = [
        StatusKey::Completed,
        StatusKey::InProgress,
        StatusKey::Busy,
        StatusKey::Failed,
        StatusKey::NoAnswer,
        StatusKey::Canceled,
        StatusKey::Queued,
        StatusKey::Initiated,
        StatusKey::Ringing,
        StatusKey::Unknown,
    ];

    /// Map any raw backend status to a key. Total: unrecognised input,
    /// including the empty string, is `Unknown`.
    pub fn normalize(raw: &str) -> Self {
        let folded: String = raw
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        match folded.as_str() {
            "completed" | "connected" => Self::Completed,
            "in_progress" | "inprogress" => Self::InProgress,
            "busy" => Self::Busy,
            "failed" => Self::Failed,
            "no_answer" | "noanswer" => Self::NoAnswer,
            "canceled" | "cancelled" => Self::Canceled,
            "queued" => Self::Queued,
            "initiated" => Self::Initiated,
            "ringing" => Self::Ringing,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in_progress",
            Self::Busy => "busy",
            Self::Failed => "failed",
            Self::NoAnswer => "no_answer",
            Self::Canceled => "canceled",
            Self::Queued => "queued",
            Self::Initiated => "initiated",
            Self::Ringing => "ringing",
            Self::Unknown => "unknown",
        }
    }

    /// Translation key of the display label. Completed and in-progress calls
    /// both read as "connected".
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Completed | Self::InProgress => "status.connected",
            Self::Busy => "status.busy",
            Self::Failed => "status.failed",
            Self::NoAnswer => "status.noanswer",
            Self::Canceled => "status.canceled",
            Self::Queued => "status.queued",
            Self::Initiated => "status.initiated",
            Self::Ringing => "status.ringing",
            Self::Unknown => "status.unknown",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Completed | Self::InProgress => Severity::Positive,
            Self::Busy | Self::NoAnswer => Severity::Warning,
            Self::Failed => Severity::Error,
            Self::Queued | Self::Initiated | Self::Ringing => Severity::Pending,
            Self::Canceled | Self::Unknown => Severity::Neutral,
        }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_variants() {
        let table = [
            ("completed", StatusKey::Completed),
            ("COMPLETED", StatusKey::Completed),
            ("in_progress", StatusKey::InProgress),
            ("in-progress", StatusKey::InProgress),
            ("In-Progress", StatusKey::InProgress),
            ("busy", StatusKey::Busy),
            ("failed", StatusKey::Failed),
            ("no_answer", StatusKey::NoAnswer),
            ("no-answer", StatusKey::NoAnswer),
            ("noanswer", StatusKey::NoAnswer),
            ("NoAnswer", StatusKey::NoAnswer),
            ("canceled", StatusKey::Canceled),
            ("cancelled", StatusKey::Canceled),
            ("queued", StatusKey::Queued),
            ("initiated", StatusKey::Initiated),
            ("ringing", StatusKey::Ringing),
            ("  ringing ", StatusKey::Ringing),
        ];
        for (raw, expected) in table {
            assert_eq!(StatusKey::normalize(raw), expected, "raw status {raw:?}");
        }
    }

    #[test]
    fn test_unrecognised_is_unknown() {
        for raw in ["", " ", "dropped", "answered", "in__progress", "no answer please", "✓"] {
            assert_eq!(StatusKey::normalize(raw), StatusKey::Unknown, "raw status {raw:?}");
        }
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_names() {
        for key in StatusKey::ALL {
            assert_eq!(StatusKey::normalize(key.as_str()), key);
        }
    }

    #[test]
    fn test_label_and_severity_table() {
        assert_eq!(StatusKey::Completed.label_key(), "status.connected");
        assert_eq!(StatusKey::InProgress.label_key(), "status.connected");
        assert_eq!(StatusKey::Completed.severity(), Severity::Positive);
        assert_eq!(StatusKey::Busy.severity(), Severity::Warning);
        assert_eq!(StatusKey::NoAnswer.severity(), Severity::Warning);
        assert_eq!(StatusKey::Failed.severity(), Severity::Error);
        assert_eq!(StatusKey::Canceled.severity(), Severity::Neutral);
        assert_eq!(StatusKey::Unknown.severity(), Severity::Neutral);
        assert_eq!(StatusKey::Queued.severity(), Severity::Pending);
        assert_eq!(StatusKey::Initiated.severity(), Severity::Pending);
        assert_eq!(StatusKey::Ringing.severity(), Severity::Pending);
    }

    #[test]
    fn test_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&StatusKey::NoAnswer).unwrap(),
            "\"no_answer\""
        );
    }
}
