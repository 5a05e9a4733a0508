use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description applied to suspicious events when the caller gives none
pub const DEFAULT_SUSPICIOUS_DESCRIPTION: &str = "Suspicious behavior detected";

/// Fixed description for recording-initiated events
pub const RECORDING_DESCRIPTION: &str = "Video recording initiated";

/// Number of suspicious events at which the alert level turns red
pub const RED_ALERT_THRESHOLD: u32 = 5;

/// Kind of a logged behavior event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    Suspicious,
    Recording,
}

/// A single entry in a subject's behavior log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub id: u64,
    pub kind: BehaviorKind,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub evidence_url: Option<String>,
}

/// Per-subject suspicious-behavior counter plus the append-only event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectBehavior {
    pub count: u32,
    pub events: Vec<BehaviorEvent>,
}

/// Alert level derived from a behavior count. Never stored; always
/// recomputed from the count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Orange,
    Red,
}

impl AlertLevel {
    pub fn from_count(count: u32) -> Self {
        if count == 0 {
            AlertLevel::None
        } else if count < RED_ALERT_THRESHOLD {
            AlertLevel::Orange
        } else {
            AlertLevel::Red
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_level_thresholds() {
        assert_eq!(AlertLevel::from_count(0), AlertLevel::None);
        assert_eq!(AlertLevel::from_count(1), AlertLevel::Orange);
        assert_eq!(AlertLevel::from_count(4), AlertLevel::Orange);
        assert_eq!(AlertLevel::from_count(5), AlertLevel::Red);
        assert_eq!(AlertLevel::from_count(42), AlertLevel::Red);
    }
}
