//! Farm alert models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prioritized alert shown to the farmer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub icon: String,
    pub time_label: String,
    pub category: AlertCategory,
    pub generated_at: DateTime<Utc>,
}

/// Alert severity; declaration order is rank order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Urgent,
    Warning,
    Normal,
}

impl AlertSeverity {
    /// Sort rank: urgent=0, warning=1, normal=2
    pub fn rank(&self) -> u8 {
        match self {
            AlertSeverity::Urgent => 0,
            AlertSeverity::Warning => 1,
            AlertSeverity::Normal => 2,
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self, AlertSeverity::Urgent | AlertSeverity::Warning)
    }
}

/// Alert category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Weather,
    Crop,
    Market,
    General,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Urgent => write!(f, "urgent"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Normal => write!(f, "normal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_matches_ordering() {
        assert!(AlertSeverity::Urgent < AlertSeverity::Warning);
        assert!(AlertSeverity::Warning < AlertSeverity::Normal);
        assert_eq!(AlertSeverity::Urgent.rank(), 0);
        assert_eq!(AlertSeverity::Normal.rank(), 2);
    }

    #[test]
    fn test_actionable() {
        assert!(AlertSeverity::Urgent.is_actionable());
        assert!(AlertSeverity::Warning.is_actionable());
        assert!(!AlertSeverity::Normal.is_actionable());
    }
}
