//! Campaign status state machine and the closed category set.
//!
//! Both enums carry a canonical lowercase storage string. The repository stores
//! that string; the wire codec maps caller-facing ordinals onto these enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Campaign status.
///
/// State transitions:
/// - Active -> Completed (scheduled completion only)
///
/// Completed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Active,
    Completed,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 2] = [CampaignStatus::Active, CampaignStatus::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CampaignStatus::Completed)
    }

    /// Forward-only: staying put is allowed, leaving a terminal state is not.
    pub fn can_transition_to(self, next: CampaignStatus) -> bool {
        self == next || !self.is_terminal()
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for CampaignStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Campaign category (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Education,
    Health,
    DisasterRelief,
    Environment,
    Animals,
    Community,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Education,
        Category::Health,
        Category::DisasterRelief,
        Category::Environment,
        Category::Animals,
        Category::Community,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Health => "health",
            Category::DisasterRelief => "disaster_relief",
            Category::Environment => "environment",
            Category::Animals => "animals",
            Category::Community => "community",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_status_defaults_to_active() {
        assert_eq!(CampaignStatus::default(), CampaignStatus::Active);
    }

    #[rstest]
    #[case::stay_active(CampaignStatus::Active, CampaignStatus::Active, true)]
    #[case::complete(CampaignStatus::Active, CampaignStatus::Completed, true)]
    #[case::stay_completed(CampaignStatus::Completed, CampaignStatus::Completed, true)]
    #[case::reopen(CampaignStatus::Completed, CampaignStatus::Active, false)]
    fn status_transitions_only_move_forward(
        #[case] from: CampaignStatus,
        #[case] to: CampaignStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn storage_strings_round_trip_for_every_variant() {
        for status in CampaignStatus::ALL {
            assert_eq!(status.as_str().parse::<CampaignStatus>().unwrap(), status);
        }
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_storage_strings_fail_closed() {
        let err = "archived".parse::<CampaignStatus>().unwrap_err();
        assert_eq!(err.kind, "status");
        assert!("Health".parse::<Category>().is_err());
    }

    #[test]
    fn serde_uses_storage_strings() {
        let s = serde_json::to_string(&Category::DisasterRelief).unwrap();
        assert_eq!(s, "\"disaster_relief\"");
        let s = serde_json::to_string(&CampaignStatus::Completed).unwrap();
        assert_eq!(s, "\"completed\"");
    }
}
