//! Campaign record, creation candidate and partial update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CampaignId, OwnerId};
use super::state::{CampaignStatus, Category};
use super::validation::{ValidationError, check_min_within_target};

/// Campaign record: the stored row.
///
/// Design:
/// - `id` and `owner_id` are fixed at creation
/// - `collected_amount` belongs to the donation pipeline; nothing here decreases it
/// - State transitions via methods (not direct field access)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub target_amount: i64,
    pub min_donation: i64,
    pub collected_amount: i64,
    pub deadline: DateTime<Utc>,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated-or-to-be-validated creation candidate.
///
/// The identifier is generated by the orchestrator, never supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    pub id: CampaignId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub target_amount: i64,
    pub min_donation: i64,
    pub deadline: DateTime<Utc>,
    pub category: Category,
}

impl NewCampaign {
    /// Materialise the stored row: active, nothing collected, both timestamps `now`.
    pub fn into_campaign(self, now: DateTime<Utc>) -> Campaign {
        Campaign {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            category: self.category,
            target_amount: self.target_amount,
            min_donation: self.min_donation,
            collected_amount: 0,
            deadline: self.deadline,
            status: CampaignStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update (PATCH semantics). `None` means "not provided".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub target_amount: Option<i64>,
    pub min_donation: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<CampaignStatus>,
}

impl CampaignPatch {
    pub fn is_empty(&self) -> bool {
        *self == CampaignPatch::default()
    }
}

/// Why a patch could not be merged into a stored row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("status cannot move from {from} to {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },
}

impl Campaign {
    /// Apply only the provided fields and bump `updated_at`.
    ///
    /// The merged row must still satisfy `min_donation <= target_amount` and the
    /// status may only move forward. On error `self` is left untouched.
    pub fn apply_patch(&mut self, patch: &CampaignPatch, now: DateTime<Utc>) -> Result<(), PatchError> {
        let mut merged = self.clone();
        if let Some(title) = &patch.title {
            merged.title = title.clone();
        }
        if let Some(description) = &patch.description {
            merged.description = description.clone();
        }
        if let Some(category) = patch.category {
            merged.category = category;
        }
        if let Some(target) = patch.target_amount {
            merged.target_amount = target;
        }
        if let Some(min_donation) = patch.min_donation {
            merged.min_donation = min_donation;
        }
        if let Some(deadline) = patch.deadline {
            merged.deadline = deadline;
        }
        if let Some(status) = patch.status {
            if !self.status.can_transition_to(status) {
                return Err(PatchError::InvalidTransition {
                    from: self.status,
                    to: status,
                });
            }
            merged.status = status;
        }
        check_min_within_target(merged.min_donation, merged.target_amount)?;

        merged.updated_at = now;
        *self = merged;
        Ok(())
    }

    /// Expired = still active with the deadline strictly behind `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == CampaignStatus::Active && self.deadline < now
    }

    /// Mark campaign as completed (scheduled path only).
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.status = CampaignStatus::Completed;
        self.updated_at = now;
    }
}
