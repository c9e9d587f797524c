//! Field-level and cross-field business rules for campaign mutations.
//!
//! Pure functions: the current time is passed in by the caller. Rules run in a
//! fixed order and the first failing rule is returned; nothing is aggregated.

use chrono::{DateTime, Utc};

use super::campaign::{CampaignPatch, NewCampaign};

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("user ID is required")]
    MissingOwner,

    #[error("title must be between 5 and 100 characters (got {0})")]
    TitleLength(usize),

    #[error("target amount must be positive")]
    NonPositiveTarget,

    #[error("minimum donation amount must be positive")]
    NonPositiveMinDonation,

    #[error("deadline must be in the future")]
    DeadlineNotInFuture,

    #[error("minimum donation ({min_donation}) must be less than or equal to target amount ({target_amount})")]
    MinDonationExceedsTarget { min_donation: i64, target_amount: i64 },
}

/// Checks a full creation candidate.
pub fn validate_for_create(candidate: &NewCampaign, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if !candidate.owner_id.is_present() {
        return Err(ValidationError::MissingOwner);
    }
    check_title(&candidate.title)?;
    if candidate.target_amount <= 0 {
        return Err(ValidationError::NonPositiveTarget);
    }
    if candidate.min_donation <= 0 {
        return Err(ValidationError::NonPositiveMinDonation);
    }
    check_deadline(candidate.deadline, now)?;
    check_min_within_target(candidate.min_donation, candidate.target_amount)
}

/// Checks only the fields a partial update actually provides.
///
/// The min-donation/target cross check fires here only when both are in the
/// patch; the check against the stored target happens when the repository
/// merges the patch (see [`Campaign::apply_patch`](super::Campaign::apply_patch)).
pub fn validate_for_update(patch: &CampaignPatch, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if let Some(title) = &patch.title {
        check_title(title)?;
    }
    if let Some(target) = patch.target_amount
        && target <= 0
    {
        return Err(ValidationError::NonPositiveTarget);
    }
    if let Some(deadline) = patch.deadline {
        check_deadline(deadline, now)?;
    }
    if let Some(min_donation) = patch.min_donation {
        if min_donation <= 0 {
            return Err(ValidationError::NonPositiveMinDonation);
        }
        if let Some(target) = patch.target_amount {
            check_min_within_target(min_donation, target)?;
        }
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(ValidationError::TitleLength(len));
    }
    Ok(())
}

fn check_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if deadline <= now {
        return Err(ValidationError::DeadlineNotInFuture);
    }
    Ok(())
}

pub(crate) fn check_min_within_target(min_donation: i64, target_amount: i64) -> Result<(), ValidationError> {
    if min_donation > target_amount {
        return Err(ValidationError::MinDonationExceedsTarget {
            min_donation,
            target_amount,
        });
    }
    Ok(())
}
