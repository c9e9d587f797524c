//! Category/Status codec and request/record mapping.
//!
//! Decoding is deterministic and fails closed:
//! - UNSPECIFIED (0) decodes to "not provided" (`None`)
//! - any ordinal outside the closed set is [`CodecError::UnknownOrdinal`]
//!
//! A creation request with an UNSPECIFIED category gets [`Category::Other`].
//! Encoding is total.

use chrono::{DateTime, Utc};

use super::messages::{
    CampaignView, CreateCampaignRequest, DeletionNotice, UpdateCampaignRequest, WireCategory,
    WireStatus,
};
use crate::domain::{
    Campaign, CampaignError, CampaignEvent, CampaignId, CampaignPatch, CampaignStatus, Category,
    NewCampaign, OwnerId,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("unknown {kind} ordinal {value}")]
    UnknownOrdinal { kind: &'static str, value: i32 },
}

impl From<CodecError> for CampaignError {
    fn from(err: CodecError) -> Self {
        CampaignError::InvalidArgument(err.to_string())
    }
}

impl TryFrom<i32> for WireStatus {
    type Error = CodecError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireStatus::Unspecified),
            1 => Ok(WireStatus::Active),
            2 => Ok(WireStatus::Completed),
            _ => Err(CodecError::UnknownOrdinal {
                kind: "status",
                value,
            }),
        }
    }
}

impl TryFrom<i32> for WireCategory {
    type Error = CodecError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireCategory::Unspecified),
            1 => Ok(WireCategory::Education),
            2 => Ok(WireCategory::Health),
            3 => Ok(WireCategory::DisasterRelief),
            4 => Ok(WireCategory::Environment),
            5 => Ok(WireCategory::Animals),
            6 => Ok(WireCategory::Community),
            7 => Ok(WireCategory::Other),
            _ => Err(CodecError::UnknownOrdinal {
                kind: "category",
                value,
            }),
        }
    }
}

pub fn status_from_wire(value: i32) -> Result<Option<CampaignStatus>, CodecError> {
    Ok(match WireStatus::try_from(value)? {
        WireStatus::Unspecified => None,
        WireStatus::Active => Some(CampaignStatus::Active),
        WireStatus::Completed => Some(CampaignStatus::Completed),
    })
}

pub fn status_to_wire(status: CampaignStatus) -> i32 {
    let wire = match status {
        CampaignStatus::Active => WireStatus::Active,
        CampaignStatus::Completed => WireStatus::Completed,
    };
    wire as i32
}

pub fn category_from_wire(value: i32) -> Result<Option<Category>, CodecError> {
    Ok(match WireCategory::try_from(value)? {
        WireCategory::Unspecified => None,
        WireCategory::Education => Some(Category::Education),
        WireCategory::Health => Some(Category::Health),
        WireCategory::DisasterRelief => Some(Category::DisasterRelief),
        WireCategory::Environment => Some(Category::Environment),
        WireCategory::Animals => Some(Category::Animals),
        WireCategory::Community => Some(Category::Community),
        WireCategory::Other => Some(Category::Other),
    })
}

pub fn category_to_wire(category: Category) -> i32 {
    let wire = match category {
        Category::Education => WireCategory::Education,
        Category::Health => WireCategory::Health,
        Category::DisasterRelief => WireCategory::DisasterRelief,
        Category::Environment => WireCategory::Environment,
        Category::Animals => WireCategory::Animals,
        Category::Community => WireCategory::Community,
        Category::Other => WireCategory::Other,
    };
    wire as i32
}

/// Map a creation request onto the canonical candidate.
///
/// A missing deadline becomes the epoch, which the validator then rejects as
/// not being in the future.
pub fn new_campaign_from_request(
    id: CampaignId,
    req: &CreateCampaignRequest,
) -> Result<NewCampaign, CodecError> {
    let category = category_from_wire(req.category)?.unwrap_or(Category::Other);
    Ok(NewCampaign {
        id,
        owner_id: OwnerId::new(req.owner_id),
        title: req.title.clone(),
        description: req.description.clone(),
        target_amount: req.target_amount,
        min_donation: req.min_donation,
        deadline: req.deadline.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        category,
    })
}

/// Map the optional fields of an update request; sentinels become `None`.
pub fn patch_from_request(req: &UpdateCampaignRequest) -> Result<CampaignPatch, CodecError> {
    Ok(CampaignPatch {
        title: non_empty(&req.title),
        description: non_empty(&req.description),
        category: category_from_wire(req.category)?,
        target_amount: non_zero(req.target_amount),
        min_donation: non_zero(req.min_donation),
        deadline: req.deadline,
        status: status_from_wire(req.status)?,
    })
}

pub fn campaign_view(campaign: &Campaign) -> CampaignView {
    CampaignView {
        id: campaign.id.to_string(),
        owner_id: campaign.owner_id.get(),
        title: campaign.title.clone(),
        description: campaign.description.clone(),
        target_amount: campaign.target_amount,
        collected_amount: campaign.collected_amount,
        deadline: campaign.deadline,
        status: status_to_wire(campaign.status),
        category: category_to_wire(campaign.category),
        min_donation: campaign.min_donation,
        created_at: campaign.created_at,
        updated_at: campaign.updated_at,
    }
}

/// Encode the broker payload for an event.
pub fn encode_event(event: &CampaignEvent) -> Result<Vec<u8>, serde_json::Error> {
    match event {
        CampaignEvent::Created(campaign) | CampaignEvent::Updated(campaign) => {
            serde_json::to_vec(&campaign_view(campaign))
        }
        CampaignEvent::Deleted { id, owner_id } => serde_json::to_vec(&DeletionNotice {
            id: id.to_string(),
            owner_id: owner_id.get(),
        }),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;
    use ulid::Ulid;

    #[test]
    fn status_codec_is_a_bijection_over_the_closed_set() {
        for status in CampaignStatus::ALL {
            assert_eq!(status_from_wire(status_to_wire(status)), Ok(Some(status)));
        }
    }

    #[test]
    fn category_codec_is_a_bijection_over_the_closed_set() {
        for category in Category::ALL {
            assert_eq!(category_from_wire(category_to_wire(category)), Ok(Some(category)));
        }
    }

    #[test]
    fn unspecified_decodes_to_not_provided() {
        assert_eq!(status_from_wire(WireStatus::Unspecified as i32), Ok(None));
        assert_eq!(category_from_wire(WireCategory::Unspecified as i32), Ok(None));
    }

    #[rstest]
    #[case::status_high(3, "status")]
    #[case::status_negative(-1, "status")]
    fn unknown_status_ordinals_fail_closed(#[case] value: i32, #[case] kind: &'static str) {
        assert_eq!(status_from_wire(value), Err(CodecError::UnknownOrdinal { kind, value }));
    }

    #[test]
    fn unknown_category_ordinal_maps_to_invalid_argument() {
        let err = category_from_wire(99).unwrap_err();
        let err: CampaignError = err.into();
        assert!(matches!(err, CampaignError::InvalidArgument(msg) if msg.contains("category")));
    }

    #[test]
    fn create_request_with_unspecified_category_defaults_to_other() {
        let req = CreateCampaignRequest {
            owner_id: 3,
            title: "Shelter dogs".into(),
            category: WireCategory::Unspecified as i32,
            ..Default::default()
        };
        let candidate = new_campaign_from_request(CampaignId::from_ulid(Ulid::new()), &req).unwrap();
        assert_eq!(candidate.category, Category::Other);
        assert_eq!(candidate.deadline, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn empty_update_request_maps_to_empty_patch() {
        let req = UpdateCampaignRequest {
            id: "campaign-x".into(),
            owner_id: 9,
            ..Default::default()
        };
        assert!(patch_from_request(&req).unwrap().is_empty());
    }

    #[test]
    fn update_request_maps_provided_fields() {
        let deadline = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let req = UpdateCampaignRequest {
            title: "New title".into(),
            target_amount: -3,
            deadline: Some(deadline),
            status: WireStatus::Completed as i32,
            category: WireCategory::Health as i32,
            ..Default::default()
        };
        let patch = patch_from_request(&req).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert_eq!(patch.description, None);
        assert_eq!(patch.target_amount, Some(-3));
        assert_eq!(patch.min_donation, None);
        assert_eq!(patch.deadline, Some(deadline));
        assert_eq!(patch.status, Some(CampaignStatus::Completed));
        assert_eq!(patch.category, Some(Category::Health));
    }

    #[test]
    fn deletion_payload_carries_id_and_owner() {
        let id = CampaignId::from_ulid(Ulid::new());
        let event = CampaignEvent::Deleted {
            id,
            owner_id: OwnerId::new(12),
        };
        let payload = encode_event(&event).unwrap();
        let notice: DeletionNotice = serde_json::from_slice(&payload).unwrap();
        assert_eq!(notice.id, id.to_string());
        assert_eq!(notice.owner_id, 12);
    }

    #[test]
    fn created_payload_is_a_full_view() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let campaign = NewCampaign {
            id: CampaignId::from_ulid(Ulid::new()),
            owner_id: OwnerId::new(4),
            title: "Reforest the hill".into(),
            description: "Ten thousand saplings".into(),
            target_amount: 2_000,
            min_donation: 20,
            deadline: now + Duration::days(10),
            category: Category::Environment,
        }
        .into_campaign(now);

        let payload = encode_event(&CampaignEvent::Created(campaign.clone())).unwrap();
        let view: CampaignView = serde_json::from_slice(&payload).unwrap();
        assert_eq!(view, campaign_view(&campaign));
        assert_eq!(view.status, WireStatus::Active as i32);
        assert_eq!(view.category, WireCategory::Environment as i32);
    }
}
