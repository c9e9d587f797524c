//! Canonical request/response shapes for the five campaign RPCs.
//!
//! Enumerations travel as `i32` ordinals; see [`WireStatus`] and [`WireCategory`].
//! Update requests use sentinels for "not provided": empty string, zero, a
//! missing timestamp, or the UNSPECIFIED ordinal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-facing status ordinals.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireStatus {
    Unspecified = 0,
    Active = 1,
    Completed = 2,
}

/// Caller-facing category ordinals.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireCategory {
    Unspecified = 0,
    Education = 1,
    Health = 2,
    DisasterRelief = 3,
    Environment = 4,
    Animals = 5,
    Community = 6,
    Other = 7,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
    pub owner_id: u64,
    pub title: String,
    pub description: String,
    pub target_amount: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub category: i32,
    pub min_donation: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetCampaignByIdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetCampaignsByOwnerRequest {
    pub owner_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCampaignRequest {
    pub id: String,
    pub owner_id: u64,
    pub title: String,
    pub description: String,
    pub target_amount: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub status: i32,
    pub category: i32,
    pub min_donation: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteCampaignRequest {
    pub id: String,
}

/// Campaign as seen by callers and by `campaign.created` / `campaign.updated` consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignView {
    pub id: String,
    pub owner_id: u64,
    pub title: String,
    pub description: String,
    pub target_amount: i64,
    pub collected_amount: i64,
    pub deadline: DateTime<Utc>,
    pub status: i32,
    pub category: i32,
    pub min_donation: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCampaignResponse {
    pub campaign: CampaignView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetCampaignByIdResponse {
    pub campaign: CampaignView,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetCampaignsByOwnerResponse {
    pub campaigns: Vec<CampaignView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCampaignResponse {
    pub campaign: CampaignView,
}

/// Deletion acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteCampaignResponse {
    pub id: String,
    pub owner_id: u64,
}

/// `campaign.deleted` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionNotice {
    pub id: String,
    pub owner_id: u64,
}
