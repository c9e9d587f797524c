//! Events - ドメインイベント
//!
//! ストレージへの変更が commit された後にだけ生成されます。
//! payload のエンコードは `wire` モジュールが担当します。

use super::campaign::Campaign;
use super::ids::{CampaignId, OwnerId};

pub const ROUTING_KEY_CREATED: &str = "campaign.created";
pub const ROUTING_KEY_UPDATED: &str = "campaign.updated";
pub const ROUTING_KEY_DELETED: &str = "campaign.deleted";

/// CampaignEvent はキャンペーンの状態変化を下流へ知らせる事実
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignEvent {
    /// Full snapshot of the stored row.
    Created(Campaign),

    /// Full snapshot after a partial update.
    Updated(Campaign),

    Deleted { id: CampaignId, owner_id: OwnerId },
}

impl CampaignEvent {
    pub fn routing_key(&self) -> &'static str {
        match self {
            CampaignEvent::Created(_) => ROUTING_KEY_CREATED,
            CampaignEvent::Updated(_) => ROUTING_KEY_UPDATED,
            CampaignEvent::Deleted { .. } => ROUTING_KEY_DELETED,
        }
    }

    pub fn campaign_id(&self) -> CampaignId {
        match self {
            CampaignEvent::Created(c) | CampaignEvent::Updated(c) => c.id,
            CampaignEvent::Deleted { id, .. } => *id,
        }
    }
}
