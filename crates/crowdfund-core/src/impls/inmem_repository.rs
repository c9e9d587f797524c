//! InMemoryCampaignRepository - 開発用・テスト用の正本
//!
//! # 学習ポイント
//! - tokio::sync::Mutex による排他制御（1 操作 = 1 クリティカルセクション）
//! - 一括遷移（expired → completed）をロック内で完結させてアトミックにする
//! - Clock を注入して timestamp と期限判定をテスト可能にする

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Campaign, CampaignId, CampaignPatch, NewCampaign, OwnerId};
use crate::ports::{CampaignRepository, Clock, RepositoryError};

/// In-memory repository state.
///
/// Keyed by ULID, so iteration order is creation order.
#[derive(Default)]
struct InMemoryRepositoryState {
    campaigns: BTreeMap<CampaignId, Campaign>,
}

/// In-memory campaign repository.
///
/// Every operation holds the lock for its whole read-modify-write, which gives
/// the same guarantees a row-locking store would: concurrent updates to one row
/// serialise, and the bulk completion never interleaves with an update.
pub struct InMemoryCampaignRepository {
    state: Arc<Mutex<InMemoryRepositoryState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCampaignRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryRepositoryState::default())),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.campaigns.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn create(&self, campaign: NewCampaign) -> Result<Campaign, RepositoryError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if state.campaigns.contains_key(&campaign.id) {
            return Err(RepositoryError::AlreadyExists(campaign.id));
        }
        let stored = campaign.into_campaign(now);
        state.campaigns.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: CampaignId) -> Result<Campaign, RepositoryError> {
        let state = self.state.lock().await;
        state
            .campaigns
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Campaign>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .campaigns
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_by_id_and_owner(
        &self,
        id: CampaignId,
        owner_id: OwnerId,
        patch: &CampaignPatch,
    ) -> Result<Campaign, RepositoryError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let campaign = state
            .campaigns
            .get_mut(&id)
            .filter(|c| c.owner_id == owner_id)
            .ok_or(RepositoryError::NotFound)?;
        campaign.apply_patch(patch, now)?;
        Ok(campaign.clone())
    }

    async fn delete_by_id(&self, id: CampaignId) -> Result<OwnerId, RepositoryError> {
        let mut state = self.state.lock().await;
        state
            .campaigns
            .remove(&id)
            .map(|c| c.owner_id)
            .ok_or(RepositoryError::NotFound)
    }

    async fn transition_expired_to_completed(&self) -> Result<Vec<Campaign>, RepositoryError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let mut transitioned = Vec::new();
        for campaign in state.campaigns.values_mut().filter(|c| c.is_expired(now)) {
            campaign.mark_completed(now);
            transitioned.push(campaign.clone());
        }
        Ok(transitioned)
    }
}
