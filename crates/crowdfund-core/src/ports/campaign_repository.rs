//! CampaignRepository port - 永続ストレージが実装する正本（source of truth）
//!
//! # 設計原則
//! - 戻り値は具体型（`Campaign` / `Vec<Campaign>`）で、呼び出し側での型変換は不要
//! - `update_by_id_and_owner` は (id, owner) が一致する行にしか触れない。
//!   他人のキャンペーンを変更させない唯一のゲートです
//! - `transition_expired_to_completed` は単一トランザクション（または同等）で実行し、
//!   既に completed の行は述語から外れるので何度呼んでも安全
//! - 同じ行への並行更新はストレージ層で直列化する（last-writer-wins は可、更新の消失は不可）

use async_trait::async_trait;

use crate::domain::{Campaign, CampaignId, CampaignPatch, NewCampaign, OwnerId, PatchError};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No row matches the id (or the id + owner pair).
    #[error("no matching campaign")]
    NotFound,

    #[error("campaign {0} already exists")]
    AlreadyExists(CampaignId),

    /// The merged row would break a campaign invariant.
    #[error(transparent)]
    Rejected(#[from] PatchError),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Persist a new row; the store assigns `created_at` / `updated_at`.
    async fn create(&self, campaign: NewCampaign) -> Result<Campaign, RepositoryError>;

    async fn get_by_id(&self, id: CampaignId) -> Result<Campaign, RepositoryError>;

    /// Zero rows is an empty vec, never an error.
    async fn get_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Campaign>, RepositoryError>;

    /// Apply only the provided fields and bump `updated_at`.
    async fn update_by_id_and_owner(
        &self,
        id: CampaignId,
        owner_id: OwnerId,
        patch: &CampaignPatch,
    ) -> Result<Campaign, RepositoryError>;

    /// Returns the former owner so the deletion can be announced.
    async fn delete_by_id(&self, id: CampaignId) -> Result<OwnerId, RepositoryError>;

    /// Atomically flip every `active` row whose deadline has passed to `completed`
    /// and return the flipped rows.
    async fn transition_expired_to_completed(&self) -> Result<Vec<Campaign>, RepositoryError>;
}
