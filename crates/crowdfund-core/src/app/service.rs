//! CampaignService - キャンペーンの変更と通知のオーケストレーション
//!
//! # フロー（変更系）
//! 1. request を codec で正準モデルへ写像
//! 2. validator で検証（失敗したらストレージに触れない）
//! 3. repository で永続化（ここが source of truth）
//! 4. commit 成功後にだけイベントを EventDispatcher へ渡す（RPC は publish を待たない）
//!
//! サービス自体は呼び出しをまたぐ可変状態を持たないので、
//! 各 RPC は並行に実行できます。

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::app::event_dispatch::{DEFAULT_EVENT_BUFFER, EventDispatcher};
use crate::domain::{
    Campaign, CampaignError, CampaignEvent, CampaignId, CampaignStatus, OwnerId, PatchError,
    validate_for_create, validate_for_update,
};
use crate::ports::{CampaignRepository, Clock, EventPublisher, IdGenerator, RepositoryError};
use crate::wire::{
    CreateCampaignRequest, CreateCampaignResponse, DeleteCampaignRequest, DeleteCampaignResponse,
    GetCampaignByIdRequest, GetCampaignByIdResponse, GetCampaignsByOwnerRequest,
    GetCampaignsByOwnerResponse, UpdateCampaignRequest, UpdateCampaignResponse, campaign_view,
    new_campaign_from_request, patch_from_request,
};

/// Outcome of one scheduled completion run.
#[derive(Debug, Clone, Default)]
pub struct CompletionReport {
    /// Rows flipped from active to completed by this run.
    pub completed: Vec<Campaign>,
    /// Set when the repository call failed; the run changed nothing.
    pub error: Option<String>,
}

impl CompletionReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The campaign orchestrator.
pub struct CampaignService {
    repository: Arc<dyn CampaignRepository>,
    events: EventDispatcher,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl CampaignService {
    /// Spawns the event dispatcher, so this must run inside a Tokio runtime.
    pub fn new(
        repository: Arc<dyn CampaignRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self::with_event_buffer(repository, publisher, clock, ids, DEFAULT_EVENT_BUFFER)
    }

    pub fn with_event_buffer(
        repository: Arc<dyn CampaignRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        event_buffer: usize,
    ) -> Self {
        Self {
            repository,
            events: EventDispatcher::spawn(publisher, event_buffer),
            clock,
            ids,
        }
    }

    /// Wait until every event from mutations that already returned has been
    /// handed to the publisher. Used at shutdown.
    pub async fn flush_events(&self) {
        self.events.flush().await;
    }

    #[instrument(skip_all, fields(owner_id = req.owner_id))]
    pub async fn create_campaign(
        &self,
        req: CreateCampaignRequest,
    ) -> Result<CreateCampaignResponse, CampaignError> {
        let id = self.ids.generate_campaign_id();
        let candidate = new_campaign_from_request(id, &req)?;
        validate_for_create(&candidate, self.clock.now())?;

        let created = self
            .repository
            .create(candidate)
            .await
            .map_err(|e| from_repository(e, id))?;
        info!(campaign_id = %created.id, "campaign created");

        let response = CreateCampaignResponse {
            campaign: campaign_view(&created),
        };
        self.events.dispatch(CampaignEvent::Created(created));
        Ok(response)
    }

    pub async fn get_campaign_by_id(
        &self,
        req: GetCampaignByIdRequest,
    ) -> Result<GetCampaignByIdResponse, CampaignError> {
        let id = parse_campaign_id(&req.id)?;
        let campaign = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| from_repository(e, id))?;
        Ok(GetCampaignByIdResponse {
            campaign: campaign_view(&campaign),
        })
    }

    pub async fn get_campaigns_by_owner(
        &self,
        req: GetCampaignsByOwnerRequest,
    ) -> Result<GetCampaignsByOwnerResponse, CampaignError> {
        let campaigns = self
            .repository
            .get_by_owner(OwnerId::new(req.owner_id))
            .await
            .map_err(|e| CampaignError::Internal(e.to_string()))?;
        Ok(GetCampaignsByOwnerResponse {
            campaigns: campaigns.iter().map(campaign_view).collect(),
        })
    }

    /// Partial update scoped to (id, owner).
    ///
    /// Check order: id/owner presence, then manual completion, then field rules.
    #[instrument(skip_all, fields(campaign_id = %req.id, owner_id = req.owner_id))]
    pub async fn update_campaign_by_id(
        &self,
        req: UpdateCampaignRequest,
    ) -> Result<UpdateCampaignResponse, CampaignError> {
        let owner_id = OwnerId::new(req.owner_id);
        if req.id.is_empty() || !owner_id.is_present() {
            return Err(CampaignError::InvalidArgument(
                "a campaign id and a user id are both required".to_string(),
            ));
        }

        let patch = patch_from_request(&req)?;
        if patch.status == Some(CampaignStatus::Completed) {
            return Err(CampaignError::PermissionDenied(
                "status cannot be set to completed manually".to_string(),
            ));
        }
        validate_for_update(&patch, self.clock.now())?;

        let id = parse_campaign_id(&req.id)?;
        let updated = self
            .repository
            .update_by_id_and_owner(id, owner_id, &patch)
            .await
            .map_err(|e| from_repository(e, id))?;
        info!("campaign updated");

        let response = UpdateCampaignResponse {
            campaign: campaign_view(&updated),
        };
        self.events.dispatch(CampaignEvent::Updated(updated));
        Ok(response)
    }

    #[instrument(skip_all, fields(campaign_id = %req.id))]
    pub async fn delete_campaign_by_id(
        &self,
        req: DeleteCampaignRequest,
    ) -> Result<DeleteCampaignResponse, CampaignError> {
        let id = parse_campaign_id(&req.id)?;
        let owner_id = self
            .repository
            .delete_by_id(id)
            .await
            .map_err(|e| from_repository(e, id))?;
        info!(%owner_id, "campaign deleted");

        self.events.dispatch(CampaignEvent::Deleted { id, owner_id });
        Ok(DeleteCampaignResponse {
            id: id.to_string(),
            owner_id: owner_id.get(),
        })
    }

    /// Close every active campaign whose deadline has passed.
    ///
    /// Invoked by the scheduler, never by a caller: failures are logged and
    /// reported, not propagated.
    pub async fn complete_expired(&self) -> CompletionReport {
        match self.repository.transition_expired_to_completed().await {
            Ok(completed) => {
                for campaign in &completed {
                    info!(
                        campaign_id = %campaign.id,
                        status = %campaign.status,
                        "campaign transitioned"
                    );
                }
                info!(count = completed.len(), "scheduled completion finished");
                CompletionReport {
                    completed,
                    error: None,
                }
            }
            Err(err) => {
                error!(error = %err, "scheduled completion failed");
                CompletionReport {
                    completed: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Empty is a caller error; anything unparsable cannot match a row.
fn parse_campaign_id(raw: &str) -> Result<CampaignId, CampaignError> {
    if raw.is_empty() {
        return Err(CampaignError::InvalidArgument(
            "campaign id is required".to_string(),
        ));
    }
    raw.parse()
        .map_err(|_| CampaignError::NotFound(raw.to_string()))
}

fn from_repository(err: RepositoryError, id: CampaignId) -> CampaignError {
    match err {
        RepositoryError::NotFound => CampaignError::not_found(id),
        RepositoryError::Rejected(PatchError::Invalid(invalid)) => CampaignError::Validation(invalid),
        RepositoryError::Rejected(transition @ PatchError::InvalidTransition { .. }) => {
            CampaignError::PermissionDenied(transition.to_string())
        }
        other @ (RepositoryError::AlreadyExists(_) | RepositoryError::Backend(_)) => {
            CampaignError::Internal(other.to_string())
        }
    }
}
