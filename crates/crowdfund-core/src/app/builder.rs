//! AppBuilder - サービスの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）：必須の port が欠けていたら build() で止める
//! - 任意の port（Clock, IdGenerator）は本番用のデフォルトを補う

use std::sync::Arc;

use crate::app::service::CampaignService;
use crate::ports::{CampaignRepository, Clock, EventPublisher, IdGenerator, SystemClock, UlidGenerator};

/// AppBuilder は CampaignService を構築
///
/// # 使用例
/// ```ignore
/// let service = AppBuilder::new()
///     .repository(repo)
///     .publisher(bus)
///     .build()?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    repository: Option<Arc<dyn CampaignRepository>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no campaign repository was configured")]
    MissingRepository,

    #[error("no event publisher was configured")]
    MissingPublisher,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repository(mut self, repository: Arc<dyn CampaignRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to a [`UlidGenerator`] driven by the configured clock.
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// # 検証
    /// - repository が無ければ BuildError::MissingRepository
    /// - publisher が無ければ BuildError::MissingPublisher
    pub fn build(self) -> Result<CampaignService, BuildError> {
        let repository = self.repository.ok_or(BuildError::MissingRepository)?;
        let publisher = self.publisher.ok_or(BuildError::MissingPublisher)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));
        Ok(CampaignService::new(repository, publisher, clock, ids))
    }
}
