//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（データベース、メッセージブローカー）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ストレージが source of truth（正本）
//! - ブローカーへの通知は commit 後の best-effort

pub mod campaign_repository;
pub mod clock;
pub mod event_publisher;
pub mod id_generator;

pub use self::campaign_repository::{CampaignRepository, RepositoryError};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_publisher::{EventPublisher, PublishError};
pub use self::id_generator::{IdGenerator, UlidGenerator};
