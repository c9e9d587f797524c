//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **CampaignService**: RPC 操作のオーケストレーション（検証 → 永続化 → 通知）
//! - **EventDispatcher**: commit 済みイベントをバックグラウンドで publish
//! - **AppBuilder**: サービスの構築とワイヤリング
//! - **CompletionLoop**: 期限切れキャンペーンの定期完了
//! - **AppConfig**: 環境変数からの設定

pub mod builder;
pub mod completion_loop;
pub mod config;
pub mod event_dispatch;
pub mod service;

// 主要な型を再エクスポート
pub use self::builder::{AppBuilder, BuildError};
pub use self::completion_loop::{CompletionLoop, Schedule};
pub use self::config::{AppConfig, ConfigError, LogFormat};
pub use self::event_dispatch::{DEFAULT_EVENT_BUFFER, EventDispatcher};
pub use self::service::{CampaignService, CompletionReport};
