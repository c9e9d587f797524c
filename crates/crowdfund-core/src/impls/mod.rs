//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryCampaignRepository**: 開発用の正本
//! - **InMemoryEventBus**: 開発用のブローカークライアント
//!
//! 本番用の実装（SQL ストア、AMQP クライアント）は同じ trait を別クレートで実装します。

pub mod inmem_event_bus;
pub mod inmem_repository;

pub use self::inmem_event_bus::{
    BrokerConfig, BrokerError, DEFAULT_EXCHANGE, InMemoryEventBus, PublishedMessage,
};
pub use self::inmem_repository::InMemoryCampaignRepository;
