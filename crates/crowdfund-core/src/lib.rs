//! crowdfund-core
//!
//! Core building blocks for the fundraising campaign service.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, state, campaign, validation, errors, events）
//! - **ports**: 抽象化レイヤー（CampaignRepository, EventPublisher, Clock, IdGenerator）
//! - **wire**: RPC メッセージと Category/Status の序数 codec
//! - **impls**: 実装（InMemoryCampaignRepository, InMemoryEventBus など開発用）
//! - **app**: アプリケーションロジック（service, builder, completion_loop, config）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod wire;
