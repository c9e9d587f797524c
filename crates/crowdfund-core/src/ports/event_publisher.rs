//! EventPublisher port - ブローカーへの通知
//!
//! payload は不透明なバイト列で、routing key で購読者へ振り分けられます。
//! 配送は at-least-once を意図し、routing key 間の順序は保証しません。
//! 呼び出し側（orchestrator）はリトライしません。

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The client was closed at shutdown.
    #[error("publisher is closed")]
    Closed,

    #[error("publish to {routing_key:?} failed: {message}")]
    Failed { routing_key: String, message: String },
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, payload: Vec<u8>, routing_key: &str) -> Result<(), PublishError>;
}
