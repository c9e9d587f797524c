//! InMemoryEventBus - 開発用のブローカークライアント
//!
//! # 学習ポイント
//! - グローバルな接続ハンドルではなく、起動時に一度だけ作る所有型クライアント
//! - connect → publish → close という明示的なライフサイクル
//! - 接続時の失敗は型付きエラー（BrokerError）で呼び出し元へ返す
//! - tokio::sync::broadcast による購読者へのファンアウト

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use crate::ports::{EventPublisher, PublishError};

pub const DEFAULT_EXCHANGE: &str = "campaign-events";
const DEFAULT_CAPACITY: usize = 1024;
const DEFAULT_HISTORY: usize = 256;

/// Connection settings for the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// Name of the direct exchange events are routed through.
    pub exchange: String,
    /// Per-subscriber buffer; slow subscribers lag rather than block publishers.
    pub capacity: usize,
    /// How many recent messages `published()` keeps; 0 keeps none.
    pub history: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            exchange: DEFAULT_EXCHANGE.to_string(),
            capacity: DEFAULT_CAPACITY,
            history: DEFAULT_HISTORY,
        }
    }
}

/// BrokerError は起動時（connect）のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("invalid exchange name {0:?}")]
    InvalidExchange(String),

    #[error("subscriber capacity must be greater than zero")]
    ZeroCapacity,
}

/// A message as it left the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub exchange: String,
    pub routing_key: String,
    pub payload: Vec<u8>,
}

/// InMemoryEventBus は direct exchange を模したインプロセスのブローカー
///
/// # 実装詳細
/// - 直近 `history` 件だけを記録するリングバッファ（古いものから捨てる）
/// - broadcast::Sender で購読者へ配送（購読者がいなくても publish は成功）
/// - close() 以降の publish は PublishError::Closed
pub struct InMemoryEventBus {
    exchange: String,
    sender: broadcast::Sender<PublishedMessage>,
    history: usize,
    published: Mutex<VecDeque<PublishedMessage>>,
    closed: AtomicBool,
}

impl InMemoryEventBus {
    /// Declare the exchange and open the client.
    pub fn connect(config: BrokerConfig) -> Result<Self, BrokerError> {
        let exchange = config.exchange.trim();
        if exchange.is_empty() || exchange.chars().any(char::is_whitespace) {
            return Err(BrokerError::InvalidExchange(config.exchange));
        }
        if config.capacity == 0 {
            return Err(BrokerError::ZeroCapacity);
        }
        let (sender, _) = broadcast::channel(config.capacity);
        debug!(exchange, "exchange declared");
        Ok(Self {
            exchange: exchange.to_string(),
            sender,
            history: config.history,
            published: Mutex::new(VecDeque::with_capacity(config.history.min(DEFAULT_HISTORY))),
            closed: AtomicBool::new(false),
        })
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Subscribe to every message published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedMessage> {
        self.sender.subscribe()
    }

    /// Snapshot of the most recent messages, oldest first.
    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().await.iter().cloned().collect()
    }

    pub async fn published_with_key(&self, routing_key: &str) -> Vec<PublishedMessage> {
        self.published
            .lock()
            .await
            .iter()
            .filter(|m| m.routing_key == routing_key)
            .cloned()
            .collect()
    }

    /// End the client lifecycle. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(exchange = %self.exchange, "event bus closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, payload: Vec<u8>, routing_key: &str) -> Result<(), PublishError> {
        if self.is_closed() {
            return Err(PublishError::Closed);
        }
        let message = PublishedMessage {
            exchange: self.exchange.clone(),
            routing_key: routing_key.to_string(),
            payload,
        };
        let bytes = message.payload.len();
        if self.history > 0 {
            let mut recent = self.published.lock().await;
            if recent.len() == self.history {
                recent.pop_front();
            }
            recent.push_back(message.clone());
        }
        // No subscribers is not an error: the exchange simply drops the message.
        let receivers = self.sender.send(message).unwrap_or(0);
        debug!(routing_key, bytes, receivers, "event published");
        Ok(())
    }
}
