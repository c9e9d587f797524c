//! EventDispatcher - commit 済みイベントのバックグラウンド配送
//!
//! # フロー
//! 1. orchestrator が commit 後に `dispatch()`（非ブロッキング、try_send）
//! 2. 単一のタスクが bounded mpsc から順に取り出して encode → publish
//! 3. encode / publish の失敗はタスク内でログに残すだけ
//!
//! ブローカーが遅くても止まっていても、呼び出し元の RPC は待ちません。
//! キューが満杯のときは取りこぼしを `warn!` で記録します。

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::domain::{CampaignError, CampaignEvent};
use crate::ports::EventPublisher;
use crate::wire::encode_event;

pub const DEFAULT_EVENT_BUFFER: usize = 1024;

enum Command {
    Publish(CampaignEvent),
    Flush(oneshot::Sender<()>),
}

/// Handle for the publishing task. Dropping it lets the task drain and exit.
pub struct EventDispatcher {
    tx: mpsc::Sender<Command>,
    _join: JoinHandle<()>,
}

impl EventDispatcher {
    /// Must be called from within a Tokio runtime.
    pub fn spawn(publisher: Arc<dyn EventPublisher>, buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let join = tokio::spawn(dispatch_loop(publisher, rx));
        Self { tx, _join: join }
    }

    /// Queue an event without waiting for the broker.
    pub fn dispatch(&self, event: CampaignEvent) {
        if let Err(err) = self.tx.try_send(Command::Publish(event)) {
            let (reason, event) = match err {
                mpsc::error::TrySendError::Full(Command::Publish(e)) => ("queue full", e),
                mpsc::error::TrySendError::Closed(Command::Publish(e)) => ("dispatcher stopped", e),
                _ => return,
            };
            warn!(
                campaign_id = %event.campaign_id(),
                routing_key = event.routing_key(),
                reason,
                "event dropped"
            );
        }
    }

    /// Wait until every event queued before this call has been handed to the publisher.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }
}

async fn dispatch_loop(publisher: Arc<dyn EventPublisher>, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Publish(event) => publish_one(publisher.as_ref(), event).await,
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

async fn publish_one(publisher: &dyn EventPublisher, event: CampaignEvent) {
    let routing_key = event.routing_key();
    let campaign_id = event.campaign_id();
    let payload = match encode_event(&event) {
        Ok(payload) => payload,
        Err(err) => {
            let err = CampaignError::Serialization(err.to_string());
            error!(%campaign_id, routing_key, error = %err, "event not published");
            return;
        }
    };
    if let Err(err) = publisher.publish(payload, routing_key).await {
        warn!(%campaign_id, routing_key, error = %err, "event publish failed");
    }
}
