//! Outbound event sink

use tokio::sync::mpsc;

use crate::domain::entities::MessageEvent;
use crate::domain::traits::EventQueue;

/// Logs every event and hands it to the downstream consumer, if any
pub struct ChannelOutbox {
    tx: Option<mpsc::UnboundedSender<MessageEvent>>,
}

impl ChannelOutbox {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MessageEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Outbox with no consumer; events are only logged
    pub fn logging_only() -> Self {
        Self { tx: None }
    }
}

impl EventQueue for ChannelOutbox {
    fn enqueue(&self, event: MessageEvent) {
        let sender = event.message.sender
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("<system>");
        tracing::info!("[{}] {}: {}", event.room.name, sender, event.message.text);

        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                tracing::warn!("Outbox consumer is gone, event dropped");
            }
        }
    }
}
