//! Relay queue - Hands events from transport threads to the dispatch loop

use tokio::sync::{mpsc, Mutex};

use crate::application::shutdown::ShutdownSignal;
use crate::domain::entities::MessageEvent;
use crate::domain::traits::EventQueue;

/// Unbounded FIFO between one producer (transport callbacks) and one consumer
/// (the adapter's relay loop).
pub struct RelayQueue {
    tx: mpsc::UnboundedSender<MessageEvent>,
    rx: Mutex<mpsc::UnboundedReceiver<MessageEvent>>,
}

impl RelayQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Append to the tail. Never blocks.
    pub fn enqueue(&self, event: MessageEvent) {
        // The receiver lives as long as `self`, so the send cannot fail.
        let _ = self.tx.send(event);
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once `shutdown` is observed while the queue is empty.
    /// A queued item is always handed out before the signal is checked.
    pub async fn dequeue(&self, shutdown: &ShutdownSignal) -> Option<MessageEvent> {
        let mut rx = self.rx.lock().await;

        if let Ok(event) = rx.try_recv() {
            return Some(event);
        }
        if shutdown.is_shutdown() {
            return None;
        }

        tokio::select! {
            biased;
            _ = shutdown.wait() => None,
            event = rx.recv() => event,
        }
    }

    /// Empty the queue without waiting, returning how many events were removed
    pub async fn discard_pending(&self) -> usize {
        let mut rx = self.rx.lock().await;
        let mut discarded = 0;
        while rx.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }
}

impl Default for RelayQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue for RelayQueue {
    fn enqueue(&self, event: MessageEvent) {
        RelayQueue::enqueue(self, event);
    }
}
