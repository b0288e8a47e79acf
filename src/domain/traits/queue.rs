use crate::domain::entities::MessageEvent;

/// Outbound sink for normalized events. Fire-and-forget.
pub trait EventQueue: Send + Sync {
    fn enqueue(&self, event: MessageEvent);
}
