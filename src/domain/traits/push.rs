use serde::{Deserialize, Serialize};
use crate::application::errors::TransportError;

/// A message delivered by the push transport, payload still undecoded
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawMessage {
    pub channel: String,
    pub data: serde_json::Value,
}

/// Subscription callback, invoked once per inbound message on a transport thread
pub type MessageCallback = Box<dyn Fn(RawMessage) + Send + Sync>;

/// PushClient trait - abstraction for publish/subscribe transports (Bayeux/Faye)
pub trait PushClient: Send + Sync {
    /// Start connecting; the handshake itself may finish asynchronously
    fn connect(&self) -> Result<(), TransportError>;

    /// Release the connection
    fn disconnect(&self);

    /// Register `callback` for every message published on `channel`
    fn subscribe(&self, channel: &str, callback: MessageCallback) -> Result<(), TransportError>;
}
