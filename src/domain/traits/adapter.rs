use std::sync::Arc;

use async_trait::async_trait;

use super::Broker;
use crate::application::errors::BotError;
use crate::application::shutdown::ShutdownSignal;

/// Adapter trait - a chat backend hosted as a long-running worker
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Human readable backend name
    fn friendly_name(&self) -> &str;

    /// Broker this adapter is bound to
    fn broker(&self) -> Arc<dyn Broker>;

    /// Run until `shutdown` fires.
    ///
    /// Returns whether the host should keep its other workers running.
    async fn run(&self, shutdown: ShutdownSignal) -> Result<bool, BotError>;
}
