//! Gitter adapter
//!
//! Bridges the Gitter Faye push feed into the bot's outbox. Transport
//! callbacks normalize and queue messages; `run` drains the queue so every
//! outbound enqueue happens on one task.

pub mod broker;
pub mod models;
pub mod normalizer;
pub mod subscriptions;

pub use broker::GitterBroker;
pub use normalizer::MessageNormalizer;
pub use subscriptions::SubscriptionManager;

use std::future::Future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::messaging::RelayQueue;
use crate::application::shutdown::ShutdownSignal;
use crate::domain::traits::{Adapter, Broker, EventQueue, PushClient};

/// Lifecycle of a single `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Disconnected,
    Connecting,
    Identifying,
    Subscribing,
    Relaying,
    Disconnecting,
}

/// Gitter bot adapter
pub struct GitterAdapter {
    broker: Arc<dyn Broker>,
    client: Arc<dyn PushClient>,
    inbox: Arc<RelayQueue>,
    outbox: Arc<dyn EventQueue>,
    subscriptions: SubscriptionManager,
    state: Mutex<AdapterState>,
}

impl GitterAdapter {
    /// `client` must already carry the Gitter token.
    pub fn new(
        broker: Arc<dyn Broker>,
        client: Arc<dyn PushClient>,
        outbox: Arc<dyn EventQueue>,
    ) -> Self {
        let inbox = Arc::new(RelayQueue::new());
        let normalizer = Arc::new(MessageNormalizer::new(
            Arc::clone(&broker),
            Arc::clone(&inbox),
        ));
        let subscriptions = SubscriptionManager::new(Arc::clone(&client), normalizer);

        Self {
            broker,
            client,
            inbox,
            outbox,
            subscriptions,
            state: Mutex::new(AdapterState::Disconnected),
        }
    }

    pub fn state(&self) -> AdapterState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: AdapterState) {
        tracing::debug!(?state, "Gitter adapter state");
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Connect, identify, subscribe. Returns early if shutdown comes first.
    async fn start(&self, shutdown: &ShutdownSignal) -> Result<(), BotError> {
        self.set_state(AdapterState::Connecting);
        self.client
            .connect()
            .map_err(|e| BotError::startup("connecting", e.into()))?;

        self.set_state(AdapterState::Identifying);
        let Some(user) = until_shutdown(shutdown, self.broker.get_current_user()).await else {
            return Ok(());
        };
        let user = user.map_err(|e| BotError::startup("identifying", e))?;
        tracing::info!("Current user is {}.", user.username);

        self.set_state(AdapterState::Subscribing);
        let Some(rooms) = until_shutdown(shutdown, self.broker.get_rooms()).await else {
            return Ok(());
        };
        let rooms = rooms.map_err(|e| BotError::startup("listing rooms", e))?;
        self.subscriptions
            .subscribe_all(&user, &rooms)
            .map_err(|e| BotError::startup("subscribing", e.into()))?;

        Ok(())
    }

    /// Forward queued events to the outbox until shutdown.
    async fn relay(&self, shutdown: &ShutdownSignal) {
        self.set_state(AdapterState::Relaying);
        while !shutdown.is_shutdown() {
            if let Some(event) = self.inbox.dequeue(shutdown).await {
                self.outbox.enqueue(event);
            }
        }

        let undelivered = self.inbox.discard_pending().await;
        if undelivered > 0 {
            tracing::warn!("Shutting down with {} undelivered message(s)", undelivered);
        }
    }
}

#[async_trait]
impl Adapter for GitterAdapter {
    fn friendly_name(&self) -> &str {
        "Gitter"
    }

    fn broker(&self) -> Arc<dyn Broker> {
        Arc::clone(&self.broker)
    }

    async fn run(&self, shutdown: ShutdownSignal) -> Result<bool, BotError> {
        let _connection = Connection { adapter: self };

        if let Err(e) = self.start(&shutdown).await {
            tracing::error!("Gitter adapter failed to start: {}", e);
            return Err(e);
        }
        self.relay(&shutdown).await;

        // The connection stays up until the host has really asked us to stop.
        shutdown.wait().await;

        // Never ask the host to stop the other adapters.
        Ok(true)
    }
}

/// Releases the push connection whichever way `run` exits
struct Connection<'a> {
    adapter: &'a GitterAdapter,
}

impl Drop for Connection<'_> {
    fn drop(&mut self) {
        self.adapter.set_state(AdapterState::Disconnecting);
        self.adapter.client.disconnect();
        self.adapter.set_state(AdapterState::Disconnected);
        tracing::info!("Disconnected from Gitter.");
    }
}

/// `None` if shutdown fired before `fut` completed
async fn until_shutdown<F: Future>(shutdown: &ShutdownSignal, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = shutdown.wait() => None,
        output = fut => Some(output),
    }
}
