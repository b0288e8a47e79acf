//! One push subscription per room

use std::sync::Arc;

use crate::application::errors::TransportError;
use crate::domain::entities::{Room, User};
use crate::domain::traits::PushClient;

use super::normalizer::MessageNormalizer;

/// Registers room callbacks with the push client.
///
/// Rooms joined after startup are not picked up.
pub struct SubscriptionManager {
    client: Arc<dyn PushClient>,
    normalizer: Arc<MessageNormalizer>,
}

impl SubscriptionManager {
    pub fn new(client: Arc<dyn PushClient>, normalizer: Arc<MessageNormalizer>) -> Self {
        Self { client, normalizer }
    }

    /// Subscribe to every room's message channel, in the given order.
    ///
    /// Stops at the first transport failure.
    pub fn subscribe_all(&self, bot: &User, rooms: &[Room]) -> Result<usize, TransportError> {
        for room in rooms {
            let channel = room.messages_channel();
            let normalizer = Arc::clone(&self.normalizer);
            let bot = bot.clone();
            let bound = room.clone();

            self.client.subscribe(
                &channel,
                Box::new(move |raw| normalizer.receive(&bot, &bound, raw)),
            )?;
            tracing::info!("Subscribed to {} ({}).", room.name, room.id);
        }
        Ok(rooms.len())
    }
}
