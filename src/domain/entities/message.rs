use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{Room, User};
use crate::application::errors::BotError;
use crate::domain::traits::Broker;

/// A normalized chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// `None` for system or unknown senders
    pub sender: Option<User>,
    /// Only set when the text used directed-message syntax
    pub addressee: Option<User>,
    pub text: String,
}

impl Message {
    pub fn new(sender: Option<User>, addressee: Option<User>, text: impl Into<String>) -> Self {
        Self {
            sender,
            addressee,
            text: text.into(),
        }
    }

    /// Whether the message was explicitly addressed to `user`
    pub fn is_addressed_to(&self, user: &User) -> bool {
        self.addressee
            .as_ref()
            .is_some_and(|a| a.username.eq_ignore_ascii_case(&user.username))
    }
}

/// An accepted inbound message, ready for the outbox
#[derive(Clone)]
pub struct MessageEvent {
    pub id: String,
    pub received_at: DateTime<Utc>,
    pub bot: User,
    pub room: Room,
    pub message: Message,
    pub broker: Arc<dyn Broker>,
}

impl MessageEvent {
    pub fn new(bot: User, room: Room, message: Message, broker: Arc<dyn Broker>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            received_at: Utc::now(),
            bot,
            room,
            message,
            broker,
        }
    }

    /// Answer in the room the message came from
    pub async fn reply(&self, text: &str) -> Result<(), BotError> {
        self.broker.send_message(&self.room, text).await
    }
}

impl fmt::Debug for MessageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEvent")
            .field("id", &self.id)
            .field("received_at", &self.received_at)
            .field("bot", &self.bot)
            .field("room", &self.room)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
