//! Turns raw Faye envelopes into `MessageEvent`s

use std::sync::Arc;

use crate::application::errors::DecodeError;
use crate::application::messaging::{parser, RelayQueue};
use crate::domain::entities::{Message, MessageEvent, Room, User};
use crate::domain::traits::{Broker, RawMessage};

use super::models::{Envelope, GitterMessage};

/// Producer side of the relay: runs on the transport's callback thread
pub struct MessageNormalizer {
    broker: Arc<dyn Broker>,
    queue: Arc<RelayQueue>,
}

impl MessageNormalizer {
    pub fn new(broker: Arc<dyn Broker>, queue: Arc<RelayQueue>) -> Self {
        Self { broker, queue }
    }

    /// Normalize `raw` and enqueue the result.
    ///
    /// Decode failures only cost this one message.
    pub fn receive(&self, bot: &User, room: &Room, raw: RawMessage) {
        match self.normalize(bot, room, &raw) {
            Ok(Some(event)) => {
                tracing::debug!("[{}] queued message {}", room.name, event.id);
                self.queue.enqueue(event);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("[{}] dropping message on {}: {}", room.name, raw.channel, e);
            }
        }
    }

    /// Produce at most one event from a raw push message.
    ///
    /// Non-create operations and the bot's own messages yield `Ok(None)`.
    pub fn normalize(
        &self,
        bot: &User,
        room: &Room,
        raw: &RawMessage,
    ) -> Result<Option<MessageEvent>, DecodeError> {
        let envelope: Envelope<serde_json::Value> = serde_json::from_value(raw.data.clone())?;
        if !envelope.is_create() {
            tracing::trace!("[{}] ignoring operation {:?}", room.name, envelope.operation);
            return Ok(None);
        }

        let model = envelope.model.ok_or(DecodeError::MissingModel)?;
        let model: GitterMessage = serde_json::from_value(model)?;

        let sender = model.from_user.map(User::from);
        if sender.as_ref().is_some_and(|s| s.id == bot.id) {
            return Ok(None);
        }

        let parsed = parser::parse(&model.text);
        let addressee = parsed.addressee.map(User::from_mention);
        let message = Message::new(sender, addressee, parsed.body);

        Ok(Some(MessageEvent::new(
            bot.clone(),
            room.clone(),
            message,
            Arc::clone(&self.broker),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    use crate::application::errors::BotError;
    use crate::application::shutdown;

    struct NullBroker;

    #[async_trait]
    impl Broker for NullBroker {
        async fn get_current_user(&self) -> Result<User, BotError> {
            Ok(bot())
        }

        async fn get_rooms(&self) -> Result<Vec<Room>, BotError> {
            Ok(Vec::new())
        }

        async fn send_message(&self, _room: &Room, _text: &str) -> Result<(), BotError> {
            Ok(())
        }
    }

    fn bot() -> User {
        User::new("u0", "bot", "The Bot")
    }

    fn room() -> Room {
        Room::new("r1", "dotbot/dev")
    }

    fn normalizer() -> (MessageNormalizer, Arc<RelayQueue>) {
        let queue = Arc::new(RelayQueue::new());
        (MessageNormalizer::new(Arc::new(NullBroker), Arc::clone(&queue)), queue)
    }

    fn raw(data: serde_json::Value) -> RawMessage {
        RawMessage {
            channel: room().messages_channel(),
            data,
        }
    }

    fn chat(operation: Option<&str>, sender_id: &str, text: &str) -> RawMessage {
        let mut data = json!({
            "model": {
                "id": "m1",
                "text": text,
                "fromUser": {"id": sender_id, "username": "alice", "displayName": "Alice"}
            }
        });
        if let Some(op) = operation {
            data["operation"] = json!(op);
        }
        raw(data)
    }

    #[test]
    fn test_directed_create_message() {
        let (normalizer, _) = normalizer();
        let event = normalizer
            .normalize(&bot(), &room(), &chat(Some("create"), "u1", "@bot do X"))
            .unwrap()
            .expect("event produced");

        let sender = event.message.sender.as_ref().unwrap();
        assert_eq!(sender.id, "u1");
        assert_eq!(sender.username, "alice");
        assert_eq!(event.message.addressee.as_ref().unwrap().username, "bot");
        assert_eq!(event.message.text, "do X");
        assert_eq!(event.bot, bot());
        assert_eq!(event.room, room());
    }

    #[test]
    fn test_non_create_operations_are_discarded() {
        let (normalizer, _) = normalizer();
        for op in [None, Some("update"), Some("remove"), Some("patch"), Some("")] {
            let result = normalizer.normalize(&bot(), &room(), &chat(op, "u1", "hello")).unwrap();
            assert!(result.is_none(), "operation {:?}", op);
        }
        let upper = normalizer
            .normalize(&bot(), &room(), &chat(Some("Create"), "u1", "hello"))
            .unwrap();
        assert!(upper.is_some());
    }

    #[test]
    fn test_own_messages_are_discarded() {
        let (normalizer, _) = normalizer();
        for text in ["hello", "@bot do X", "@alice hi", ""] {
            let result = normalizer
                .normalize(&bot(), &room(), &chat(Some("create"), "u0", text))
                .unwrap();
            assert!(result.is_none(), "text {:?}", text);
        }
    }

    #[test]
    fn test_missing_sender_is_system_message() {
        let (normalizer, _) = normalizer();
        let event = normalizer
            .normalize(
                &bot(),
                &room(),
                &raw(json!({"operation": "create", "model": {"text": "room renamed"}})),
            )
            .unwrap()
            .unwrap();
        assert!(event.message.sender.is_none());
        assert!(event.message.addressee.is_none());
        assert_eq!(event.message.text, "room renamed");
    }

    #[test]
    fn test_malformed_envelopes_are_errors() {
        let (normalizer, _) = normalizer();
        let missing = normalizer.normalize(&bot(), &room(), &raw(json!({"operation": "create"})));
        assert!(matches!(missing, Err(DecodeError::MissingModel)));

        let not_object = normalizer.normalize(&bot(), &room(), &raw(json!("create")));
        assert!(matches!(not_object, Err(DecodeError::InvalidEnvelope(_))));

        let bad_model = normalizer.normalize(
            &bot(),
            &room(),
            &raw(json!({"operation": "create", "model": {"text": 42}})),
        );
        assert!(matches!(bad_model, Err(DecodeError::InvalidEnvelope(_))));
    }

    #[tokio::test]
    async fn test_receive_enqueues_accepted_and_drops_the_rest() {
        let (normalizer, queue) = normalizer();
        normalizer.receive(&bot(), &room(), raw(json!({"operation": "create"})));
        normalizer.receive(&bot(), &room(), chat(Some("update"), "u1", "edited"));
        normalizer.receive(&bot(), &room(), chat(Some("create"), "u0", "echo"));
        normalizer.receive(&bot(), &room(), chat(Some("create"), "u1", "first"));
        normalizer.receive(&bot(), &room(), chat(Some("create"), "u2", "second"));

        let (handle, signal) = shutdown::channel();
        handle.shutdown();
        assert_eq!(queue.dequeue(&signal).await.unwrap().message.text, "first");
        assert_eq!(queue.dequeue(&signal).await.unwrap().message.text, "second");
        assert!(queue.dequeue(&signal).await.is_none());
    }
}
