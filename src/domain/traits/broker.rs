use async_trait::async_trait;
use crate::domain::entities::{Room, User};
use crate::application::errors::BotError;

/// Broker trait - request/response side of a chat service
#[async_trait]
pub trait Broker: Send + Sync {
    /// The user the bot is authenticated as
    async fn get_current_user(&self) -> Result<User, BotError>;

    /// Rooms the bot has joined, in the service's order
    async fn get_rooms(&self) -> Result<Vec<Room>, BotError>;

    /// Post a text message to a room
    async fn send_message(&self, room: &Room, text: &str) -> Result<(), BotError>;
}
