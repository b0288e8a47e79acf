//! Domain layer - Core business objects and the seams to the outside world
//! 
//! This layer contains:
//! - Entities: Core business objects (User, Room, Message, MessageEvent)
//! - Traits: Abstractions for infrastructure (Broker, PushClient, EventQueue, Adapter)

pub mod entities;
pub mod traits;
