//! Bridges a Gitter chat bot onto an in-process event bus.
//!
//! Push messages are normalized on the transport's callback thread, queued,
//! and forwarded to the outbox from the adapter's own task.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::errors::BotError;
pub use application::shutdown::{ShutdownHandle, ShutdownSignal};
pub use domain::entities::{Message, MessageEvent, Room, User};
pub use domain::traits::{Adapter, Broker, EventQueue, PushClient, RawMessage};
pub use infrastructure::adapters::gitter::{AdapterState, GitterAdapter};
