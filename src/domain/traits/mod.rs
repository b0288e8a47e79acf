//! Domain traits - Abstractions for infrastructure implementations

pub mod adapter;
pub mod broker;
pub mod push;
pub mod queue;

pub use adapter::Adapter;
pub use broker::Broker;
pub use push::{MessageCallback, PushClient, RawMessage};
pub use queue::EventQueue;
