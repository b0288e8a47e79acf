//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Chat backend integrations (Gitter, console)
//! - Outbox: Outbound event sink

pub mod config;
pub mod adapters;
pub mod outbox;
