//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Shutdown: Cooperative cancellation
//! - Messaging: Directed-message parsing, relay queue

pub mod errors;
pub mod messaging;
pub mod shutdown;
