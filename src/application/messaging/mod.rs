//! Message handling - Inbound parsing and the relay hand-off

pub mod parser;
pub mod relay;

pub use parser::{parse, ParsedText};
pub use relay::RelayQueue;
