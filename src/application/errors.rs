//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Startup failed while {stage}: {source}")]
    Startup {
        stage: &'static str,
        #[source]
        source: Box<BotError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    pub fn startup(stage: &'static str, source: BotError) -> Self {
        BotError::Startup {
            stage,
            source: Box::new(source),
        }
    }
}

/// Push transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Subscribe to {channel} failed: {reason}")]
    Subscribe { channel: String, reason: String },
}

/// Errors decoding a single inbound envelope
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),

    #[error("Envelope has no model")]
    MissingModel,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
