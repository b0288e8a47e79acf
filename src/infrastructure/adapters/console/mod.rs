//! Console transport for local development
//!
//! `ConsolePushClient` reads push messages as JSON lines
//! (`{"channel": "...", "data": {...}}`) and delivers them on its own reader
//! thread, the same way a Faye client would. `StaticBroker` serves a fixed
//! bot user and room list and prints replies.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::errors::{BotError, TransportError};
use crate::domain::entities::{Room, User};
use crate::domain::traits::{Broker, MessageCallback, PushClient, RawMessage};

/// Callbacks per channel, plus messages that arrived before anyone subscribed
#[derive(Default)]
struct Channels {
    subscribers: HashMap<String, Vec<MessageCallback>>,
    pending: HashMap<String, Vec<RawMessage>>,
}

type SharedChannels = Arc<Mutex<Channels>>;

/// Push client fed from a line-oriented reader
///
/// Lines for channels nobody has subscribed to yet are held back and
/// replayed, in order, to the first subscriber of that channel.
pub struct ConsolePushClient {
    input: Mutex<Option<Box<dyn BufRead + Send>>>,
    channels: SharedChannels,
    connected: Arc<AtomicBool>,
}

impl ConsolePushClient {
    pub fn new(input: impl BufRead + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Some(Box::new(input))),
            channels: Arc::new(Mutex::new(Channels::default())),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stdin() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()))
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Messages waiting for a subscriber
    pub fn pending(&self) -> usize {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.pending.values().map(Vec::len).sum()
    }
}

fn dispatch(channels: &SharedChannels, line: &str) {
    let raw: RawMessage = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Ignoring malformed console input: {}", e);
            return;
        }
    };

    // Callbacks run under the lock so replayed and live messages keep their order.
    let mut channels = channels.lock().unwrap_or_else(|e| e.into_inner());
    match channels.subscribers.get(&raw.channel) {
        Some(callbacks) => {
            for callback in callbacks {
                callback(raw.clone());
            }
        }
        None => {
            tracing::debug!("No subscriber for {} yet, holding message", raw.channel);
            channels.pending.entry(raw.channel.clone()).or_default().push(raw);
        }
    }
}

impl PushClient for ConsolePushClient {
    fn connect(&self) -> Result<(), TransportError> {
        let input = self.input
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or_else(|| TransportError::Connect("console input already consumed".to_string()))?;

        self.connected.store(true, Ordering::SeqCst);
        let channels = Arc::clone(&self.channels);
        let connected = Arc::clone(&self.connected);

        std::thread::Builder::new()
            .name("console-push".to_string())
            .spawn(move || {
                for line in input.lines() {
                    if !connected.load(Ordering::SeqCst) {
                        break;
                    }
                    match line {
                        Ok(line) if line.trim().is_empty() => {}
                        Ok(line) => dispatch(&channels, &line),
                        Err(e) => {
                            tracing::warn!("Console input closed: {}", e);
                            break;
                        }
                    }
                }
                tracing::debug!("Console reader stopped");
            })
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        tracing::info!("Console push client connected");
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);

        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        for (channel, messages) in &channels.pending {
            tracing::warn!(
                "Discarding {} console message(s) for {}: never subscribed",
                messages.len(),
                channel
            );
        }
    }

    fn subscribe(&self, channel: &str, callback: MessageCallback) -> Result<(), TransportError> {
        let mut channels = self.channels
            .lock()
            .map_err(|_| TransportError::Subscribe {
                channel: channel.to_string(),
                reason: "subscription table poisoned".to_string(),
            })?;

        if let Some(backlog) = channels.pending.remove(channel) {
            tracing::debug!("Replaying {} held message(s) on {}", backlog.len(), channel);
            for raw in backlog {
                callback(raw);
            }
        }
        channels.subscribers
            .entry(channel.to_string())
            .or_default()
            .push(callback);
        Ok(())
    }
}

/// Broker with a fixed identity and room list
pub struct StaticBroker {
    user: User,
    rooms: Vec<Room>,
}

impl StaticBroker {
    pub fn new(user: User, rooms: Vec<Room>) -> Self {
        Self { user, rooms }
    }
}

#[async_trait]
impl Broker for StaticBroker {
    async fn get_current_user(&self) -> Result<User, BotError> {
        Ok(self.user.clone())
    }

    async fn get_rooms(&self) -> Result<Vec<Room>, BotError> {
        Ok(self.rooms.clone())
    }

    async fn send_message(&self, room: &Room, text: &str) -> Result<(), BotError> {
        println!("[BOT -> {}] {}", room.name, text);
        Ok(())
    }
}
