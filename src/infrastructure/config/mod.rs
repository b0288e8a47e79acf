//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::{Room, User};
use crate::infrastructure::adapters::gitter::broker::API_BASE;

/// Bridge configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub gitter: GitterConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitterConfig {
    pub token: Option<String>,
    pub api_url: String,
}

/// Development mode: identity and rooms come from here instead of Gitter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub user: ConsoleUserConfig,
    pub rooms: Vec<ConsoleRoomConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleUserConfig {
    pub id: String,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleRoomConfig {
    pub id: String,
    pub name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "gitter-bridge".to_string(),
            },
            gitter: GitterConfig {
                token: None,
                api_url: API_BASE.to_string(),
            },
            console: ConsoleConfig {
                enabled: true,
                user: ConsoleUserConfig {
                    id: "console".to_string(),
                    username: "bot".to_string(),
                    display_name: "Console Bot".to_string(),
                },
                rooms: vec![ConsoleRoomConfig {
                    id: "dev".to_string(),
                    name: "dev".to_string(),
                }],
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables win over file values
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("GITTER_TOKEN") {
            self.gitter.token = Some(token);
            self.console.enabled = false;
        }

        if let Ok(url) = std::env::var("GITTER_API_URL") {
            self.gitter.api_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.console.enabled {
            if self.console.user.id.is_empty() {
                return Err(ConfigError::MissingField("console.user.id".to_string()));
            }
            return Ok(());
        }

        match self.gitter.token.as_deref() {
            None | Some("") => Err(ConfigError::MissingField("gitter.token".to_string())),
            Some(_) if self.gitter.api_url.is_empty() => {
                Err(ConfigError::InvalidValue("gitter.api-url is empty".to_string()))
            }
            Some(_) => Ok(()),
        }
    }

    pub fn console_user(&self) -> User {
        let user = &self.console.user;
        User::new(&user.id, &user.username, &user.display_name)
    }

    pub fn console_rooms(&self) -> Vec<Room> {
        self.console.rooms
            .iter()
            .map(|r| Room::new(&r.id, &r.name))
            .collect()
    }
}
