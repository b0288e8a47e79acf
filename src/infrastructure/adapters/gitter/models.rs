//! Gitter wire types

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Room, User};

/// Faye payload wrapper: what happened, and to which object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub operation: Option<String>,
    pub model: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_create(&self) -> bool {
        self.operation
            .as_deref()
            .is_some_and(|op| op.eq_ignore_ascii_case("create"))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitterUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
}

impl From<GitterUser> for User {
    fn from(user: GitterUser) -> Self {
        User::new(user.id, user.username, user.display_name)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitterMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub from_user: Option<GitterUser>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitterRoom {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl From<GitterRoom> for Room {
    fn from(room: GitterRoom) -> Self {
        Room::new(room.id, room.name)
    }
}
