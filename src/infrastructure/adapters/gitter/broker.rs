//! Gitter REST broker

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;

use super::models::{GitterRoom, GitterUser};
use crate::application::errors::BotError;
use crate::domain::entities::{Room, User};
use crate::domain::traits::Broker;

/// Gitter REST API base URL
pub const API_BASE: &str = "https://api.gitter.im";

/// Broker backed by the Gitter REST API
pub struct GitterBroker {
    token: String,
    api_base: String,
    client: Client,
}

impl GitterBroker {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, API_BASE)
    }

    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Get the API URL for a path
    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    async fn get(&self, path: &str) -> Result<Response, BotError> {
        let response = self.client
            .get(self.api_url(path))
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        check_status(response)
    }
}

fn check_status(response: Response) -> Result<Response, BotError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(BotError::Auth(format!("Gitter API rejected token: {}", status)));
    }
    if !status.is_success() {
        return Err(BotError::Network(format!("Gitter API error: {}", status)));
    }
    Ok(response)
}

#[async_trait]
impl Broker for GitterBroker {
    async fn get_current_user(&self) -> Result<User, BotError> {
        // `/v1/user` answers with a one-element array.
        let users: Vec<GitterUser> = self.get("user")
            .await?
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        users.into_iter()
            .next()
            .map(User::from)
            .ok_or_else(|| BotError::Auth("Gitter returned no current user".to_string()))
    }

    async fn get_rooms(&self) -> Result<Vec<Room>, BotError> {
        let rooms: Vec<GitterRoom> = self.get("rooms")
            .await?
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(rooms.into_iter().map(Room::from).collect())
    }

    async fn send_message(&self, room: &Room, text: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            text: &'a str,
        }

        let url = self.api_url(&format!("rooms/{}/chatMessages", room.id));
        let response = self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&SendMessageRequest { text })
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        check_status(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TOKEN: &str = "test_token_12345";

    fn broker(server: &mockito::ServerGuard) -> GitterBroker {
        GitterBroker::with_api_base(TOKEN, server.url())
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let broker = GitterBroker::with_api_base("token", "http://localhost:8080/");
        assert_eq!(broker.api_url("rooms"), "http://localhost:8080/v1/rooms");
        assert_eq!(GitterBroker::new("t").api_url("user"), "https://api.gitter.im/v1/user");
    }

    #[tokio::test]
    async fn test_current_user_is_first_array_entry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/user")
            .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "u0", "username": "dotbot", "displayName": "Dot Bot"}]"#)
            .create_async()
            .await;

        let user = broker(&server).get_current_user().await.unwrap();
        assert_eq!(user.id, "u0");
        assert_eq!(user.username, "dotbot");
        assert_eq!(user.display_name, "Dot Bot");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_user_list_is_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/user")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let result = broker(&server).get_current_user().await;
        assert!(matches!(result, Err(BotError::Auth(_))));
    }

    #[tokio::test]
    async fn test_rejected_token_is_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/user")
            .with_status(401)
            .create_async()
            .await;

        let result = broker(&server).get_current_user().await;
        assert!(matches!(result, Err(BotError::Auth(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/rooms")
            .with_status(502)
            .create_async()
            .await;

        let result = broker(&server).get_rooms().await;
        assert!(matches!(result, Err(BotError::Network(_))));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/rooms")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = broker(&server).get_rooms().await;
        assert!(matches!(result, Err(BotError::Parse(_))));
    }

    #[tokio::test]
    async fn test_rooms_keep_service_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/rooms")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "r2", "name": "two", "unread": 3}, {"id": "r1", "name": "one"}]"#)
            .create_async()
            .await;

        let rooms = broker(&server).get_rooms().await.unwrap();
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r2", "r1"]);
        assert_eq!(rooms[0].name, "two");
    }

    #[tokio::test]
    async fn test_send_message_posts_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/rooms/r1/chatMessages")
            .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
            .match_body(Matcher::Json(serde_json::json!({"text": "pong"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "m1", "text": "pong"}"#)
            .create_async()
            .await;

        broker(&server)
            .send_message(&Room::new("r1", "one"), "pong")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_failure_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/rooms/r1/chatMessages")
            .with_status(500)
            .create_async()
            .await;

        let result = broker(&server).send_message(&Room::new("r1", "one"), "pong").await;
        assert!(matches!(result, Err(BotError::Network(_))));
    }
}
