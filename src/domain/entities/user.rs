use std::fmt;
use std::hash::{Hash, Hasher};

/// Represents a chat participant, either the bot itself or a remote user
///
/// Equality and hashing only look at the identifier.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: display_name.into(),
        }
    }

    /// Build a user from a bare mention token.
    ///
    /// No lookup happens: identifier, username and display name are all the token.
    pub fn from_mention(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            id: token.clone(),
            username: token.clone(),
            display_name: token,
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}", self.username)
        } else {
            write!(f, "{}", self.display_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_identifier_based() {
        let a = User::new("42", "alice", "Alice");
        let b = User::new("42", "alice_renamed", "Someone Else");
        assert_eq!(a, b);
        assert_ne!(a, User::new("43", "alice", "Alice"));
    }

    #[test]
    fn test_from_mention_fills_every_field() {
        let user = User::from_mention("bot");
        assert_eq!(user.id, "bot");
        assert_eq!(user.username, "bot");
        assert_eq!(user.display_name, "bot");
    }
}
