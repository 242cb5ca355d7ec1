use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Longest username accepted at signup.
pub const USERNAME_MAX_LEN: usize = 150;

/// User entity - a registered account that can author posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public identity of a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for Author {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Check a username against the allowed alphabet: letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::Validation("Username is required".to_string()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "Username must be at most {USERNAME_MAX_LEN} characters"
        )));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(DomainError::Validation(
            "Username may contain only letters, digits and @/./+/-/_ characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_usernames() {
        assert!(validate_username("NoNameAuthor").is_ok());
        assert!(validate_username("leo.tolstoy+1@mail").is_ok());
        assert!(validate_username("лев_толстой").is_ok());
    }

    #[test]
    fn rejects_empty_and_spaced_usernames() {
        assert!(matches!(
            validate_username(""),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            validate_username("two words"),
            Err(DomainError::Validation(_))
        ));
        assert!(validate_username(&"a".repeat(USERNAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn author_projection_keeps_identity() {
        let user = User::new("reader".to_string(), "hash".to_string());
        let author = user.author();
        assert_eq!(author.id, user.id);
        assert_eq!(author.username, "reader");
    }
}
