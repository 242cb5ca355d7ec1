//! Signup and login.

use std::sync::Arc;

use crate::domain::{Principal, User, validate_username};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

pub const PASSWORD_MIN_LEN: usize = 8;

/// An issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub principal: Principal,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    fn session_for(&self, user: &User) -> Result<Session, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .map_err(internal)?;
        Ok(Session {
            token,
            principal: Principal::new(user.id, user.username.clone()),
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Register a new account and log it in.
    pub async fn signup(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let username = username.trim();
        validate_username(username)?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {PASSWORD_MIN_LEN} characters"
            )));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "A user with username {username:?} already exists"
            )));
        }

        let hash = self.passwords.hash(password).map_err(internal)?;
        let user = self
            .users
            .insert(User::new(username.to_string(), hash))
            .await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        self.session_for(&user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?;
        if !valid {
            tracing::debug!(username = %user.username, "Rejected login with wrong password");
            return Err(DomainError::Unauthorized);
        }

        self.session_for(&user)
    }
}
