//! Middleware modules.

pub mod auth;
pub mod error;

pub use auth::{OptionalIdentity, SESSION_COOKIE};
pub use error::{AppError, AppResult};
