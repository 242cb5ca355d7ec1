//! # Yatube Shared
//!
//! Request and error types shared by the web handlers and views.

pub mod dto;
pub mod response;

pub use dto::{LoginForm, NextQuery, PageQuery, SignupForm};
pub use response::ErrorResponse;
