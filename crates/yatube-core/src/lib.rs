//! # Yatube Core
//!
//! The domain layer of the Yatube blog: posts, groups, authors, pagination,
//! form validation and the read/write services.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
