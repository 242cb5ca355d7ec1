use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Longest group title.
pub const GROUP_TITLE_MAX_LEN: usize = 200;

/// Group entity - a topic that posts may optionally belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    /// Unique URL-safe identifier.
    pub slug: String,
    pub description: String,
}

impl Group {
    /// Create a new group, validating the title and slug.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let slug = slug.into();

        if title.trim().is_empty() {
            return Err(DomainError::Validation("Group title is required".to_string()));
        }
        if title.chars().count() > GROUP_TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Group title must be at most {GROUP_TITLE_MAX_LEN} characters"
            )));
        }
        if !is_valid_slug(&slug) {
            return Err(DomainError::Validation(format!("Invalid slug: {slug:?}")));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description: description.into(),
        })
    }
}

/// A slug consists of ASCII letters, digits, hyphens and underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
