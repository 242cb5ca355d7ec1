use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Group};

/// Post entity - an authored text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    /// Set once at creation.
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    /// Stored media path, if an image is attached.
    pub image: Option<String>,
}

impl Post {
    /// Create a new post published now.
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            pub_date: Utc::now(),
            author_id,
            group_id,
            image: None,
        }
    }

    /// The first `limit` characters of the text, for logs and titles.
    pub fn preview(&self, limit: usize) -> &str {
        match self.text.char_indices().nth(limit) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

/// A post together with its author and group, as shown in feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: Author,
    pub group: Option<Group>,
}
