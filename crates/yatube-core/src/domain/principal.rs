use uuid::Uuid;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
}

impl Principal {
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }

    /// Whether this caller wrote the post owned by `author_id`.
    pub fn is_author_of(&self, author_id: Uuid) -> bool {
        self.user_id == author_id
    }
}
