use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, Page, PageRequest, Post, PostEntry, User};
use crate::error::RepoError;

/// Generic repository trait for entities keyed by `ID`.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups, ordered by title.
    async fn list_all(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository. Listings are newest-first and paginated.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Persist new text and group for an existing post. Author and
    /// publication date are never written.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// A single post with its author and group.
    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, RepoError>;

    async fn list_all(&self, page: PageRequest) -> Result<Page<PostEntry>, RepoError>;

    async fn list_by_group(
        &self,
        group_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError>;

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}
