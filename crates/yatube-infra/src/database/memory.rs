//! In-memory store - used when no database is configured, and in tests.
//!
//! Enforces the same constraints as the relational schema: unique usernames
//! and slugs, and posts that reference an existing author and group.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Group, Page, PageRequest, Post, PostEntry, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, GroupRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    groups: HashMap<Uuid, Group>,
    posts: HashMap<Uuid, Post>,
}

impl Tables {
    fn entry(&self, post: &Post) -> Option<PostEntry> {
        let author = self.users.get(&post.author_id)?.author();
        let group = post.group_id.and_then(|id| self.groups.get(&id)).cloned();
        Some(PostEntry {
            post: post.clone(),
            author,
            group,
        })
    }

    fn page_where(&self, page: PageRequest, keep: impl Fn(&Post) -> bool) -> Page<PostEntry> {
        let mut posts: Vec<&Post> = self.posts.values().filter(|&p| keep(p)).collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| b.id.cmp(&a.id)));

        let rows = posts.into_iter().filter_map(|p| self.entry(p)).collect();
        Page::from_vec(rows, &page)
    }

    fn check_references(&self, post: &Post) -> Result<(), RepoError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }
        self.check_group(post.group_id)
    }

    fn check_group(&self, group_id: Option<Uuid>) -> Result<(), RepoError> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(RepoError::Constraint(format!(
                "group {id} does not exist"
            ))),
            _ => Ok(()),
        }
    }
}

/// Shared in-memory tables backing the three repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: self.clone(),
        }
    }

    pub fn groups(&self) -> InMemoryGroupRepository {
        InMemoryGroupRepository {
            store: self.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: self.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

pub struct InMemoryGroupRepository {
    store: InMemoryStore,
}

pub struct InMemoryPostRepository {
    store: InMemoryStore,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username {:?} is taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.store.tables.read().await.groups.get(&id).cloned())
    }

    async fn insert(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Constraint(format!(
                "slug {:?} is taken",
                group.slug
            )));
        }
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.slug.cmp(&b.slug)));
        Ok(groups)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_references(&post)?;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("post {} exists", post.id)));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_group(post.group_id)?;
        let stored = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        stored.text = post.text;
        stored.group_id = post.group_id;
        Ok(stored.clone())
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).and_then(|p| tables.entry(p)))
    }

    async fn list_all(&self, page: PageRequest) -> Result<Page<PostEntry>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.page_where(page, |_| true))
    }

    async fn list_by_group(
        &self,
        group_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.page_where(page, |p| p.group_id == Some(group_id)))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.page_where(page, |p| p.author_id == author_id))
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;

    async fn seed_user(store: &InMemoryStore, username: &str) -> User {
        store
            .users()
            .insert(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn usernames_and_slugs_are_unique() {
        let store = InMemoryStore::new();
        seed_user(&store, "leo").await;
        let dup = store
            .users()
            .insert(User::new("leo".to_string(), "hash".to_string()))
            .await;
        assert!(matches!(dup, Err(RepoError::Constraint(_))));

        let groups = store.groups();
        groups
            .insert(Group::new("A", "test-slug", "").unwrap())
            .await
            .unwrap();
        let dup = groups.insert(Group::new("B", "test-slug", "").unwrap()).await;
        assert!(matches!(dup, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn posts_require_existing_author_and_group() {
        let store = InMemoryStore::new();
        let orphan = Post::new(Uuid::new_v4(), "text".to_string(), None);
        assert!(store.posts().insert(orphan).await.is_err());

        let user = seed_user(&store, "leo").await;
        let dangling = Post::new(user.id, "text".to_string(), Some(Uuid::new_v4()));
        assert!(store.posts().insert(dangling).await.is_err());
    }

    #[tokio::test]
    async fn listings_are_newest_first() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "leo").await;
        let posts = store.posts();

        let base = Utc::now();
        for minutes in [5, 1, 3] {
            let mut post = Post::new(user.id, format!("post {minutes}"), None);
            post.pub_date = base - TimeDelta::minutes(minutes);
            posts.insert(post).await.unwrap();
        }

        let page = posts.list_all(PageRequest::first(10)).await.unwrap();
        let texts: Vec<_> = page.items.iter().map(|e| e.post.text.as_str()).collect();
        assert_eq!(texts, ["post 1", "post 3", "post 5"]);
        assert_eq!(page.items[0].author.username, "leo");
    }

    #[tokio::test]
    async fn update_only_touches_text_and_group() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "leo").await;
        let other = seed_user(&store, "fyodor").await;
        let group = store
            .groups()
            .insert(Group::new("G", "g", "").unwrap())
            .await
            .unwrap();
        let posts = store.posts();
        let original = posts
            .insert(Post::new(author.id, "before".to_string(), None))
            .await
            .unwrap();

        let mut changed = original.clone();
        changed.text = "after".to_string();
        changed.group_id = Some(group.id);
        changed.author_id = other.id;
        changed.pub_date = original.pub_date + TimeDelta::days(1);
        let saved = posts.update(changed).await.unwrap();

        assert_eq!(saved.text, "after");
        assert_eq!(saved.group_id, Some(group.id));
        assert_eq!(saved.author_id, author.id);
        assert_eq!(saved.pub_date, original.pub_date);
    }

    #[tokio::test]
    async fn updating_missing_post_is_not_found() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "leo").await;
        let ghost = Post::new(user.id, "ghost".to_string(), None);
        assert!(matches!(
            store.posts().update(ghost).await,
            Err(RepoError::NotFound)
        ));
    }
}
