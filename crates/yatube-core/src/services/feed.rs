//! Read side: the global, group and author feeds and the post detail view.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Author, Group, Page, PageRequest, PostEntry};
use crate::error::DomainError;
use crate::ports::{GroupRepository, PostRepository, UserRepository};

/// A page of one group's posts.
#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<PostEntry>,
}

/// A page of one author's posts.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: Author,
    pub page: Page<PostEntry>,
}

impl ProfileFeed {
    pub fn post_count(&self) -> u64 {
        self.page.total
    }
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub entry: PostEntry,
    /// How many posts the author has written in total.
    pub author_post_count: u64,
}

/// Paginated, newest-first listings of posts.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    page_size: u64,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        page_size: u64,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    fn request(&self, raw_page: Option<&str>) -> PageRequest {
        PageRequest::parse(raw_page, self.page_size)
    }

    /// All posts.
    pub async fn index(&self, raw_page: Option<&str>) -> Result<Page<PostEntry>, DomainError> {
        let page = self.posts.list_all(self.request(raw_page)).await?;
        tracing::debug!(page = page.number, items = page.len(), "Loaded index feed");
        Ok(page)
    }

    /// Posts of the group with the given slug.
    pub async fn group_posts(
        &self,
        slug: &str,
        raw_page: Option<&str>,
    ) -> Result<GroupFeed, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))?;

        let page = self
            .posts
            .list_by_group(group.id, self.request(raw_page))
            .await?;
        tracing::debug!(slug, page = page.number, items = page.len(), "Loaded group feed");

        Ok(GroupFeed { group, page })
    }

    /// Posts written by the user with the given username.
    pub async fn profile(
        &self,
        username: &str,
        raw_page: Option<&str>,
    ) -> Result<ProfileFeed, DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?
            .author();

        let page = self
            .posts
            .list_by_author(author.id, self.request(raw_page))
            .await?;
        tracing::debug!(username, page = page.number, items = page.len(), "Loaded profile feed");

        Ok(ProfileFeed { author, page })
    }

    pub async fn post_detail(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let entry = self
            .posts
            .find_entry(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;
        let author_post_count = self.posts.count_by_author(entry.author.id).await?;

        Ok(PostDetail {
            entry,
            author_post_count,
        })
    }
}
