//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use yatube_core::domain::{Author, Group, Page, PageRequest, Post, PostEntry, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{GroupRepository, PostRepository, UserRepository};

use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::sea_orm_base::{SeaOrmRepository, repo_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = SeaOrmRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = SeaOrmRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = SeaOrmRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let groups = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .order_by_asc(group::Column::Slug)
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(groups.into_iter().map(Into::into).collect())
    }
}

impl PostgresPostRepository {
    /// Count matching posts, clamp the page, then fetch that slice newest-first.
    async fn page_where(
        &self,
        condition: Condition,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let total = PostEntity::find()
            .filter(condition.clone())
            .count(self.db.as_ref())
            .await
            .map_err(repo_error)?;
        let window = page.resolve(total);

        let models = PostEntity::find()
            .filter(condition)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(window.offset)
            .limit(window.limit)
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;
        tracing::debug!(
            total,
            page = window.number,
            rows = models.len(),
            "Fetched post page"
        );

        let entries = self.with_relations(models).await?;
        Ok(Page::new(entries, window, total))
    }

    /// Load authors and groups for a batch of posts in two queries.
    async fn with_relations(&self, models: Vec<post::Model>) -> Result<Vec<PostEntry>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let mut group_ids: Vec<Uuid> = models.iter().filter_map(|m| m.group_id).collect();
        group_ids.sort_unstable();
        group_ids.dedup();

        let authors: HashMap<Uuid, Author> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?
            .into_iter()
            .map(|u| (u.id, Author::from(User::from(u))))
            .collect();

        let groups: HashMap<Uuid, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            GroupEntity::find()
                .filter(group::Column::Id.is_in(group_ids))
                .all(self.db.as_ref())
                .await
                .map_err(repo_error)?
                .into_iter()
                .map(|g| (g.id, Group::from(g)))
                .collect()
        };

        Ok(models
            .into_iter()
            .filter_map(|model| {
                let author = authors.get(&model.author_id)?.clone();
                let group = model.group_id.and_then(|id| groups.get(&id).cloned());
                Some(PostEntry {
                    post: model.into(),
                    author,
                    group,
                })
            })
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let active = post::ActiveModel {
            id: Unchanged(post.id),
            text: Set(post.text),
            group_id: Set(post.group_id),
            ..Default::default()
        };

        let model = active.update(self.db.as_ref()).await.map_err(repo_error)?;
        Ok(model.into())
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?
        else {
            return Ok(None);
        };

        Ok(self.with_relations(vec![model]).await?.pop())
    }

    async fn list_all(&self, page: PageRequest) -> Result<Page<PostEntry>, RepoError> {
        self.page_where(Condition::all(), page).await
    }

    async fn list_by_group(
        &self,
        group_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let condition = Condition::all().add(post::Column::GroupId.eq(group_id));
        self.page_where(condition, page).await
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let condition = Condition::all().add(post::Column::AuthorId.eq(author_id));
        self.page_where(condition, page).await
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(self.db.as_ref())
            .await
            .map_err(repo_error)
    }
}
