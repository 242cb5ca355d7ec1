//! Write side: creating and editing posts.
//!
//! Every call receives the current principal explicitly. The outcome tells
//! the caller whether to send the user to the login page, back to the post,
//! to a (re-)rendered form, or on to the saved post.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Group, Post, Principal};
use crate::error::DomainError;
use crate::forms::{FieldErrors, PostFormInput, validate_post};
use crate::ports::{GroupRepository, PostRepository};

/// Everything needed to render the post form.
#[derive(Debug, Clone)]
pub struct PostForm {
    pub input: PostFormInput,
    pub errors: FieldErrors,
    /// Selectable groups.
    pub groups: Vec<Group>,
    /// The post being edited, `None` when creating.
    pub editing: Option<Uuid>,
}

impl PostForm {
    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum WriteOutcome {
    /// Anonymous caller.
    LoginRequired,
    /// Authenticated, but not the post's author.
    NotAuthor { post_id: Uuid },
    Form(PostForm),
    Saved(Post),
}

#[derive(Clone)]
pub struct PostAuthoring {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    preview_chars: usize,
}

impl PostAuthoring {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        preview_chars: usize,
    ) -> Self {
        Self {
            posts,
            groups,
            preview_chars,
        }
    }

    async fn form(
        &self,
        input: PostFormInput,
        errors: FieldErrors,
        editing: Option<Uuid>,
    ) -> Result<WriteOutcome, DomainError> {
        let groups = self.groups.list_all().await?;
        Ok(WriteOutcome::Form(PostForm {
            input,
            errors,
            groups,
            editing,
        }))
    }

    pub async fn create_form(
        &self,
        principal: Option<&Principal>,
    ) -> Result<WriteOutcome, DomainError> {
        if principal.is_none() {
            return Ok(WriteOutcome::LoginRequired);
        }
        self.form(PostFormInput::default(), FieldErrors::default(), None)
            .await
    }

    pub async fn create(
        &self,
        principal: Option<&Principal>,
        input: PostFormInput,
    ) -> Result<WriteOutcome, DomainError> {
        let Some(principal) = principal else {
            return Ok(WriteOutcome::LoginRequired);
        };

        let groups = self.groups.list_all().await?;
        let draft = match validate_post(&input, &groups) {
            Ok(draft) => draft,
            Err(errors) => {
                return Ok(WriteOutcome::Form(PostForm {
                    input,
                    errors,
                    groups,
                    editing: None,
                }));
            }
        };

        let post = Post::new(principal.user_id, draft.text, draft.group_id);
        let saved = self.posts.insert(post).await?;
        tracing::info!(
            post_id = %saved.id,
            author = %principal.username,
            preview = saved.preview(self.preview_chars),
            "Post created"
        );

        Ok(WriteOutcome::Saved(saved))
    }

    /// Look up the post before anything else: an unknown id is not found
    /// whoever is asking.
    async fn editable(
        &self,
        principal: Option<&Principal>,
        post_id: Uuid,
    ) -> Result<Result<Post, WriteOutcome>, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        Ok(match principal {
            None => Err(WriteOutcome::LoginRequired),
            Some(p) if !p.is_author_of(post.author_id) => {
                tracing::debug!(%post_id, user = %p.username, "Edit refused for non-author");
                Err(WriteOutcome::NotAuthor { post_id })
            }
            Some(_) => Ok(post),
        })
    }

    pub async fn edit_form(
        &self,
        principal: Option<&Principal>,
        post_id: Uuid,
    ) -> Result<WriteOutcome, DomainError> {
        let post = match self.editable(principal, post_id).await? {
            Ok(post) => post,
            Err(outcome) => return Ok(outcome),
        };

        let input = PostFormInput::new(post.text, post.group_id);
        self.form(input, FieldErrors::default(), Some(post_id))
            .await
    }

    pub async fn edit(
        &self,
        principal: Option<&Principal>,
        post_id: Uuid,
        input: PostFormInput,
    ) -> Result<WriteOutcome, DomainError> {
        let mut post = match self.editable(principal, post_id).await? {
            Ok(post) => post,
            Err(outcome) => return Ok(outcome),
        };

        let groups = self.groups.list_all().await?;
        let draft = match validate_post(&input, &groups) {
            Ok(draft) => draft,
            Err(errors) => {
                return Ok(WriteOutcome::Form(PostForm {
                    input,
                    errors,
                    groups,
                    editing: Some(post_id),
                }));
            }
        };

        post.text = draft.text;
        post.group_id = draft.group_id;
        let saved = self.posts.update(post).await?;
        tracing::info!(
            post_id = %saved.id,
            preview = saved.preview(self.preview_chars),
            "Post updated"
        );

        Ok(WriteOutcome::Saved(saved))
    }
}
