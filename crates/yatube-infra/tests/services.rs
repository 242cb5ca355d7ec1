//! Feed, authoring and account services running on the in-memory store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use yatube_core::DomainError;
use yatube_core::domain::{Group, Post, Principal, User};
use yatube_core::forms::{PostFormInput, REQUIRED_MESSAGE};
use yatube_core::ports::{BaseRepository, PostRepository, TokenService};
use yatube_core::services::{AccountService, FeedService, PostAuthoring, WriteOutcome};
use yatube_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

const PAGE_SIZE: u64 = 10;

struct Fixture {
    store: InMemoryStore,
    feeds: FeedService,
    authoring: PostAuthoring,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let feeds = FeedService::new(
            Arc::new(store.posts()),
            Arc::new(store.groups()),
            Arc::new(store.users()),
            PAGE_SIZE,
        );
        let authoring = PostAuthoring::new(Arc::new(store.posts()), Arc::new(store.groups()), 15);
        Self {
            store,
            feeds,
            authoring,
        }
    }

    async fn user(&self, username: &str) -> Principal {
        let user = self
            .store
            .users()
            .insert(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap();
        Principal::new(user.id, user.username)
    }

    async fn group(&self, slug: &str) -> Group {
        self.store
            .groups()
            .insert(Group::new(format!("Group {slug}"), slug, "description").unwrap())
            .await
            .unwrap()
    }

    async fn post(&self, author: &Principal, text: &str, group: Option<&Group>) -> Post {
        self.store
            .posts()
            .insert(Post::new(
                author.user_id,
                text.to_string(),
                group.map(|g| g.id),
            ))
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn thirteen_posts_paginate_ten_and_three_on_every_feed() {
    let fx = Fixture::new();
    let author = fx.user("NoNameAuthor").await;
    let group = fx.group("test-slug").await;
    for _ in 0..13 {
        fx.post(&author, "Тестовый пост", Some(&group)).await;
    }

    let index1 = fx.feeds.index(None).await.unwrap();
    let index2 = fx.feeds.index(Some("2")).await.unwrap();
    assert_eq!((index1.len(), index2.len()), (10, 3));

    let group1 = fx.feeds.group_posts("test-slug", None).await.unwrap();
    let group2 = fx.feeds.group_posts("test-slug", Some("2")).await.unwrap();
    assert_eq!((group1.page.len(), group2.page.len()), (10, 3));
    assert_eq!(group1.group.slug, "test-slug");

    let profile1 = fx.feeds.profile("NoNameAuthor", None).await.unwrap();
    let profile2 = fx.feeds.profile("NoNameAuthor", Some("2")).await.unwrap();
    assert_eq!((profile1.page.len(), profile2.page.len()), (10, 3));
    assert_eq!(profile1.author.username, "NoNameAuthor");
    assert_eq!(profile1.post_count(), 13);
}

#[tokio::test]
async fn grouped_post_shows_only_in_its_group() {
    let fx = Fixture::new();
    let author = fx.user("NoNameAuthor2").await;
    let first = fx.group("test-slug").await;
    let second = fx.group("test-slug2").await;
    let post = fx.post(&author, "Тестовый текст поста", Some(&second)).await;

    let index = fx.feeds.index(None).await.unwrap();
    let newest = &index.items[0];
    assert_eq!(newest.post.id, post.id);
    assert_eq!(newest.author.username, "NoNameAuthor2");
    assert_eq!(newest.group.as_ref().unwrap().slug, "test-slug2");

    let in_second = fx.feeds.group_posts(&second.slug, None).await.unwrap();
    assert_eq!(in_second.page.items[0].post.id, post.id);

    let in_first = fx.feeds.group_posts(&first.slug, None).await.unwrap();
    assert!(in_first.page.is_empty());
}

#[tokio::test]
async fn ungrouped_post_shows_in_index_and_profile_only() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    let group = fx.group("test-slug").await;
    let post = fx.post(&author, "no group", None).await;

    assert_eq!(fx.feeds.index(None).await.unwrap().items[0].post.id, post.id);
    assert_eq!(
        fx.feeds.profile("leo", None).await.unwrap().page.items[0].post.id,
        post.id
    );
    assert!(
        fx.feeds
            .group_posts(&group.slug, None)
            .await
            .unwrap()
            .page
            .is_empty()
    );
}

#[tokio::test]
async fn feeds_are_newest_first() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    let posts = fx.store.posts();
    let now = Utc::now();
    for (text, age) in [("old", 10), ("new", 1), ("middle", 5)] {
        let mut post = Post::new(author.user_id, text.to_string(), None);
        post.pub_date = now - TimeDelta::hours(age);
        posts.insert(post).await.unwrap();
    }

    let page = fx.feeds.index(None).await.unwrap();
    let texts: Vec<_> = page.items.iter().map(|e| e.post.text.as_str()).collect();
    assert_eq!(texts, ["new", "middle", "old"]);
}

#[tokio::test]
async fn unknown_identifiers_are_not_found() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;

    assert!(matches!(
        fx.feeds.group_posts("nope", None).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.feeds.profile("nobody", None).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.feeds.post_detail(Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));
    for principal in [None, Some(&author)] {
        assert!(matches!(
            fx.authoring.edit_form(principal, Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}

#[tokio::test]
async fn detail_reports_author_post_count() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    let post = fx.post(&author, "one", None).await;
    fx.post(&author, "two", None).await;

    let detail = fx.feeds.post_detail(post.id).await.unwrap();
    assert_eq!(detail.entry.post.id, post.id);
    assert_eq!(detail.author_post_count, 2);
}

#[tokio::test]
async fn anonymous_writes_require_login() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    let post = fx.post(&author, "text", None).await;

    assert!(matches!(
        fx.authoring.create_form(None).await.unwrap(),
        WriteOutcome::LoginRequired
    ));
    assert!(matches!(
        fx.authoring
            .create(None, PostFormInput::new("text", None))
            .await
            .unwrap(),
        WriteOutcome::LoginRequired
    ));
    assert!(matches!(
        fx.authoring.edit_form(None, post.id).await.unwrap(),
        WriteOutcome::LoginRequired
    ));
}

#[tokio::test]
async fn create_persists_with_author_and_group() {
    let fx = Fixture::new();
    let author = fx.user("NoNameAuthor").await;
    let group = fx.group("test-slug").await;

    let outcome = fx
        .authoring
        .create(Some(&author), PostFormInput::new("Новый пост", Some(group.id)))
        .await
        .unwrap();
    let WriteOutcome::Saved(post) = outcome else {
        panic!("expected saved post");
    };

    assert_eq!(post.author_id, author.user_id);
    let feed = fx.feeds.group_posts("test-slug", None).await.unwrap();
    assert_eq!(feed.page.items[0].post.text, "Новый пост");
}

#[tokio::test]
async fn invalid_form_is_returned_without_saving() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    fx.group("test-slug").await;

    let outcome = fx
        .authoring
        .create(Some(&author), PostFormInput::new("   ", None))
        .await
        .unwrap();
    let WriteOutcome::Form(form) = outcome else {
        panic!("expected form with errors");
    };

    assert_eq!(form.errors.for_field("text").collect::<Vec<_>>(), [REQUIRED_MESSAGE]);
    assert_eq!(form.groups.len(), 1);
    assert!(!form.is_edit());
    assert!(fx.feeds.index(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn author_edit_keeps_author_and_pub_date() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    let group = fx.group("test-slug").await;
    let post = fx.post(&author, "Тестовый пост", None).await;

    let outcome = fx.authoring.edit_form(Some(&author), post.id).await.unwrap();
    let WriteOutcome::Form(form) = outcome else {
        panic!("expected prefilled form");
    };
    assert_eq!(form.input.text, "Тестовый пост");
    assert_eq!(form.editing, Some(post.id));

    let outcome = fx
        .authoring
        .edit(
            Some(&author),
            post.id,
            PostFormInput::new("Измененный пост", Some(group.id)),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, WriteOutcome::Saved(_)));

    let stored = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Измененный пост");
    assert_eq!(stored.group_id, Some(group.id));
    assert_eq!(stored.author_id, post.author_id);
    assert_eq!(stored.pub_date, post.pub_date);
}

#[tokio::test]
async fn non_author_edit_is_redirected_and_changes_nothing() {
    let fx = Fixture::new();
    let author = fx.user("NoNameAuthor").await;
    let stranger = fx.user("NotAuthor").await;
    let post = fx.post(&author, "original", None).await;

    let outcome = fx
        .authoring
        .edit(
            Some(&stranger),
            post.id,
            PostFormInput::new("hijacked", None),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, WriteOutcome::NotAuthor { post_id } if post_id == post.id));

    let entry = fx.store.posts().find_entry(post.id).await.unwrap().unwrap();
    assert_eq!(entry.post, post);
}

#[tokio::test]
async fn signup_then_login_issues_valid_sessions() {
    let store = InMemoryStore::new();
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    }));
    let accounts = AccountService::new(
        Arc::new(store.users()),
        Arc::new(Argon2PasswordService::new()),
        tokens.clone(),
    );

    let session = accounts.signup("leo", "war-and-peace").await.unwrap();
    assert_eq!(session.principal.username, "leo");

    assert!(matches!(
        accounts.signup("leo", "another-password").await,
        Err(DomainError::Duplicate(_))
    ));
    assert!(matches!(
        accounts.signup("short", "pw").await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        accounts.login("leo", "wrong-password").await,
        Err(DomainError::Unauthorized)
    ));

    let login = accounts.login("leo", "war-and-peace").await.unwrap();
    let claims = tokens.validate_token(&login.token).unwrap();
    assert_eq!(claims.user_id, session.principal.user_id);
}
