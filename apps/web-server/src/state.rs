//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{GroupRepository, PostRepository, TokenService, UserRepository};
use yatube_core::services::{AccountService, FeedService, PostAuthoring};
use yatube_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::AppConfig;

/// Repository handles the services are built from.
struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Repositories {
    fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.users()),
            groups: Arc::new(store.groups()),
            posts: Arc::new(store.posts()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Self {
        use yatube_infra::database::connect;
        use yatube_infra::{
            PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
        };

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory(&InMemoryStore::new());
        };

        match connect(db_config).await {
            Ok(conn) => {
                let conn = Arc::new(conn);
                Self {
                    users: Arc::new(PostgresUserRepository::shared(Arc::clone(&conn))),
                    groups: Arc::new(PostgresGroupRepository::shared(Arc::clone(&conn))),
                    posts: Arc::new(PostgresPostRepository::shared(conn)),
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory(&InMemoryStore::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::in_memory(&InMemoryStore::new())
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub feeds: FeedService,
    pub authoring: PostAuthoring,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub post_preview_chars: usize,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Repositories::connect(config).await;
        let state = Self::assemble(repos, config);
        tracing::info!(
            posts_per_page = state.feeds.page_size(),
            "Application state initialized"
        );
        state
    }

    /// State backed by an existing in-memory store.
    pub fn in_memory(store: &InMemoryStore, config: &AppConfig) -> Self {
        Self::assemble(Repositories::in_memory(store), config)
    }

    fn assemble(repos: Repositories, config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        Self {
            feeds: FeedService::new(
                repos.posts.clone(),
                repos.groups.clone(),
                repos.users.clone(),
                config.posts_per_page,
            ),
            authoring: PostAuthoring::new(
                repos.posts,
                repos.groups,
                config.post_preview_chars,
            ),
            accounts: AccountService::new(
                repos.users,
                Arc::new(Argon2PasswordService::new()),
                tokens.clone(),
            ),
            tokens,
            post_preview_chars: config.post_preview_chars,
        }
    }
}
