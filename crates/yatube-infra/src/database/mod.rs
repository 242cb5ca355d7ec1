//! Persistence: PostgreSQL through SeaORM, with an in-memory fallback.

mod connections;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_repo;
#[cfg(feature = "postgres")]
mod sea_orm_base;

#[cfg(feature = "postgres")]
pub use connections::connect;
pub use connections::DatabaseConfig;
pub use memory::{
    InMemoryGroupRepository, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "postgres")]
pub use sea_orm_base::SeaOrmRepository;
