// src/infrastructure/repositories/mod.rs
mod error;
mod in_memory;
mod postgres_article;
mod postgres_version;

pub(crate) use error::map_sqlx;
pub use in_memory::InMemoryArticleStore;
pub use postgres_article::PostgresArticleRepository;
pub use postgres_version::PostgresArticleVersionRepository;
