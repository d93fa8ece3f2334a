// src/domain/article/services/mod.rs
mod slug;
mod version_log;

pub use slug::ArticleSlugService;
pub use version_log::{ArticleVersionLog, VersionLogSettings};
