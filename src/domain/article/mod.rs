// src/domain/article/mod.rs
pub mod entity;
pub mod repository;
pub mod services;
pub mod value_objects;
pub mod version;

pub use entity::{
    Article, ArticleContent, ArticleUpdate, ContentView, NewArticle, PublicationState,
    PublishedContent, normalize_tags,
};
pub use repository::{
    ArticleListFilter, ArticlePage, ArticleReadRepository, ArticleSort, ArticleVersionRepository,
    ArticleWriteRepository, PageRequest, PublicationFilter, SortField, SortOrder,
};
pub use value_objects::{
    ArticleBody, ArticleId, ArticleSlug, ArticleTitle, Embedding, ImageRef, TagId, VersionId,
    VersionNumber, VersionStatus,
};
pub use version::{ArticleVersion, NewArticleVersion};
