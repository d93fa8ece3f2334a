// src/domain/article/repository.rs
use crate::domain::article::entity::{Article, ArticleUpdate, NewArticle};
use crate::domain::article::value_objects::{
    ArticleId, ArticleSlug, Embedding, TagId, VersionId, VersionNumber,
};
use crate::domain::article::version::{ArticleVersion, NewArticleVersion};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicationFilter {
    #[default]
    Any,
    Published,
    DraftOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    /// Draft title.
    Title,
    /// Unpublished articles sort after published ones in ascending order.
    PublishedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Ties are broken by id in the same direction, so paging is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArticleSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl ArticleSort {
    pub const NEWEST_FIRST: Self = Self {
        field: SortField::CreatedAt,
        order: SortOrder::Desc,
    };

    /// Lenient parse of `sort_by` / `sort_order` parameters. Unknown fields fall
    /// back to creation time and anything but `asc` means descending.
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        let field = match sort_by.map(str::trim) {
            Some("title") => SortField::Title,
            Some("published_at" | "status") => SortField::PublishedAt,
            _ => SortField::CreatedAt,
        };
        let order = match sort_order {
            Some(order) if order.trim().eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };
        Self { field, order }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArticleListFilter {
    pub publication: PublicationFilter,
    pub tag_id: Option<TagId>,
    /// Case-insensitive substring over draft and published title and body.
    pub search: Option<String>,
    pub exclude_id: Option<ArticleId>,
    pub sort: ArticleSort,
}

impl ArticleListFilter {
    /// The trimmed search term, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

#[derive(Debug, Clone)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total: u64,
}

#[async_trait]
pub trait ArticleWriteRepository: Send + Sync {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article>;
    async fn update(&self, update: ArticleUpdate) -> DomainResult<Article>;
    /// Copies the stored draft, embedding included, into the published slot in
    /// one statement, so a concurrent draft save lands wholly before or after it.
    async fn publish(&self, id: ArticleId, published_at: DateTime<Utc>) -> DomainResult<Article>;
    /// Removes the article and, by cascade, its versions.
    async fn delete(&self, id: ArticleId) -> DomainResult<()>;
    /// Stores `embedding` only while the draft body still equals `source_body`.
    /// Returns whether the write applied.
    async fn update_draft_embedding(
        &self,
        id: ArticleId,
        source_body: &str,
        embedding: Embedding,
    ) -> DomainResult<bool>;
}

#[async_trait]
pub trait ArticleReadRepository: Send + Sync {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>>;
    async fn find_by_slug(&self, slug: &ArticleSlug) -> DomainResult<Option<Article>>;
    async fn list_page(
        &self,
        filter: &ArticleListFilter,
        page: PageRequest,
    ) -> DomainResult<ArticlePage>;
}

#[async_trait]
pub trait ArticleVersionRepository: Send + Sync {
    /// Inserts the snapshot and relinks the article's pointer for its status in
    /// one transaction. Fails with `AlreadyExists` when the number is taken and
    /// `NotFound` when the article is gone.
    async fn append(&self, version: NewArticleVersion) -> DomainResult<ArticleVersion>;
    async fn latest_version_number(&self, article_id: ArticleId)
    -> DomainResult<Option<VersionNumber>>;
    /// Newest first.
    async fn list_by_article(&self, article_id: ArticleId) -> DomainResult<Vec<ArticleVersion>>;
    async fn find_by_id(&self, id: VersionId) -> DomainResult<Option<ArticleVersion>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_params_are_parsed_leniently() {
        assert_eq!(ArticleSort::from_params(None, None), ArticleSort::NEWEST_FIRST);
        assert_eq!(
            ArticleSort::from_params(Some("title"), Some("ASC")),
            ArticleSort {
                field: SortField::Title,
                order: SortOrder::Asc
            }
        );
        assert_eq!(
            ArticleSort::from_params(Some("status"), Some("up")).field,
            SortField::PublishedAt
        );
        assert_eq!(
            ArticleSort::from_params(Some("id; DROP TABLE articles"), Some("asc")).field,
            SortField::CreatedAt
        );
    }

    #[test]
    fn blank_search_is_no_search() {
        let filter = ArticleListFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), None);
        let filter = ArticleListFilter {
            search: Some(" rust ".into()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), Some("rust"));
    }
}
