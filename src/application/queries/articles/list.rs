use super::ArticleQueryService;
use crate::{
    application::{
        dto::{ArticleDto, Page},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{ArticleListFilter, ArticleSort, PageRequest, PublicationFilter, TagId},
};

const DEFAULT_PER_PAGE: u32 = 6;
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Drafts,
}

#[derive(Debug, Clone, Default)]
pub struct ListArticlesQuery {
    pub status: StatusFilter,
    pub tag_id: Option<i64>,
    pub sort: ArticleSort,
    pub page: u32,
    pub per_page: u32,
}

/// Listing narrowed to articles whose draft or published title or body contains `query`.
#[derive(Debug, Clone, Default)]
pub struct SearchArticlesQuery {
    pub query: String,
    pub status: StatusFilter,
    pub tag_id: Option<i64>,
    pub sort: ArticleSort,
    pub page: u32,
    pub per_page: u32,
}

impl ArticleQueryService {
    pub async fn list_articles(&self, query: ListArticlesQuery) -> ApplicationResult<Page<ArticleDto>> {
        let filter = ArticleListFilter {
            publication: query.status.into(),
            tag_id: query.tag_id.map(TagId::new).transpose()?,
            sort: query.sort,
            ..Default::default()
        };
        self.fetch_page(&filter, normalize_page(query.page, query.per_page))
            .await
    }

    /// A blank query is rejected rather than treated as "match everything".
    pub async fn search_articles(
        &self,
        query: SearchArticlesQuery,
    ) -> ApplicationResult<Page<ArticleDto>> {
        if query.query.trim().is_empty() {
            return Err(ApplicationError::validation("search query must not be empty"));
        }
        let filter = ArticleListFilter {
            publication: query.status.into(),
            tag_id: query.tag_id.map(TagId::new).transpose()?,
            search: Some(query.query),
            sort: query.sort,
            ..Default::default()
        };
        let page = self
            .fetch_page(&filter, normalize_page(query.page, query.per_page))
            .await?;
        tracing::debug!(total = page.total, "article search");
        Ok(page)
    }

    async fn fetch_page(
        &self,
        filter: &ArticleListFilter,
        page: PageRequest,
    ) -> ApplicationResult<Page<ArticleDto>> {
        let result = self.read_repo.list_page(filter, page).await?;
        let mut items = Vec::with_capacity(result.articles.len());
        for article in result.articles {
            items.push(self.decorate(article).await);
        }

        Ok(Page::new(items, page.page, page.per_page, result.total))
    }
}

impl From<StatusFilter> for PublicationFilter {
    fn from(status: StatusFilter) -> Self {
        match status {
            StatusFilter::All => Self::Any,
            StatusFilter::Published => Self::Published,
            StatusFilter::Drafts => Self::DraftOnly,
        }
    }
}

fn normalize_page(page: u32, per_page: u32) -> PageRequest {
    let per_page = if per_page == 0 {
        DEFAULT_PER_PAGE
    } else {
        per_page.min(MAX_PER_PAGE)
    };
    PageRequest {
        page: page.max(1),
        per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_caps() {
        assert_eq!(
            normalize_page(0, 0),
            PageRequest {
                page: 1,
                per_page: DEFAULT_PER_PAGE
            }
        );
        assert_eq!(normalize_page(3, 1_000).per_page, MAX_PER_PAGE);
        assert_eq!(normalize_page(3, 10).offset(), 20);
    }
}
