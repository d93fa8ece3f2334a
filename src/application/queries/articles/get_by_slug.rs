use super::ArticleQueryService;
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::ArticleSlug,
};

pub struct GetArticleBySlugQuery {
    pub slug: String,
    /// Draft-only articles are hidden unless set.
    pub include_drafts: bool,
}

impl ArticleQueryService {
    pub async fn get_article_by_slug(
        &self,
        query: GetArticleBySlugQuery,
    ) -> ApplicationResult<ArticleDto> {
        let slug = ArticleSlug::new(query.slug)
            .map_err(|_| ApplicationError::not_found("article not found"))?;
        let article = self
            .read_repo
            .find_by_slug(&slug)
            .await?
            .filter(|article| query.include_drafts || article.is_published())
            .ok_or_else(|| ApplicationError::not_found("article not found"))?;

        Ok(self.decorate(article).await)
    }
}
