use super::ArticleQueryService;
use crate::{
    application::{
        dto::{ArticleVersionDto, ArticleVersionListDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{ArticleId, VersionId},
};
use uuid::Uuid;

pub struct ListArticleVersionsQuery {
    pub article_id: Uuid,
}

pub struct GetArticleVersionQuery {
    pub version_id: Uuid,
}

impl ArticleQueryService {
    /// Most recent first.
    pub async fn list_versions(
        &self,
        query: ListArticleVersionsQuery,
    ) -> ApplicationResult<ArticleVersionListDto> {
        let article_id = ArticleId::new(query.article_id);
        self.read_repo
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("article not found"))?;

        let versions = self.version_repo.list_by_article(article_id).await?;
        Ok(versions.into())
    }

    pub async fn get_version(
        &self,
        query: GetArticleVersionQuery,
    ) -> ApplicationResult<ArticleVersionDto> {
        let version = self
            .version_repo
            .find_by_id(VersionId::new(query.version_id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("version not found"))?;
        Ok(version.into())
    }
}
