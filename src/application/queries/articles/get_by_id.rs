use super::ArticleQueryService;
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::ArticleId,
};
use uuid::Uuid;

pub struct GetArticleByIdQuery {
    pub id: Uuid,
}

impl ArticleQueryService {
    pub async fn get_article_by_id(
        &self,
        query: GetArticleByIdQuery,
    ) -> ApplicationResult<ArticleDto> {
        let article = self
            .read_repo
            .find_by_id(ArticleId::new(query.id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("article not found"))?;
        Ok(self.decorate(article).await)
    }
}
