use super::ArticleQueryService;
use crate::{
    application::{dto::RecommendedArticleDto, error::ApplicationResult},
    domain::article::{ArticleId, ArticleListFilter, ArticleSort, PageRequest, PublicationFilter},
};
use uuid::Uuid;

const RECOMMENDED_LIMIT: u32 = 3;

pub struct GetRecommendedArticlesQuery {
    /// The article being read; never recommended to itself.
    pub article_id: Uuid,
}

impl ArticleQueryService {
    /// The newest published articles other than the current one.
    pub async fn get_recommended_articles(
        &self,
        query: GetRecommendedArticlesQuery,
    ) -> ApplicationResult<Vec<RecommendedArticleDto>> {
        let filter = ArticleListFilter {
            publication: PublicationFilter::Published,
            exclude_id: Some(ArticleId::new(query.article_id)),
            sort: ArticleSort::NEWEST_FIRST,
            ..Default::default()
        };
        let page = PageRequest {
            page: 1,
            per_page: RECOMMENDED_LIMIT,
        };

        let result = self.read_repo.list_page(&filter, page).await?;
        let mut cards = Vec::with_capacity(result.articles.len());
        for article in result.articles {
            let name = self.author_name(article.author_id).await;
            let mut card = RecommendedArticleDto::from(article);
            card.author.name = name;
            cards.push(card);
        }
        Ok(cards)
    }
}
