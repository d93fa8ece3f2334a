use std::sync::Arc;

use crate::{
    application::{dto::ArticleDto, ports::accounts::AuthorDirectory},
    domain::{
        article::{Article, ArticleReadRepository, ArticleVersionRepository},
        user::UserId,
    },
};

pub struct ArticleQueryService {
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) version_repo: Arc<dyn ArticleVersionRepository>,
    pub(super) authors: Arc<dyn AuthorDirectory>,
}

impl ArticleQueryService {
    pub fn new(
        read_repo: Arc<dyn ArticleReadRepository>,
        version_repo: Arc<dyn ArticleVersionRepository>,
        authors: Arc<dyn AuthorDirectory>,
    ) -> Self {
        Self {
            read_repo,
            version_repo,
            authors,
        }
    }

    /// Adds the author's display name.
    pub(super) async fn decorate(&self, article: Article) -> ArticleDto {
        let name = self.author_name(article.author_id).await;
        ArticleDto::from(article).with_author_name(name)
    }

    /// Lookup failures leave the name empty.
    pub(super) async fn author_name(&self, author_id: UserId) -> String {
        match self.authors.display_name(author_id).await {
            Ok(name) => name.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(author_id = %author_id, error = %err, "author lookup failed");
                String::new()
            }
        }
    }
}
