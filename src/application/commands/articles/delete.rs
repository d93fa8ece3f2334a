// src/application/commands/articles/delete.rs
use super::ArticleCommandService;
use crate::application::error::ApplicationResult;
use uuid::Uuid;

pub struct DeleteArticleCommand {
    pub id: Uuid,
}

impl ArticleCommandService {
    pub async fn delete_article(&self, command: DeleteArticleCommand) -> ApplicationResult<()> {
        let article = self.load(command.id).await?;
        self.write_repo.delete(article.id).await?;
        tracing::info!(article_id = %article.id, slug = %article.slug, "article deleted");
        Ok(())
    }
}
