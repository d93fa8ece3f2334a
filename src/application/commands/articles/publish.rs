// src/application/commands/articles/publish.rs
use super::ArticleCommandService;
use crate::{
    application::{
        background::VersionJob,
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleId, ArticleUpdate},
        user::UserId,
    },
};
use uuid::Uuid;

pub struct PublishArticleCommand {
    pub id: Uuid,
    pub editor: Option<UserId>,
}

pub struct UnpublishArticleCommand {
    pub id: Uuid,
}

impl ArticleCommandService {
    /// Legal from any state. Republishing with no intervening edit still appends a version.
    /// The `Published` snapshot is taken from the row the store returned.
    pub async fn publish_article(
        &self,
        command: PublishArticleCommand,
    ) -> ApplicationResult<ArticleDto> {
        let now = self.clock.now();
        let updated = self
            .write_repo
            .publish(ArticleId::new(command.id), now)
            .await?;
        let published = updated.published.as_ref().ok_or_else(|| {
            ApplicationError::infrastructure("store returned an unpublished row after publish")
        })?;

        tracing::info!(article_id = %updated.id, "article published");
        self.record_version(VersionJob::published(
            updated.id,
            published.content.clone(),
            command.editor,
        ))
        .await;

        Ok(updated.into())
    }

    /// Clears the published slot. History is kept and no version is appended.
    pub async fn unpublish_article(
        &self,
        command: UnpublishArticleCommand,
    ) -> ApplicationResult<ArticleDto> {
        let mut article = self.load(command.id).await?;
        let now = self.clock.now();
        article.unpublish(now)?;

        let update = ArticleUpdate::new(article.id, now).with_published(None);
        let updated = self.write_repo.update(update).await?;

        tracing::info!(article_id = %updated.id, "article unpublished");
        Ok(updated.into())
    }
}
