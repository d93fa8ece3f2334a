// src/application/commands/articles/revert.rs
use super::ArticleCommandService;
use crate::{
    application::{
        background::VersionJob,
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleId, ArticleUpdate, VersionId},
        user::UserId,
    },
};
use uuid::Uuid;

pub struct RevertArticleCommand {
    pub article_id: Uuid,
    pub version_id: Uuid,
    pub editor: Option<UserId>,
}

impl ArticleCommandService {
    /// Restores a snapshot into the draft slot. The published slot and slug are not touched.
    pub async fn revert_to_version(
        &self,
        command: RevertArticleCommand,
    ) -> ApplicationResult<ArticleDto> {
        let article_id = ArticleId::new(command.article_id);
        let version = self
            .version_repo
            .find_by_id(VersionId::new(command.version_id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("version not found"))?;

        if !version.belongs_to(article_id) {
            tracing::warn!(
                article_id = %article_id,
                version_id = %version.id,
                owner = %version.article_id,
                "rejected cross-article revert"
            );
            return Err(ApplicationError::validation(
                "version does not belong to this article",
            ));
        }

        let mut article = self.load(command.article_id).await?;
        let now = self.clock.now();
        article.restore_draft(version.content.clone(), now);

        let update = ArticleUpdate::new(article.id, now).with_draft(version.content);
        let updated = self.write_repo.update(update).await?;

        tracing::info!(
            article_id = %updated.id,
            version = %version.version_number,
            "draft reverted"
        );
        self.record_version(VersionJob::draft(
            updated.id,
            updated.draft.clone(),
            command.editor,
        ))
        .await;
        if updated.draft.embedding.is_none() {
            self.refresh_embedding(&updated).await;
        }

        Ok(updated.into())
    }
}
