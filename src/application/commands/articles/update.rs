// src/application/commands/articles/update.rs
use super::ArticleCommandService;
use crate::{
    application::{background::VersionJob, dto::ArticleDto, error::ApplicationResult},
    domain::{
        article::{Article, ArticleBody, ArticleTitle, ArticleUpdate, ImageRef},
        user::UserId,
    },
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Partial draft edit. `None` leaves a field alone; a blank `image` clears it.
#[derive(Default)]
pub struct SaveDraftCommand {
    pub id: Uuid,
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub editor: Option<UserId>,
}

impl ArticleCommandService {
    pub async fn save_draft(&self, command: SaveDraftCommand) -> ApplicationResult<ArticleDto> {
        let mut article = self.load(command.id).await?;
        let now = self.clock.now();
        let original_embedding = article.draft.embedding.clone();

        let SaveDraftCommand {
            id: _,
            title,
            body,
            image,
            tags,
            editor,
        } = command;

        let mut update = ArticleUpdate::new(article.id, now);
        if let Some(title) = title {
            update = self.apply_title(&mut article, title, update, now).await?;
        }
        if let Some(body) = body {
            let body = ArticleBody::new(body);
            article.set_draft_body(body.clone(), now);
            update = update.with_draft_body(body);
        }
        if let Some(image) = image {
            let image = ImageRef::parse_optional(Some(image))?;
            article.set_draft_image(image.clone(), now);
            update = update.with_draft_image(image);
        }
        if let Some(names) = tags {
            let tag_ids = self.resolve_tags(&names).await?;
            article.set_tags(tag_ids.clone(), now);
            update = update.with_tags(tag_ids);
        }
        if article.draft.embedding != original_embedding {
            update = update.with_draft_embedding(article.draft.embedding.clone());
        }
        debug_assert!(!update.touches_published_slot());

        let updated = self.write_repo.update(update).await?;
        tracing::debug!(article_id = %updated.id, "draft saved");

        self.record_version(VersionJob::draft(updated.id, updated.draft.clone(), editor))
            .await;
        self.refresh_embedding(&updated).await;

        Ok(updated.into())
    }

    /// Any change to the title string regenerates the slug, even when it would slugify the same.
    async fn apply_title(
        &self,
        article: &mut Article,
        title: String,
        mut update: ArticleUpdate,
        now: DateTime<Utc>,
    ) -> ApplicationResult<ArticleUpdate> {
        let title = ArticleTitle::new(title)?;
        if title == article.draft.title {
            return Ok(update);
        }

        let slug = self
            .slug_service
            .generate_unique_slug(&title, Some(article.id))
            .await?;
        if slug != article.slug {
            article.set_slug(slug.clone(), now);
            update = update.with_slug(slug);
        }
        article.set_draft_title(title.clone(), now);
        Ok(update.with_draft_title(title))
    }
}
