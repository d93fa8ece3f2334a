// src/application/commands/articles/create.rs
use super::ArticleCommandService;
use crate::{
    application::{
        background::VersionJob,
        dto::ArticleDto,
        error::ApplicationResult,
    },
    domain::{
        article::{
            ArticleBody, ArticleContent, ArticleId, ArticleTitle, ImageRef, NewArticle,
            PublishedContent,
        },
        user::UserId,
    },
};
use serde_json::{Map, Value};

pub struct CreateArticleCommand {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub author_id: UserId,
    pub tags: Vec<String>,
    pub publish: bool,
}

impl CreateArticleCommand {
    pub fn builder() -> CreateArticleCommandBuilder {
        CreateArticleCommandBuilder::default()
    }
}

#[derive(Default)]
pub struct CreateArticleCommandBuilder {
    title: Option<String>,
    body: Option<String>,
    image: Option<String>,
    author_id: Option<UserId>,
    tags: Vec<String>,
    publish: bool,
}

impl CreateArticleCommandBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }

    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn build(self) -> Result<CreateArticleCommand, &'static str> {
        Ok(CreateArticleCommand {
            title: self.title.ok_or("title is required")?,
            body: self.body.unwrap_or_default(),
            image: self.image,
            author_id: self.author_id.ok_or("author is required")?,
            tags: self.tags,
            publish: self.publish,
        })
    }
}

impl ArticleCommandService {
    pub async fn create_article(&self, command: CreateArticleCommand) -> ApplicationResult<ArticleDto> {
        let title = ArticleTitle::new(command.title)?;
        let body = ArticleBody::new(command.body);
        let image = ImageRef::parse_optional(command.image)?;
        let tag_ids = self.resolve_tags(&command.tags).await?;
        let slug = self.slug_service.generate_unique_slug(&title, None).await?;
        let now = self.clock.now();

        let draft = ArticleContent::new(title, body, image);
        let published = command.publish.then(|| PublishedContent {
            content: draft.clone(),
            published_at: now,
        });

        let created = self
            .write_repo
            .insert(NewArticle {
                id: ArticleId::generate(),
                slug,
                author_id: command.author_id,
                tag_ids,
                draft,
                published,
                session_memory: Value::Object(Map::new()),
                created_at: now,
            })
            .await?;

        tracing::info!(
            article_id = %created.id,
            slug = %created.slug,
            published = created.is_published(),
            "article created"
        );

        let author = Some(created.author_id);
        self.record_version(VersionJob::draft(created.id, created.draft.clone(), author))
            .await;
        if let Some(published) = &created.published {
            self.record_version(VersionJob::published(
                created.id,
                published.content.clone(),
                author,
            ))
            .await;
        }
        self.refresh_embedding(&created).await;

        Ok(created.into())
    }
}
