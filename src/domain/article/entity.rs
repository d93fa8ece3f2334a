// src/domain/article/entity.rs
use crate::domain::article::value_objects::{
    ArticleBody, ArticleId, ArticleSlug, ArticleTitle, Embedding, ImageRef, TagId, VersionId,
    VersionStatus,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// One slot worth of content. Used for the draft, the published copy and every version snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleContent {
    pub title: ArticleTitle,
    pub body: ArticleBody,
    pub image: Option<ImageRef>,
    pub embedding: Option<Embedding>,
}

impl ArticleContent {
    pub fn new(title: ArticleTitle, body: ArticleBody, image: Option<ImageRef>) -> Self {
        Self {
            title,
            body,
            image,
            embedding: None,
        }
    }
}

/// The publicly visible slot. Content and timestamp exist together or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedContent {
    pub content: ArticleContent,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationState {
    DraftOnly,
    Published,
}

/// Which slot a reader wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentView {
    Editing,
    Public,
}

#[derive(Debug, Clone)]
pub struct Article {
    pub id: ArticleId,
    pub slug: ArticleSlug,
    pub author_id: UserId,
    pub tag_ids: Vec<TagId>,
    pub draft: ArticleContent,
    pub published: Option<PublishedContent>,
    pub current_draft_version_id: Option<VersionId>,
    pub current_published_version_id: Option<VersionId>,
    pub session_memory: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn publication_state(&self) -> PublicationState {
        if self.published.is_some() {
            PublicationState::Published
        } else {
            PublicationState::DraftOnly
        }
    }

    pub fn is_published(&self) -> bool {
        self.publication_state() == PublicationState::Published
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published.as_ref().map(|p| p.published_at)
    }

    /// Copies the whole draft, embedding included, into the published slot.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.published = Some(PublishedContent {
            content: self.draft.clone(),
            published_at: now,
        });
        self.updated_at = now;
    }

    pub fn unpublish(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.publication_state() {
            PublicationState::DraftOnly => Err(DomainError::Validation(
                "article is not published".into(),
            )),
            PublicationState::Published => {
                self.published = None;
                self.current_published_version_id = None;
                self.updated_at = now;
                Ok(())
            }
        }
    }

    pub fn set_slug(&mut self, slug: ArticleSlug, now: DateTime<Utc>) {
        self.slug = slug;
        self.updated_at = now;
    }

    pub fn set_draft_title(&mut self, title: ArticleTitle, now: DateTime<Utc>) {
        self.draft.title = title;
        self.updated_at = now;
    }

    /// A new body makes the stored embedding stale, so it is dropped until recomputed.
    pub fn set_draft_body(&mut self, body: ArticleBody, now: DateTime<Utc>) {
        if self.draft.body != body {
            self.draft.embedding = None;
        }
        self.draft.body = body;
        self.updated_at = now;
    }

    pub fn set_draft_image(&mut self, image: Option<ImageRef>, now: DateTime<Utc>) {
        self.draft.image = image;
        self.updated_at = now;
    }

    pub fn set_tags(&mut self, tag_ids: Vec<TagId>, now: DateTime<Utc>) {
        self.tag_ids = normalize_tags(tag_ids);
        self.updated_at = now;
    }

    /// Replaces the draft slot wholesale. Publication state is left alone.
    pub fn restore_draft(&mut self, content: ArticleContent, now: DateTime<Utc>) {
        self.draft = content;
        self.updated_at = now;
    }

    pub fn version_pointer(&self, status: VersionStatus) -> Option<VersionId> {
        match status {
            VersionStatus::Draft => self.current_draft_version_id,
            VersionStatus::Published => self.current_published_version_id,
        }
    }

    /// Relinks the pointer for `status`. A published pointer is ignored once the article was unpublished.
    pub fn link_version(&mut self, status: VersionStatus, version_id: VersionId) {
        match status {
            VersionStatus::Draft => self.current_draft_version_id = Some(version_id),
            VersionStatus::Published => {
                if self.is_published() {
                    self.current_published_version_id = Some(version_id);
                }
            }
        }
    }

    pub fn content_for(&self, view: ContentView) -> &ArticleContent {
        match (view, &self.published) {
            (ContentView::Public, Some(published)) => &published.content,
            _ => &self.draft,
        }
    }

    pub fn title_for(&self, view: ContentView) -> &ArticleTitle {
        &self.content_for(view).title
    }

    pub fn body_for(&self, view: ContentView) -> &ArticleBody {
        &self.content_for(view).body
    }

    pub fn image_for(&self, view: ContentView) -> Option<&ImageRef> {
        self.content_for(view).image.as_ref()
    }
}

/// Sorted and deduplicated, so tag lists compare by set membership.
pub fn normalize_tags(mut tag_ids: Vec<TagId>) -> Vec<TagId> {
    tag_ids.sort_unstable();
    tag_ids.dedup();
    tag_ids
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub id: ArticleId,
    pub slug: ArticleSlug,
    pub author_id: UserId,
    pub tag_ids: Vec<TagId>,
    pub draft: ArticleContent,
    pub published: Option<PublishedContent>,
    pub session_memory: Value,
    pub created_at: DateTime<Utc>,
}

impl NewArticle {
    pub fn into_article(self) -> Article {
        Article {
            id: self.id,
            slug: self.slug,
            author_id: self.author_id,
            tag_ids: normalize_tags(self.tag_ids),
            draft: self.draft,
            published: self.published,
            current_draft_version_id: None,
            current_published_version_id: None,
            session_memory: self.session_memory,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Column-level partial update. Unset fields are not written, so concurrent
/// edits to different columns never clobber each other and version pointers
/// are only ever moved by the version log.
#[derive(Debug, Clone)]
pub struct ArticleUpdate {
    pub id: ArticleId,
    pub slug: Option<ArticleSlug>,
    pub draft_title: Option<ArticleTitle>,
    pub draft_body: Option<ArticleBody>,
    pub draft_image: Option<Option<ImageRef>>,
    pub draft_embedding: Option<Option<Embedding>>,
    pub tag_ids: Option<Vec<TagId>>,
    pub published: Option<Option<PublishedContent>>,
    pub session_memory: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleUpdate {
    pub fn new(id: ArticleId, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            slug: None,
            draft_title: None,
            draft_body: None,
            draft_image: None,
            draft_embedding: None,
            tag_ids: None,
            published: None,
            session_memory: None,
            updated_at,
        }
    }

    pub fn with_slug(mut self, slug: ArticleSlug) -> Self {
        self.slug = Some(slug);
        self
    }

    pub fn with_draft_title(mut self, title: ArticleTitle) -> Self {
        self.draft_title = Some(title);
        self
    }

    pub fn with_draft_body(mut self, body: ArticleBody) -> Self {
        self.draft_body = Some(body);
        self
    }

    pub fn with_draft_image(mut self, image: Option<ImageRef>) -> Self {
        self.draft_image = Some(image);
        self
    }

    pub fn with_draft_embedding(mut self, embedding: Option<Embedding>) -> Self {
        self.draft_embedding = Some(embedding);
        self
    }

    /// Writes every draft column from `content`.
    pub fn with_draft(self, content: ArticleContent) -> Self {
        self.with_draft_title(content.title)
            .with_draft_body(content.body)
            .with_draft_image(content.image)
            .with_draft_embedding(content.embedding)
    }

    pub fn with_tags(mut self, tag_ids: Vec<TagId>) -> Self {
        self.tag_ids = Some(normalize_tags(tag_ids));
        self
    }

    pub fn with_published(mut self, published: Option<PublishedContent>) -> Self {
        self.published = Some(published);
        self
    }

    pub fn with_session_memory(mut self, memory: Value) -> Self {
        self.session_memory = Some(memory);
        self
    }

    pub fn touches_published_slot(&self) -> bool {
        self.published.is_some()
    }

    /// Applies the set columns to an in-memory article, mirroring the SQL adapter.
    pub fn apply_to(self, article: &mut Article) {
        if let Some(slug) = self.slug {
            article.slug = slug;
        }
        if let Some(title) = self.draft_title {
            article.draft.title = title;
        }
        if let Some(body) = self.draft_body {
            article.draft.body = body;
        }
        if let Some(image) = self.draft_image {
            article.draft.image = image;
        }
        if let Some(embedding) = self.draft_embedding {
            article.draft.embedding = embedding;
        }
        if let Some(tag_ids) = self.tag_ids {
            article.tag_ids = tag_ids;
        }
        if let Some(published) = self.published {
            if published.is_none() {
                article.current_published_version_id = None;
            }
            article.published = published;
        }
        if let Some(memory) = self.session_memory {
            article.session_memory = memory;
        }
        article.updated_at = self.updated_at;
    }
}
