use crate::domain::article::{Article, ArticleContent, ContentView, PublishedContent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::serde_time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDto {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl From<ArticleContent> for ContentDto {
    fn from(content: ArticleContent) -> Self {
        Self {
            title: content.title.into_inner(),
            body: content.body.into_inner(),
            image: content.image.map(Into::into),
            embedding: content.embedding.map(|e| e.into_inner()),
        }
    }
}

/// The published slot is serialized as one object so a title can never
/// appear without its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedDto {
    #[serde(flatten)]
    pub content: ContentDto,
    #[serde(with = "serde_time")]
    pub published_at: DateTime<Utc>,
}

impl From<PublishedContent> for PublishedDto {
    fn from(published: PublishedContent) -> Self {
        Self {
            content: published.content.into(),
            published_at: published.published_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDto {
    pub id: Uuid,
    pub slug: String,
    pub author: AuthorDto,
    pub tag_ids: Vec<i64>,
    pub draft: ContentDto,
    pub published: Option<PublishedDto>,
    pub is_published: bool,
    #[serde(default)]
    pub current_draft_version_id: Option<Uuid>,
    #[serde(default)]
    pub current_published_version_id: Option<Uuid>,
    #[serde(default)]
    pub session_memory: Value,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl ArticleDto {
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author.name = name.into();
        self
    }
}

impl From<Article> for ArticleDto {
    fn from(article: Article) -> Self {
        let is_published = article.is_published();
        Self {
            id: article.id.into(),
            slug: article.slug.into_inner(),
            author: AuthorDto {
                id: article.author_id.into(),
                name: String::new(),
            },
            tag_ids: article.tag_ids.into_iter().map(i64::from).collect(),
            draft: article.draft.into(),
            published: article.published.map(Into::into),
            is_published,
            current_draft_version_id: article.current_draft_version_id.map(Into::into),
            current_published_version_id: article.current_published_version_id.map(Into::into),
            session_memory: article.session_memory,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Public-facing card for "read next" lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedArticleDto {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub author: AuthorDto,
    #[serde(default, with = "serde_time::option")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

/// Uses the published title, and the published image falling back to the draft image.
impl From<Article> for RecommendedArticleDto {
    fn from(article: Article) -> Self {
        let title = article.title_for(ContentView::Public).as_str().to_string();
        let image = article
            .published
            .as_ref()
            .and_then(|p| p.content.image.clone())
            .or_else(|| article.draft.image.clone())
            .map(Into::into);
        let published_at = article.published_at();
        Self {
            id: article.id.into(),
            slug: article.slug.into_inner(),
            title,
            image,
            author: AuthorDto {
                id: article.author_id.into(),
                name: String::new(),
            },
            published_at,
            created_at: article.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::{
        ArticleBody, ArticleId, ArticleSlug, ArticleTitle, ImageRef, NewArticle,
    };
    use crate::domain::user::UserId;

    fn article(published: bool) -> Article {
        let now = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let draft = ArticleContent::new(
            ArticleTitle::new("Hello").unwrap(),
            ArticleBody::new("world"),
            None,
        );
        let mut article = NewArticle {
            id: ArticleId::generate(),
            slug: ArticleSlug::new("hello").unwrap(),
            author_id: UserId::new(Uuid::new_v4()),
            tag_ids: vec![],
            draft,
            published: None,
            session_memory: serde_json::json!({"turns": 2}),
            created_at: now,
        }
        .into_article();
        if published {
            article.publish(now);
        }
        article
    }

    #[test]
    fn unpublished_article_serializes_null_published_slot() {
        let json = serde_json::to_value(ArticleDto::from(article(false))).unwrap();
        assert!(json["published"].is_null());
        assert_eq!(json["is_published"], false);
        assert_eq!(json["session_memory"]["turns"], 2);
    }

    #[test]
    fn published_slot_carries_title_and_timestamp_together() {
        let json = serde_json::to_value(ArticleDto::from(article(true))).unwrap();
        assert_eq!(json["published"]["title"], "Hello");
        assert_eq!(json["published"]["published_at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn recommendation_shows_public_title_and_falls_back_to_draft_image() {
        let mut article = article(true);
        article.draft.title = ArticleTitle::new("Edited").unwrap();
        article.draft.image = Some(ImageRef::new("cover.png").unwrap());

        let card = RecommendedArticleDto::from(article);
        assert_eq!(card.title, "Hello");
        assert_eq!(card.image.as_deref(), Some("cover.png"));
        assert_eq!(card.published_at, Some(card.created_at));
    }
}
