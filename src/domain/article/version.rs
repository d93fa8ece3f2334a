// src/domain/article/version.rs
use crate::domain::article::entity::ArticleContent;
use crate::domain::article::value_objects::{ArticleId, VersionId, VersionNumber, VersionStatus};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

/// Immutable historical snapshot of one of an article's slots.
#[derive(Debug, Clone)]
pub struct ArticleVersion {
    pub id: VersionId,
    pub article_id: ArticleId,
    pub version_number: VersionNumber,
    pub status: VersionStatus,
    pub content: ArticleContent,
    pub edited_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl ArticleVersion {
    pub fn belongs_to(&self, article_id: ArticleId) -> bool {
        self.article_id == article_id
    }
}

#[derive(Debug, Clone)]
pub struct NewArticleVersion {
    pub id: VersionId,
    pub article_id: ArticleId,
    pub version_number: VersionNumber,
    pub status: VersionStatus,
    pub content: ArticleContent,
    pub edited_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl NewArticleVersion {
    pub fn into_version(self) -> ArticleVersion {
        ArticleVersion {
            id: self.id,
            article_id: self.article_id,
            version_number: self.version_number,
            status: self.status,
            content: self.content,
            edited_by: self.edited_by,
            created_at: self.created_at,
        }
    }
}
