use crate::domain::article::ArticleVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ContentDto, serde_time};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleVersionDto {
    pub id: Uuid,
    pub article_id: Uuid,
    pub version_number: i32,
    pub status: String,
    #[serde(flatten)]
    pub content: ContentDto,
    #[serde(default)]
    pub edited_by: Option<Uuid>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<ArticleVersion> for ArticleVersionDto {
    fn from(version: ArticleVersion) -> Self {
        Self {
            id: version.id.into(),
            article_id: version.article_id.into(),
            version_number: version.version_number.into(),
            status: version.status.as_str().to_string(),
            content: version.content.into(),
            edited_by: version.edited_by.map(Into::into),
            created_at: version.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleVersionListDto {
    pub versions: Vec<ArticleVersionDto>,
    pub total: usize,
}

impl From<Vec<ArticleVersion>> for ArticleVersionListDto {
    fn from(versions: Vec<ArticleVersion>) -> Self {
        let versions: Vec<ArticleVersionDto> = versions.into_iter().map(Into::into).collect();
        Self {
            total: versions.len(),
            versions,
        }
    }
}
