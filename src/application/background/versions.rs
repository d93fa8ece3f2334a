// src/application/background/versions.rs
use std::sync::Arc;

use async_trait::async_trait;

use super::pool::{ArticleJob, JobHandler};
use crate::application::error::ApplicationResult;
use crate::domain::article::{ArticleContent, ArticleId, VersionStatus, services::ArticleVersionLog};
use crate::domain::errors::DomainError;
use crate::domain::user::UserId;

/// Snapshot to record after a committed mutation.
#[derive(Debug, Clone)]
pub struct VersionJob {
    pub article_id: ArticleId,
    pub content: ArticleContent,
    pub status: VersionStatus,
    pub edited_by: Option<UserId>,
}

impl VersionJob {
    pub fn draft(article_id: ArticleId, content: ArticleContent, edited_by: Option<UserId>) -> Self {
        Self {
            article_id,
            content,
            status: VersionStatus::Draft,
            edited_by,
        }
    }

    pub fn published(
        article_id: ArticleId,
        content: ArticleContent,
        edited_by: Option<UserId>,
    ) -> Self {
        Self {
            article_id,
            content,
            status: VersionStatus::Published,
            edited_by,
        }
    }
}

impl ArticleJob for VersionJob {
    fn article_id(&self) -> ArticleId {
        self.article_id
    }
}

pub struct VersionJobHandler {
    log: Arc<ArticleVersionLog>,
}

impl VersionJobHandler {
    pub fn new(log: Arc<ArticleVersionLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl JobHandler<VersionJob> for VersionJobHandler {
    async fn handle(&self, job: VersionJob) -> ApplicationResult<()> {
        let VersionJob {
            article_id,
            content,
            status,
            edited_by,
        } = job;

        match self.log.append(article_id, content, status, edited_by).await {
            Ok(_) => Ok(()),
            Err(DomainError::NotFound(_)) => {
                tracing::info!(
                    article_id = %article_id,
                    status = %status,
                    "article deleted before its version was recorded"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
