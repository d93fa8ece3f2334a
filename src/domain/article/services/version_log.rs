// src/domain/article/services/version_log.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::application::ports::time::Clock;
use crate::domain::article::entity::ArticleContent;
use crate::domain::article::repository::ArticleVersionRepository;
use crate::domain::article::value_objects::{ArticleId, VersionId, VersionNumber, VersionStatus};
use crate::domain::article::version::{ArticleVersion, NewArticleVersion};
use crate::domain::errors::DomainResult;
use crate::domain::user::UserId;

#[derive(Debug, Clone, Copy)]
pub struct VersionLogSettings {
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for VersionLogSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_backoff: Duration::from_millis(25),
        }
    }
}

type ArticleLock = Arc<tokio::sync::Mutex<()>>;

/// Append-only history writer.
///
/// Sequence allocation is a read of the current maximum followed by an insert
/// of `max + 1`. Appends for one article are serialized by an async mutex held
/// across both steps; the store's `(article_id, version_number)` uniqueness
/// catches writers in other processes, and those conflicts are retried with a
/// fresh read.
pub struct ArticleVersionLog {
    repo: Arc<dyn ArticleVersionRepository>,
    clock: Arc<dyn Clock>,
    settings: VersionLogSettings,
    locks: Mutex<HashMap<ArticleId, ArticleLock>>,
}

impl ArticleVersionLog {
    pub fn new(
        repo: Arc<dyn ArticleVersionRepository>,
        clock: Arc<dyn Clock>,
        settings: VersionLogSettings,
    ) -> Self {
        Self {
            repo,
            clock,
            settings,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn append(
        &self,
        article_id: ArticleId,
        content: ArticleContent,
        status: VersionStatus,
        edited_by: Option<UserId>,
    ) -> DomainResult<ArticleVersion> {
        let lock = self.lock_for(article_id);
        let result = {
            let _guard = lock.lock().await;
            self.append_with_retry(article_id, &content, status, edited_by)
                .await
        };
        drop(lock);
        self.release(article_id);
        result
    }

    async fn append_with_retry(
        &self,
        article_id: ArticleId,
        content: &ArticleContent,
        status: VersionStatus,
        edited_by: Option<UserId>,
    ) -> DomainResult<ArticleVersion> {
        let mut attempt = 1;
        loop {
            match self
                .append_once(article_id, content.clone(), status, edited_by)
                .await
            {
                Ok(version) => {
                    tracing::debug!(
                        article_id = %article_id,
                        version = %version.version_number,
                        status = %status,
                        "version appended"
                    );
                    return Ok(version);
                }
                Err(err) if err.is_transient() && attempt < self.settings.max_attempts => {
                    tracing::warn!(
                        article_id = %article_id,
                        attempt,
                        error = %err,
                        "version append failed, retrying"
                    );
                    tokio::time::sleep(self.settings.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn append_once(
        &self,
        article_id: ArticleId,
        content: ArticleContent,
        status: VersionStatus,
        edited_by: Option<UserId>,
    ) -> DomainResult<ArticleVersion> {
        let latest = self.repo.latest_version_number(article_id).await?;
        let version_number = VersionNumber::after(latest)?;
        self.repo
            .append(NewArticleVersion {
                id: VersionId::generate(),
                article_id,
                version_number,
                status,
                content,
                edited_by,
                created_at: self.clock.now(),
            })
            .await
    }

    fn lock_for(&self, article_id: ArticleId) -> ArticleLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(article_id).or_default())
    }

    fn release(&self, article_id: ArticleId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&article_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&article_id);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
