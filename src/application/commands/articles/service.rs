// src/application/commands/articles/service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    application::{
        background::{EmbeddingJob, VersionJob, WorkerPool},
        error::{ApplicationError, ApplicationResult},
        ports::{tags::TagResolver, time::Clock},
    },
    domain::article::{
        Article, ArticleId, ArticleReadRepository, ArticleVersionRepository,
        ArticleWriteRepository, TagId, services::ArticleSlugService,
    },
};

pub struct ArticleCommandService {
    pub(super) write_repo: Arc<dyn ArticleWriteRepository>,
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) version_repo: Arc<dyn ArticleVersionRepository>,
    pub(super) slug_service: Arc<ArticleSlugService>,
    pub(super) tag_resolver: Arc<dyn TagResolver>,
    pub(super) clock: Arc<dyn Clock>,
    version_jobs: Arc<WorkerPool<VersionJob>>,
    embedding_jobs: Arc<WorkerPool<EmbeddingJob>>,
}

impl ArticleCommandService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        write_repo: Arc<dyn ArticleWriteRepository>,
        read_repo: Arc<dyn ArticleReadRepository>,
        version_repo: Arc<dyn ArticleVersionRepository>,
        slug_service: Arc<ArticleSlugService>,
        tag_resolver: Arc<dyn TagResolver>,
        clock: Arc<dyn Clock>,
        version_jobs: Arc<WorkerPool<VersionJob>>,
        embedding_jobs: Arc<WorkerPool<EmbeddingJob>>,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            version_repo,
            slug_service,
            tag_resolver,
            clock,
            version_jobs,
            embedding_jobs,
        }
    }

    pub(super) async fn load(&self, id: Uuid) -> ApplicationResult<Article> {
        self.read_repo
            .find_by_id(ArticleId::new(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("article not found"))
    }

    pub(super) async fn resolve_tags(&self, names: &[String]) -> ApplicationResult<Vec<TagId>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.tag_resolver.ensure_exists(names).await
    }

    /// History is recorded after the row commit; a failed hand-off is logged, not returned.
    pub(super) async fn record_version(&self, job: VersionJob) {
        let article_id = job.article_id;
        let status = job.status;
        if let Err(err) = self.version_jobs.submit(job).await {
            tracing::error!(
                article_id = %article_id,
                status = %status,
                error = %err,
                "failed to schedule version append"
            );
        }
    }

    pub(super) async fn refresh_embedding(&self, article: &Article) {
        let job = EmbeddingJob {
            article_id: article.id,
            text: article.draft.body.as_str().to_string(),
        };
        if let Err(err) = self.embedding_jobs.submit(job).await {
            tracing::warn!(
                article_id = %article.id,
                error = %err,
                "failed to schedule embedding refresh"
            );
        }
    }
}
