// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        background::{
            EmbeddingJob, EmbeddingJobHandler, JobHandler, PoolSettings, PoolStats, VersionJob,
            VersionJobHandler, WorkerPool,
        },
        commands::articles::ArticleCommandService,
        ports::{
            accounts::AuthorDirectory, embedding::EmbeddingGenerator, tags::TagResolver,
            time::Clock, util::SlugGenerator,
        },
        queries::articles::ArticleQueryService,
    },
    domain::article::{
        ArticleReadRepository, ArticleVersionRepository, ArticleWriteRepository,
        services::{ArticleSlugService, ArticleVersionLog, VersionLogSettings},
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundSettings {
    pub version_pool: PoolSettings,
    pub embedding_pool: PoolSettings,
    pub version_log: VersionLogSettings,
}

pub struct ApplicationServices {
    pub article_commands: Arc<ArticleCommandService>,
    pub article_queries: Arc<ArticleQueryService>,
    version_jobs: Arc<WorkerPool<VersionJob>>,
    embedding_jobs: Arc<WorkerPool<EmbeddingJob>>,
}

impl ApplicationServices {
    /// Wires the services and starts the background pools on the current runtime.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        article_write_repo: Arc<dyn ArticleWriteRepository>,
        article_read_repo: Arc<dyn ArticleReadRepository>,
        article_version_repo: Arc<dyn ArticleVersionRepository>,
        tag_resolver: Arc<dyn TagResolver>,
        embedding_generator: Arc<dyn EmbeddingGenerator>,
        author_directory: Arc<dyn AuthorDirectory>,
        clock: Arc<dyn Clock>,
        slugger: Arc<dyn SlugGenerator>,
        settings: BackgroundSettings,
    ) -> Self {
        let slug_service = Arc::new(ArticleSlugService::new(
            Arc::clone(&article_read_repo),
            Arc::clone(&slugger),
        ));

        let version_log = Arc::new(ArticleVersionLog::new(
            Arc::clone(&article_version_repo),
            Arc::clone(&clock),
            settings.version_log,
        ));
        let version_handler: Arc<dyn JobHandler<VersionJob>> =
            Arc::new(VersionJobHandler::new(version_log));
        let version_jobs = Arc::new(WorkerPool::start(
            "versions",
            settings.version_pool,
            version_handler,
        ));

        let embedding_handler: Arc<dyn JobHandler<EmbeddingJob>> = Arc::new(
            EmbeddingJobHandler::new(embedding_generator, Arc::clone(&article_write_repo)),
        );
        let embedding_jobs = Arc::new(WorkerPool::start(
            "embeddings",
            settings.embedding_pool,
            embedding_handler,
        ));

        let article_commands = Arc::new(ArticleCommandService::new(
            Arc::clone(&article_write_repo),
            Arc::clone(&article_read_repo),
            Arc::clone(&article_version_repo),
            slug_service,
            tag_resolver,
            Arc::clone(&clock),
            Arc::clone(&version_jobs),
            Arc::clone(&embedding_jobs),
        ));

        let article_queries = Arc::new(ArticleQueryService::new(
            Arc::clone(&article_read_repo),
            Arc::clone(&article_version_repo),
            author_directory,
        ));

        Self {
            article_commands,
            article_queries,
            version_jobs,
            embedding_jobs,
        }
    }

    /// Waits until every background job submitted so far has run.
    pub async fn flush_background(&self) {
        self.version_jobs.flush().await;
        self.embedding_jobs.flush().await;
    }

    /// Stops accepting background work and drains what is queued.
    pub async fn shutdown(&self) {
        self.version_jobs.shutdown().await;
        self.embedding_jobs.shutdown().await;
    }

    pub fn version_job_stats(&self) -> PoolStats {
        self.version_jobs.stats()
    }

    pub fn embedding_job_stats(&self) -> PoolStats {
        self.embedding_jobs.stats()
    }
}
