// src/application/background/embeddings.rs
use std::sync::Arc;

use async_trait::async_trait;

use super::pool::{ArticleJob, JobHandler};
use crate::application::{error::ApplicationResult, ports::embedding::EmbeddingGenerator};
use crate::domain::article::{ArticleId, ArticleWriteRepository};

/// Recompute the draft embedding from `text`, the draft body at submission time.
#[derive(Debug, Clone)]
pub struct EmbeddingJob {
    pub article_id: ArticleId,
    pub text: String,
}

impl ArticleJob for EmbeddingJob {
    fn article_id(&self) -> ArticleId {
        self.article_id
    }
}

pub struct EmbeddingJobHandler {
    generator: Arc<dyn EmbeddingGenerator>,
    write_repo: Arc<dyn ArticleWriteRepository>,
}

impl EmbeddingJobHandler {
    pub fn new(
        generator: Arc<dyn EmbeddingGenerator>,
        write_repo: Arc<dyn ArticleWriteRepository>,
    ) -> Self {
        Self {
            generator,
            write_repo,
        }
    }
}

#[async_trait]
impl JobHandler<EmbeddingJob> for EmbeddingJobHandler {
    async fn handle(&self, job: EmbeddingJob) -> ApplicationResult<()> {
        let embedding = self.generator.generate(&job.text).await?;
        let dimensions = embedding.dimensions();
        let applied = self
            .write_repo
            .update_draft_embedding(job.article_id, &job.text, embedding)
            .await?;

        if applied {
            tracing::debug!(article_id = %job.article_id, dimensions, "draft embedding refreshed");
        } else {
            tracing::debug!(
                article_id = %job.article_id,
                "draft changed or article removed before embedding landed; discarded"
            );
        }
        Ok(())
    }
}
