// src/application/ports/embedding.rs
use crate::{application::ApplicationResult, domain::article::Embedding};
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> ApplicationResult<Embedding>;
}
