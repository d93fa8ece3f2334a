// src/application/ports/tags.rs
use crate::{application::ApplicationResult, domain::article::TagId};
use async_trait::async_trait;

#[async_trait]
pub trait TagResolver: Send + Sync {
    /// Maps tag names to stable ids, creating unknown tags.
    async fn ensure_exists(&self, names: &[String]) -> ApplicationResult<Vec<TagId>>;
}
