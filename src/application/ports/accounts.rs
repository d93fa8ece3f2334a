// src/application/ports/accounts.rs
use crate::{application::ApplicationResult, domain::user::UserId};
use async_trait::async_trait;

/// Read-only account lookup used to decorate responses. Never consulted for writes.
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    async fn display_name(&self, id: UserId) -> ApplicationResult<Option<String>>;
}
