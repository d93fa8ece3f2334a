// src/application/commands/articles/session_memory.rs
use super::ArticleCommandService;
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::ArticleUpdate,
};
use serde_json::Value;
use uuid::Uuid;

/// Replaces the opaque editing-session bag. Content and history are untouched.
pub struct UpdateSessionMemoryCommand {
    pub id: Uuid,
    pub memory: Value,
}

impl ArticleCommandService {
    pub async fn update_session_memory(
        &self,
        command: UpdateSessionMemoryCommand,
    ) -> ApplicationResult<ArticleDto> {
        if !command.memory.is_object() {
            return Err(ApplicationError::validation(
                "session memory must be a JSON object",
            ));
        }
        let article = self.load(command.id).await?;
        let update = ArticleUpdate::new(article.id, self.clock.now())
            .with_session_memory(command.memory);
        let updated = self.write_repo.update(update).await?;
        Ok(updated.into())
    }
}
