// src/application/commands/articles/mod.rs
mod create;
mod delete;
mod publish;
mod revert;
mod service;
mod session_memory;
mod update;

pub use create::{CreateArticleCommand, CreateArticleCommandBuilder};
pub use delete::DeleteArticleCommand;
pub use publish::{PublishArticleCommand, UnpublishArticleCommand};
pub use revert::RevertArticleCommand;
pub use service::ArticleCommandService;
pub use session_memory::UpdateSessionMemoryCommand;
pub use update::SaveDraftCommand;
