// tests/support/helpers.rs
use folio_core::application::commands::articles::{CreateArticleCommand, SaveDraftCommand};
use folio_core::application::dto::ArticleDto;
use folio_core::application::queries::articles::ListArticleVersionsQuery;
use folio_core::application::dto::ArticleVersionDto;
use folio_core::domain::user::UserId;
use uuid::Uuid;

use super::builders::{TestApp, TestAppBuilder};

pub fn test_app() -> TestApp {
    TestAppBuilder::new().build()
}

pub fn author() -> UserId {
    UserId::new(Uuid::new_v4())
}

pub async fn create_draft(app: &TestApp, title: &str, body: &str) -> ArticleDto {
    let command = CreateArticleCommand::builder()
        .title(title)
        .body(body)
        .author(author())
        .build()
        .unwrap();
    app.services
        .article_commands
        .create_article(command)
        .await
        .unwrap()
}

pub async fn save_body(app: &TestApp, id: Uuid, body: &str) -> ArticleDto {
    app.services
        .article_commands
        .save_draft(SaveDraftCommand {
            id,
            body: Some(body.into()),
            ..Default::default()
        })
        .await
        .unwrap()
}

/// Drains background work, then returns the article's history oldest first.
pub async fn history(app: &TestApp, article_id: Uuid) -> Vec<ArticleVersionDto> {
    app.services.flush_background().await;
    let mut versions = app
        .services
        .article_queries
        .list_versions(ListArticleVersionsQuery { article_id })
        .await
        .unwrap()
        .versions;
    versions.reverse();
    versions
}

pub fn numbers(versions: &[ArticleVersionDto]) -> Vec<i32> {
    versions.iter().map(|v| v.version_number).collect()
}
