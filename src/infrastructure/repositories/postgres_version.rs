// src/infrastructure/repositories/postgres_version.rs
use super::map_sqlx;
use crate::domain::article::{
    ArticleBody, ArticleContent, ArticleId, ArticleTitle, ArticleVersion,
    ArticleVersionRepository, Embedding, ImageRef, NewArticleVersion, VersionId, VersionNumber,
    VersionStatus,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const VERSION_COLUMNS: &str =
    "id, article_id, version_number, status, title, body, image, embedding, edited_by, created_at";

#[derive(Clone)]
pub struct PostgresArticleVersionRepository {
    pool: PgPool,
}

impl PostgresArticleVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct VersionRow {
    id: Uuid,
    article_id: Uuid,
    version_number: i32,
    status: String,
    title: String,
    body: String,
    image: Option<String>,
    embedding: Option<Vec<f32>>,
    edited_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<VersionRow> for ArticleVersion {
    type Error = DomainError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        Ok(ArticleVersion {
            id: VersionId::new(row.id),
            article_id: ArticleId::new(row.article_id),
            version_number: VersionNumber::new(row.version_number)?,
            status: row.status.parse()?,
            content: ArticleContent {
                title: ArticleTitle::new(row.title)?,
                body: ArticleBody::new(row.body),
                image: ImageRef::parse_optional(row.image)?,
                embedding: Embedding::from_stored(row.embedding)?,
            },
            edited_by: row.edited_by.map(UserId::new),
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ArticleVersionRepository for PostgresArticleVersionRepository {
    async fn append(&self, version: NewArticleVersion) -> DomainResult<ArticleVersion> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        // Row lock keeps the pointer relink consistent with a concurrent unpublish.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM articles WHERE id = $1 FOR UPDATE")
                .bind(version.article_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        if locked.is_none() {
            return Err(DomainError::NotFound("article not found".into()));
        }

        let content = &version.content;
        let sql = format!(
            "INSERT INTO article_versions ({VERSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {VERSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VersionRow>(&sql)
            .bind(Uuid::from(version.id))
            .bind(version.article_id.as_uuid())
            .bind(version.version_number.get())
            .bind(version.status.as_str())
            .bind(content.title.as_str())
            .bind(content.body.as_str())
            .bind(content.image.as_ref().map(ImageRef::as_str))
            .bind(content.embedding.as_ref().map(|e| e.as_slice().to_vec()))
            .bind(version.edited_by.map(|u| u.as_uuid()))
            .bind(version.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        let relink = match version.status {
            VersionStatus::Draft => {
                "UPDATE articles SET current_draft_version_id = $1 WHERE id = $2"
            }
            VersionStatus::Published => {
                "UPDATE articles SET current_published_version_id = $1 \
                 WHERE id = $2 AND published_at IS NOT NULL"
            }
        };
        sqlx::query(relink)
            .bind(Uuid::from(version.id))
            .bind(version.article_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;

        ArticleVersion::try_from(row)
    }

    async fn latest_version_number(
        &self,
        article_id: ArticleId,
    ) -> DomainResult<Option<VersionNumber>> {
        let max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(version_number) FROM article_versions WHERE article_id = $1",
        )
        .bind(article_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        max.map(VersionNumber::new).transpose()
    }

    async fn list_by_article(&self, article_id: ArticleId) -> DomainResult<Vec<ArticleVersion>> {
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM article_versions \
             WHERE article_id = $1 ORDER BY version_number DESC"
        );
        let rows = sqlx::query_as::<_, VersionRow>(&sql)
            .bind(article_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter().map(ArticleVersion::try_from).collect()
    }

    async fn find_by_id(&self, id: VersionId) -> DomainResult<Option<ArticleVersion>> {
        let sql = format!("SELECT {VERSION_COLUMNS} FROM article_versions WHERE id = $1");
        let row = sqlx::query_as::<_, VersionRow>(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(ArticleVersion::try_from).transpose()
    }
}
