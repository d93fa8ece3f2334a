// src/infrastructure/repositories/postgres_article.rs
use super::map_sqlx;
use crate::domain::article::{
    Article, ArticleBody, ArticleContent, ArticleId, ArticleListFilter, ArticlePage,
    ArticleReadRepository, ArticleSlug, ArticleSort, ArticleTitle, ArticleUpdate,
    ArticleWriteRepository, Embedding, ImageRef, NewArticle, PageRequest, PublicationFilter,
    PublishedContent, SortField, SortOrder, TagId, VersionId, normalize_tags,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const ARTICLE_COLUMNS: &str = "id, slug, author_id, tag_ids, \
     draft_title, draft_body, draft_image, draft_embedding, \
     published_title, published_body, published_image, published_embedding, published_at, \
     current_draft_version_id, current_published_version_id, session_memory, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ArticleRow {
    id: Uuid,
    slug: String,
    author_id: Uuid,
    tag_ids: Vec<i64>,
    draft_title: String,
    draft_body: String,
    draft_image: Option<String>,
    draft_embedding: Option<Vec<f32>>,
    published_title: Option<String>,
    published_body: Option<String>,
    published_image: Option<String>,
    published_embedding: Option<Vec<f32>>,
    published_at: Option<DateTime<Utc>>,
    current_draft_version_id: Option<Uuid>,
    current_published_version_id: Option<Uuid>,
    session_memory: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DomainError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let draft = ArticleContent {
            title: ArticleTitle::new(row.draft_title)?,
            body: ArticleBody::new(row.draft_body),
            image: ImageRef::parse_optional(row.draft_image)?,
            embedding: Embedding::from_stored(row.draft_embedding)?,
        };

        let published = match (row.published_title, row.published_at) {
            (Some(title), Some(published_at)) => Some(PublishedContent {
                content: ArticleContent {
                    title: ArticleTitle::new(title)?,
                    body: ArticleBody::new(row.published_body.unwrap_or_default()),
                    image: ImageRef::parse_optional(row.published_image)?,
                    embedding: Embedding::from_stored(row.published_embedding)?,
                },
                published_at,
            }),
            (None, None) => None,
            _ => {
                return Err(DomainError::Persistence(format!(
                    "article {} has a partially populated published slot",
                    row.id
                )));
            }
        };

        let tag_ids = row
            .tag_ids
            .into_iter()
            .map(TagId::new)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Article {
            id: ArticleId::new(row.id),
            slug: ArticleSlug::new(row.slug)?,
            author_id: UserId::new(row.author_id),
            tag_ids,
            draft,
            published,
            current_draft_version_id: row.current_draft_version_id.map(VersionId::new),
            current_published_version_id: row.current_published_version_id.map(VersionId::new),
            session_memory: row.session_memory,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn embedding_column(embedding: Option<&Embedding>) -> Option<Vec<f32>> {
    embedding.map(|e| e.as_slice().to_vec())
}

fn tag_column(tag_ids: &[TagId]) -> Vec<i64> {
    tag_ids.iter().copied().map(i64::from).collect()
}

const SEARCH_COLUMNS: [&str; 4] = ["draft_title", "draft_body", "published_title", "published_body"];

/// `%term%` with LIKE metacharacters escaped, so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ArticleWriteRepository for PostgresArticleRepository {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        let NewArticle {
            id,
            slug,
            author_id,
            tag_ids,
            draft,
            published,
            session_memory,
            created_at,
        } = article;
        let tag_ids = normalize_tags(tag_ids);
        let published_content = published.as_ref().map(|p| &p.content);

        let sql = format!(
            "INSERT INTO articles (id, slug, author_id, tag_ids, \
             draft_title, draft_body, draft_image, draft_embedding, \
             published_title, published_body, published_image, published_embedding, published_at, \
             session_memory, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15) \
             RETURNING {ARTICLE_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id.as_uuid())
            .bind(slug.as_str())
            .bind(author_id.as_uuid())
            .bind(tag_column(&tag_ids))
            .bind(draft.title.as_str())
            .bind(draft.body.as_str())
            .bind(draft.image.as_ref().map(ImageRef::as_str))
            .bind(embedding_column(draft.embedding.as_ref()))
            .bind(published_content.map(|c| c.title.as_str()))
            .bind(published_content.map(|c| c.body.as_str()))
            .bind(published_content.and_then(|c| c.image.as_ref().map(ImageRef::as_str)))
            .bind(published_content.and_then(|c| embedding_column(c.embedding.as_ref())))
            .bind(published.as_ref().map(|p| p.published_at))
            .bind(&session_memory)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Article::try_from(row)
    }

    async fn update(&self, update: ArticleUpdate) -> DomainResult<Article> {
        let ArticleUpdate {
            id,
            slug,
            draft_title,
            draft_body,
            draft_image,
            draft_embedding,
            tag_ids,
            published,
            session_memory,
            updated_at,
        } = update;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE articles SET updated_at = ");
        builder.push_bind(updated_at);

        if let Some(slug) = slug {
            builder.push(", slug = ");
            builder.push_bind(String::from(slug));
        }

        if let Some(title) = draft_title {
            builder.push(", draft_title = ");
            builder.push_bind(String::from(title));
        }

        if let Some(body) = draft_body {
            builder.push(", draft_body = ");
            builder.push_bind(String::from(body));
        }

        if let Some(image) = draft_image {
            builder.push(", draft_image = ");
            builder.push_bind(image.map(String::from));
        }

        if let Some(embedding) = draft_embedding {
            builder.push(", draft_embedding = ");
            builder.push_bind(embedding.map(Embedding::into_inner));
        }

        if let Some(tag_ids) = tag_ids {
            builder.push(", tag_ids = ");
            builder.push_bind(tag_column(&tag_ids));
        }

        if let Some(published) = published {
            match published {
                Some(PublishedContent {
                    content,
                    published_at,
                }) => {
                    builder.push(", published_title = ");
                    builder.push_bind(String::from(content.title));
                    builder.push(", published_body = ");
                    builder.push_bind(String::from(content.body));
                    builder.push(", published_image = ");
                    builder.push_bind(content.image.map(String::from));
                    builder.push(", published_embedding = ");
                    builder.push_bind(content.embedding.map(Embedding::into_inner));
                    builder.push(", published_at = ");
                    builder.push_bind(published_at);
                }
                None => {
                    builder.push(
                        ", published_title = NULL, published_body = NULL, published_image = NULL, \
                         published_embedding = NULL, published_at = NULL, \
                         current_published_version_id = NULL",
                    );
                }
            }
        }

        if let Some(memory) = session_memory {
            builder.push(", session_memory = ");
            builder.push_bind(memory);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id.as_uuid());
        builder.push(" RETURNING ");
        builder.push(ARTICLE_COLUMNS);

        let row = builder
            .build_query_as::<ArticleRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound("article not found".into()))?;

        Article::try_from(row)
    }

    async fn publish(&self, id: ArticleId, published_at: DateTime<Utc>) -> DomainResult<Article> {
        let sql = format!(
            "UPDATE articles SET published_title = draft_title, published_body = draft_body, \
             published_image = draft_image, published_embedding = draft_embedding, \
             published_at = $1, updated_at = $1 \
             WHERE id = $2 RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(published_at)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound("article not found".into()))?;

        Article::try_from(row)
    }

    async fn delete(&self, id: ArticleId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("article not found".into()));
        }
        Ok(())
    }

    async fn update_draft_embedding(
        &self,
        id: ArticleId,
        source_body: &str,
        embedding: Embedding,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE articles SET draft_embedding = $1 WHERE id = $2 AND draft_body = $3",
        )
        .bind(embedding.into_inner())
        .bind(id.as_uuid())
        .bind(source_body)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected() == 1)
    }
}

impl PostgresArticleRepository {
    fn apply_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &ArticleListFilter) {
        let mut has_where = false;
        let mut push_clause = |builder: &mut QueryBuilder<'a, Postgres>| {
            if has_where {
                builder.push(" AND ");
            } else {
                builder.push(" WHERE ");
                has_where = true;
            }
        };

        match filter.publication {
            PublicationFilter::Any => {}
            PublicationFilter::Published => {
                push_clause(builder);
                builder.push("published_at IS NOT NULL");
            }
            PublicationFilter::DraftOnly => {
                push_clause(builder);
                builder.push("published_at IS NULL");
            }
        }

        if let Some(tag_id) = filter.tag_id {
            push_clause(builder);
            builder.push_bind(i64::from(tag_id));
            builder.push(" = ANY(tag_ids)");
        }

        if let Some(exclude_id) = filter.exclude_id {
            push_clause(builder);
            builder.push("id <> ");
            builder.push_bind(exclude_id.as_uuid());
        }

        if let Some(term) = filter.search_term() {
            let pattern = like_pattern(term);
            push_clause(builder);
            builder.push("(");
            for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(*column);
                builder.push(" ILIKE ");
                builder.push_bind(pattern.clone());
            }
            builder.push(")");
        }
    }

    fn apply_order(builder: &mut QueryBuilder<'_, Postgres>, sort: ArticleSort) {
        let column = match sort.field {
            SortField::CreatedAt => "created_at",
            SortField::Title => "draft_title",
            SortField::PublishedAt => "published_at",
        };
        let direction = match sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        builder.push(format!(" ORDER BY {column} {direction}, id {direction}"));
    }
}

#[async_trait]
impl ArticleReadRepository for PostgresArticleRepository {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Article::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &ArticleSlug) -> DomainResult<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Article::try_from).transpose()
    }

    async fn list_page(
        &self,
        filter: &ArticleListFilter,
        page: PageRequest,
    ) -> DomainResult<ArticlePage> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM articles");
        Self::apply_filter(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(ARTICLE_COLUMNS);
        builder.push(" FROM articles");
        Self::apply_filter(&mut builder, filter);
        Self::apply_order(&mut builder, filter.sort);
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(page.per_page));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = builder
            .build_query_as::<ArticleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let articles = rows
            .into_iter()
            .map(Article::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArticlePage {
            articles,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
