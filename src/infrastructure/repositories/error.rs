use crate::domain::errors::DomainError;

const CNT_ARTICLE_SLUG: &str = "articles_slug_key";
const CNT_ARTICLE_PUBLISHED_SLOT: &str = "articles_published_slot_chk";
const CNT_VERSION_NUMBER: &str = "article_versions_article_number_key";
const CNT_VERSION_ARTICLE: &str = "article_versions_article_id_fkey";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_ARTICLE_SLUG => DomainError::AlreadyExists("slug already exists".into()),
                    CNT_VERSION_NUMBER => {
                        DomainError::AlreadyExists("version number already taken".into())
                    }
                    CNT_VERSION_ARTICLE => DomainError::NotFound("article not found".into()),
                    CNT_ARTICLE_PUBLISHED_SLOT => DomainError::Validation(
                        "published content and timestamp must be set together".into(),
                    ),
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::AlreadyExists("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
