// src/domain/article/services/slug.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::util::SlugGenerator;
use crate::domain::article::repository::ArticleReadRepository;
use crate::domain::article::value_objects::{ArticleId, ArticleSlug, ArticleTitle};
use crate::domain::errors::{DomainError, DomainResult};

const FALLBACK_SLUG: &str = "untitled";
const SUFFIX_LEN: usize = 8;
const MAX_SUFFIX_ATTEMPTS: usize = 8;

/// Domain service responsible for producing unique slugs for articles.
pub struct ArticleSlugService {
    read_repo: Arc<dyn ArticleReadRepository>,
    generator: Arc<dyn SlugGenerator>,
}

impl ArticleSlugService {
    pub fn new(
        read_repo: Arc<dyn ArticleReadRepository>,
        generator: Arc<dyn SlugGenerator>,
    ) -> Self {
        Self {
            read_repo,
            generator,
        }
    }

    pub fn base_slug(&self, title: &ArticleTitle) -> DomainResult<ArticleSlug> {
        let base = self.generator.slugify(title.as_str());
        if base.is_empty() {
            ArticleSlug::new(FALLBACK_SLUG)
        } else {
            ArticleSlug::new(base)
        }
    }

    /// Never returns a slug owned by an article other than `ignore_id`.
    pub async fn generate_unique_slug(
        &self,
        title: &ArticleTitle,
        ignore_id: Option<ArticleId>,
    ) -> DomainResult<ArticleSlug> {
        let base = self.base_slug(title)?;
        if self.is_available(&base, ignore_id).await? {
            return Ok(base);
        }

        for _ in 0..MAX_SUFFIX_ATTEMPTS {
            let suffix = Uuid::new_v4().simple().to_string();
            let candidate = ArticleSlug::new(format!("{}-{}", base, &suffix[..SUFFIX_LEN]))?;
            if self.is_available(&candidate, ignore_id).await? {
                tracing::debug!(base = %base, slug = %candidate, "slug collision resolved");
                return Ok(candidate);
            }
        }

        Err(DomainError::AlreadyExists(format!(
            "could not allocate a unique slug for {base}"
        )))
    }

    async fn is_available(
        &self,
        slug: &ArticleSlug,
        ignore_id: Option<ArticleId>,
    ) -> DomainResult<bool> {
        match self.read_repo.find_by_slug(slug).await? {
            Some(existing) => Ok(ignore_id.is_some_and(|id| id == existing.id)),
            None => Ok(true),
        }
    }
}
