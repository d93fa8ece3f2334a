// tests/support/mocks/repos.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio_core::domain::article::{
    Article, ArticleId, ArticleListFilter, ArticlePage, ArticleReadRepository, ArticleSlug,
    ArticleVersion, ArticleVersionRepository, NewArticleVersion, PageRequest, VersionId,
    VersionNumber,
};
use folio_core::domain::errors::{DomainError, DomainResult};
use folio_core::infrastructure::repositories::InMemoryArticleStore;

/* -------------------------------- ArticleVersionRepository -------------------------------- */

/// 最初の `failures` 回の append を一時的な永続化エラーで拒否し、以降はストアへ委譲する
pub struct FlakyVersionRepo {
    inner: Arc<InMemoryArticleStore>,
    failures: AtomicU32,
}

impl FlakyVersionRepo {
    pub fn new(inner: Arc<InMemoryArticleStore>, failures: u32) -> Self {
        Self {
            inner,
            failures: AtomicU32::new(failures),
        }
    }

    pub fn remaining_failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleVersionRepository for FlakyVersionRepo {
    async fn append(&self, version: NewArticleVersion) -> DomainResult<ArticleVersion> {
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(DomainError::Persistence("connection reset".into()));
        }
        self.inner.append(version).await
    }

    async fn latest_version_number(
        &self,
        article_id: ArticleId,
    ) -> DomainResult<Option<VersionNumber>> {
        self.inner.latest_version_number(article_id).await
    }

    async fn list_by_article(&self, article_id: ArticleId) -> DomainResult<Vec<ArticleVersion>> {
        self.inner.list_by_article(article_id).await
    }

    async fn find_by_id(&self, id: VersionId) -> DomainResult<Option<ArticleVersion>> {
        ArticleVersionRepository::find_by_id(self.inner.as_ref(), id).await
    }
}

/* -------------------------------- ArticleReadRepository -------------------------------- */

/// `arm` 後の最初の `find_by_id` だけを `delay` だけ遅らせる（読み取りと書き込みの間に割り込ませる用）
pub struct DelayedReadRepo {
    inner: Arc<InMemoryArticleStore>,
    armed: AtomicBool,
    delay: Duration,
}

impl DelayedReadRepo {
    pub fn new(inner: Arc<InMemoryArticleStore>, delay: Duration) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            delay,
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArticleReadRepository for DelayedReadRepo {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let found = ArticleReadRepository::find_by_id(self.inner.as_ref(), id).await;
        if self.armed.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(self.delay).await;
        }
        found
    }

    async fn find_by_slug(&self, slug: &ArticleSlug) -> DomainResult<Option<Article>> {
        self.inner.find_by_slug(slug).await
    }

    async fn list_page(
        &self,
        filter: &ArticleListFilter,
        page: PageRequest,
    ) -> DomainResult<ArticlePage> {
        self.inner.list_page(filter, page).await
    }
}
