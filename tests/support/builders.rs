// tests/support/builders.rs
use std::sync::Arc;
use std::time::Duration;

use folio_core::application::background::PoolSettings;
use folio_core::application::ports::{
    embedding::EmbeddingGenerator, time::Clock, util::SlugGenerator,
};
use folio_core::application::services::{ApplicationServices, BackgroundSettings};
use folio_core::domain::article::{ArticleReadRepository, ArticleVersionRepository};
use folio_core::domain::article::services::VersionLogSettings;
use folio_core::infrastructure::repositories::InMemoryArticleStore;
use folio_core::infrastructure::util::DefaultSlugGenerator;

use super::mocks::{StaticAuthorDirectory, StaticTagResolver, StubEmbeddingGenerator, TickingClock};

/// In-memory wiring of the whole engine plus handles on its collaborators.
pub struct TestApp {
    pub services: ApplicationServices,
    pub store: Arc<InMemoryArticleStore>,
    pub tags: Arc<StaticTagResolver>,
    pub embeddings: Arc<StubEmbeddingGenerator>,
    pub authors: Arc<StaticAuthorDirectory>,
}

pub struct TestAppBuilder {
    store: Arc<InMemoryArticleStore>,
    read_repo: Option<Arc<dyn ArticleReadRepository>>,
    version_repo: Option<Arc<dyn ArticleVersionRepository>>,
    embedding_generator: Option<Arc<dyn EmbeddingGenerator>>,
    settings: BackgroundSettings,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryArticleStore::new()),
            read_repo: None,
            version_repo: None,
            embedding_generator: None,
            settings: BackgroundSettings {
                version_pool: PoolSettings {
                    workers: 4,
                    queue_capacity: 64,
                },
                embedding_pool: PoolSettings {
                    workers: 2,
                    queue_capacity: 64,
                },
                version_log: VersionLogSettings {
                    max_attempts: 5,
                    retry_backoff: Duration::from_millis(1),
                },
            },
        }
    }

    pub fn store(&self) -> Arc<InMemoryArticleStore> {
        Arc::clone(&self.store)
    }

    pub fn read_repo(mut self, repo: Arc<dyn ArticleReadRepository>) -> Self {
        self.read_repo = Some(repo);
        self
    }

    pub fn version_repo(mut self, repo: Arc<dyn ArticleVersionRepository>) -> Self {
        self.version_repo = Some(repo);
        self
    }

    pub fn embedding_generator(mut self, generator: Arc<dyn EmbeddingGenerator>) -> Self {
        self.embedding_generator = Some(generator);
        self
    }

    pub fn max_append_attempts(mut self, attempts: u32) -> Self {
        self.settings.version_log.max_attempts = attempts;
        self
    }

    pub fn build(self) -> TestApp {
        let tags = Arc::new(StaticTagResolver::default());
        let embeddings = Arc::new(StubEmbeddingGenerator::default());
        let authors = Arc::new(StaticAuthorDirectory::default());
        let clock: Arc<dyn Clock> = Arc::new(TickingClock::default());
        let slugger: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator);

        let read_repo = self
            .read_repo
            .unwrap_or_else(|| Arc::clone(&self.store) as Arc<dyn ArticleReadRepository>);
        let version_repo = self
            .version_repo
            .unwrap_or_else(|| Arc::clone(&self.store) as Arc<dyn ArticleVersionRepository>);
        let embedding_generator = self
            .embedding_generator
            .unwrap_or_else(|| Arc::clone(&embeddings) as Arc<dyn EmbeddingGenerator>);

        let services = ApplicationServices::new(
            Arc::clone(&self.store) as _,
            read_repo,
            version_repo,
            Arc::clone(&tags) as _,
            embedding_generator,
            Arc::clone(&authors) as _,
            clock,
            slugger,
            self.settings,
        );

        TestApp {
            services,
            store: self.store,
            tags,
            embeddings,
            authors,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
