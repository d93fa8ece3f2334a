// tests/support/mocks/ports.rs
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use folio_core::application::ports::{
    accounts::AuthorDirectory, embedding::EmbeddingGenerator, tags::TagResolver,
};
use folio_core::application::{ApplicationError, ApplicationResult};
use folio_core::domain::article::{Embedding, TagId};
use folio_core::domain::user::UserId;

/* -------------------------------- TagResolver -------------------------------- */

/// 名前を小文字化し、初見の名前に連番 ID を割り当てるタグリゾルバ
#[derive(Default)]
pub struct StaticTagResolver {
    ids: Mutex<HashMap<String, i64>>,
}

impl StaticTagResolver {
    pub fn id_of(&self, name: &str) -> Option<i64> {
        self.ids.lock().unwrap().get(&name.to_lowercase()).copied()
    }
}

#[async_trait]
impl TagResolver for StaticTagResolver {
    async fn ensure_exists(&self, names: &[String]) -> ApplicationResult<Vec<TagId>> {
        let mut ids = self.ids.lock().unwrap();
        names
            .iter()
            .map(|name| {
                let next = ids.len() as i64 + 1;
                let id = *ids.entry(name.to_lowercase()).or_insert(next);
                Ok(TagId::new(id)?)
            })
            .collect()
    }
}

/* -------------------------------- EmbeddingGenerator -------------------------------- */

/// 本文から決定論的に求めるベクトル
pub fn stub_embedding(text: &str) -> Embedding {
    let words = text.split_whitespace().count() as f32;
    Embedding::new(vec![text.len() as f32, words, 1.0]).unwrap()
}

#[derive(Default)]
pub struct StubEmbeddingGenerator {
    calls: AtomicUsize,
}

impl StubEmbeddingGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingGenerator for StubEmbeddingGenerator {
    async fn generate(&self, text: &str) -> ApplicationResult<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(stub_embedding(text))
    }
}

/// 常に失敗する埋め込み生成器
pub struct FailingEmbeddingGenerator;

#[async_trait]
impl EmbeddingGenerator for FailingEmbeddingGenerator {
    async fn generate(&self, _text: &str) -> ApplicationResult<Embedding> {
        Err(ApplicationError::infrastructure("embedding backend unavailable"))
    }
}

/* -------------------------------- AuthorDirectory -------------------------------- */

#[derive(Default)]
pub struct StaticAuthorDirectory {
    names: Mutex<HashMap<UserId, String>>,
}

impl StaticAuthorDirectory {
    pub fn register(&self, id: UserId, name: impl Into<String>) {
        self.names.lock().unwrap().insert(id, name.into());
    }
}

#[async_trait]
impl AuthorDirectory for StaticAuthorDirectory {
    async fn display_name(&self, id: UserId) -> ApplicationResult<Option<String>> {
        Ok(self.names.lock().unwrap().get(&id).cloned())
    }
}
