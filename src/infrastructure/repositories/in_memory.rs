// src/infrastructure/repositories/in_memory.rs
use crate::domain::article::{
    Article, ArticleId, ArticleListFilter, ArticlePage, ArticleReadRepository, ArticleSlug,
    ArticleSort, ArticleUpdate, ArticleVersion, ArticleVersionRepository, ArticleWriteRepository,
    Embedding, NewArticle, NewArticleVersion, PageRequest, PublicationFilter, SortField,
    SortOrder, VersionId, VersionNumber,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct StoreState {
    articles: HashMap<ArticleId, Article>,
    versions: Vec<ArticleVersion>,
}

impl StoreState {
    fn slug_taken_by_other(&self, slug: &ArticleSlug, id: ArticleId) -> bool {
        self.articles
            .values()
            .any(|a| a.id != id && &a.slug == slug)
    }
}

/// Process-local store implementing every article repository trait over one
/// lock, with the same uniqueness, cascade and pointer rules as the SQL schema.
#[derive(Default)]
pub struct InMemoryArticleStore {
    state: Mutex<StoreState>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn article_count(&self) -> usize {
        self.state().articles.len()
    }

    pub fn version_count(&self) -> usize {
        self.state().versions.len()
    }
}

#[async_trait]
impl ArticleWriteRepository for InMemoryArticleStore {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        let mut state = self.state();
        if state.articles.contains_key(&article.id) {
            return Err(DomainError::AlreadyExists("article id already exists".into()));
        }
        if state.slug_taken_by_other(&article.slug, article.id) {
            return Err(DomainError::AlreadyExists("slug already exists".into()));
        }
        let article = article.into_article();
        state.articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn update(&self, update: ArticleUpdate) -> DomainResult<Article> {
        let mut state = self.state();
        if let Some(slug) = &update.slug {
            if state.slug_taken_by_other(slug, update.id) {
                return Err(DomainError::AlreadyExists("slug already exists".into()));
            }
        }
        let article = state
            .articles
            .get_mut(&update.id)
            .ok_or_else(|| DomainError::NotFound("article not found".into()))?;
        update.apply_to(article);
        Ok(article.clone())
    }

    async fn publish(&self, id: ArticleId, published_at: DateTime<Utc>) -> DomainResult<Article> {
        let mut state = self.state();
        let article = state
            .articles
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("article not found".into()))?;
        article.publish(published_at);
        Ok(article.clone())
    }

    async fn delete(&self, id: ArticleId) -> DomainResult<()> {
        let mut state = self.state();
        if state.articles.remove(&id).is_none() {
            return Err(DomainError::NotFound("article not found".into()));
        }
        state.versions.retain(|v| v.article_id != id);
        Ok(())
    }

    async fn update_draft_embedding(
        &self,
        id: ArticleId,
        source_body: &str,
        embedding: Embedding,
    ) -> DomainResult<bool> {
        let mut state = self.state();
        match state.articles.get_mut(&id) {
            Some(article) if article.draft.body.as_str() == source_body => {
                article.draft.embedding = Some(embedding);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ArticleReadRepository for InMemoryArticleStore {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        Ok(self.state().articles.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &ArticleSlug) -> DomainResult<Option<Article>> {
        Ok(self
            .state()
            .articles
            .values()
            .find(|a| &a.slug == slug)
            .cloned())
    }

    async fn list_page(
        &self,
        filter: &ArticleListFilter,
        page: PageRequest,
    ) -> DomainResult<ArticlePage> {
        let state = self.state();
        let needle = filter.search_term().map(str::to_lowercase);
        let mut matching: Vec<&Article> = state
            .articles
            .values()
            .filter(|a| match filter.publication {
                PublicationFilter::Any => true,
                PublicationFilter::Published => a.is_published(),
                PublicationFilter::DraftOnly => !a.is_published(),
            })
            .filter(|a| filter.tag_id.is_none_or(|tag| a.tag_ids.contains(&tag)))
            .filter(|a| filter.exclude_id != Some(a.id))
            .filter(|a| needle.as_deref().is_none_or(|needle| mentions(a, needle)))
            .collect();
        matching.sort_by(|a, b| compare(a, b, filter.sort));

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(page.per_page).unwrap_or(usize::MAX);
        let articles = matching
            .into_iter()
            .skip(offset)
            .take(per_page)
            .cloned()
            .collect();

        Ok(ArticlePage { articles, total })
    }
}

fn mentions(article: &Article, needle: &str) -> bool {
    let published = article.published.as_ref().map(|p| &p.content);
    [Some(&article.draft), published]
        .into_iter()
        .flatten()
        .any(|content| {
            content.title.as_str().to_lowercase().contains(needle)
                || content.body.as_str().to_lowercase().contains(needle)
        })
}

/// Mirrors the SQL ordering, including NULLS LAST for ascending `published_at`.
fn compare(a: &Article, b: &Article, sort: ArticleSort) -> Ordering {
    let primary = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Title => a.draft.title.as_str().cmp(b.draft.title.as_str()),
        SortField::PublishedAt => match (a.published_at(), b.published_at()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    let ordering = primary.then_with(|| a.id.cmp(&b.id));
    match sort.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl ArticleVersionRepository for InMemoryArticleStore {
    async fn append(&self, version: NewArticleVersion) -> DomainResult<ArticleVersion> {
        let mut state = self.state();
        if !state.articles.contains_key(&version.article_id) {
            return Err(DomainError::NotFound("article not found".into()));
        }
        if state.versions.iter().any(|v| {
            v.article_id == version.article_id && v.version_number == version.version_number
        }) {
            return Err(DomainError::AlreadyExists(
                "version number already taken".into(),
            ));
        }

        let version = version.into_version();
        if let Some(article) = state.articles.get_mut(&version.article_id) {
            article.link_version(version.status, version.id);
        }
        state.versions.push(version.clone());
        Ok(version)
    }

    async fn latest_version_number(
        &self,
        article_id: ArticleId,
    ) -> DomainResult<Option<VersionNumber>> {
        Ok(self
            .state()
            .versions
            .iter()
            .filter(|v| v.article_id == article_id)
            .map(|v| v.version_number)
            .max())
    }

    async fn list_by_article(&self, article_id: ArticleId) -> DomainResult<Vec<ArticleVersion>> {
        let mut versions: Vec<ArticleVersion> = self
            .state()
            .versions
            .iter()
            .filter(|v| v.article_id == article_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    async fn find_by_id(&self, id: VersionId) -> DomainResult<Option<ArticleVersion>> {
        Ok(self.state().versions.iter().find(|v| v.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::{
        ArticleBody, ArticleContent, ArticleTitle, TagId, VersionStatus,
    };
    use crate::domain::user::UserId;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn new_article(slug: &str, offset_secs: i64) -> NewArticle {
        NewArticle {
            id: ArticleId::generate(),
            slug: ArticleSlug::new(slug).unwrap(),
            author_id: UserId::new(Uuid::new_v4()),
            tag_ids: vec![],
            draft: ArticleContent::new(
                ArticleTitle::new(slug).unwrap(),
                ArticleBody::new("body"),
                None,
            ),
            published: None,
            session_memory: json!({}),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    fn new_version(article_id: ArticleId, number: i32, status: VersionStatus) -> NewArticleVersion {
        NewArticleVersion {
            id: VersionId::generate(),
            article_id,
            version_number: VersionNumber::new(number).unwrap(),
            status,
            content: ArticleContent::new(
                ArticleTitle::new("snapshot").unwrap(),
                ArticleBody::new("body"),
                None,
            ),
            edited_by: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let store = InMemoryArticleStore::new();
        store.insert(new_article("same", 0)).await.unwrap();
        let err = store.insert(new_article("same", 1)).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn append_enforces_unique_numbers_and_relinks_draft_pointer() {
        let store = InMemoryArticleStore::new();
        let article = store.insert(new_article("a", 0)).await.unwrap();

        let first = store
            .append(new_version(article.id, 1, VersionStatus::Draft))
            .await
            .unwrap();
        let err = store
            .append(new_version(article.id, 1, VersionStatus::Draft))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        let stored = ArticleReadRepository::find_by_id(&store, article.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.current_draft_version_id, Some(first.id));
        assert_eq!(
            store.latest_version_number(article.id).await.unwrap(),
            Some(VersionNumber::FIRST)
        );
    }

    #[tokio::test]
    async fn published_append_skips_pointer_on_unpublished_article() {
        let store = InMemoryArticleStore::new();
        let article = store.insert(new_article("a", 0)).await.unwrap();
        store
            .append(new_version(article.id, 1, VersionStatus::Published))
            .await
            .unwrap();
        let stored = ArticleReadRepository::find_by_id(&store, article.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.current_published_version_id.is_none());
    }

    #[tokio::test]
    async fn append_for_missing_article_is_not_found() {
        let store = InMemoryArticleStore::new();
        let err = store
            .append(new_version(ArticleId::generate(), 1, VersionStatus::Draft))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_cascades_versions() {
        let store = InMemoryArticleStore::new();
        let article = store.insert(new_article("a", 0)).await.unwrap();
        let other = store.insert(new_article("b", 1)).await.unwrap();
        store
            .append(new_version(article.id, 1, VersionStatus::Draft))
            .await
            .unwrap();
        store
            .append(new_version(other.id, 1, VersionStatus::Draft))
            .await
            .unwrap();

        store.delete(article.id).await.unwrap();
        assert!(store.list_by_article(article.id).await.unwrap().is_empty());
        assert_eq!(store.version_count(), 1);
        assert!(matches!(
            store.delete(article.id).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn embedding_write_applies_only_to_matching_body() {
        let store = InMemoryArticleStore::new();
        let article = store.insert(new_article("a", 0)).await.unwrap();
        let embedding = Embedding::new(vec![1.0, 2.0]).unwrap();

        assert!(
            !store
                .update_draft_embedding(article.id, "other", embedding.clone())
                .await
                .unwrap()
        );
        assert!(
            store
                .update_draft_embedding(article.id, "body", embedding.clone())
                .await
                .unwrap()
        );
        let stored = ArticleReadRepository::find_by_id(&store, article.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.draft.embedding, Some(embedding));
    }

    #[tokio::test]
    async fn list_page_filters_by_tag_and_orders_newest_first() {
        let store = InMemoryArticleStore::new();
        let tag = TagId::new(5).unwrap();
        let mut tagged = new_article("older", 0);
        tagged.tag_ids = vec![tag];
        store.insert(tagged).await.unwrap();
        let mut newer = new_article("newer", 10);
        newer.tag_ids = vec![tag];
        store.insert(newer).await.unwrap();
        store.insert(new_article("untagged", 20)).await.unwrap();

        let filter = ArticleListFilter {
            tag_id: Some(tag),
            ..Default::default()
        };
        let page = store
            .list_page(&filter, PageRequest { page: 1, per_page: 1 })
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].slug.as_str(), "newer");
    }

    #[tokio::test]
    async fn publish_copies_the_stored_draft() {
        let store = InMemoryArticleStore::new();
        let article = store.insert(new_article("a", 0)).await.unwrap();
        store
            .update(
                ArticleUpdate::new(article.id, Utc::now())
                    .with_draft_body(ArticleBody::new("saved later")),
            )
            .await
            .unwrap();

        let at = Utc::now();
        let published = store.publish(article.id, at).await.unwrap();
        let slot = published.published.as_ref().unwrap();
        assert_eq!(slot.content, published.draft);
        assert_eq!(slot.content.body.as_str(), "saved later");
        assert_eq!(slot.published_at, at);

        assert!(matches!(
            store.publish(ArticleId::generate(), at).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn published_at_ordering_puts_drafts_last_when_ascending() {
        let store = InMemoryArticleStore::new();
        let draft = store.insert(new_article("draft", 0)).await.unwrap();
        let early = store.insert(new_article("early", 1)).await.unwrap();
        let late = store.insert(new_article("late", 2)).await.unwrap();
        let now = Utc::now();
        store.publish(late.id, now + Duration::seconds(5)).await.unwrap();
        store.publish(early.id, now).await.unwrap();

        let slugs = |page: ArticlePage| -> Vec<String> {
            page.articles.iter().map(|a| a.slug.as_str().to_string()).collect()
        };
        let mut filter = ArticleListFilter {
            sort: ArticleSort {
                field: SortField::PublishedAt,
                order: SortOrder::Asc,
            },
            ..Default::default()
        };
        let request = PageRequest { page: 1, per_page: 10 };
        let asc = store.list_page(&filter, request).await.unwrap();
        assert_eq!(slugs(asc), vec!["early", "late", "draft"]);

        filter.sort.order = SortOrder::Desc;
        let desc = store.list_page(&filter, request).await.unwrap();
        assert_eq!(slugs(desc), vec!["draft", "late", "early"]);
        assert!(draft.published.is_none());
    }

    #[tokio::test]
    async fn search_matches_either_slot_case_insensitively() {
        let store = InMemoryArticleStore::new();
        let article = store.insert(new_article("first", 0)).await.unwrap();
        store.insert(new_article("second", 1)).await.unwrap();
        store.publish(article.id, Utc::now()).await.unwrap();
        store
            .update(
                ArticleUpdate::new(article.id, Utc::now())
                    .with_draft_body(ArticleBody::new("Rewritten")),
            )
            .await
            .unwrap();

        let request = PageRequest { page: 1, per_page: 10 };
        for term in ["REWRITTEN", "body"] {
            let filter = ArticleListFilter {
                search: Some(term.into()),
                exclude_id: None,
                ..Default::default()
            };
            let page = store.list_page(&filter, request).await.unwrap();
            assert!(page.articles.iter().any(|a| a.id == article.id), "{term}");
        }

        let filter = ArticleListFilter {
            search: Some("body".into()),
            exclude_id: Some(article.id),
            ..Default::default()
        };
        let page = store.list_page(&filter, request).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.articles[0].slug.as_str(), "second");
    }
}
