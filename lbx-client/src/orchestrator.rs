//! Fetch orchestration: the single call surface used by all consumers
//!
//! Normalization and caching live together so that preloading and on-demand
//! fetches for the same resource can never produce divergent cache entries.
//! On a hit the adapter is never consulted; on a miss the result is written
//! back before being returned; a failed fetch propagates untouched, with no
//! retry and nothing written.

use lbx_common::model::{HierarchyNode, Lesson, LessonList, NavigationInfo, TagIndex};
use lbx_common::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::{SweepHandle, TimeBoxedCache};
use crate::config::ClientConfig;
use crate::request::{FetchRequest, FetchValue};
use crate::source::{select_source, ContentSource};

/// Cached, source-agnostic lesson fetching. Cheap to clone; clones share the
/// same cache and source.
#[derive(Clone)]
pub struct LessonClient {
    source: Arc<dyn ContentSource>,
    cache: Arc<TimeBoxedCache<FetchValue>>,
}

impl LessonClient {
    pub fn new(source: Arc<dyn ContentSource>, max_age: Duration) -> Self {
        Self {
            source,
            cache: Arc::new(TimeBoxedCache::new(max_age)),
        }
    }

    /// Build a client from configuration: selects the content source and
    /// sizes the cache. The sweep task is not started here; the entry point
    /// owns that lifecycle via [`LessonClient::start_sweep`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let source = select_source(config)?;
        Ok(Self::new(source, config.cache.max_age()))
    }

    pub fn cache(&self) -> &Arc<TimeBoxedCache<FetchValue>> {
        &self.cache
    }

    /// Start the periodic cache sweep; the caller keeps the handle.
    pub fn start_sweep(&self, interval: Duration) -> SweepHandle {
        self.cache.start_sweep(interval)
    }

    /// Fetch one logical resource: cache first, adapter on miss.
    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchValue> {
        let key = request.cache_key();
        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key).await {
                debug!(key = %key, "cache hit");
                return Ok(hit);
            }
            debug!(key = %key, "cache miss");
        }

        let value = self.dispatch(&request).await?;
        if let Some(key) = key {
            self.cache.set(key, value.clone()).await;
        }
        Ok(value)
    }

    /// Fetch by logical path; every spelling of the same resource shares one
    /// cache entry.
    pub async fn fetch_path(&self, path: &str) -> Result<FetchValue> {
        self.fetch(FetchRequest::from_path(path)?).await
    }

    async fn dispatch(&self, request: &FetchRequest) -> Result<FetchValue> {
        match request {
            FetchRequest::ListLessons => {
                Ok(FetchValue::Lessons(self.source.list_lessons().await?))
            }
            FetchRequest::GetLesson(path) => {
                Ok(FetchValue::Lesson(self.source.lesson(path).await?))
            }
            FetchRequest::GetHierarchy => {
                Ok(FetchValue::Hierarchy(self.source.hierarchy().await?))
            }
            FetchRequest::ListTags => Ok(FetchValue::Tags(self.source.list_tags().await?)),
            FetchRequest::GetNavigation(path) => {
                Ok(FetchValue::Navigation(self.source.navigation(path).await?))
            }
            FetchRequest::Search { query, tags } => Ok(FetchValue::Lessons(
                self.source.search(query, tags.as_deref()).await?,
            )),
        }
    }

    // Typed conveniences over `fetch`.

    pub async fn lessons(&self) -> Result<LessonList> {
        self.fetch(FetchRequest::ListLessons).await?.into_lessons()
    }

    pub async fn lesson(&self, path: &str) -> Result<Lesson> {
        self.fetch(FetchRequest::GetLesson(path.to_string()))
            .await?
            .into_lesson()
    }

    pub async fn hierarchy(&self) -> Result<Vec<HierarchyNode>> {
        self.fetch(FetchRequest::GetHierarchy)
            .await?
            .into_hierarchy()
    }

    pub async fn tags(&self) -> Result<TagIndex> {
        self.fetch(FetchRequest::ListTags).await?.into_tags()
    }

    pub async fn navigation(&self, path: &str) -> Result<NavigationInfo> {
        self.fetch(FetchRequest::GetNavigation(path.to_string()))
            .await?
            .into_navigation()
    }

    pub async fn search(&self, query: &str, tags: Option<&[String]>) -> Result<LessonList> {
        self.fetch(FetchRequest::Search {
            query: query.to_string(),
            tags: tags.map(<[String]>::to_vec),
        })
        .await?
        .into_lessons()
    }
}
