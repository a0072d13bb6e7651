//! Content-source adapters: one contract, two backends
//!
//! Both adapters normalize their raw source into the shared domain model, so
//! everything above this seam is source-agnostic. The active adapter is
//! chosen once at startup from configuration and never switched afterward.

use async_trait::async_trait;
use lbx_common::model::{HierarchyNode, Lesson, LessonList, NavigationInfo, TagIndex};
use lbx_common::{Error, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::ClientConfig;

pub mod backend;
pub mod repository;

pub use backend::BackendSource;
pub use repository::RepositorySource;

/// The common contract both source variants satisfy identically.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All lessons, sorted `(order, title)`.
    async fn list_lessons(&self) -> Result<LessonList>;

    /// Tag occurrence counts across all lessons.
    async fn list_tags(&self) -> Result<TagIndex>;

    /// Root nodes of the lesson hierarchy.
    async fn hierarchy(&self) -> Result<Vec<HierarchyNode>>;

    /// One lesson by canonical path. Fails with `Error::NotFound` when no
    /// lesson matches.
    async fn lesson(&self, path: &str) -> Result<Lesson>;

    /// Previous/next neighbors and breadcrumb for a lesson.
    async fn navigation(&self, path: &str) -> Result<NavigationInfo>;

    /// Lessons matching a substring query and/or tag filter, sorted
    /// `(order, title)`.
    async fn search(&self, query: &str, tags: Option<&[String]>) -> Result<LessonList>;
}

/// Select the active content source from configuration: a configured backend
/// URL selects the REST backend, otherwise lessons are read straight from
/// the repository hosting API.
pub fn select_source(config: &ClientConfig) -> Result<Arc<dyn ContentSource>> {
    match &config.backend_url {
        Some(url) => {
            info!(url = %url, "using backend content source");
            Ok(Arc::new(BackendSource::new(url.clone())?))
        }
        None => {
            if config.repository.repo.is_empty() {
                return Err(Error::Config(
                    "no backend URL and no repository configured; set backend_url, \
                     [repository].repo, or LBX_BACKEND_URL / LBX_REPOSITORY"
                        .to_string(),
                ));
            }
            info!(repo = %config.repository.repo, branch = %config.repository.branch,
                "using repository content source");
            Ok(Arc::new(RepositorySource::new(config.repository.clone())?))
        }
    }
}
