//! Repository-hosted content source
//!
//! Reads Markdown lesson files straight from a repository hosting service,
//! with no backend in between. Retrieval is two-tiered everywhere: the
//! structured contents API first, and on a permission failure (HTTP 403,
//! typically rate limiting) or any other retrieval failure, the raw
//! file-serving endpoint — or, for directory listings, a single recursive
//! tree-listing call filtered by path prefix and extension.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::BoxFuture;
use lbx_common::model::{
    normalize_path, HierarchyNode, Lesson, LessonList, NavigationInfo, TagIndex,
};
use lbx_common::{catalog, frontmatter, Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::ContentSource;
use crate::config::RepositoryConfig;

const USER_AGENT: &str = concat!("lessonbox/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of a contents-API response (file fetch or directory listing).
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Recursive tree-listing response.
#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

/// Content source reading Markdown files from a remote repository.
pub struct RepositorySource {
    http: reqwest::Client,
    config: RepositoryConfig,
}

impl RepositorySource {
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::SourceUnavailable(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { http, config })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/{}/contents/{}?ref={}",
            self.config.api_base, self.config.repo, path, self.config.branch
        )
    }

    fn raw_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.raw_base, self.config.repo, self.config.branch, path
        )
    }

    fn tree_url(&self) -> String {
        format!(
            "{}/{}/git/trees/{}?recursive=1",
            self.config.api_base, self.config.repo, self.config.branch
        )
    }

    /// Repository-relative path of a lesson given its canonical path.
    fn repo_path(&self, path: &str) -> String {
        let normalized = normalize_path(path);
        let prefix = format!("{}/", self.config.content_dir);
        if normalized.starts_with(&prefix) {
            normalized.to_string()
        } else {
            format!("{}/{}", self.config.content_dir, normalized)
        }
    }

    /// Canonical lesson path of a repository-relative file path.
    fn lesson_path(&self, repo_path: &str) -> String {
        let prefix = format!("{}/", self.config.content_dir);
        repo_path
            .strip_prefix(&prefix)
            .unwrap_or(repo_path)
            .to_string()
    }

    /// Raw text of one repository file, contents API first, raw endpoint as
    /// the fallback tier. A 404 from either tier is authoritative.
    async fn file_content(&self, repo_path: &str) -> Result<String> {
        let url = self.contents_url(repo_path);
        debug!(url = %url, "contents API fetch");

        let attempt = async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::SourceUnavailable(format!("GET {url}: {e}")))?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(repo_path.to_string()));
            }
            if !status.is_success() {
                return Err(Error::SourceUnavailable(format!(
                    "{url} returned HTTP {status}"
                )));
            }
            let entry: ContentsEntry = response
                .json()
                .await
                .map_err(|e| Error::Parse(format!("{url}: {e}")))?;
            decode_entry_content(&entry)
        };

        match attempt.await {
            Ok(text) => Ok(text),
            Err(Error::NotFound(path)) => Err(Error::NotFound(path)),
            Err(err) => {
                warn!(path = %repo_path, error = %err,
                    "contents API failed, falling back to raw endpoint");
                self.file_content_raw(repo_path).await
            }
        }
    }

    async fn file_content_raw(&self, repo_path: &str) -> Result<String> {
        let url = self.raw_url(repo_path);
        debug!(url = %url, "raw endpoint fetch");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("GET {url}: {e}")))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(repo_path.to_string()));
        }
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "{url} returned HTTP {status}"
            )));
        }
        response
            .text()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("{url}: {e}")))
    }

    /// Every Markdown file under `dir`, recursing into subdirectories.
    /// Falls back to the recursive tree listing when the contents API fails
    /// at any level.
    fn markdown_files<'a>(&'a self, dir: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(async move {
            match self.markdown_files_via_contents(dir).await {
                Ok(files) => Ok(files),
                Err(err) => {
                    warn!(dir = %dir, error = %err,
                        "contents listing failed, using recursive tree listing");
                    self.markdown_files_via_tree(dir).await
                }
            }
        })
    }

    async fn markdown_files_via_contents(&self, dir: &str) -> Result<Vec<String>> {
        let url = self.contents_url(dir);
        debug!(url = %url, "contents API listing");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("GET {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "{url} returned HTTP {status}"
            )));
        }
        let entries: Vec<ContentsEntry> = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("{url}: {e}")))?;

        let mut files = Vec::new();
        for entry in entries {
            if entry.entry_type == "file" && entry.name.ends_with(".md") {
                files.push(entry.path);
            } else if entry.entry_type == "dir" {
                files.extend(self.markdown_files(&entry.path).await?);
            }
        }
        Ok(files)
    }

    async fn markdown_files_via_tree(&self, dir: &str) -> Result<Vec<String>> {
        let url = self.tree_url();
        debug!(url = %url, "tree listing");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("GET {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "{url} returned HTTP {status}"
            )));
        }
        let tree: TreeResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("{url}: {e}")))?;

        let prefix = format!("{dir}/");
        Ok(tree
            .tree
            .into_iter()
            .filter(|entry| {
                entry.entry_type == "blob"
                    && entry.path.starts_with(&prefix)
                    && entry.path.ends_with(".md")
            })
            .map(|entry| entry.path)
            .collect())
    }

    async fn fetch_lesson(&self, repo_path: &str) -> Result<Lesson> {
        let raw = self.file_content(repo_path).await?;
        Ok(frontmatter::lesson_from_markdown(
            self.lesson_path(repo_path),
            &raw,
            chrono::Utc::now(),
        ))
    }

    /// All lessons under the content directory. Individually unreadable or
    /// unparsable documents are skipped, never aborting the listing.
    async fn all_lessons(&self) -> Result<LessonList> {
        let files = self.markdown_files(&self.config.content_dir).await?;
        let mut lessons = Vec::with_capacity(files.len());
        for repo_path in files {
            match self.fetch_lesson(&repo_path).await {
                Ok(lesson) => lessons.push(lesson),
                Err(err) => {
                    warn!(path = %repo_path, error = %err, "skipping unreadable lesson");
                }
            }
        }
        catalog::sort_lessons(&mut lessons);
        Ok(LessonList { lessons })
    }
}

fn decode_entry_content(entry: &ContentsEntry) -> Result<String> {
    match (entry.encoding.as_deref(), entry.content.as_deref()) {
        (Some("base64"), Some(content)) => {
            let cleaned: String = content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = BASE64
                .decode(cleaned)
                .map_err(|e| Error::Parse(format!("{}: bad base64 content: {e}", entry.path)))?;
            String::from_utf8(bytes)
                .map_err(|e| Error::Parse(format!("{}: content is not UTF-8: {e}", entry.path)))
        }
        (_, content) => Ok(content.unwrap_or_default().to_string()),
    }
}

#[async_trait]
impl ContentSource for RepositorySource {
    async fn list_lessons(&self) -> Result<LessonList> {
        self.all_lessons().await
    }

    async fn list_tags(&self) -> Result<TagIndex> {
        let list = self.all_lessons().await?;
        Ok(catalog::count_tags(&list.lessons))
    }

    async fn hierarchy(&self) -> Result<Vec<HierarchyNode>> {
        let list = self.all_lessons().await?;
        Ok(catalog::build_hierarchy(&list.lessons))
    }

    async fn lesson(&self, path: &str) -> Result<Lesson> {
        self.fetch_lesson(&self.repo_path(path)).await
    }

    async fn navigation(&self, path: &str) -> Result<NavigationInfo> {
        let list = self.all_lessons().await?;
        Ok(catalog::navigation(&list.lessons, normalize_path(path)))
    }

    async fn search(&self, query: &str, tags: Option<&[String]>) -> Result<LessonList> {
        let list = self.all_lessons().await?;
        Ok(LessonList {
            lessons: catalog::search(&list.lessons, query, tags),
        })
    }
}
