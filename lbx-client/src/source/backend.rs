//! REST backend content source
//!
//! Each contract operation maps to one HTTP call against the content API;
//! responses arrive already normalized to the domain shapes, so this adapter
//! is a thin transport layer.

use async_trait::async_trait;
use lbx_common::model::{
    normalize_path, HierarchyNode, HierarchyResponse, Lesson, LessonList, NavigationInfo,
    SearchRequest, TagIndex, TagsResponse,
};
use lbx_common::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::ContentSource;

const USER_AGENT: &str = concat!("lessonbox/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Content source backed by the lesson REST API.
pub struct BackendSource {
    http: reqwest::Client,
    base_url: String,
}

impl BackendSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::SourceUnavailable(format!("HTTP client setup failed: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "backend GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("GET {url}: {e}")))?;
        Self::read_json(url, response).await
    }

    async fn read_json<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "{url} returned HTTP {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("{url}: {e}")))
    }
}

#[async_trait]
impl ContentSource for BackendSource {
    async fn list_lessons(&self) -> Result<LessonList> {
        self.get_json(&self.url("lessons")).await
    }

    async fn list_tags(&self) -> Result<TagIndex> {
        let response: TagsResponse = self.get_json(&self.url("tags")).await?;
        Ok(response.tags)
    }

    async fn hierarchy(&self) -> Result<Vec<HierarchyNode>> {
        let response: HierarchyResponse = self.get_json(&self.url("hierarchy")).await?;
        Ok(response.hierarchy)
    }

    async fn lesson(&self, path: &str) -> Result<Lesson> {
        let path = normalize_path(path);
        match self
            .get_json(&self.url(&format!("lessons/{path}")))
            .await
        {
            Err(Error::NotFound(_)) => Err(Error::NotFound(path.to_string())),
            other => other,
        }
    }

    async fn navigation(&self, path: &str) -> Result<NavigationInfo> {
        let path = normalize_path(path);
        self.get_json(&self.url(&format!("navigation/{path}")))
            .await
    }

    async fn search(&self, query: &str, tags: Option<&[String]>) -> Result<LessonList> {
        let url = self.url("search");
        let body = SearchRequest {
            query: query.to_string(),
            tags: tags.map(<[String]>::to_vec),
        };
        debug!(url = %url, query = %query, "backend search");
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("POST {url}: {e}")))?;
        Self::read_json(&url, response).await
    }
}
