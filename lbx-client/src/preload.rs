//! Background cache warm-up for anticipated navigation
//!
//! Preloads are fire-and-forget: they go through the same orchestrator
//! fetch (so a warmed entry is exactly the entry an on-demand fetch would
//! produce), their results are discarded beyond the caching side effect,
//! and their failures are logged, never surfaced. The settle delay guards
//! against wasting bandwidth on rapid path changes; cancelling a handle
//! invalidates a preload that has not fired yet, while one already past its
//! delay runs to completion harmlessly.

use lbx_common::model::{LessonList, NavigationInfo};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::PreloadConfig;
use crate::orchestrator::LessonClient;
use crate::request::FetchRequest;

/// Default settle delay before warming the next lesson.
pub const DEFAULT_NEXT_DELAY: Duration = Duration::from_millis(1000);

/// Default settle delay before warming a lesson list.
pub const DEFAULT_LIST_DELAY: Duration = Duration::from_millis(2000);

/// Default number of leading lessons of a listing to warm.
pub const DEFAULT_WARM_FIRST: usize = 3;

/// Opportunistic cache warmer built over a [`LessonClient`].
#[derive(Clone)]
pub struct Preloader {
    client: LessonClient,
    next_delay: Duration,
    list_delay: Duration,
    warm_first: usize,
}

impl Preloader {
    pub fn new(client: LessonClient) -> Self {
        Self {
            client,
            next_delay: DEFAULT_NEXT_DELAY,
            list_delay: DEFAULT_LIST_DELAY,
            warm_first: DEFAULT_WARM_FIRST,
        }
    }

    pub fn from_config(client: LessonClient, config: &PreloadConfig) -> Self {
        Self {
            client,
            next_delay: config.next_delay(),
            list_delay: config.list_delay(),
            warm_first: config.warm_first,
        }
    }

    /// Warm the next lesson and its navigation metadata once the user
    /// settles on the current one. Returns `None` when there is no next
    /// lesson to warm.
    pub fn schedule_next(&self, navigation: &NavigationInfo) -> Option<PreloadHandle> {
        let next = navigation.next.as_ref()?;
        let requests = vec![
            FetchRequest::GetLesson(next.path.clone()),
            FetchRequest::GetNavigation(next.path.clone()),
        ];
        Some(self.spawn(requests, self.next_delay))
    }

    /// Warm a short list of lessons, e.g. the first few of a listing.
    pub fn schedule_lessons<I>(&self, paths: I) -> PreloadHandle
    where
        I: IntoIterator<Item = String>,
    {
        let requests = paths.into_iter().map(FetchRequest::GetLesson).collect();
        self.spawn(requests, self.list_delay)
    }

    /// Warm the leading lessons of a listing (the ones a reader opens first).
    pub fn schedule_leading(&self, list: &LessonList) -> PreloadHandle {
        self.schedule_lessons(
            list.lessons
                .iter()
                .take(self.warm_first)
                .map(|lesson| lesson.path.clone()),
        )
    }

    fn spawn(&self, requests: Vec<FetchRequest>, delay: Duration) -> PreloadHandle {
        let client = self.client.clone();
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!("preload cancelled before firing");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            for request in requests {
                if let Err(err) = client.fetch(request.clone()).await {
                    warn!(request = ?request, error = %err, "preload fetch failed");
                }
            }
        });
        PreloadHandle { token, task }
    }
}

/// Handle to a scheduled preload.
pub struct PreloadHandle {
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl PreloadHandle {
    /// Cancel the preload if it has not fired yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the preload task to finish (test/diagnostic use).
    pub async fn finished(self) {
        let _ = self.task.await;
    }
}
