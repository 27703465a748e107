//! Shared test doubles for the publishing integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use gridiron_publisher::publishing::{
    PlatformClient, PlatformError, Post, PostMetadata, PublicationLogger, PublicationResult,
    PublicationStatus, ValidationResult,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Scripted outcome for one publish attempt.
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// Platform accepts the post and assigns this id.
    Succeed { post_id: String, url: Option<String> },
    /// Platform responds with `success: false`.
    FailResult(String),
    /// Client-level error (network, timeout, ...).
    Throw(String),
}

impl PublishOutcome {
    pub fn succeed(post_id: &str) -> Self {
        Self::Succeed {
            post_id: post_id.to_string(),
            url: Some(format!("https://blog.example/posts/{post_id}")),
        }
    }
}

/// Platform client double with per-call scripting and call counting.
///
/// Successful publishes store the submitted post so later fetches see what
/// a real platform would return.
pub struct MockPlatformClient {
    name: String,
    script: Mutex<VecDeque<PublishOutcome>>,
    default_outcome: PublishOutcome,
    store_on_publish: bool,
    remote_post: Mutex<Option<Post>>,
    publish_calls: AtomicU32,
    fetch_calls: AtomicU32,
    authenticated: AtomicBool,
}

impl MockPlatformClient {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            default_outcome: PublishOutcome::succeed(&format!("{name}-1")),
            store_on_publish: true,
            remote_post: Mutex::new(None),
            publish_calls: AtomicU32::new(0),
            fetch_calls: AtomicU32::new(0),
            authenticated: AtomicBool::new(true),
        }
    }

    /// Queue outcomes consumed one per publish call; once exhausted the
    /// default outcome repeats.
    pub fn with_outcomes(self, outcomes: Vec<PublishOutcome>) -> Self {
        *self.script.lock() = outcomes.into();
        self
    }

    pub fn with_default_outcome(mut self, outcome: PublishOutcome) -> Self {
        self.default_outcome = outcome;
        self
    }

    /// Accept publishes without remembering the post, so fetches fail.
    pub fn without_remote_storage(mut self) -> Self {
        self.store_on_publish = false;
        self
    }

    pub fn publish_calls(&self) -> u32 {
        self.publish_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn set_authenticated(&self, value: bool) {
        self.authenticated.store(value, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlatformClient for MockPlatformClient {
    fn platform_name(&self) -> &str {
        &self.name
    }

    async fn authenticate(&self) -> Result<(), PlatformError> {
        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn publish_post(&self, post: &Post) -> Result<PublicationResult, PlatformError> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default_outcome.clone());

        match outcome {
            PublishOutcome::Succeed { post_id, url } => {
                if self.store_on_publish {
                    *self.remote_post.lock() = Some(post.clone());
                }
                Ok(PublicationResult::published(post_id, url))
            }
            PublishOutcome::FailResult(error) => Ok(PublicationResult::failure(error)),
            PublishOutcome::Throw(message) => Err(PlatformError::network(message)),
        }
    }

    async fn update_post(
        &self,
        post_id: &str,
        post: &Post,
    ) -> Result<PublicationResult, PlatformError> {
        *self.remote_post.lock() = Some(post.clone());
        Ok(PublicationResult::published(post_id, None))
    }

    async fn delete_post(&self, _post_id: &str) -> Result<bool, PlatformError> {
        Ok(self.remote_post.lock().take().is_some())
    }

    async fn get_post(&self, post_id: &str) -> Result<Post, PlatformError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.remote_post
            .lock()
            .clone()
            .ok_or_else(|| PlatformError::post_not_found(post_id))
    }

    async fn list_posts(
        &self,
        _limit: Option<usize>,
        _offset: Option<usize>,
    ) -> Result<Vec<Post>, PlatformError> {
        Ok(self.remote_post.lock().clone().into_iter().collect())
    }

    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

/// Logger double recording every publication event as a tagged string.
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().push(event);
    }
}

impl PublicationLogger for RecordingLogger {
    fn publish_success(&self, platform: &str, post_id: &str, _url: Option<&str>) {
        self.record(format!("success:{platform}:{post_id}"));
    }

    fn publish_failure(&self, platform: &str, attempt: u32, _error: &str) {
        self.record(format!("failure:{platform}:{attempt}"));
    }

    fn fallback_switch(&self, from: &str, to: &str) {
        self.record(format!("fallback:{from}->{to}"));
    }

    fn validation_outcome(&self, platform: &str, post_id: &str, result: &ValidationResult) {
        self.record(format!("validated:{platform}:{post_id}:{}", result.is_valid));
    }

    fn validation_retry(&self, platform: &str, post_id: &str, attempt: u32, _error: &str) {
        self.record(format!("validation_retry:{platform}:{post_id}:{attempt}"));
    }

    fn validation_exhausted(&self, platform: &str, post_id: &str, _errors: &str) {
        self.record(format!("validation_exhausted:{platform}:{post_id}"));
    }

    fn status_tracked(&self, status: &PublicationStatus) {
        self.record(format!("tracked:{}:{}", status.platform, status.post_id));
    }
}

/// A complete weekly post with realistic metadata.
pub fn weekly_post() -> Post {
    let mut post = Post::new(
        "Week 10 Waiver Wire Targets",
        "The three pickups that matter before Sunday kickoff.",
        "Deep dive on this week's waiver options, snap counts, and matchup notes.",
    );
    post.metadata = PostMetadata {
        tags: vec!["fantasy".into(), "waivers".into(), "week-10".into()],
        categories: vec!["Analysis".into()],
        author: "gridiron-bot".into(),
        ..Default::default()
    };
    post
}
