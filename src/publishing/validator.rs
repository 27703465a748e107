//! # Publication Validator
//!
//! Confirms that a published artifact actually exists on the remote platform
//! and matches what was sent: fuzzy text similarity for title and body,
//! Jaccard overlap for tags and categories.
//!
//! The API is infallible by design: every failure mode (unknown platform,
//! unreachable remote, missing post) folds into the returned
//! `ValidationResult` rather than propagating, so a flaky platform can never
//! abort the publish path that called us.

use crate::publishing::logger::{PublicationLogger, TracingLogger};
use crate::publishing::platform::PlatformClient;
use crate::publishing::retry::BackoffPolicy;
use crate::publishing::similarity::{
    normalize_labels, normalize_text, set_overlap, strip_markup, text_similarity,
    BODY_SIMILARITY_THRESHOLD, METADATA_OVERLAP_THRESHOLD, TITLE_SIMILARITY_THRESHOLD,
};
use crate::publishing::tracker::PublicationTracker;
use crate::publishing::types::{
    Post, PublicationResult, ValidationRequest, ValidationResult,
};
use chrono::Utc;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Confirmation retry settings.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Confirmation attempts before giving up.
    pub max_retries: u32,
    /// Base delay between confirmation attempts; grows linearly with the
    /// attempt number so slow CDN propagation gets progressively more time.
    pub retry_delay: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(5000),
        }
    }
}

/// Compares locally-authored posts against their remote copies.
pub struct PublicationValidator {
    clients: Arc<HashMap<String, Arc<dyn PlatformClient>>>,
    tracker: Arc<PublicationTracker>,
    logger: Arc<dyn PublicationLogger>,
    config: ValidatorConfig,
}

impl PublicationValidator {
    pub fn new(
        clients: Arc<HashMap<String, Arc<dyn PlatformClient>>>,
        tracker: Arc<PublicationTracker>,
    ) -> Self {
        Self {
            clients,
            tracker,
            logger: Arc::new(TracingLogger),
            config: ValidatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn PublicationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Fetch the remote post and compare it against `original`.
    ///
    /// Unknown platforms and fetch failures produce `errors`; a retrieved
    /// post that merely differs produces `warnings` and failed match flags.
    pub async fn validate_publication(
        &self,
        post_id: &str,
        platform: &str,
        original: &Post,
    ) -> ValidationResult {
        let result = self.validate_inner(post_id, platform, original).await;
        self.logger.validation_outcome(platform, post_id, &result);
        result
    }

    async fn validate_inner(
        &self,
        post_id: &str,
        platform: &str,
        original: &Post,
    ) -> ValidationResult {
        let Some(client) = self.clients.get(platform) else {
            return ValidationResult::invalid(format!("Platform {platform} not available"));
        };

        let remote = match client.get_post(post_id).await {
            Ok(post) => post,
            Err(e) => {
                return ValidationResult::invalid(format!(
                    "Failed to fetch post {post_id} from {platform}: {e}"
                ));
            }
        };

        let mut warnings = Vec::new();

        let content_matches = self.compare_content(original, &remote, &mut warnings);
        let metadata_matches = self.compare_metadata(original, &remote, &mut warnings);

        ValidationResult {
            is_valid: content_matches && metadata_matches,
            post_exists: true,
            content_matches,
            metadata_matches,
            errors: Vec::new(),
            warnings,
            last_checked: Utc::now(),
        }
    }

    fn compare_content(&self, original: &Post, remote: &Post, warnings: &mut Vec<String>) -> bool {
        let title_similarity = text_similarity(
            &normalize_text(&original.title),
            &normalize_text(&remote.title),
        );
        let body_similarity = text_similarity(
            &normalize_text(&strip_markup(&original.body)),
            &normalize_text(&strip_markup(&remote.body)),
        );

        debug!(
            title_similarity = title_similarity,
            body_similarity = body_similarity,
            "Content comparison scores"
        );

        let title_ok = title_similarity >= TITLE_SIMILARITY_THRESHOLD;
        let body_ok = body_similarity >= BODY_SIMILARITY_THRESHOLD;

        if !title_ok {
            warnings.push(format!(
                "Title similarity {title_similarity:.2} below threshold {TITLE_SIMILARITY_THRESHOLD}"
            ));
        }
        if !body_ok {
            warnings.push(format!(
                "Body similarity {body_similarity:.2} below threshold {BODY_SIMILARITY_THRESHOLD}"
            ));
        }

        title_ok && body_ok
    }

    fn compare_metadata(&self, original: &Post, remote: &Post, warnings: &mut Vec<String>) -> bool {
        let tag_overlap = set_overlap(
            &normalize_labels(&original.metadata.tags),
            &normalize_labels(&remote.metadata.tags),
        );
        let category_overlap = set_overlap(
            &normalize_labels(&original.metadata.categories),
            &normalize_labels(&remote.metadata.categories),
        );

        let tags_ok = tag_overlap >= METADATA_OVERLAP_THRESHOLD;
        let categories_ok = category_overlap >= METADATA_OVERLAP_THRESHOLD;

        if !tags_ok {
            warnings.push(format!(
                "Tag overlap {tag_overlap:.2} below threshold {METADATA_OVERLAP_THRESHOLD}"
            ));
        }
        if !categories_ok {
            warnings.push(format!(
                "Category overlap {category_overlap:.2} below threshold {METADATA_OVERLAP_THRESHOLD}"
            ));
        }

        tags_ok && categories_ok
    }

    /// Confirm a publish result with bounded retries: validate, and on a
    /// valid outcome track the publication; otherwise back off linearly and
    /// try again up to `max_retries` total attempts.
    ///
    /// An unsuccessful or id-less upstream result short-circuits without any
    /// platform contact.
    pub async fn confirm_publication(
        &self,
        result: &PublicationResult,
        platform: &str,
        original: &Post,
    ) -> ValidationResult {
        let Some(post_id) = result.post_id.as_deref().filter(|_| result.success) else {
            return ValidationResult::invalid("Cannot confirm unsuccessful publication");
        };

        let policy = BackoffPolicy::Linear {
            delay: self.config.retry_delay,
        };
        let max_retries = self.config.max_retries.max(1);
        let mut last: Option<ValidationResult> = None;

        for attempt in 1..=max_retries {
            let validation = self.validate_publication(post_id, platform, original).await;

            if validation.is_valid {
                if let Some(status) = self.tracker.track_publication(result, platform) {
                    self.logger.status_tracked(&status);
                }
                return validation;
            }

            // Results carrying errors mean the platform could not be
            // queried at all; log those as retry events.
            if !validation.errors.is_empty() {
                self.logger.validation_retry(
                    platform,
                    post_id,
                    attempt,
                    &validation.errors.join("; "),
                );
            }

            last = Some(validation);
            if attempt < max_retries {
                tokio::time::sleep(policy.delay_for(attempt)).await;
            }
        }

        let failed = last
            .unwrap_or_else(|| ValidationResult::invalid("Validation failed completely"));
        let summary = if failed.errors.is_empty() {
            failed.warnings.join("; ")
        } else {
            failed.errors.join("; ")
        };
        self.logger.validation_exhausted(platform, post_id, &summary);
        failed
    }

    /// Validate many publications concurrently. Every request produces
    /// exactly one entry keyed `"<platform>:<post_id>"`; one entry's failure
    /// never aborts its siblings.
    pub async fn batch_validate(
        &self,
        requests: &[ValidationRequest],
    ) -> HashMap<String, ValidationResult> {
        let futures = requests.iter().map(|request| async move {
            let key = format!("{}:{}", request.platform, request.post_id);
            let result = self
                .validate_publication(&request.post_id, &request.platform, &request.post)
                .await;
            (key, result)
        });

        join_all(futures).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publishing::platform::PlatformError;
    use crate::publishing::types::PostMetadata;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Client returning a scripted remote post, counting fetches.
    struct ScriptedClient {
        name: String,
        remote: Mutex<Option<Post>>,
        fetches: Mutex<u32>,
    }

    impl ScriptedClient {
        fn serving(name: &str, post: Post) -> Self {
            Self {
                name: name.to_string(),
                remote: Mutex::new(Some(post)),
                fetches: Mutex::new(0),
            }
        }

        fn failing(name: &str) -> Self {
            Self {
                name: name.to_string(),
                remote: Mutex::new(None),
                fetches: Mutex::new(0),
            }
        }

        fn fetch_count(&self) -> u32 {
            *self.fetches.lock()
        }
    }

    #[async_trait]
    impl PlatformClient for ScriptedClient {
        fn platform_name(&self) -> &str {
            &self.name
        }

        async fn authenticate(&self) -> Result<(), PlatformError> {
            Ok(())
        }

        async fn publish_post(&self, _post: &Post) -> Result<PublicationResult, PlatformError> {
            Ok(PublicationResult::published("p-1", None))
        }

        async fn update_post(
            &self,
            post_id: &str,
            _post: &Post,
        ) -> Result<PublicationResult, PlatformError> {
            Ok(PublicationResult::published(post_id, None))
        }

        async fn delete_post(&self, _post_id: &str) -> Result<bool, PlatformError> {
            Ok(true)
        }

        async fn get_post(&self, post_id: &str) -> Result<Post, PlatformError> {
            *self.fetches.lock() += 1;
            self.remote
                .lock()
                .clone()
                .ok_or_else(|| PlatformError::network(format!("fetch of {post_id} refused")))
        }

        async fn list_posts(
            &self,
            _limit: Option<usize>,
            _offset: Option<usize>,
        ) -> Result<Vec<Post>, PlatformError> {
            Ok(Vec::new())
        }

        async fn is_authenticated(&self) -> bool {
            true
        }
    }

    fn weekly_post() -> Post {
        let mut post = Post::new(
            "Week 10 Waiver Wire Targets",
            "The pickups that matter before Sunday.",
            "Grab these three running backs before your league mates wake up.",
        );
        post.metadata = PostMetadata {
            tags: vec!["fantasy".into(), "waivers".into(), "week-10".into()],
            categories: vec!["Analysis".into()],
            author: "gridiron-bot".into(),
            ..Default::default()
        };
        post
    }

    fn validator_with(
        clients: Vec<Arc<dyn PlatformClient>>,
    ) -> (PublicationValidator, Arc<PublicationTracker>) {
        let map: HashMap<String, Arc<dyn PlatformClient>> = clients
            .into_iter()
            .map(|c| (c.platform_name().to_string(), c))
            .collect();
        let tracker = Arc::new(PublicationTracker::new());
        let validator = PublicationValidator::new(Arc::new(map), tracker.clone()).with_config(
            ValidatorConfig {
                max_retries: 3,
                retry_delay: Duration::from_millis(1),
            },
        );
        (validator, tracker)
    }

    #[tokio::test]
    async fn test_unknown_platform_yields_error_naming_it() {
        let (validator, _) = validator_with(vec![]);
        let result = validator
            .validate_publication("p-1", "ghost-cms", &weekly_post())
            .await;

        assert!(!result.is_valid);
        assert!(!result.post_exists);
        assert!(result.errors[0].contains("ghost-cms"));
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_post_missing() {
        let client = Arc::new(ScriptedClient::failing("wordpress"));
        let (validator, _) = validator_with(vec![client]);

        let result = validator
            .validate_publication("p-1", "wordpress", &weekly_post())
            .await;

        assert!(!result.post_exists);
        assert!(!result.content_matches);
        assert!(!result.metadata_matches);
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_identical_post_is_valid() {
        let post = weekly_post();
        let client = Arc::new(ScriptedClient::serving("wordpress", post.clone()));
        let (validator, _) = validator_with(vec![client]);

        let result = validator.validate_publication("p-1", "wordpress", &post).await;

        assert!(result.is_valid);
        assert!(result.post_exists);
        assert!(result.content_matches);
        assert!(result.metadata_matches);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_markup_and_case_do_not_break_content_match() {
        let post = weekly_post();
        let mut remote = post.clone();
        remote.title = post.title.to_uppercase();
        remote.body = format!("<p>{}</p>", post.body);
        let client = Arc::new(ScriptedClient::serving("wordpress", remote));
        let (validator, _) = validator_with(vec![client]);

        let result = validator.validate_publication("p-1", "wordpress", &post).await;
        assert!(result.content_matches);
    }

    #[tokio::test]
    async fn test_diverged_body_warns_but_does_not_error() {
        let post = weekly_post();
        let mut remote = post.clone();
        remote.body = "Completely unrelated placeholder text from the platform.".into();
        let client = Arc::new(ScriptedClient::serving("wordpress", remote));
        let (validator, _) = validator_with(vec![client]);

        let result = validator.validate_publication("p-1", "wordpress", &post).await;

        assert!(!result.is_valid);
        assert!(result.post_exists);
        assert!(!result.content_matches);
        assert!(result.errors.is_empty());
        assert!(!result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_metadata_mismatch_fails_validity() {
        let post = weekly_post();
        let mut remote = post.clone();
        remote.metadata.tags = vec!["baseball".into(), "trades".into(), "injuries".into()];
        let client = Arc::new(ScriptedClient::serving("wordpress", remote));
        let (validator, _) = validator_with(vec![client]);

        let result = validator.validate_publication("p-1", "wordpress", &post).await;

        assert!(result.content_matches);
        assert!(!result.metadata_matches);
        assert!(!result.is_valid);
    }

    #[tokio::test]
    async fn test_confirm_short_circuits_without_post_id() {
        let client = Arc::new(ScriptedClient::serving("wordpress", weekly_post()));
        let counting = client.clone();
        let (validator, _) = validator_with(vec![client]);

        let failed = PublicationResult::failure("upstream exploded");
        let result = validator
            .confirm_publication(&failed, "wordpress", &weekly_post())
            .await;

        assert!(!result.is_valid);
        assert_eq!(counting.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_confirm_retries_exactly_max_times_on_fetch_failure() {
        let client = Arc::new(ScriptedClient::failing("wordpress"));
        let counting = client.clone();
        let (validator, tracker) = validator_with(vec![client]);

        let published = PublicationResult::published("p-1", None);
        let result = validator
            .confirm_publication(&published, "wordpress", &weekly_post())
            .await;

        assert!(!result.is_valid);
        assert_eq!(counting.fetch_count(), 3);
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_tracks_on_success() {
        let post = weekly_post();
        let client = Arc::new(ScriptedClient::serving("wordpress", post.clone()));
        let (validator, tracker) = validator_with(vec![client]);

        let published = PublicationResult::published("p-1", None);
        let result = validator.confirm_publication(&published, "wordpress", &post).await;

        assert!(result.is_valid);
        let status = tracker.publication_status("p-1").unwrap();
        assert_eq!(status.platform, "wordpress");
    }

    #[tokio::test]
    async fn test_batch_validate_returns_entry_per_request() {
        let post = weekly_post();
        let good = Arc::new(ScriptedClient::serving("wordpress", post.clone()));
        let bad = Arc::new(ScriptedClient::failing("medium"));
        let (validator, _) = validator_with(vec![good, bad]);

        let requests = vec![
            ValidationRequest {
                post_id: "p-1".into(),
                platform: "wordpress".into(),
                post: post.clone(),
            },
            ValidationRequest {
                post_id: "p-2".into(),
                platform: "medium".into(),
                post: post.clone(),
            },
            ValidationRequest {
                post_id: "p-3".into(),
                platform: "nowhere".into(),
                post,
            },
        ];

        let results = validator.batch_validate(&requests).await;

        assert_eq!(results.len(), 3);
        assert!(results["wordpress:p-1"].is_valid);
        assert!(!results["medium:p-2"].post_exists);
        assert!(results["nowhere:p-3"].errors[0].contains("nowhere"));
    }
}
