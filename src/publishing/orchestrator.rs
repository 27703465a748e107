//! # Publishing Orchestrator
//!
//! Top-level component of the publication subsystem. Owns the configured
//! platform clients and drives the publish attempt: optimize the post,
//! publish to the primary platform with linear-backoff retry, confirm the
//! remote copy through the validator, and fall back to alternate platforms
//! in declared order when the primary exhausts its retries.
//!
//! ## Failure semantics
//!
//! Platform-level failures never propagate as errors; they become
//! `PublicationResult { success: false }` values. When every fallback also
//! fails, the caller receives the *original primary* failure, since that is
//! the platform they asked for. Only a missing platform mapping surfaces as
//! a `PublisherError`.
//!
//! Attempts are strictly sequential. Primary retries exhaust before any
//! fallback is contacted, so the same artifact is never in flight to two
//! platforms at once.

use crate::config::PublisherConfig;
use crate::error::{PublisherError, Result};
use crate::publishing::logger::{PublicationLogger, TracingLogger};
use crate::publishing::platform::PlatformClient;
use crate::publishing::retry::{retry_with_backoff, BackoffPolicy};
use crate::publishing::tracker::PublicationTracker;
use crate::publishing::types::{
    PlatformMetrics, Post, PublicationMetrics, PublicationResult, PublicationState,
    PublicationStatus, StatusUpdate, ValidationRequest, ValidationResult,
};
use crate::publishing::validator::{PublicationValidator, ValidatorConfig};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Fixed error returned when a post fails structural validation. No
/// platform is contacted in that case.
pub const POST_VALIDATION_FAILED: &str = "Post validation failed";

/// Summary length bound applied during post optimization.
pub const MAX_SUMMARY_LENGTH: usize = 300;

/// SEO title length bound (search engines truncate around here).
pub const MAX_SEO_TITLE_LENGTH: usize = 70;

/// SEO description length bound.
pub const MAX_SEO_DESCRIPTION_LENGTH: usize = 160;

/// Drives publication across the configured platforms.
pub struct PublishingOrchestrator {
    config: PublisherConfig,
    clients: Arc<HashMap<String, Arc<dyn PlatformClient>>>,
    validator: PublicationValidator,
    tracker: Arc<PublicationTracker>,
    logger: Arc<dyn PublicationLogger>,
}

impl PublishingOrchestrator {
    /// Build an orchestrator over the given platform clients. Clients are
    /// keyed by their reported platform name.
    pub fn new(config: PublisherConfig, clients: Vec<Arc<dyn PlatformClient>>) -> Result<Self> {
        config.validate()?;

        let clients: Arc<HashMap<String, Arc<dyn PlatformClient>>> = Arc::new(
            clients
                .into_iter()
                .map(|c| (c.platform_name().to_string(), c))
                .collect(),
        );
        let tracker = Arc::new(PublicationTracker::new());
        let validator = PublicationValidator::new(clients.clone(), tracker.clone()).with_config(
            ValidatorConfig {
                max_retries: config.validation.max_retries,
                retry_delay: config.validation.retry_delay(),
            },
        );

        info!(
            primary = %config.primary_platform,
            fallbacks = ?config.fallback_platforms,
            platforms = clients.len(),
            "Creating publishing orchestrator"
        );

        Ok(Self {
            config,
            clients,
            validator,
            tracker,
            logger: Arc::new(TracingLogger),
        })
    }

    /// Replace the publication event sink (tests inject recording doubles).
    pub fn with_logger(mut self, logger: Arc<dyn PublicationLogger>) -> Self {
        self.validator = PublicationValidator::new(self.clients.clone(), self.tracker.clone())
            .with_config(ValidatorConfig {
                max_retries: self.config.validation.max_retries,
                retry_delay: self.config.validation.retry_delay(),
            })
            .with_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// Publish a post: primary platform with retry, then fallbacks in
    /// declared order. Returns the first success, or the primary's failure
    /// when everything fails.
    pub async fn publish(&self, post: &Post) -> Result<PublicationResult> {
        let correlation_id = format!("pub_{}", &Uuid::new_v4().to_string()[..8]);

        if self.config.validate_before_publish {
            if let Err(reason) = validate_post_structure(post) {
                warn!(
                    correlation_id = %correlation_id,
                    reason = %reason,
                    "❌ PUBLISH: Post rejected before any platform contact"
                );
                return Ok(PublicationResult::failure(POST_VALIDATION_FAILED));
            }
        }

        let optimized = optimize_post(post);
        let primary = self.config.primary_platform.clone();

        info!(
            correlation_id = %correlation_id,
            platform = %primary,
            title = %optimized.title,
            "Publishing post to primary platform"
        );

        let primary_result = self.attempt_platform(&primary, &optimized).await?;
        if primary_result.success {
            return Ok(self.confirm_if_tracking(primary_result, &primary, &optimized).await);
        }

        let mut previous = primary.clone();
        for fallback in &self.config.fallback_platforms {
            self.logger.fallback_switch(&previous, fallback);
            let result = self.attempt_platform(fallback, &optimized).await?;
            if result.success {
                return Ok(self.confirm_if_tracking(result, fallback, &optimized).await);
            }
            previous = fallback.clone();
        }

        // Every platform failed; the primary's failure is the caller-facing
        // answer, not whichever fallback happened to fail last.
        Ok(primary_result)
    }

    /// One platform's bounded retry loop: up to `retry_attempts` tries with
    /// linear backoff between failures. A thrown client error and a
    /// `success: false` result are treated the same way.
    async fn attempt_platform(&self, platform: &str, post: &Post) -> Result<PublicationResult> {
        let client = self.client(platform)?;
        let attempts = self.config.retry_attempts.max(1);
        let policy = BackoffPolicy::Linear {
            delay: self.config.retry_delay(),
        };

        let outcome: std::result::Result<PublicationResult, String> =
            retry_with_backoff(attempts, policy, |attempt| {
                let client = client.clone();
                async move {
                    let error = match client.publish_post(post).await {
                        Ok(result) if result.success => {
                            self.logger.publish_success(
                                platform,
                                result.post_id.as_deref().unwrap_or(""),
                                result.url.as_deref(),
                            );
                            return Ok(result);
                        }
                        Ok(result) => result
                            .error
                            .unwrap_or_else(|| "unknown platform error".to_string()),
                        Err(e) => e.to_string(),
                    };
                    self.logger.publish_failure(platform, attempt, &error);
                    Err(error)
                }
            })
            .await;

        Ok(outcome.unwrap_or_else(|last_error| {
            PublicationResult::failure(format!(
                "Failed to publish to {platform} after {attempts} attempts: {last_error}"
            ))
        }))
    }

    /// Post-publish confirmation hand-off. Only runs when status tracking is
    /// enabled. A failed confirmation logs a warning and, unless strict
    /// confirmation is configured, leaves the success result untouched.
    async fn confirm_if_tracking(
        &self,
        result: PublicationResult,
        platform: &str,
        optimized: &Post,
    ) -> PublicationResult {
        if !self.config.track_publication_status {
            return result;
        }

        let validation = self
            .validator
            .confirm_publication(&result, platform, optimized)
            .await;

        if validation.is_valid || !self.config.strict_confirmation {
            if !validation.is_valid {
                warn!(
                    platform = platform,
                    post_id = result.post_id.as_deref(),
                    "⚠️ PUBLISH: Platform accepted the post but confirmation failed"
                );
            }
            return result;
        }

        // Strict mode: an unconfirmed publish is reported as a failure,
        // keeping the remote id so callers can reconcile manually.
        PublicationResult {
            success: false,
            error: Some(format!(
                "Publication to {platform} could not be confirmed: {}",
                validation
                    .errors
                    .iter()
                    .chain(validation.warnings.iter())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("; ")
            )),
            status: PublicationState::Failed,
            ..result
        }
    }

    // ── Management operations (single-shot, no retry) ──────────────────

    /// Whether the remote post can be fetched from the platform.
    pub async fn verify_publication(&self, post_id: &str, platform: &str) -> Result<bool> {
        let client = self.client(platform)?;
        Ok(client.get_post(post_id).await.is_ok())
    }

    /// Update an existing remote post. Client errors become failure results.
    pub async fn update_post(
        &self,
        post_id: &str,
        platform: &str,
        post: &Post,
    ) -> Result<PublicationResult> {
        let client = self.client(platform)?;
        let optimized = optimize_post(post);
        match client.update_post(post_id, &optimized).await {
            Ok(result) => Ok(result),
            Err(e) => Ok(PublicationResult::failure(format!(
                "Failed to update post {post_id} on {platform}: {e}"
            ))),
        }
    }

    /// Delete a remote post; the tracked history goes with it.
    pub async fn delete_post(&self, post_id: &str, platform: &str) -> Result<bool> {
        let client = self.client(platform)?;
        match client.delete_post(post_id).await {
            Ok(true) => {
                self.tracker.remove_publication(post_id);
                info!(post_id = post_id, platform = platform, "Post deleted");
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                warn!(
                    post_id = post_id,
                    platform = platform,
                    error = %e,
                    "Failed to delete post"
                );
                Ok(false)
            }
        }
    }

    /// Platform health, delegated to the client's authentication state.
    pub async fn check_platform_health(&self, platform: &str) -> Result<bool> {
        Ok(self.client(platform)?.is_authenticated().await)
    }

    /// Re-run authentication and report the resulting state.
    pub async fn refresh_platform_authentication(&self, platform: &str) -> Result<bool> {
        let client = self.client(platform)?;
        if let Err(e) = client.authenticate().await {
            warn!(platform = platform, error = %e, "Re-authentication failed");
        }
        Ok(client.is_authenticated().await)
    }

    /// Names of all configured platforms.
    pub fn available_platforms(&self) -> Vec<String> {
        self.clients.keys().cloned().collect()
    }

    /// Published/failed counts per platform, derived from tracker history.
    pub fn publication_metrics(&self) -> PublicationMetrics {
        let publications = self.tracker.all_publications();
        let mut metrics = PublicationMetrics {
            total_tracked: publications.len(),
            by_platform: HashMap::new(),
        };

        for history in publications.values() {
            for status in history {
                let entry: &mut PlatformMetrics =
                    metrics.by_platform.entry(status.platform.clone()).or_default();
                match status.status {
                    PublicationState::Failed => entry.failed += 1,
                    _ => entry.published += 1,
                }
            }
        }

        metrics
    }

    /// Drop any client-side caches. Called when the weekly run finishes.
    pub fn cleanup(&self) {
        for client in self.clients.values() {
            client.clear_cache();
        }
        info!(platforms = self.clients.len(), "Cleared platform client caches");
    }

    // ── Validator pass-throughs ────────────────────────────────────────

    pub async fn validate_publication(
        &self,
        post_id: &str,
        platform: &str,
        original: &Post,
    ) -> ValidationResult {
        self.validator
            .validate_publication(post_id, platform, original)
            .await
    }

    pub async fn confirm_publication_with_validation(
        &self,
        result: &PublicationResult,
        platform: &str,
        original: &Post,
    ) -> ValidationResult {
        self.validator
            .confirm_publication(result, platform, original)
            .await
    }

    pub async fn batch_validate_publications(
        &self,
        requests: &[ValidationRequest],
    ) -> HashMap<String, ValidationResult> {
        self.validator.batch_validate(requests).await
    }

    // ── Tracker pass-throughs ──────────────────────────────────────────

    pub fn track_publication(
        &self,
        result: &PublicationResult,
        platform: &str,
    ) -> Option<PublicationStatus> {
        let status = self.tracker.track_publication(result, platform);
        if let Some(ref status) = status {
            self.logger.status_tracked(status);
        }
        status
    }

    pub fn publication_status(&self, post_id: &str) -> Option<PublicationStatus> {
        self.tracker.publication_status(post_id)
    }

    pub fn update_publication_status(
        &self,
        post_id: &str,
        platform: &str,
        update: StatusUpdate,
    ) -> bool {
        self.tracker.update_publication_status(post_id, platform, update)
    }

    pub fn remove_publication(&self, post_id: &str) -> bool {
        self.tracker.remove_publication(post_id)
    }

    pub fn all_publications(&self) -> HashMap<String, Vec<PublicationStatus>> {
        self.tracker.all_publications()
    }

    fn client(&self, platform: &str) -> Result<Arc<dyn PlatformClient>> {
        self.clients
            .get(platform)
            .cloned()
            .ok_or_else(|| PublisherError::unknown_platform(platform))
    }
}

/// Structural pre-publication checks. Returns the first problem found.
fn validate_post_structure(post: &Post) -> std::result::Result<(), String> {
    if post.title.trim().is_empty() {
        return Err("title is empty".to_string());
    }
    if post.summary.trim().is_empty() {
        return Err("summary is empty".to_string());
    }
    if post.body.trim().is_empty() {
        return Err("body is empty".to_string());
    }
    if post.metadata.author.trim().is_empty() {
        return Err("author is missing".to_string());
    }
    Ok(())
}

/// Derive the optimized copy actually sent to platforms. The caller's post
/// is never mutated.
fn optimize_post(post: &Post) -> Post {
    let mut optimized = post.clone();

    optimized.title = collapse_whitespace(&post.title);
    optimized.summary = truncate_chars(post.summary.trim(), MAX_SUMMARY_LENGTH);

    if optimized.metadata.seo_title.is_none() {
        optimized.metadata.seo_title = Some(truncate_chars(&optimized.title, MAX_SEO_TITLE_LENGTH));
    }
    if optimized.metadata.seo_description.is_none() {
        optimized.metadata.seo_description =
            Some(truncate_chars(&optimized.summary, MAX_SEO_DESCRIPTION_LENGTH));
    }

    optimized.metadata.tags = dedup_normalized(&post.metadata.tags, true);
    optimized.metadata.categories = dedup_normalized(&post.metadata.categories, false);

    optimized
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Trim, drop empties, and deduplicate case-insensitively while preserving
/// order. Tags are additionally lowercased; categories keep their casing.
fn dedup_normalized(labels: &[String], lowercase: bool) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    labels
        .iter()
        .filter_map(|label| {
            let trimmed = label.trim();
            if trimmed.is_empty() {
                return None;
            }
            let key = trimmed.to_lowercase();
            if !seen.insert(key.clone()) {
                return None;
            }
            Some(if lowercase { key } else { trimmed.to_string() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publishing::types::PostMetadata;

    fn sample_post() -> Post {
        let mut post = Post::new(
            "  Week 10   Start/Sit  Calls ",
            "Who to start and who to bench this week.",
            "Full analysis of every questionable roster decision.",
        );
        post.metadata = PostMetadata {
            tags: vec![
                "Fantasy".into(),
                "fantasy".into(),
                " Start-Sit ".into(),
                "".into(),
            ],
            categories: vec!["Analysis".into(), "analysis".into(), "Weekly".into()],
            author: "gridiron-bot".into(),
            ..Default::default()
        };
        post
    }

    #[test]
    fn test_structural_validation_catches_empty_fields() {
        let mut post = sample_post();
        assert!(validate_post_structure(&post).is_ok());

        post.title = "   ".into();
        assert!(validate_post_structure(&post).is_err());
    }

    #[test]
    fn test_optimize_sanitizes_title_and_dedups_labels() {
        let post = sample_post();
        let optimized = optimize_post(&post);

        assert_eq!(optimized.title, "Week 10 Start/Sit Calls");
        assert_eq!(optimized.metadata.tags, vec!["fantasy", "start-sit"]);
        assert_eq!(optimized.metadata.categories, vec!["Analysis", "Weekly"]);

        // Caller's post untouched.
        assert_eq!(post.metadata.tags.len(), 4);
    }

    #[test]
    fn test_optimize_backfills_seo_fields() {
        let post = sample_post();
        let optimized = optimize_post(&post);

        assert_eq!(
            optimized.metadata.seo_title.as_deref(),
            Some("Week 10 Start/Sit Calls")
        );
        assert_eq!(
            optimized.metadata.seo_description.as_deref(),
            Some("Who to start and who to bench this week.")
        );
    }

    #[test]
    fn test_optimize_preserves_existing_seo_fields() {
        let mut post = sample_post();
        post.metadata.seo_title = Some("Custom SEO Title".into());
        let optimized = optimize_post(&post);
        assert_eq!(optimized.metadata.seo_title.as_deref(), Some("Custom SEO Title"));
    }

    #[test]
    fn test_optimize_truncates_long_summary() {
        let mut post = sample_post();
        post.summary = "x".repeat(MAX_SUMMARY_LENGTH + 50);
        let optimized = optimize_post(&post);
        assert_eq!(optimized.summary.chars().count(), MAX_SUMMARY_LENGTH);
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
    }
}
