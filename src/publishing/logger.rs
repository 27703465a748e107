//! # Publication Event Logging
//!
//! Injected observer for publish/validate/retry side effects. Components
//! never write to a hard-coded destination; they call this trait, and the
//! default implementation forwards to `tracing`. Tests substitute recording
//! doubles to assert on emitted events.

use crate::publishing::types::{PublicationStatus, ValidationResult};
use tracing::{error, info, warn};

/// Leveled sink for publication lifecycle events.
pub trait PublicationLogger: Send + Sync {
    /// A platform accepted the post.
    fn publish_success(&self, platform: &str, post_id: &str, url: Option<&str>);

    /// A single publish attempt failed.
    fn publish_failure(&self, platform: &str, attempt: u32, error: &str);

    /// The orchestrator is moving from a failed platform to a fallback.
    fn fallback_switch(&self, from: &str, to: &str);

    /// A validation pass completed (valid or not).
    fn validation_outcome(&self, platform: &str, post_id: &str, result: &ValidationResult);

    /// A confirmation attempt failed and will be retried.
    fn validation_retry(&self, platform: &str, post_id: &str, attempt: u32, error: &str);

    /// Confirmation exhausted its retries.
    fn validation_exhausted(&self, platform: &str, post_id: &str, errors: &str);

    /// A publication status entry was recorded.
    fn status_tracked(&self, status: &PublicationStatus);
}

/// Default logger backed by `tracing` structured events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl PublicationLogger for TracingLogger {
    fn publish_success(&self, platform: &str, post_id: &str, url: Option<&str>) {
        info!(
            platform = platform,
            post_id = post_id,
            url = url,
            "✅ PUBLISH: Post published successfully"
        );
    }

    fn publish_failure(&self, platform: &str, attempt: u32, error: &str) {
        warn!(
            platform = platform,
            attempt = attempt,
            error = error,
            "❌ PUBLISH: Attempt failed"
        );
    }

    fn fallback_switch(&self, from: &str, to: &str) {
        warn!(
            from_platform = from,
            to_platform = to,
            "🔄 PUBLISH: Switching to fallback platform"
        );
    }

    fn validation_outcome(&self, platform: &str, post_id: &str, result: &ValidationResult) {
        if result.is_valid {
            info!(
                platform = platform,
                post_id = post_id,
                warnings = result.warnings.len(),
                "✅ VALIDATION: Publication confirmed"
            );
        } else {
            warn!(
                platform = platform,
                post_id = post_id,
                post_exists = result.post_exists,
                content_matches = result.content_matches,
                metadata_matches = result.metadata_matches,
                errors = result.errors.len(),
                warnings = result.warnings.len(),
                "❌ VALIDATION: Publication did not validate"
            );
        }
    }

    fn validation_retry(&self, platform: &str, post_id: &str, attempt: u32, error: &str) {
        warn!(
            platform = platform,
            post_id = post_id,
            attempt = attempt,
            error = error,
            "🔄 VALIDATION: Retrying confirmation"
        );
    }

    fn validation_exhausted(&self, platform: &str, post_id: &str, errors: &str) {
        error!(
            platform = platform,
            post_id = post_id,
            errors = errors,
            "❌ VALIDATION: Confirmation failed after all retries"
        );
    }

    fn status_tracked(&self, status: &PublicationStatus) {
        info!(
            post_id = %status.post_id,
            platform = %status.platform,
            status = %status.status,
            "📋 TRACKER: Publication status recorded"
        );
    }
}
