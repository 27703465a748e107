//! # Publishing Types
//!
//! Core data structures shared across the publishing subsystem: the post
//! artifact handed in by the content pipeline, per-attempt publication
//! results, validation verdicts, and tracked publication status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Post metadata carried alongside the content body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMetadata {
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub author: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    /// Platform-specific extras (featured image, slug overrides, etc.)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The content artifact being published.
///
/// Immutable once handed to the orchestrator; optimization produces a
/// derived copy and never mutates the caller's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub metadata: PostMetadata,
    pub publish_date: DateTime<Utc>,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            body: body.into(),
            metadata: PostMetadata::default(),
            publish_date: Utc::now(),
        }
    }
}

/// Remote lifecycle state of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    Published,
    Draft,
    Pending,
    Failed,
    Scheduled,
    /// Set by administrative status updates after a remote edit.
    Updated,
}

impl std::fmt::Display for PublicationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PublicationState::Published => "published",
            PublicationState::Draft => "draft",
            PublicationState::Pending => "pending",
            PublicationState::Failed => "failed",
            PublicationState::Scheduled => "scheduled",
            PublicationState::Updated => "updated",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a single platform publish attempt. Terminal: never mutated
/// after creation.
///
/// Invariant: `success == true` implies `post_id` is present;
/// `success == false` implies `error` is present. The constructors uphold
/// this, so prefer them over struct literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationResult {
    pub success: bool,
    pub post_id: Option<String>,
    pub url: Option<String>,
    pub error: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub status: PublicationState,
}

impl PublicationResult {
    /// A successful publication with the platform-assigned id.
    pub fn published(post_id: impl Into<String>, url: Option<String>) -> Self {
        Self {
            success: true,
            post_id: Some(post_id.into()),
            url,
            error: None,
            published_at: Some(Utc::now()),
            status: PublicationState::Published,
        }
    }

    /// A failed publication carrying the underlying error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            post_id: None,
            url: None,
            error: Some(error.into()),
            published_at: None,
            status: PublicationState::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Verdict from comparing a locally-authored post against its remote copy.
///
/// `errors` means the remote copy could not be retrieved or the platform was
/// unknown; `warnings` means it was retrieved but did not match (non-fatal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub post_exists: bool,
    pub content_matches: bool,
    pub metadata_matches: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub last_checked: DateTime<Utc>,
}

impl ValidationResult {
    /// An immediately-invalid result carrying a single error, used when the
    /// remote side was never contacted or could not be reached.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            post_exists: false,
            content_matches: false,
            metadata_matches: false,
            errors: vec![error.into()],
            warnings: Vec::new(),
            last_checked: Utc::now(),
        }
    }
}

/// Tracked status of one (post, platform) publication. Mutable only through
/// the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationStatus {
    pub post_id: String,
    pub platform: String,
    pub status: PublicationState,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub last_checked: DateTime<Utc>,
    pub error: Option<String>,
}

/// Partial fields merged into an existing tracked status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<PublicationState>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// One entry in a batch validation request.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub post_id: String,
    pub platform: String,
    pub post: Post,
}

/// Aggregate publication counts derived from tracker history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationMetrics {
    pub total_tracked: usize,
    pub by_platform: HashMap<String, PlatformMetrics>,
}

/// Published/failed counts for one platform.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlatformMetrics {
    pub published: u64,
    pub failed: u64,
}
