#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Gridiron Publisher
//!
//! Publication orchestration core for the weekly fantasy-football analysis
//! pipeline. The upstream stages (collect → research → analyze → write)
//! hand this crate a finished post; this crate gets it reliably onto a blog
//! platform, proves it landed, and recovers when it did not.
//!
//! ## Architecture
//!
//! - **Publish with fallback**: the orchestrator attempts the primary
//!   platform with bounded linear-backoff retries, then walks the declared
//!   fallback platforms in order. Attempts are strictly sequential, so the
//!   same artifact is never in flight to two platforms concurrently.
//! - **Confirm**: after a reported success the validator fetches the remote
//!   copy and fuzzily compares it against what was sent (Levenshtein
//!   similarity for text, Jaccard overlap for tags/categories), retrying
//!   while the platform propagates.
//! - **Track**: every confirmed publication lands in an append-only,
//!   concurrency-safe per-post history that backs the metrics surface.
//! - **Recover**: failures classify into a taxonomy (category, severity,
//!   retryability, fallback availability); registered recovery strategies
//!   run before escalation, and agent failures always degrade gracefully.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridiron_publisher::config::PublisherConfig;
//! use gridiron_publisher::publishing::{PlatformClient, Post, PublishingOrchestrator};
//! use std::sync::Arc;
//!
//! # async fn example(wordpress: Arc<dyn PlatformClient>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = PublisherConfig {
//!     primary_platform: "wordpress".to_string(),
//!     ..Default::default()
//! };
//! let orchestrator = PublishingOrchestrator::new(config, vec![wordpress])?;
//!
//! let post = Post::new(
//!     "Week 10 Waiver Wire Targets",
//!     "The pickups that matter before Sunday.",
//!     "Full analysis of this week's waiver options...",
//! );
//! let result = orchestrator.publish(&post).await?;
//! println!("published: {} ({:?})", result.success, result.post_id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`publishing`] - orchestrator, validator, tracker, platform capability
//! - [`recovery`] - error classification and recovery strategy dispatch
//! - [`config`] - publisher configuration with env/file layering
//! - [`error`] - structured error handling
//! - [`logging`] - environment-aware structured logging setup

pub mod config;
pub mod error;
pub mod logging;
pub mod publishing;
pub mod recovery;

pub use config::PublisherConfig;
pub use error::{PublisherError, Result};
pub use publishing::{
    PlatformClient, PlatformError, Post, PostMetadata, PublicationLogger, PublicationResult,
    PublicationState, PublicationStatus, PublicationTracker, PublicationValidator,
    PublishingOrchestrator, ValidationRequest, ValidationResult,
};
pub use recovery::{
    AgentKind, DegradationAction, ErrorCategory, ErrorClassifier, ErrorContext, ErrorSeverity,
    RecoveryDispatcher, RecoveryScope, RecoveryStrategy,
};
