//! # Publishing Subsystem
//!
//! Reliable delivery of a finished weekly post across heterogeneous blog
//! platforms.
//!
//! ## Core Components
//!
//! - **PublishingOrchestrator**: primary-then-fallback publish flow with
//!   per-platform retry and backoff
//! - **PublicationValidator**: fuzzy post-publish confirmation (did the
//!   platform really store what we sent?)
//! - **PublicationTracker**: append-only per-post status history
//! - **PlatformClient**: the capability trait each concrete backend
//!   implements
//!
//! Publication side effects flow through the injected [`PublicationLogger`]
//! so tests can observe attempts without a real platform.
//!
//! [`PublicationLogger`]: logger::PublicationLogger

pub mod logger;
pub mod orchestrator;
pub mod platform;
pub mod retry;
pub mod similarity;
pub mod tracker;
pub mod types;
pub mod validator;

pub use logger::{PublicationLogger, TracingLogger};
pub use orchestrator::{PublishingOrchestrator, POST_VALIDATION_FAILED};
pub use platform::{PlatformClient, PlatformError};
pub use retry::{retry_delay, retry_with_backoff, BackoffPolicy};
pub use similarity::{
    levenshtein, set_overlap, text_similarity, BODY_SIMILARITY_THRESHOLD,
    METADATA_OVERLAP_THRESHOLD, TITLE_SIMILARITY_THRESHOLD,
};
pub use tracker::PublicationTracker;
pub use types::{
    PlatformMetrics, Post, PostMetadata, PublicationMetrics, PublicationResult, PublicationState,
    PublicationStatus, StatusUpdate, ValidationRequest, ValidationResult,
};
pub use validator::{PublicationValidator, ValidatorConfig};
