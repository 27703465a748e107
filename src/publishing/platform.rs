//! # Platform Client Capability
//!
//! The pluggable endpoint the orchestrator publishes through. One
//! implementation exists per target backend (a CMS, a publishing network);
//! the orchestrator and validator only ever see this trait.
//!
//! Implementations live outside this crate. The contract is narrow on
//! purpose: authenticate, CRUD a post, list posts, and report
//! authentication state.

use crate::publishing::types::{Post, PublicationResult};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by platform client implementations.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Authentication failed for {platform}: {message}")]
    Authentication { platform: String, message: String },

    #[error("Post not found: {post_id}")]
    PostNotFound { post_id: String },

    #[error("{platform} API error: {message}")]
    Api { platform: String, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Operation {operation} timed out after {timeout_seconds}s")]
    Timeout {
        operation: String,
        timeout_seconds: u64,
    },

    #[error("Rate limit exceeded for {platform}: {message}")]
    RateLimited { platform: String, message: String },

    #[error("Invalid post: {reason}")]
    InvalidPost { reason: String },
}

impl PlatformError {
    /// Create an API error for a platform
    pub fn api(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            platform: platform.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a post-not-found error
    pub fn post_not_found(post_id: impl Into<String>) -> Self {
        Self::PostNotFound {
            post_id: post_id.into(),
        }
    }
}

/// Capability trait for one concrete publishing backend.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Platform name used in configuration, tracking, and logs.
    fn platform_name(&self) -> &str;

    /// Establish or refresh credentials with the backend.
    async fn authenticate(&self) -> Result<(), PlatformError>;

    /// Publish a new post and return the platform-assigned result.
    async fn publish_post(&self, post: &Post) -> Result<PublicationResult, PlatformError>;

    /// Update an existing remote post.
    async fn update_post(
        &self,
        post_id: &str,
        post: &Post,
    ) -> Result<PublicationResult, PlatformError>;

    /// Delete a remote post. Returns whether anything was deleted.
    async fn delete_post(&self, post_id: &str) -> Result<bool, PlatformError>;

    /// Fetch a remote post by id.
    async fn get_post(&self, post_id: &str) -> Result<Post, PlatformError>;

    /// List remote posts, most recent first.
    async fn list_posts(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Post>, PlatformError>;

    /// Whether the client currently holds valid credentials.
    async fn is_authenticated(&self) -> bool;

    /// Drop any in-memory caches the client keeps. Called on orchestrator
    /// cleanup; default is a no-op.
    fn clear_cache(&self) {}
}
