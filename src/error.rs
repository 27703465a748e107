//! # Publisher Error Types
//!
//! Crate-level error handling using thiserror for structured error types
//! instead of `Box<dyn Error>` patterns.
//!
//! Platform-level failures are deliberately *not* represented here: the
//! orchestrator converts them into `PublicationResult { success: false }`
//! values (see `publishing::orchestrator`). Only conditions the caller cannot
//! reasonably recover from in-band, such as a missing platform mapping,
//! surface as `PublisherError`.

use crate::publishing::platform::PlatformError;
use thiserror::Error;

/// Errors surfaced to callers of the orchestrator and validator.
#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("Platform not configured: {platform}")]
    UnknownPlatform { platform: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Internal publisher error: {message}")]
    Internal { message: String },
}

impl PublisherError {
    /// Create an unknown-platform error
    pub fn unknown_platform(platform: impl Into<String>) -> Self {
        Self::UnknownPlatform {
            platform: platform.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PublisherError>;
