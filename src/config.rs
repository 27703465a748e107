//! # Publisher Configuration
//!
//! Environment-aware configuration for the publishing subsystem. Values come
//! from an optional config file layered under `GRIDIRON_`-prefixed
//! environment variables; every field has a working default so the crate is
//! usable with nothing but a primary platform name.

use crate::error::{PublisherError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration consumed by the publishing orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Platform attempted first.
    pub primary_platform: String,

    /// Platforms attempted, in order, after the primary exhausts its
    /// retries.
    #[serde(default)]
    pub fallback_platforms: Vec<String>,

    /// Publish attempts per platform.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Base delay between publish attempts; backoff grows linearly.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Reject structurally-invalid posts before contacting any platform.
    #[serde(default = "default_true")]
    pub validate_before_publish: bool,

    /// Track publication status and confirm remote copies after a
    /// successful publish.
    #[serde(default = "default_true")]
    pub track_publication_status: bool,

    /// When set, a publish whose post-hoc confirmation fails is reported as
    /// a failure instead of a success. Off by default: the platform did
    /// accept the write.
    #[serde(default)]
    pub strict_confirmation: bool,

    /// Confirmation retry settings.
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// Confirmation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default = "default_validation_retries")]
    pub max_retries: u32,

    #[serde(default = "default_validation_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_validation_retries() -> u32 {
    3
}

fn default_validation_delay_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_retries: default_validation_retries(),
            retry_delay_ms: default_validation_delay_ms(),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            primary_platform: "wordpress".to_string(),
            fallback_platforms: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            validate_before_publish: true,
            track_publication_status: true,
            strict_confirmation: false,
            validation: ValidationSettings::default(),
        }
    }
}

impl PublisherConfig {
    /// Load configuration from an optional file with environment overrides
    /// (`GRIDIRON_PRIMARY_PLATFORM`, `GRIDIRON_RETRY_ATTEMPTS`, ...).
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("GRIDIRON").separator("__"))
            .build()
            .map_err(|e| PublisherError::configuration(e.to_string()))?;

        let config: PublisherConfig = settings
            .try_deserialize()
            .map_err(|e| PublisherError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the orchestrator depends on.
    pub fn validate(&self) -> Result<()> {
        if self.primary_platform.trim().is_empty() {
            return Err(PublisherError::configuration(
                "primary_platform must not be empty",
            ));
        }
        if self.retry_attempts == 0 {
            return Err(PublisherError::configuration(
                "retry_attempts must be at least 1",
            ));
        }
        if self.validation.max_retries == 0 {
            return Err(PublisherError::configuration(
                "validation.max_retries must be at least 1",
            ));
        }
        Ok(())
    }

    /// Base delay between publish attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl ValidationSettings {
    /// Base delay between confirmation attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
