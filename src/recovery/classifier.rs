//! # Failure Classification
//!
//! Classifies arbitrary failure messages into a taxonomy the recovery
//! dispatcher and the orchestrator can act on: category, severity,
//! retryability, and whether a fallback path exists.
//!
//! Classification is message-pattern based: ordered substring rules over the
//! lowercased error text, matching the behavior external collaborators
//! (platform clients, pipeline agents) exhibit in practice. An `agent` hint
//! from a fallback-capable pipeline agent forces `fallback_available`
//! regardless of what the message suggests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Primary failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ApiFailure,
    DataQuality,
    AgentFailure,
    Network,
    Timeout,
    Authentication,
    RateLimit,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::ApiFailure => "API Failure",
            ErrorCategory::DataQuality => "Data Quality",
            ErrorCategory::AgentFailure => "Agent Failure",
            ErrorCategory::Network => "Network",
            ErrorCategory::Timeout => "Timeout",
            ErrorCategory::Authentication => "Authentication",
            ErrorCategory::RateLimit => "Rate Limit",
            ErrorCategory::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// How serious a failure is for the overall weekly pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Pipeline agents that can fail upstream or downstream of publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Collects roster and matchup data from fantasy platforms.
    Collector,
    /// Gathers news and sentiment for rostered players.
    NewsResearcher,
    /// Runs the scoring/recommendation analysis.
    Analyst,
    /// Generates the weekly blog content.
    Writer,
    /// Delivers the finished artifact (this crate's own stage).
    Publisher,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Collector => "collector",
            AgentKind::NewsResearcher => "news_researcher",
            AgentKind::Analyst => "analyst",
            AgentKind::Writer => "writer",
            AgentKind::Publisher => "publisher",
        }
    }

    /// Agents the pipeline can route around with reduced output. The
    /// publisher is excluded: its fallback is the platform chain itself,
    /// which the orchestrator drives rather than agent-level recovery.
    pub fn fallback_capable(&self) -> bool {
        !matches!(self, AgentKind::Publisher)
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived classification of one failure. Computed fresh per failure and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub retryable: bool,
    pub fallback_available: bool,
    pub agent: Option<AgentKind>,
    pub service: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Message-pattern error classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a failure message with optional agent/service hints.
    ///
    /// Rules are ordered; the first match wins.
    pub fn classify(
        &self,
        message: &str,
        agent: Option<AgentKind>,
        service: Option<&str>,
    ) -> ErrorContext {
        let lowered = message.to_lowercase();

        let (category, severity, retryable, fallback_available) = if lowered.contains("timeout") {
            (ErrorCategory::Timeout, ErrorSeverity::Medium, true, false)
        } else if lowered.contains("network") || lowered.contains("connection") {
            (ErrorCategory::Network, ErrorSeverity::Medium, true, false)
        } else if lowered.contains("rate limit") || lowered.contains("too many requests") {
            (ErrorCategory::RateLimit, ErrorSeverity::Low, true, false)
        } else if lowered.contains("unauthorized") || lowered.contains("authentication") {
            (
                ErrorCategory::Authentication,
                ErrorSeverity::High,
                false,
                false,
            )
        } else if lowered.contains("api") || lowered.contains("service") {
            (ErrorCategory::ApiFailure, ErrorSeverity::Medium, true, true)
        } else {
            (ErrorCategory::Unknown, ErrorSeverity::Medium, false, false)
        };

        // A hint from a fallback-capable agent overrides the message-based
        // verdict: the pipeline can always degrade around that agent.
        let fallback_available = fallback_available
            || agent.map(|a| a.fallback_capable()).unwrap_or(false);

        ErrorContext {
            category,
            severity,
            retryable,
            fallback_available,
            agent,
            service: service.map(str::to_string),
            metadata: HashMap::from([(
                "message".to_string(),
                serde_json::json!(message),
            )]),
        }
    }

    /// Whether a failure message classifies as retryable.
    pub fn is_retryable(&self, message: &str) -> bool {
        self.classify(message, None, None).retryable
    }
}
