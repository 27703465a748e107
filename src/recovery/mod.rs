//! # Failure Classification and Recovery
//!
//! Turns arbitrary failure messages into an actionable taxonomy and
//! dispatches registered recovery strategies before escalating. Agent
//! failures always end in a graceful-degradation step so one broken stage
//! cannot halt the weekly pipeline.

pub mod classifier;
pub mod strategies;

pub use classifier::{AgentKind, ErrorCategory, ErrorClassifier, ErrorContext, ErrorSeverity};
pub use strategies::{
    DataQualityIssue, DegradationAction, IssueSeverity, RecoveryDispatcher, RecoveryOutcome,
    RecoveryScope, RecoveryStrategy,
};
