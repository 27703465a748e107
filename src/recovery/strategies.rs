//! # Recovery Strategy Dispatch
//!
//! Registry of named, conditionally-applicable remediation actions, scoped
//! by failure origin. The dispatcher classifies a failure, runs the first
//! applicable strategy that completes without error, and otherwise
//! escalates. Agent failures additionally take a guaranteed
//! graceful-degradation step so the weekly pipeline can continue with
//! reduced output instead of halting.
//!
//! Scopes are a typed enum rather than string buckets: a strategy registered
//! for the wrong scope is a compile error, not a silent lookup miss.

use crate::publishing::retry;
use crate::recovery::classifier::{
    AgentKind, ErrorCategory, ErrorClassifier, ErrorContext, ErrorSeverity,
};
use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Where a recovery strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryScope {
    /// External API/service failures.
    Api,
    /// Failures of one specific pipeline agent.
    Agent(AgentKind),
    /// Failures of any pipeline agent, tried after agent-specific strategies.
    AnyAgent,
    /// Data quality issues in collected inputs.
    DataQuality,
}

/// Predicate deciding whether a strategy applies to a failure.
pub type StrategyPredicate = Arc<dyn Fn(&str, &ErrorContext) -> bool + Send + Sync>;

/// Executable remediation. Returns a JSON description of what was done so
/// callers can surface it; failing actions fall through to the next
/// applicable strategy.
pub type StrategyAction =
    Arc<dyn Fn(String, ErrorContext) -> BoxFuture<'static, anyhow::Result<serde_json::Value>> + Send + Sync>;

/// A named predicate + action pair.
#[derive(Clone)]
pub struct RecoveryStrategy {
    pub name: String,
    applies: StrategyPredicate,
    action: StrategyAction,
}

impl RecoveryStrategy {
    pub fn new<P, A>(name: impl Into<String>, applies: P, action: A) -> Self
    where
        P: Fn(&str, &ErrorContext) -> bool + Send + Sync + 'static,
        A: Fn(String, ErrorContext) -> BoxFuture<'static, anyhow::Result<serde_json::Value>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            applies: Arc::new(applies),
            action: Arc::new(action),
        }
    }

    fn is_applicable(&self, message: &str, context: &ErrorContext) -> bool {
        (self.applies)(message, context)
    }

    async fn execute(
        &self,
        message: &str,
        context: &ErrorContext,
    ) -> anyhow::Result<serde_json::Value> {
        (self.action)(message.to_string(), context.clone()).await
    }
}

impl std::fmt::Debug for RecoveryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryStrategy")
            .field("name", &self.name)
            .finish()
    }
}

/// Last-resort fallback action keyed by the failing agent. Always succeeds;
/// not a true fix, just permission for the pipeline to continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Continue the analysis with whatever platform data was collected.
    ContinueWithPartialData,
    /// Publish without the news/sentiment enrichment section.
    SkipNewsEnrichment,
    /// Fall back to the simplified scoring model.
    UseSimplifiedScoring,
    /// Render the post from the static weekly template.
    UseTemplateContent,
    /// Persist the artifact for manual publication.
    QueueForManualPublication,
}

impl DegradationAction {
    pub fn for_agent(agent: AgentKind) -> Self {
        match agent {
            AgentKind::Collector => DegradationAction::ContinueWithPartialData,
            AgentKind::NewsResearcher => DegradationAction::SkipNewsEnrichment,
            AgentKind::Analyst => DegradationAction::UseSimplifiedScoring,
            AgentKind::Writer => DegradationAction::UseTemplateContent,
            AgentKind::Publisher => DegradationAction::QueueForManualPublication,
        }
    }
}

impl std::fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DegradationAction::ContinueWithPartialData => "continue with partial platform data",
            DegradationAction::SkipNewsEnrichment => "skip news enrichment",
            DegradationAction::UseSimplifiedScoring => "use simplified scoring",
            DegradationAction::UseTemplateContent => "use template content",
            DegradationAction::QueueForManualPublication => "queue for manual publication",
        };
        write!(f, "{s}")
    }
}

/// Severity of a data quality issue as reported by the collection stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Minor,
    Moderate,
    Severe,
}

impl From<IssueSeverity> for ErrorSeverity {
    fn from(severity: IssueSeverity) -> Self {
        match severity {
            IssueSeverity::Minor => ErrorSeverity::Low,
            IssueSeverity::Moderate => ErrorSeverity::Medium,
            IssueSeverity::Severe => ErrorSeverity::High,
        }
    }
}

/// A data quality problem in collected inputs.
#[derive(Debug, Clone)]
pub struct DataQualityIssue {
    pub description: String,
    pub severity: IssueSeverity,
    pub source: Option<String>,
}

/// What the dispatcher did about a failure.
#[derive(Debug, Clone)]
pub struct RecoveryOutcome {
    /// Whether some strategy completed without error.
    pub recovered: bool,
    /// Name of the strategy that handled the failure, if any.
    pub strategy: Option<String>,
    /// Degradation step taken when no strategy succeeded (agent failures only).
    pub degradation: Option<DegradationAction>,
    /// The classification the decision was based on.
    pub context: ErrorContext,
}

/// Classifies failures and dispatches recovery strategies.
pub struct RecoveryDispatcher {
    classifier: ErrorClassifier,
    strategies: RwLock<HashMap<RecoveryScope, Vec<RecoveryStrategy>>>,
}

impl Default for RecoveryDispatcher {
    fn default() -> Self {
        Self::with_default_strategies()
    }
}

impl RecoveryDispatcher {
    /// A dispatcher with no strategies registered. Failures escalate (and
    /// degrade, for agents) immediately.
    pub fn new() -> Self {
        Self {
            classifier: ErrorClassifier::new(),
            strategies: RwLock::new(HashMap::new()),
        }
    }

    /// A dispatcher pre-loaded with the stock strategies: wait-out for
    /// retryable API failures, re-initialization for retryable agent
    /// failures, cached data and record-skipping for data quality issues.
    pub fn with_default_strategies() -> Self {
        let dispatcher = Self::new();

        dispatcher.register_strategy(
            RecoveryScope::Api,
            RecoveryStrategy::new(
                "wait_for_service_recovery",
                |_, ctx| ctx.retryable,
                |_, _| {
                    Box::pin(async {
                        let delay = retry::retry_delay(1);
                        Ok(serde_json::json!({
                            "action": "wait_for_service_recovery",
                            "delay_ms": delay.as_millis() as u64,
                        }))
                    })
                },
            ),
        );

        dispatcher.register_strategy(
            RecoveryScope::AnyAgent,
            RecoveryStrategy::new(
                "reinitialize_agent",
                |_, ctx| ctx.retryable,
                |_, ctx| {
                    Box::pin(async move {
                        Ok(serde_json::json!({
                            "action": "reinitialize_agent",
                            "agent": ctx.agent.map(|a| a.as_str()),
                        }))
                    })
                },
            ),
        );

        dispatcher.register_strategy(
            RecoveryScope::DataQuality,
            RecoveryStrategy::new(
                "use_cached_data",
                |_, ctx| ctx.severity <= ErrorSeverity::Medium,
                |_, _| Box::pin(async { Ok(serde_json::json!({"action": "use_cached_data"})) }),
            ),
        );

        dispatcher.register_strategy(
            RecoveryScope::DataQuality,
            RecoveryStrategy::new(
                "skip_invalid_records",
                |_, _| true,
                |_, _| {
                    Box::pin(async { Ok(serde_json::json!({"action": "skip_invalid_records"})) })
                },
            ),
        );

        dispatcher
    }

    /// Register a strategy at the end of a scope's ordered list.
    pub fn register_strategy(&self, scope: RecoveryScope, strategy: RecoveryStrategy) {
        info!(
            scope = ?scope,
            strategy = %strategy.name,
            "Registering recovery strategy"
        );
        self.strategies
            .write()
            .entry(scope)
            .or_default()
            .push(strategy);
    }

    /// Number of strategies registered for a scope.
    pub fn strategy_count(&self, scope: RecoveryScope) -> usize {
        self.strategies
            .read()
            .get(&scope)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Remove all registered strategies (useful for testing).
    pub fn clear_strategies(&self) {
        self.strategies.write().clear();
    }

    /// Handle a failed call to an external API/service.
    ///
    /// ```rust
    /// use gridiron_publisher::recovery::RecoveryDispatcher;
    ///
    /// let dispatcher = RecoveryDispatcher::with_default_strategies();
    /// let outcome = tokio_test::block_on(
    ///     dispatcher.handle_api_failure("wordpress", "WordPress API error"),
    /// );
    /// assert!(outcome.recovered);
    /// assert_eq!(outcome.strategy.as_deref(), Some("wait_for_service_recovery"));
    /// ```
    pub async fn handle_api_failure(&self, service: &str, error: &str) -> RecoveryOutcome {
        let context = self.classifier.classify(error, None, Some(service));
        warn!(
            service = service,
            category = %context.category,
            error = error,
            "API failure reported"
        );

        let strategy = self
            .run_strategies(&[RecoveryScope::Api], error, &context)
            .await;

        if strategy.is_none() {
            self.escalate(&context, error);
        }

        RecoveryOutcome {
            recovered: strategy.is_some(),
            strategy,
            degradation: None,
            context,
        }
    }

    /// Handle a failed pipeline agent. Agent-specific strategies run before
    /// generic agent strategies; when none succeed, the agent's graceful
    /// degradation is taken after escalation.
    pub async fn handle_agent_failure(&self, agent: AgentKind, error: &str) -> RecoveryOutcome {
        let context = self.classifier.classify(error, Some(agent), None);
        warn!(
            agent = %agent,
            category = %context.category,
            error = error,
            "Agent failure reported"
        );

        let strategy = self
            .run_strategies(
                &[RecoveryScope::Agent(agent), RecoveryScope::AnyAgent],
                error,
                &context,
            )
            .await;

        let degradation = if strategy.is_none() {
            self.escalate(&context, error);
            let action = DegradationAction::for_agent(agent);
            info!(
                agent = %agent,
                degradation = %action,
                "🛟 RECOVERY: Continuing via graceful degradation"
            );
            Some(action)
        } else {
            None
        };

        RecoveryOutcome {
            recovered: strategy.is_some(),
            strategy,
            degradation,
            context,
        }
    }

    /// Handle a data quality issue from the collection stage.
    pub async fn handle_data_quality_issue(&self, issue: &DataQualityIssue) -> RecoveryOutcome {
        let context = ErrorContext {
            category: ErrorCategory::DataQuality,
            severity: issue.severity.into(),
            retryable: false,
            fallback_available: true,
            agent: None,
            service: issue.source.clone(),
            metadata: HashMap::from([(
                "description".to_string(),
                serde_json::json!(issue.description),
            )]),
        };
        warn!(
            severity = ?issue.severity,
            source = issue.source.as_deref(),
            description = %issue.description,
            "Data quality issue reported"
        );

        let strategy = self
            .run_strategies(&[RecoveryScope::DataQuality], &issue.description, &context)
            .await;

        if strategy.is_none() {
            self.escalate(&context, &issue.description);
        }

        RecoveryOutcome {
            recovered: strategy.is_some(),
            strategy,
            degradation: None,
            context,
        }
    }

    /// Whether a failure message classifies as retryable.
    pub fn is_retryable(&self, message: &str) -> bool {
        self.classifier.is_retryable(message)
    }

    /// Exponential-capped delay before the given retry attempt.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        retry::retry_delay(attempt)
    }

    /// Run scopes in order; within each scope, run the first applicable
    /// strategy and stop at the first one that completes without error.
    /// Failing strategies are logged and skipped.
    async fn run_strategies(
        &self,
        scopes: &[RecoveryScope],
        message: &str,
        context: &ErrorContext,
    ) -> Option<String> {
        // Clone candidates out so the lock is not held across awaits.
        let candidates: Vec<RecoveryStrategy> = {
            let table = self.strategies.read();
            scopes
                .iter()
                .flat_map(|scope| table.get(scope).cloned().unwrap_or_default())
                .collect()
        };

        for strategy in candidates {
            if !strategy.is_applicable(message, context) {
                continue;
            }
            match strategy.execute(message, context).await {
                Ok(outcome) => {
                    info!(
                        strategy = %strategy.name,
                        outcome = %outcome,
                        "✅ RECOVERY: Strategy succeeded"
                    );
                    return Some(strategy.name);
                }
                Err(e) => {
                    warn!(
                        strategy = %strategy.name,
                        error = %e,
                        "❌ RECOVERY: Strategy failed, trying next"
                    );
                }
            }
        }
        None
    }

    fn escalate(&self, context: &ErrorContext, message: &str) {
        if context.severity == ErrorSeverity::Critical {
            error!(
                category = %context.category,
                severity = ?context.severity,
                error = message,
                "🚨 RECOVERY: Unrecovered critical failure"
            );
        } else {
            warn!(
                category = %context.category,
                severity = ?context.severity,
                error = message,
                "⚠️ RECOVERY: Failure not recovered, escalating"
            );
        }
    }
}

impl std::fmt::Debug for RecoveryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.strategies.read();
        f.debug_struct("RecoveryDispatcher")
            .field("scopes", &table.len())
            .finish()
    }
}
