//! External rule-evaluator boundary.
//!
//! The rule evaluator is independently owned and may perform its own
//! async work (network, storage). It is always optional: the engine
//! absorbs every failure into an empty outcome and logs a warning, so
//! evaluator problems never surface to callers.

use async_trait::async_trait;
use govgauge_core::{AnswerSet, RuleOutcome};
use thiserror::Error;

/// Errors a rule evaluator may report. None of them propagate past the
/// engine boundary.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Rule evaluation failed: {0}")]
    Evaluation(String),

    #[error("Rule evaluator unavailable: {0}")]
    Unavailable(String),
}

/// An independently owned rule evaluator.
///
/// Implementations must be pure with respect to their inputs where
/// possible: the engine caches final results by input fingerprint, so a
/// nondeterministic evaluator makes cached and fresh results diverge.
#[async_trait]
pub trait RuleEvaluator: Send + Sync {
    /// Evaluate rules for one assessment's answers.
    async fn evaluate(
        &self,
        answers: &AnswerSet,
        assessment_id: &str,
    ) -> Result<RuleOutcome, RuleError>;

    /// Name used in log output.
    fn name(&self) -> &str {
        "rule-evaluator"
    }
}
