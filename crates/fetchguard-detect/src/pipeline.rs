//! Ordered, short-circuiting evaluation of the enabled checks.

use crate::check::{CheckContext, CheckId, CheckResult, FailureCategory};
use crate::error::Result;
use crate::pattern::CompiledPattern;
use fetchguard_core::{DetectorConfig, ResponseSnapshot};
use serde::{Deserialize, Serialize};

/// Final classification of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Every enabled check passed.
    Valid,
    /// The first failing check, in canonical order.
    Invalid {
        /// Check that failed
        check: CheckId,
        /// Its failure family
        category: FailureCategory,
        /// Human-readable diagnostic
        reason: String,
    },
}

impl Verdict {
    /// Whether the response was judged genuine.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Diagnostic of the failing check, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { reason, .. } => Some(reason),
        }
    }

    /// Identifier of the failing check, if any.
    #[must_use]
    pub fn failed_check(&self) -> Option<CheckId> {
        match self {
            Self::Valid => None,
            Self::Invalid { check, .. } => Some(*check),
        }
    }

    /// Failure family, if any.
    #[must_use]
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::Valid => None,
            Self::Invalid { category, .. } => Some(*category),
        }
    }

    /// The `(is_valid, reason)` pair callers of simpler APIs expect.
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<String>) {
        match self {
            Self::Valid => (true, None),
            Self::Invalid { reason, .. } => (false, Some(reason)),
        }
    }
}

/// A validated configuration with its expected patterns compiled and its
/// execution plan fixed.
///
/// Building a pipeline is the only fallible step. Evaluation never fails:
/// every problem with a response becomes a [`Verdict::Invalid`]. A pipeline
/// holds no mutable state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: DetectorConfig,
    patterns: Vec<CompiledPattern>,
    plan: Vec<CheckId>,
}

impl Pipeline {
    /// Validate `config`, compile its patterns and derive the plan.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let patterns = CompiledPattern::compile_all(&config.expected_patterns)?;
        let plan: Vec<CheckId> = CheckId::ALL
            .into_iter()
            .filter(|id| id.is_enabled(&config))
            .collect();

        tracing::debug!(
            checks = plan.len(),
            patterns = patterns.len(),
            "Detection pipeline ready"
        );

        Ok(Self {
            config,
            patterns,
            plan,
        })
    }

    /// Remove a check from the plan.
    #[must_use]
    pub fn without(mut self, id: CheckId) -> Self {
        self.plan.retain(|planned| *planned != id);
        self
    }

    /// Checks that will run, in order.
    #[must_use]
    pub fn plan(&self) -> &[CheckId] {
        &self.plan
    }

    /// Configuration the pipeline was built from.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the plan against a response. The first failure wins.
    #[must_use]
    pub fn evaluate(&self, snapshot: &ResponseSnapshot) -> Verdict {
        let ctx = CheckContext::new(snapshot, &self.config, &self.patterns);

        for id in &self.plan {
            if let Some(reason) = id.run(&ctx).into_failure() {
                tracing::debug!(check = %id, category = %id.category(), %reason, "Check failed");
                return Verdict::Invalid {
                    check: *id,
                    category: id.category(),
                    reason,
                };
            }
            tracing::debug!(check = %id, "Check passed");
        }

        tracing::debug!(status = snapshot.status(), "Response valid");
        Verdict::Valid
    }

    /// Run one check regardless of the plan.
    #[must_use]
    pub fn run_check(&self, id: CheckId, snapshot: &ResponseSnapshot) -> CheckResult {
        id.run(&CheckContext::new(snapshot, &self.config, &self.patterns))
    }
}

/// Build a pipeline for `config` and evaluate one response with it.
pub fn evaluate(snapshot: &ResponseSnapshot, config: &DetectorConfig) -> Result<Verdict> {
    Ok(Pipeline::new(config.clone())?.evaluate(snapshot))
}
