//! Named verification steps.
//!
//! A composite verification is modeled as an explicit sequential pipeline of
//! named checks. Each step records pass or fail; the first failure halts the
//! pipeline, and the executed steps aggregate into one scenario result.
//! There is no partial-success notion: a halted verification is a failed
//! verification.

use crate::result::{SondearError, SondearResult};
use serde::{Deserialize, Serialize};

/// Outcome of one named check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// The check held
    Passed,
    /// The check failed and halted the pipeline
    Failed,
}

/// One executed check step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Step name, e.g. "hero subtitle text"
    pub name: String,
    /// Whether the step passed
    pub status: CheckStatus,
    /// Failure detail, if any
    pub message: Option<String>,
}

/// A sequential pipeline of named checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    name: String,
    checks: Vec<CheckResult>,
    halted: bool,
}

impl Verification {
    /// Start a new verification
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
            halted: false,
        }
    }

    /// The verification's name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a step from a driver/assertion outcome.
    ///
    /// Returns true when the step passed and the pipeline may continue.
    pub fn record(&mut self, name: &str, outcome: SondearResult<()>) -> bool {
        match outcome {
            Ok(()) => {
                self.checks.push(CheckResult {
                    name: name.to_string(),
                    status: CheckStatus::Passed,
                    message: None,
                });
                true
            }
            Err(e) => {
                self.checks.push(CheckResult {
                    name: name.to_string(),
                    status: CheckStatus::Failed,
                    message: Some(e.to_string()),
                });
                self.halted = true;
                false
            }
        }
    }

    /// Record an exact string-equality step. No trimming, no partial match.
    ///
    /// Returns true when the step passed and the pipeline may continue.
    pub fn record_eq(&mut self, name: &str, expected: &str, actual: &str) -> bool {
        let outcome = if expected == actual {
            Ok(())
        } else {
            Err(SondearError::Assertion {
                message: format!("expected text {expected:?}, got {actual:?}"),
            })
        };
        self.record(name, outcome)
    }

    /// Whether every executed step passed and none halted the pipeline
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.halted
    }

    /// The failing step, if the pipeline halted
    #[must_use]
    pub fn failure(&self) -> Option<&CheckResult> {
        self.checks
            .iter()
            .find(|c| c.status == CheckStatus::Failed)
    }

    /// All executed steps, in order
    #[must_use]
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// Collapse into a single result for `?` propagation
    ///
    /// # Errors
    ///
    /// Returns an `Assertion` error naming the failing step
    pub fn to_result(&self) -> SondearResult<()> {
        match self.failure() {
            None => Ok(()),
            Some(check) => Err(SondearError::Assertion {
                message: format!(
                    "{}: step '{}' failed: {}",
                    self.name,
                    check.name,
                    check.message.as_deref().unwrap_or("no detail")
                ),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_passing_pipeline() {
        let mut v = Verification::new("home page elements");
        assert!(v.record("hero title visible", Ok(())));
        assert!(v.record_eq(
            "hero subtitle text",
            "Explore our demo projects",
            "Explore our demo projects"
        ));
        assert!(v.passed());
        assert!(v.failure().is_none());
        assert_eq!(v.checks().len(), 2);
        assert!(v.to_result().is_ok());
    }

    #[test]
    fn test_first_failure_halts() {
        let mut v = Verification::new("home page elements");
        assert!(v.record("hero title visible", Ok(())));
        let cont = v.record(
            "hero subtitle visible",
            Err(SondearError::Timeout {
                ms: 5000,
                condition: "[data-testid=\"hero-subtitle\"] visible".to_string(),
            }),
        );
        assert!(!cont);
        assert!(!v.passed());

        let failure = v.failure().unwrap();
        assert_eq!(failure.name, "hero subtitle visible");
        assert!(failure.message.as_ref().unwrap().contains("5000ms"));
    }

    #[test]
    fn test_exact_equality_no_normalization() {
        let mut v = Verification::new("subtitle");
        assert!(!v.record_eq("subtitle text", "Explore our demo projects", "explore our demo projects"));
        assert!(!v.passed());

        let mut padded = Verification::new("subtitle");
        assert!(!padded.record_eq("subtitle text", "text", " text "));
    }

    #[test]
    fn test_to_result_names_failing_step() {
        let mut v = Verification::new("home page elements");
        let _ = v.record_eq("hero subtitle text", "a", "b");
        let err = v.to_result().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("home page elements"));
        assert!(msg.contains("hero subtitle text"));
    }

    #[test]
    fn test_serializes_for_report_embedding() {
        let mut v = Verification::new("home page elements");
        let _ = v.record("theme toggle visible", Ok(()));
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("theme toggle visible"));
        assert!(json.contains("Passed"));
    }
}
