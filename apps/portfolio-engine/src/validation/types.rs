//! Validation verdict types.

use serde::{Deserialize, Serialize};

/// Overall verdict of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// Every check passed.
    Pass,
    /// At least one check failed.
    Fail,
}

/// The verdict for one run: PASS with no reasons, or FAIL with one
/// human-readable reason per failing check. Checks are never
/// short-circuited, so the reason list is exhaustive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Overall status.
    pub status: ValidationStatus,
    /// One reason per failing check, in check order. Empty iff PASS.
    pub reasons: Vec<String>,
}

impl ValidationResult {
    /// Build a result from collected failure reasons.
    #[must_use]
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        let status = if reasons.is_empty() {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Fail
        };
        Self { status, reasons }
    }

    /// Whether the verdict is PASS.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == ValidationStatus::Pass
    }
}
