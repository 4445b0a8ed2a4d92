//! Risk-profile validation of a proposed allocation.
//!
//! A stateless decision function over the allocation, its aggregated
//! metrics and the investor profile. Each check produces zero or one
//! reason string and every check runs even after one fails, so a
//! FAIL verdict carries the exhaustive reason list. FAIL is a
//! normal, expected outcome surfaced as data, never as an error.

mod concentration;
mod diversification;
mod types;
mod volatility_band;
mod weight_sum;

use tracing::debug;

pub use types::{ValidationResult, ValidationStatus};

use crate::config::EngineConfig;
use crate::domain::{Allocation, PriceSeries, RiskProfile};
use crate::portfolio::PortfolioMetrics;

/// Validates a proposed allocation against a risk profile.
#[derive(Debug)]
pub struct RiskValidator<'a> {
    config: &'a EngineConfig,
}

impl<'a> RiskValidator<'a> {
    /// Create a validator bound to a configuration.
    #[must_use]
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Run every check and collect the verdict.
    #[must_use]
    pub fn validate(
        &self,
        allocation: &Allocation,
        series: &PriceSeries,
        metrics: &PortfolioMetrics,
        profile: &RiskProfile,
    ) -> ValidationResult {
        let checks = [
            weight_sum::check_weight_sum(allocation),
            concentration::check_concentration(
                allocation,
                profile,
                &self.config.concentration_caps,
            ),
            volatility_band::check_volatility_band(
                metrics,
                profile,
                &self.config.volatility_bands,
            ),
            diversification::check_diversification(allocation, series, profile),
        ];
        let reasons: Vec<String> = checks.into_iter().flatten().collect();
        debug!(
            failed_checks = reasons.len(),
            tolerance = %profile.risk_tolerance,
            "validation complete"
        );
        ValidationResult::from_reasons(reasons)
    }
}
