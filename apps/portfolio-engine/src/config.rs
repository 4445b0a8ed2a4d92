//! Engine configuration.
//!
//! Every threshold the engine applies is carried here and passed
//! explicitly into each run, never read from ambient process state,
//! so runs are reproducible and testable in isolation. All fields
//! have serde defaults, so a partial JSON/YAML document deserializes
//! into a fully usable configuration.

use serde::{Deserialize, Serialize};

use crate::domain::RiskTolerance;
use crate::error::EngineError;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Annual risk-free rate used for Sharpe and CAPM (e.g. 0.045).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Expected annual market return used for CAPM (e.g. 0.09).
    #[serde(default = "default_expected_market_return")]
    pub expected_market_return: f64,
    /// Trailing window, in trading days, applied to every price
    /// series before any metric is computed.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,
    /// Minimum shared return observations required for beta
    /// regression and for the joint covariance matrix.
    #[serde(default = "default_min_overlap_observations")]
    pub min_overlap_observations: usize,
    /// Per-tolerance single-asset concentration caps.
    #[serde(default)]
    pub concentration_caps: ConcentrationCaps,
    /// Per-tolerance acceptable annualized volatility bands.
    #[serde(default)]
    pub volatility_bands: VolatilityBands,
    /// Parallel execution settings for per-asset evaluation.
    #[serde(default)]
    pub parallel: ParallelSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            expected_market_return: default_expected_market_return(),
            lookback_days: default_lookback_days(),
            min_overlap_observations: default_min_overlap_observations(),
            concentration_caps: ConcentrationCaps::default(),
            volatility_bands: VolatilityBands::default(),
            parallel: ParallelSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] describing the first
    /// invalid setting found.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.risk_free_rate.is_finite() {
            return Err(invalid("risk_free_rate must be finite"));
        }
        if !self.expected_market_return.is_finite() {
            return Err(invalid("expected_market_return must be finite"));
        }
        if self.lookback_days < 2 {
            return Err(invalid("lookback_days must be at least 2"));
        }
        if self.min_overlap_observations < 2 {
            return Err(invalid("min_overlap_observations must be at least 2"));
        }
        self.concentration_caps.validate()?;
        self.volatility_bands.validate()?;
        Ok(())
    }
}

fn invalid(message: &str) -> EngineError {
    EngineError::InvalidConfig {
        message: message.to_string(),
    }
}

/// Maximum weight any single asset may carry, by risk tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationCaps {
    /// Cap for conservative profiles.
    #[serde(default = "default_cap_conservative")]
    pub conservative: f64,
    /// Cap for medium profiles.
    #[serde(default = "default_cap_medium")]
    pub medium: f64,
    /// Cap for aggressive profiles.
    #[serde(default = "default_cap_aggressive")]
    pub aggressive: f64,
}

impl Default for ConcentrationCaps {
    fn default() -> Self {
        Self {
            conservative: default_cap_conservative(),
            medium: default_cap_medium(),
            aggressive: default_cap_aggressive(),
        }
    }
}

impl ConcentrationCaps {
    /// Cap applicable to the given tolerance.
    #[must_use]
    pub const fn cap_for(&self, tolerance: RiskTolerance) -> f64 {
        match tolerance {
            RiskTolerance::Conservative => self.conservative,
            RiskTolerance::Medium => self.medium,
            RiskTolerance::Aggressive => self.aggressive,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        for (name, cap) in [
            ("conservative", self.conservative),
            ("medium", self.medium),
            ("aggressive", self.aggressive),
        ] {
            if !cap.is_finite() || cap <= 0.0 || cap > 1.0 {
                return Err(invalid(&format!(
                    "concentration cap '{name}' must be in (0, 1], got {cap}"
                )));
            }
        }
        Ok(())
    }
}

/// An inclusive acceptable range for annualized volatility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolatilityBand {
    /// Lower bound. Non-zero for aggressive profiles, so an overly
    /// conservative portfolio is flagged too.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Acceptable volatility bands by risk tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityBands {
    /// Band for conservative profiles.
    #[serde(default = "default_band_conservative")]
    pub conservative: VolatilityBand,
    /// Band for medium profiles.
    #[serde(default = "default_band_medium")]
    pub medium: VolatilityBand,
    /// Band for aggressive profiles.
    #[serde(default = "default_band_aggressive")]
    pub aggressive: VolatilityBand,
}

impl Default for VolatilityBands {
    fn default() -> Self {
        Self {
            conservative: default_band_conservative(),
            medium: default_band_medium(),
            aggressive: default_band_aggressive(),
        }
    }
}

impl VolatilityBands {
    /// Band applicable to the given tolerance.
    #[must_use]
    pub const fn band_for(&self, tolerance: RiskTolerance) -> VolatilityBand {
        match tolerance {
            RiskTolerance::Conservative => self.conservative,
            RiskTolerance::Medium => self.medium,
            RiskTolerance::Aggressive => self.aggressive,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        for (name, band) in [
            ("conservative", self.conservative),
            ("medium", self.medium),
            ("aggressive", self.aggressive),
        ] {
            if !band.min.is_finite() || !band.max.is_finite() || band.min < 0.0 {
                return Err(invalid(&format!(
                    "volatility band '{name}' must be finite and non-negative"
                )));
            }
            if band.min > band.max {
                return Err(invalid(&format!(
                    "volatility band '{name}' has min {} > max {}",
                    band.min, band.max
                )));
            }
        }
        Ok(())
    }
}

/// Parallel execution settings for per-asset evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelSettings {
    /// Thread count for the evaluation pool (0 = rayon default).
    #[serde(default)]
    pub max_threads: usize,
    /// Below this many assets, evaluation runs sequentially; the
    /// fan-out overhead is not worth it for tiny allocations.
    #[serde(default = "default_min_parallel_jobs")]
    pub min_parallel_jobs: usize,
}

impl Default for ParallelSettings {
    fn default() -> Self {
        Self {
            max_threads: 0,
            min_parallel_jobs: default_min_parallel_jobs(),
        }
    }
}

const fn default_risk_free_rate() -> f64 {
    0.045
}

const fn default_expected_market_return() -> f64 {
    0.09
}

const fn default_lookback_days() -> usize {
    252
}

const fn default_min_overlap_observations() -> usize {
    30
}

const fn default_cap_conservative() -> f64 {
    0.15
}

const fn default_cap_medium() -> f64 {
    0.20
}

const fn default_cap_aggressive() -> f64 {
    0.30
}

const fn default_band_conservative() -> VolatilityBand {
    VolatilityBand { min: 0.0, max: 0.12 }
}

const fn default_band_medium() -> VolatilityBand {
    VolatilityBand { min: 0.05, max: 0.20 }
}

const fn default_band_aggressive() -> VolatilityBand {
    VolatilityBand { min: 0.12, max: 0.45 }
}

const fn default_min_parallel_jobs() -> usize {
    4
}
