//! Engine facade: one entry point orchestrating evaluation,
//! aggregation and validation for a single run.
//!
//! Per-asset metric evaluation is independent across tickers with no
//! shared mutable state, so it fans out across a rayon pool; the
//! aggregator is the join point and the validator runs strictly
//! after it, synchronously. Nothing is cached across runs and
//! nothing here touches the network or disk.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::domain::{Allocation, Asset, PriceSeries, RiskProfile, WEIGHT_SUM_TOLERANCE};
use crate::error::EngineError;
use crate::metrics::{AssetMetrics, CapmAssumptions, MetricEvaluator};
use crate::portfolio::{PortfolioAggregator, PortfolioMetrics};
use crate::validation::{RiskValidator, ValidationResult};

/// The composite result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Valuation date the inputs were assembled for.
    pub as_of: NaiveDate,
    /// Per-ticker metric records, keyed and ordered by ticker.
    pub per_asset: BTreeMap<String, AssetMetrics>,
    /// Portfolio-level aggregate metrics.
    pub portfolio: PortfolioMetrics,
    /// The validation verdict.
    pub validation: ValidationResult,
    /// CAPM assumptions the run was computed under, for verbatim
    /// reproduction in rendered reports.
    pub assumptions: CapmAssumptions,
}

/// Deterministic metrics and validation engine.
///
/// Holds only configuration; every run's inputs are passed to
/// [`Engine::evaluate`] and every output is newly constructed, so
/// concurrent runs never interfere.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when the configuration
    /// fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one proposed allocation.
    ///
    /// Runs per-asset metric evaluation (in parallel for larger
    /// allocations), aggregates the portfolio, and validates the
    /// result against the profile.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownTickers`] when the allocation
    ///   references assets absent from the price series.
    /// - [`EngineError::AllocationWeight`] when weights do not sum
    ///   to 1.0 within tolerance.
    /// - [`EngineError::InsufficientData`] when any allocated asset
    ///   cannot form a single return.
    /// - [`EngineError::InsufficientOverlap`] when the assets' date
    ///   ranges do not overlap enough for a joint covariance.
    pub fn evaluate(
        &self,
        series: &PriceSeries,
        market_index: Option<&Asset>,
        allocation: &Allocation,
        profile: &RiskProfile,
    ) -> Result<EvaluationReport, EngineError> {
        let start = Instant::now();

        let unknown: Vec<String> = allocation
            .tickers()
            .filter(|t| !series.contains(t))
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(EngineError::UnknownTickers { tickers: unknown });
        }
        if !allocation.sums_to_one() {
            return Err(EngineError::AllocationWeight {
                total: allocation.total_weight(),
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        info!(
            assets = allocation.len(),
            as_of = %series.as_of(),
            benchmark = market_index.map(Asset::ticker),
            "starting evaluation run"
        );

        let per_asset = self.evaluate_assets(series, market_index, allocation)?;

        let aggregator = PortfolioAggregator::new(&self.config);
        let portfolio = aggregator.aggregate(series, allocation, &per_asset)?;

        let validator = RiskValidator::new(&self.config);
        let validation = validator.validate(allocation, series, &portfolio, profile);

        info!(
            passed = validation.passed(),
            reasons = validation.reasons.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "evaluation run complete"
        );

        Ok(EvaluationReport {
            as_of: series.as_of(),
            per_asset,
            portfolio,
            validation,
            assumptions: CapmAssumptions {
                risk_free_rate: self.config.risk_free_rate,
                expected_market_return: self.config.expected_market_return,
            },
        })
    }

    /// Fan per-asset evaluation out across a rayon pool, or run
    /// sequentially for small allocations where the fan-out isn't
    /// worth it.
    fn evaluate_assets(
        &self,
        series: &PriceSeries,
        market_index: Option<&Asset>,
        allocation: &Allocation,
    ) -> Result<BTreeMap<String, AssetMetrics>, EngineError> {
        let evaluator = MetricEvaluator::new(&self.config, market_index);
        let tickers: Vec<&str> = allocation.tickers().collect();

        let evaluate_one = |ticker: &&str| -> Result<(String, AssetMetrics), EngineError> {
            // Presence was checked up front.
            let asset = series.get(ticker).ok_or_else(|| EngineError::UnknownTickers {
                tickers: vec![(*ticker).to_string()],
            })?;
            let metrics = evaluator.evaluate(asset)?;
            Ok(((*ticker).to_string(), metrics))
        };

        let results: Vec<Result<(String, AssetMetrics), EngineError>> =
            if tickers.len() >= self.config.parallel.min_parallel_jobs {
                debug!(jobs = tickers.len(), "evaluating assets in parallel");
                if self.config.parallel.max_threads > 0 {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(self.config.parallel.max_threads)
                        .build()
                        .map_err(|e| EngineError::ThreadPool {
                            message: e.to_string(),
                        })?;
                    pool.install(|| tickers.par_iter().map(evaluate_one).collect())
                } else {
                    tickers.par_iter().map(evaluate_one).collect()
                }
            } else {
                tickers.iter().map(|t| evaluate_one(t)).collect()
            };

        results.into_iter().collect()
    }
}
