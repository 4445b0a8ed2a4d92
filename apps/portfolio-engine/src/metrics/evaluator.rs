//! Per-asset metric evaluation.
//!
//! Pure computation over a supplied price series and optional market
//! benchmark. Missing or insufficient data degrades individual
//! fields to `None`; only a series too short to form a single return
//! is a hard error.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::Asset;
use crate::error::EngineError;

use super::constants::{SMA_LONG_WINDOW, SMA_SHORT_WINDOW, VOLATILITY_NOISE_FLOOR};
use super::math::{
    annualize_return, annualized_volatility, max_drawdown, ols_slope, total_return, trailing_sma,
};
use super::returns::{DatedReturn, align_returns, windowed_points, windowed_returns};
use super::types::{AssetMetrics, CapmAssumptions, Momentum};

/// Evaluates one asset at a time against a fixed configuration and
/// (optionally) a market benchmark.
///
/// The benchmark's return series is derived once at construction and
/// shared across every `evaluate` call, so the per-asset fan-out
/// does no redundant work.
#[derive(Debug)]
pub struct MetricEvaluator<'a> {
    config: &'a EngineConfig,
    market_returns: Option<Vec<DatedReturn>>,
}

impl<'a> MetricEvaluator<'a> {
    /// Create an evaluator.
    ///
    /// When `market_index` is `None`, beta and CAPM are absent for
    /// every asset.
    #[must_use]
    pub fn new(config: &'a EngineConfig, market_index: Option<&Asset>) -> Self {
        let market_returns = market_index.map(|index| {
            let returns = windowed_returns(index, config.lookback_days);
            if returns.is_empty() {
                warn!(
                    ticker = index.ticker(),
                    "market index has no computable returns; beta disabled for this run"
                );
            }
            returns
        });
        Self {
            config,
            market_returns,
        }
    }

    /// Compute the full metric record for one asset.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientData`] when the windowed
    /// series cannot form a single return.
    pub fn evaluate(&self, asset: &Asset) -> Result<AssetMetrics, EngineError> {
        let returns = windowed_returns(asset, self.config.lookback_days);
        if returns.is_empty() {
            return Err(EngineError::InsufficientData {
                ticker: asset.ticker().to_string(),
                observations: windowed_points(asset, self.config.lookback_days).len(),
            });
        }

        let values: Vec<f64> = returns.iter().map(|r| r.value).collect();
        let total = total_return(&values);
        let annualized = annualize_return(total, values.len());
        let volatility = annualized_volatility(&values);
        let sharpe = volatility.and_then(|vol| {
            if vol < VOLATILITY_NOISE_FLOOR {
                None
            } else {
                Some((annualized - self.config.risk_free_rate) / vol)
            }
        });
        let drawdown = max_drawdown(&values);

        let beta = self.beta(asset.ticker(), &returns);
        let capm = beta.map(|b| {
            self.config.risk_free_rate
                + b * (self.config.expected_market_return - self.config.risk_free_rate)
        });

        let closes: Vec<f64> = windowed_points(asset, self.config.lookback_days)
            .iter()
            .map(|p| p.close)
            .collect();
        let sma_50 = trailing_sma(&closes, SMA_SHORT_WINDOW);
        let sma_200 = trailing_sma(&closes, SMA_LONG_WINDOW);
        let momentum = Momentum::from_smas(sma_50, sma_200);

        debug!(
            ticker = asset.ticker(),
            period_days = values.len(),
            beta = ?beta,
            momentum = ?momentum,
            "asset metrics computed"
        );

        Ok(AssetMetrics {
            ticker: asset.ticker().to_string(),
            total_return: total,
            annualized_return: annualized,
            annualized_volatility: volatility,
            sharpe_ratio: sharpe,
            max_drawdown: drawdown,
            beta,
            capm_expected_return: capm,
            sma_50,
            sma_200,
            momentum,
            period_days: values.len(),
            assumptions: CapmAssumptions {
                risk_free_rate: self.config.risk_free_rate,
                expected_market_return: self.config.expected_market_return,
            },
        })
    }

    /// OLS beta over the date-intersected overlap with the
    /// benchmark. Absent without a benchmark, with a thin overlap,
    /// or with a flat benchmark.
    fn beta(&self, ticker: &str, asset_returns: &[DatedReturn]) -> Option<f64> {
        let market = self.market_returns.as_ref()?;
        let (market_vals, asset_vals) = align_returns(market, asset_returns);
        if market_vals.len() < self.config.min_overlap_observations {
            debug!(
                ticker,
                overlap = market_vals.len(),
                required = self.config.min_overlap_observations,
                "insufficient overlap with benchmark, beta absent"
            );
            return None;
        }
        ols_slope(&market_vals, &asset_vals)
    }
}
