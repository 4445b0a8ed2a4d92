//! Portfolio aggregation: the join point after per-asset evaluation.
//!
//! Rebuilds a joint daily return series over the intersection of the
//! allocated assets' observation dates and derives every aggregate
//! from that series and its covariance matrix, never from weight
//! averages of already-annualized per-asset figures.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::{Allocation, PriceSeries, WEIGHT_SUM_TOLERANCE};
use crate::error::EngineError;
use crate::metrics::constants::{TRADING_DAYS_PER_YEAR, VOLATILITY_NOISE_FLOOR};
use crate::metrics::math::{annualize_return, max_drawdown, total_return};
use crate::metrics::returns::windowed_returns;
use crate::metrics::{AssetMetrics, CapmAssumptions, Momentum};

use super::types::PortfolioMetrics;

/// Aggregates per-asset metrics and raw return series into
/// portfolio-level statistics.
#[derive(Debug)]
pub struct PortfolioAggregator<'a> {
    config: &'a EngineConfig,
}

impl<'a> PortfolioAggregator<'a> {
    /// Create an aggregator bound to a configuration.
    #[must_use]
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Aggregate the allocation.
    ///
    /// `per_asset` must hold a record for every allocated ticker;
    /// the engine facade guarantees that by failing the run on any
    /// per-asset [`EngineError::InsufficientData`]. Assets without a
    /// beta stay in the covariance, return and drawdown terms; they
    /// are only excluded from the CAPM aggregate.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AllocationWeight`] when weights do not sum
    ///   to 1.0 within tolerance.
    /// - [`EngineError::InsufficientOverlap`] when the shared date
    ///   range is thinner than `min_overlap_observations`.
    pub fn aggregate(
        &self,
        series: &PriceSeries,
        allocation: &Allocation,
        per_asset: &BTreeMap<String, AssetMetrics>,
    ) -> Result<PortfolioMetrics, EngineError> {
        if !allocation.sums_to_one() {
            return Err(EngineError::AllocationWeight {
                total: allocation.total_weight(),
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        let tickers: Vec<String> = allocation.tickers().map(str::to_string).collect();
        let weights: Vec<f64> = allocation.iter().map(|(_, w)| w).collect();

        let (dates, columns) = self.joint_return_matrix(series, &tickers)?;
        let observations = dates;

        // Portfolio daily return: weight dot product per shared date.
        let portfolio_returns: Vec<f64> = (0..observations)
            .map(|t| {
                columns
                    .iter()
                    .zip(weights.iter())
                    .map(|(col, w)| col[t] * w)
                    .sum()
            })
            .collect();

        let total = total_return(&portfolio_returns);
        let annualized = annualize_return(total, observations);
        let volatility = Self::covariance_volatility(&columns, &weights);
        // The reconstructed series carries compounding round-off, so a
        // perfect hedge yields an epsilon volatility rather than an
        // exact zero.
        let sharpe = if volatility < VOLATILITY_NOISE_FLOOR {
            None
        } else {
            Some((annualized - self.config.risk_free_rate) / volatility)
        };
        let drawdown = max_drawdown(&portfolio_returns);

        let (capm, coverage) = Self::weighted_capm(allocation, per_asset);
        if coverage < 1.0 - WEIGHT_SUM_TOLERANCE {
            warn!(
                beta_coverage = coverage,
                "CAPM aggregate covers only part of the portfolio weight"
            );
        }

        let sma_50 = Self::weighted_sma(allocation, per_asset, |m| m.sma_50);
        let sma_200 = Self::weighted_sma(allocation, per_asset, |m| m.sma_200);
        let momentum = Momentum::from_smas(sma_50, sma_200);

        debug!(
            observations,
            volatility, drawdown, beta_coverage = coverage, "portfolio metrics computed"
        );

        Ok(PortfolioMetrics {
            total_return: total,
            annualized_return: annualized,
            annualized_volatility: volatility,
            sharpe_ratio: sharpe,
            max_drawdown: drawdown,
            capm_expected_return: capm,
            beta_coverage: coverage,
            sma_50,
            sma_200,
            momentum,
            period_days: observations,
            included_tickers: tickers,
            assumptions: CapmAssumptions {
                risk_free_rate: self.config.risk_free_rate,
                expected_market_return: self.config.expected_market_return,
            },
        })
    }

    /// Build the date-aligned return matrix: one column per ticker,
    /// rows restricted to dates every ticker observed.
    fn joint_return_matrix(
        &self,
        series: &PriceSeries,
        tickers: &[String],
    ) -> Result<(usize, Vec<Vec<f64>>), EngineError> {
        // Per-ticker dated returns over the lookback window.
        let mut dated: Vec<Vec<crate::metrics::returns::DatedReturn>> =
            Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let asset = series
                .get(ticker)
                .ok_or_else(|| EngineError::UnknownTickers {
                    tickers: vec![ticker.clone()],
                })?;
            dated.push(windowed_returns(asset, self.config.lookback_days));
        }

        // Intersection of observation dates across all tickers.
        let mut common: std::collections::BTreeSet<chrono::NaiveDate> =
            dated.first().map_or_else(Default::default, |first| {
                first.iter().map(|r| r.date).collect()
            });
        for returns in dated.iter().skip(1) {
            let dates: std::collections::BTreeSet<_> = returns.iter().map(|r| r.date).collect();
            common = common.intersection(&dates).copied().collect();
        }

        if common.len() < self.config.min_overlap_observations {
            return Err(EngineError::InsufficientOverlap {
                observations: common.len(),
                required: self.config.min_overlap_observations,
                tickers: tickers.to_vec(),
            });
        }

        let columns: Vec<Vec<f64>> = dated
            .iter()
            .map(|returns| {
                returns
                    .iter()
                    .filter(|r| common.contains(&r.date))
                    .map(|r| r.value)
                    .collect()
            })
            .collect();

        Ok((common.len(), columns))
    }

    /// `sqrt(w' Sigma w) * sqrt(252)` with the sample covariance
    /// matrix of the aligned per-asset daily returns.
    fn covariance_volatility(columns: &[Vec<f64>], weights: &[f64]) -> f64 {
        let n = columns.first().map_or(0, Vec::len);
        if n < 2 {
            return 0.0;
        }
        let means: Vec<f64> = columns
            .iter()
            .map(|col| col.iter().sum::<f64>() / n as f64)
            .collect();

        let mut variance = 0.0;
        for (i, col_i) in columns.iter().enumerate() {
            for (j, col_j) in columns.iter().enumerate() {
                let cov: f64 = col_i
                    .iter()
                    .zip(col_j.iter())
                    .map(|(x, y)| (x - means[i]) * (y - means[j]))
                    .sum::<f64>()
                    / (n - 1) as f64;
                variance += weights[i] * weights[j] * cov;
            }
        }
        // Guard against negative epsilon from floating accumulation.
        variance.max(0.0).sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
    }

    /// Weighted CAPM over beta-bearing assets, renormalized by the
    /// weight they cover, plus the exact coverage fraction.
    fn weighted_capm(
        allocation: &Allocation,
        per_asset: &BTreeMap<String, AssetMetrics>,
    ) -> (Option<f64>, f64) {
        let mut weighted_sum = 0.0;
        let mut covered_weight = 0.0;
        for (ticker, weight) in allocation.iter() {
            if let Some(capm) = per_asset.get(ticker).and_then(|m| m.capm_expected_return) {
                weighted_sum += weight * capm;
                covered_weight += weight;
            }
        }
        if covered_weight > 0.0 {
            (Some(weighted_sum / covered_weight), covered_weight)
        } else {
            (None, 0.0)
        }
    }

    /// Weight-average an SMA across assets; defined only when every
    /// allocated asset carries the underlying value.
    fn weighted_sma(
        allocation: &Allocation,
        per_asset: &BTreeMap<String, AssetMetrics>,
        pick: impl Fn(&AssetMetrics) -> Option<f64>,
    ) -> Option<f64> {
        let mut acc = 0.0;
        for (ticker, weight) in allocation.iter() {
            let value = per_asset.get(ticker).and_then(&pick)?;
            acc += weight * value;
        }
        Some(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Asset, PricePoint};
    use crate::metrics::MetricEvaluator;
    use chrono::NaiveDate;

    fn asset_from_returns(ticker: &str, daily: &[f64]) -> Asset {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut close = 100.0;
        let mut points = vec![PricePoint { date: start, close }];
        for (i, r) in daily.iter().enumerate() {
            close *= 1.0 + r;
            points.push(PricePoint {
                date: start + chrono::Days::new(i as u64 + 1),
                close,
            });
        }
        Asset::new(ticker, points, None).unwrap()
    }

    fn config(min_overlap: usize) -> EngineConfig {
        EngineConfig {
            min_overlap_observations: min_overlap,
            ..Default::default()
        }
    }

    fn evaluate_all(
        config: &EngineConfig,
        series: &PriceSeries,
        allocation: &Allocation,
    ) -> BTreeMap<String, AssetMetrics> {
        let evaluator = MetricEvaluator::new(config, None);
        allocation
            .tickers()
            .map(|t| {
                (
                    t.to_string(),
                    evaluator.evaluate(series.get(t).unwrap()).unwrap(),
                )
            })
            .collect()
    }

    fn alloc(pairs: &[(&str, f64)]) -> Allocation {
        Allocation::new(pairs.iter().map(|(t, w)| ((*t).to_string(), *w))).unwrap()
    }

    #[test]
    fn rejects_weight_sum_of_point_nine() {
        let config = config(2);
        let a = asset_from_returns("AAPL", &[0.01; 10]);
        let series = PriceSeries::new(a.last_date(), vec![a]).unwrap();
        let allocation = alloc(&[("AAPL", 0.9)]);
        let per_asset = evaluate_all(&config, &series, &allocation);
        let err = PortfolioAggregator::new(&config)
            .aggregate(&series, &allocation, &per_asset)
            .unwrap_err();
        assert!(matches!(err, EngineError::AllocationWeight { .. }));
    }

    #[test]
    fn alternating_returns_match_hand_computed_volatility() {
        // Three identical assets, daily returns +1%/-1% alternating:
        // zero-mean-ish, known variance. All pairwise covariances
        // equal the per-asset variance, so w' Sigma w = var exactly
        // for any weights summing to 1.
        let pattern: Vec<f64> = (0..60).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        let config = config(30);
        let assets = vec![
            asset_from_returns("A", &pattern),
            asset_from_returns("B", &pattern),
            asset_from_returns("C", &pattern),
        ];
        let as_of = assets[0].last_date();
        let series = PriceSeries::new(as_of, assets).unwrap();
        let third = 1.0 / 3.0;
        let allocation = alloc(&[("A", third), ("B", third), ("C", third)]);
        let per_asset = evaluate_all(&config, &series, &allocation);
        let metrics = PortfolioAggregator::new(&config)
            .aggregate(&series, &allocation, &per_asset)
            .unwrap();

        let var = crate::metrics::math::sample_variance(&pattern).unwrap();
        let expected_vol = var.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();
        assert!((metrics.annualized_volatility - expected_vol).abs() < 1e-9);
        assert_eq!(metrics.period_days, 60);
    }

    #[test]
    fn diversification_beats_weighted_average_volatility() {
        // Two assets with equal volatility and correlation -1:
        // portfolio volatility must be strictly below the individual
        // volatility, not its weighted average.
        let up_down: Vec<f64> = (0..60).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        let down_up: Vec<f64> = up_down.iter().map(|r| -r).collect();
        let config = config(30);
        let assets = vec![
            asset_from_returns("A", &up_down),
            asset_from_returns("B", &down_up),
        ];
        let as_of = assets[0].last_date();
        let series = PriceSeries::new(as_of, assets).unwrap();
        let allocation = alloc(&[("A", 0.5), ("B", 0.5)]);
        let per_asset = evaluate_all(&config, &series, &allocation);
        let metrics = PortfolioAggregator::new(&config)
            .aggregate(&series, &allocation, &per_asset)
            .unwrap();

        let individual_vol = per_asset["A"].annualized_volatility.unwrap();
        assert!(individual_vol > 0.0);
        assert!(metrics.annualized_volatility < individual_vol);
        // Perfect hedge: the joint series is flat
        assert!(metrics.annualized_volatility.abs() < 1e-9);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.sharpe_ratio, None);
    }

    #[test]
    fn insufficient_overlap_names_tickers() {
        let config = config(30);
        let a = asset_from_returns("AAPL", &[0.01; 10]);
        let b = asset_from_returns("MSFT", &[0.02; 10]);
        let as_of = a.last_date();
        let series = PriceSeries::new(as_of, vec![a, b]).unwrap();
        let allocation = alloc(&[("AAPL", 0.5), ("MSFT", 0.5)]);
        let per_asset = evaluate_all(&config, &series, &allocation);
        let err = PortfolioAggregator::new(&config)
            .aggregate(&series, &allocation, &per_asset)
            .unwrap_err();
        match err {
            EngineError::InsufficientOverlap {
                observations,
                required,
                tickers,
            } => {
                assert_eq!(observations, 10);
                assert_eq!(required, 30);
                assert_eq!(tickers, vec!["AAPL".to_string(), "MSFT".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn capm_renormalized_over_covered_weight() {
        let pattern: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        let config = config(30);
        let assets = vec![
            asset_from_returns("A", &pattern),
            asset_from_returns("B", &pattern),
        ];
        let as_of = assets[0].last_date();
        let series = PriceSeries::new(as_of, assets).unwrap();
        let allocation = alloc(&[("A", 0.6), ("B", 0.4)]);
        let mut per_asset = evaluate_all(&config, &series, &allocation);

        // Give only A a beta/CAPM figure.
        if let Some(m) = per_asset.get_mut("A") {
            m.beta = Some(1.2);
            m.capm_expected_return = Some(0.10);
        }

        let metrics = PortfolioAggregator::new(&config)
            .aggregate(&series, &allocation, &per_asset)
            .unwrap();
        // Renormalized over the 0.6 covered weight: exactly A's CAPM.
        assert!((metrics.capm_expected_return.unwrap() - 0.10).abs() < 1e-12);
        assert!((metrics.beta_coverage - 0.6).abs() < 1e-12);
        assert_eq!(
            metrics.beta_coverage_summary(),
            "includes assets covering 60.0% of the portfolio weight"
        );
    }

    #[test]
    fn capm_absent_when_no_asset_has_beta() {
        let pattern: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        let config = config(30);
        let a = asset_from_returns("A", &pattern);
        let as_of = a.last_date();
        let series = PriceSeries::new(as_of, vec![a]).unwrap();
        let allocation = alloc(&[("A", 1.0)]);
        let per_asset = evaluate_all(&config, &series, &allocation);
        let metrics = PortfolioAggregator::new(&config)
            .aggregate(&series, &allocation, &per_asset)
            .unwrap();
        assert_eq!(metrics.capm_expected_return, None);
        assert_eq!(metrics.beta_coverage, 0.0);
    }

    #[test]
    fn weighted_sma_absent_when_any_asset_lacks_history() {
        // 250 observations for A (has SMA200), 60 for B (does not).
        let long: Vec<f64> = vec![0.001; 250];
        let short: Vec<f64> = vec![0.001; 60];
        let config = config(30);
        let assets = vec![
            asset_from_returns("A", &long),
            asset_from_returns("B", &short),
        ];
        let as_of = assets[0].last_date();
        let series = PriceSeries::new(as_of, assets).unwrap();
        let allocation = alloc(&[("A", 0.5), ("B", 0.5)]);
        let per_asset = evaluate_all(&config, &series, &allocation);
        let metrics = PortfolioAggregator::new(&config)
            .aggregate(&series, &allocation, &per_asset)
            .unwrap();
        assert!(metrics.sma_50.is_some());
        assert_eq!(metrics.sma_200, None);
        assert_eq!(metrics.momentum, Momentum::Neutral);
    }
}
