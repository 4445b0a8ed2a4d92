//! Portfolio-level derived statistics.

use serde::{Deserialize, Serialize};

use crate::metrics::{CapmAssumptions, Momentum};

/// Aggregate statistics for a proposed allocation, computed on the
/// portfolio's own reconstructed daily return series over the
/// assets' shared date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Total compounded return of the reconstructed series.
    pub total_return: f64,
    /// Annualized return under the same convention as per-asset
    /// metrics, so cross-comparison is valid.
    pub annualized_return: f64,
    /// Annualized volatility via `sqrt(w' Sigma w) * sqrt(252)` with
    /// the sample covariance matrix of per-asset daily returns.
    pub annualized_volatility: f64,
    /// Sharpe ratio of the reconstructed series; absent when its
    /// volatility is zero up to round-off.
    pub sharpe_ratio: Option<f64>,
    /// Maximum drawdown of the reconstructed value series (not a
    /// weight-average of per-asset drawdowns); always <= 0.
    pub max_drawdown: f64,
    /// Weighted CAPM expected return, renormalized over the weight
    /// held by beta-bearing assets; absent when no asset has a beta.
    pub capm_expected_return: Option<f64>,
    /// Fraction of total portfolio weight held by assets with a
    /// defined beta. Below 1.0 the CAPM aggregate covers only part
    /// of the portfolio and is correspondingly less trustworthy.
    pub beta_coverage: f64,
    /// Weighted 50-day SMA; defined only when every allocated asset
    /// has one.
    pub sma_50: Option<f64>,
    /// Weighted 200-day SMA; defined only when every allocated asset
    /// has one.
    pub sma_200: Option<f64>,
    /// Momentum label from the weighted SMA crossover.
    pub momentum: Momentum,
    /// Shared return observations the joint series was built on.
    pub period_days: usize,
    /// Tickers included in the joint computation, sorted.
    pub included_tickers: Vec<String>,
    /// CAPM assumptions the aggregate was computed under.
    pub assumptions: CapmAssumptions,
}

impl PortfolioMetrics {
    /// Report wording for the CAPM coverage caveat, e.g.
    /// "includes assets covering 100.0% of the portfolio weight".
    #[must_use]
    pub fn beta_coverage_summary(&self) -> String {
        format!(
            "includes assets covering {:.1}% of the portfolio weight",
            self.beta_coverage * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_summary_wording() {
        let metrics = PortfolioMetrics {
            total_return: 0.1,
            annualized_return: 0.1,
            annualized_volatility: 0.15,
            sharpe_ratio: None,
            max_drawdown: -0.05,
            capm_expected_return: Some(0.08),
            beta_coverage: 1.0,
            sma_50: None,
            sma_200: None,
            momentum: Momentum::Neutral,
            period_days: 100,
            included_tickers: vec!["AAPL".to_string()],
            assumptions: CapmAssumptions {
                risk_free_rate: 0.045,
                expected_market_return: 0.09,
            },
        };
        assert_eq!(
            metrics.beta_coverage_summary(),
            "includes assets covering 100.0% of the portfolio weight"
        );
    }
}
