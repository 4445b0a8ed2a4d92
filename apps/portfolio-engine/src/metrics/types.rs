//! Derived metric records.
//!
//! Fields that can legitimately be "not computable" (beta, CAPM,
//! SMAs, volatility on a one-return window) are `Option`s; a zero is
//! never used to stand in for "absent".

use serde::{Deserialize, Serialize};

/// Momentum label from the SMA50/SMA200 crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Momentum {
    /// SMA50 above SMA200.
    Bullish,
    /// SMA50 below SMA200.
    Bearish,
    /// Either SMA absent, or the two are equal.
    #[default]
    Neutral,
}

impl Momentum {
    /// Derive the label from the two moving averages.
    #[must_use]
    pub fn from_smas(sma_short: Option<f64>, sma_long: Option<f64>) -> Self {
        match (sma_short, sma_long) {
            (Some(short), Some(long)) if short > long => Self::Bullish,
            (Some(short), Some(long)) if short < long => Self::Bearish,
            _ => Self::Neutral,
        }
    }
}

/// The CAPM inputs a run was computed under. Echoed into every
/// result so rendered reports can reproduce the assumptions
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmAssumptions {
    /// Annual risk-free rate.
    pub risk_free_rate: f64,
    /// Expected annual market return.
    pub expected_market_return: f64,
}

impl std::fmt::Display for CapmAssumptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rf={:.1}%, E(Rm)={:.1}%",
            self.risk_free_rate * 100.0,
            self.expected_market_return * 100.0
        )
    }
}

/// Per-asset derived statistics. Recomputed fresh each run; never
/// mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetMetrics {
    /// Ticker this record was computed for.
    pub ticker: String,
    /// Total compounded return over the calculation window.
    pub total_return: f64,
    /// Annualized return under the trading-day convention.
    pub annualized_return: f64,
    /// Annualized volatility; absent below two return observations.
    pub annualized_volatility: Option<f64>,
    /// Sharpe ratio; absent when volatility is absent or below the
    /// round-off noise floor.
    pub sharpe_ratio: Option<f64>,
    /// Maximum drawdown over the window; always <= 0.
    pub max_drawdown: f64,
    /// Regression beta vs the market index; absent without enough
    /// overlapping history or without a benchmark.
    pub beta: Option<f64>,
    /// CAPM expected return; absent whenever beta is absent.
    pub capm_expected_return: Option<f64>,
    /// 50-day simple moving average of the close.
    pub sma_50: Option<f64>,
    /// 200-day simple moving average of the close.
    pub sma_200: Option<f64>,
    /// Momentum label from the SMA crossover.
    pub momentum: Momentum,
    /// Return observations in the calculation window.
    pub period_days: usize,
    /// CAPM assumptions the record was computed under.
    pub assumptions: CapmAssumptions,
}
