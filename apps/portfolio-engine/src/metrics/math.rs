//! Statistical math utilities for return-series calculations.
//!
//! Everything operates on plain `f64` slices. Sample (n-1)
//! denominators are used throughout so variance, covariance and the
//! regression slope are mutually consistent.

use super::constants::{MIN_OBS_FOR_ANNUALIZATION, TRADING_DAYS_PER_YEAR};

/// Mean of a slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n-1 denominator).
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Sample covariance of two equally long slices (n-1 denominator).
#[must_use]
pub fn sample_covariance(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let sum: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();
    Some(sum / (xs.len() - 1) as f64)
}

/// Ordinary least-squares slope of `ys` regressed on `xs`:
/// `cov(x, y) / var(x)`. `None` when the regressor has zero
/// variance, so a flat benchmark never yields a fabricated beta.
#[must_use]
pub fn ols_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let var_x = sample_variance(xs)?;
    if var_x == 0.0 {
        return None;
    }
    let cov = sample_covariance(xs, ys)?;
    Some(cov / var_x)
}

/// Total compounded return of a daily return series.
#[must_use]
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Annualize a window total return observed over `observations`
/// trading days: `(1 + total)^(252/n) - 1`.
///
/// Short windows (fewer than [`MIN_OBS_FOR_ANNUALIZATION`]
/// observations) are reported unannualized.
#[must_use]
pub fn annualize_return(total: f64, observations: usize) -> f64 {
    if observations == 0 {
        return 0.0;
    }
    if observations < MIN_OBS_FOR_ANNUALIZATION {
        return total;
    }
    (1.0 + total).powf(TRADING_DAYS_PER_YEAR / observations as f64) - 1.0
}

/// Annualized volatility of a daily return series:
/// `stdev(r) * sqrt(252)`. `None` below two observations.
#[must_use]
pub fn annualized_volatility(returns: &[f64]) -> Option<f64> {
    sample_std_dev(returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Maximum drawdown of a daily return series.
///
/// Compounds a value series from 1.0 and takes the minimum of
/// `value / running_peak - 1`. Always <= 0; exactly 0 for a series
/// that never declines.
#[must_use]
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut value = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut worst = 0.0_f64;
    for r in returns {
        value *= 1.0 + r;
        if value > peak {
            peak = value;
        }
        let drawdown = value / peak - 1.0;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}

/// Simple moving average over the trailing `window` values.
/// `None` when fewer than `window` values exist.
#[must_use]
pub fn trailing_sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}
