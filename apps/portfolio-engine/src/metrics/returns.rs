//! Daily return series derivation.
//!
//! Returns are dated so that downstream consumers (beta regression,
//! the joint covariance matrix) can intersect observation dates
//! across assets with unequal history lengths.

use chrono::NaiveDate;

use crate::domain::Asset;

/// A dated daily simple return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedReturn {
    /// Date of the later close in the pair.
    pub date: NaiveDate,
    /// Simple return `p_t / p_{t-1} - 1`.
    pub value: f64,
}

/// Window an asset's closes to the trailing `lookback_days`
/// observations and compute dated daily simple returns over
/// consecutive observations.
///
/// Gaps in the calendar are tolerated: a return is formed between
/// each adjacent pair of observations, matching the behavior of a
/// trading-day series.
#[must_use]
pub fn windowed_returns(asset: &Asset, lookback_days: usize) -> Vec<DatedReturn> {
    let points = windowed_points(asset, lookback_days);
    points
        .windows(2)
        .map(|pair| DatedReturn {
            date: pair[1].date,
            value: pair[1].close / pair[0].close - 1.0,
        })
        .collect()
}

/// The trailing window of closes the metrics are computed over.
#[must_use]
pub fn windowed_points(asset: &Asset, lookback_days: usize) -> &[crate::domain::PricePoint] {
    let points = asset.points();
    // lookback_days price observations yield lookback_days - 1 returns.
    let start = points.len().saturating_sub(lookback_days);
    &points[start..]
}

/// Intersect two dated return series on their dates, returning the
/// paired values in date order. Both inputs are date-sorted, so a
/// linear merge suffices.
#[must_use]
pub fn align_returns(a: &[DatedReturn], b: &[DatedReturn]) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                xs.push(a[i].value);
                ys.push(b[j].value);
                i += 1;
                j += 1;
            }
        }
    }
    (xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn asset(ticker: &str, closes: &[(u32, f64)]) -> Asset {
        let points = closes
            .iter()
            .map(|&(d, close)| PricePoint { date: date(d), close })
            .collect();
        Asset::new(ticker, points, None).unwrap()
    }

    #[test]
    fn returns_are_simple_and_dated() {
        let a = asset("AAPL", &[(3, 100.0), (4, 110.0), (5, 99.0)]);
        let returns = windowed_returns(&a, 252);
        assert_eq!(returns.len(), 2);
        assert_eq!(returns[0].date, date(4));
        assert!((returns[0].value - 0.10).abs() < 1e-12);
        assert!((returns[1].value - (99.0 / 110.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn lookback_windows_the_series() {
        let a = asset("AAPL", &[(3, 100.0), (4, 110.0), (5, 99.0), (6, 101.0)]);
        // lookback of 3 observations -> 2 returns, ending at the last date
        let returns = windowed_returns(&a, 3);
        assert_eq!(returns.len(), 2);
        assert_eq!(returns.last().unwrap().date, date(6));
    }

    #[test]
    fn alignment_intersects_dates() {
        let a = asset("AAPL", &[(3, 100.0), (4, 110.0), (5, 99.0), (6, 101.0)]);
        let b = asset("MSFT", &[(4, 50.0), (5, 51.0), (6, 50.5)]);
        let ra = windowed_returns(&a, 252);
        let rb = windowed_returns(&b, 252);
        let (xs, ys) = align_returns(&ra, &rb);
        // Shared return dates: 5th and 6th.
        assert_eq!(xs.len(), 2);
        assert_eq!(ys.len(), 2);
        assert!((xs[0] - (99.0 / 110.0 - 1.0)).abs() < 1e-12);
        assert!((ys[0] - (51.0 / 50.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn disjoint_series_align_to_nothing() {
        let a = asset("AAPL", &[(3, 100.0), (4, 110.0)]);
        let b = asset("MSFT", &[(10, 50.0), (11, 51.0)]);
        let (xs, ys) = align_returns(&windowed_returns(&a, 252), &windowed_returns(&b, 252));
        assert!(xs.is_empty());
        assert!(ys.is_empty());
    }
}
