//! Price history types: individual assets and the per-run series table.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A single daily close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date of the observation.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

/// One asset's historical daily closes, ordered by date.
///
/// Construction enforces the series invariants: dates strictly
/// increasing with no duplicates, closes finite and positive, and at
/// least one observation present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    ticker: String,
    points: Vec<PricePoint>,
    asset_class: Option<String>,
}

impl Asset {
    /// Create an asset from an ordered price history.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSeries`] when dates are not
    /// strictly increasing or any close is non-finite or
    /// non-positive, and [`EngineError::InsufficientData`] when the
    /// series is empty.
    pub fn new(
        ticker: impl Into<String>,
        points: Vec<PricePoint>,
        asset_class: Option<String>,
    ) -> Result<Self, EngineError> {
        let ticker = ticker.into();
        if points.is_empty() {
            return Err(EngineError::InsufficientData {
                ticker,
                observations: 0,
            });
        }
        for window in points.windows(2) {
            if window[1].date <= window[0].date {
                return Err(EngineError::InvalidSeries {
                    ticker,
                    message: format!(
                        "dates must be strictly increasing ({} followed by {})",
                        window[0].date, window[1].date
                    ),
                });
            }
        }
        if let Some(point) = points.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
            return Err(EngineError::InvalidSeries {
                ticker,
                message: format!("close on {} is {}, expected a finite positive price", point.date, point.close),
            });
        }
        Ok(Self {
            ticker,
            points,
            asset_class,
        })
    }

    /// Ticker symbol.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// The ordered price history.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Optional asset-class tag (e.g. "Equity", "Fixed income").
    #[must_use]
    pub fn asset_class(&self) -> Option<&str> {
        self.asset_class.as_deref()
    }

    /// Date of the most recent observation.
    #[must_use]
    pub fn last_date(&self) -> NaiveDate {
        // Non-empty is a construction invariant.
        self.points.last().map(|p| p.date).unwrap_or_default()
    }
}

/// The immutable per-run table of price histories, keyed by ticker,
/// with an explicit valuation ("as of") date.
///
/// Assets may have unequal history lengths; the metric evaluator
/// tolerates that and the aggregator intersects dates explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    as_of: NaiveDate,
    assets: BTreeMap<String, Asset>,
}

impl PriceSeries {
    /// Build a series table from a set of assets.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSeries`] when two assets share a
    /// ticker.
    pub fn new(as_of: NaiveDate, assets: Vec<Asset>) -> Result<Self, EngineError> {
        let mut map = BTreeMap::new();
        for asset in assets {
            let ticker = asset.ticker().to_string();
            if map.insert(ticker.clone(), asset).is_some() {
                return Err(EngineError::InvalidSeries {
                    ticker,
                    message: "duplicate ticker in price series".to_string(),
                });
            }
        }
        Ok(Self { as_of, assets: map })
    }

    /// The valuation date this table was assembled for.
    #[must_use]
    pub const fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Look up an asset by ticker.
    #[must_use]
    pub fn get(&self, ticker: &str) -> Option<&Asset> {
        self.assets.get(ticker)
    }

    /// Whether the table holds a history for the ticker.
    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        self.assets.contains_key(ticker)
    }

    /// All tickers, in sorted order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    /// Number of assets in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
