//! Proposed portfolio allocations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Tolerance for the "weights sum to 1.0" precondition. A violation
/// indicates an upstream allocation bug and is never silently
/// normalized away.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-4;

/// A proposed allocation: ticker to weight, each a fraction in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation {
    weights: BTreeMap<String, f64>,
}

impl Allocation {
    /// Build an allocation from ticker/weight pairs.
    ///
    /// Individual weights are validated here; the weight-sum
    /// precondition is checked where the allocation is consumed, so
    /// a malformed sum still reaches the validator as a reportable
    /// failure rather than being unconstructible.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WeightOutOfRange`] for any weight
    /// outside [0, 1] or non-finite.
    pub fn new(
        weights: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<Self, EngineError> {
        let weights: BTreeMap<String, f64> = weights.into_iter().collect();
        for (ticker, &weight) in &weights {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(EngineError::WeightOutOfRange {
                    ticker: ticker.clone(),
                    weight,
                });
            }
        }
        Ok(Self { weights })
    }

    /// Weight for a ticker, if allocated.
    #[must_use]
    pub fn weight(&self, ticker: &str) -> Option<f64> {
        self.weights.get(ticker).copied()
    }

    /// Iterate ticker/weight pairs in sorted ticker order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, &w)| (t.as_str(), w))
    }

    /// Allocated tickers in sorted order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Whether the weight sum satisfies the 1.0 precondition.
    #[must_use]
    pub fn sums_to_one(&self) -> bool {
        (self.total_weight() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    /// Number of allocated assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the allocation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(pairs: &[(&str, f64)]) -> Result<Allocation, EngineError> {
        Allocation::new(pairs.iter().map(|(t, w)| ((*t).to_string(), *w)))
    }

    #[test]
    fn accepts_weights_summing_to_one() {
        let allocation = alloc(&[("AAPL", 0.6), ("MSFT", 0.4)]).unwrap();
        assert!(allocation.sums_to_one());
        assert_eq!(allocation.weight("AAPL"), Some(0.6));
        assert_eq!(allocation.weight("TSLA"), None);
    }

    #[test]
    fn tolerates_sum_within_epsilon() {
        let allocation = alloc(&[("AAPL", 0.60004), ("MSFT", 0.4)]).unwrap();
        assert!(allocation.sums_to_one());
    }

    #[test]
    fn flags_sum_outside_tolerance() {
        let allocation = alloc(&[("AAPL", 0.5), ("MSFT", 0.4)]).unwrap();
        assert!(!allocation.sums_to_one());
    }

    #[test]
    fn rejects_negative_weight() {
        let err = alloc(&[("AAPL", -0.1), ("MSFT", 1.1)]).unwrap_err();
        assert!(matches!(err, EngineError::WeightOutOfRange { .. }));
    }

    #[test]
    fn rejects_weight_above_one() {
        assert!(alloc(&[("AAPL", 1.2)]).is_err());
    }

    #[test]
    fn iterates_in_ticker_order() {
        let allocation = alloc(&[("MSFT", 0.4), ("AAPL", 0.6)]).unwrap();
        let tickers: Vec<_> = allocation.tickers().collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }
}
