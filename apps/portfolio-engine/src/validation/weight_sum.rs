//! Weight-sum check: allocation weights must sum to 1.0 within
//! tolerance.

use crate::domain::{Allocation, WEIGHT_SUM_TOLERANCE};

/// Returns a failure reason when the allocation's weights do not
/// sum to 1.0 within tolerance.
#[must_use]
pub fn check_weight_sum(allocation: &Allocation) -> Option<String> {
    if allocation.sums_to_one() {
        return None;
    }
    Some(format!(
        "allocation weights sum to {:.4}, expected 1.0 within {}",
        allocation.total_weight(),
        WEIGHT_SUM_TOLERANCE
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(pairs: &[(&str, f64)]) -> Allocation {
        Allocation::new(pairs.iter().map(|(t, w)| ((*t).to_string(), *w))).unwrap()
    }

    #[test]
    fn exact_sum_passes() {
        assert_eq!(check_weight_sum(&alloc(&[("AAPL", 0.4), ("MSFT", 0.6)])), None);
    }

    #[test]
    fn sum_within_tolerance_passes() {
        assert!(check_weight_sum(&alloc(&[("AAPL", 0.40005), ("MSFT", 0.6)])).is_none());
    }

    #[test]
    fn short_sum_fails_with_total() {
        let reason = check_weight_sum(&alloc(&[("AAPL", 0.4), ("MSFT", 0.5)])).unwrap();
        assert!(reason.contains("0.9000"));
    }
}
