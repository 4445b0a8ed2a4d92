//! Diversification check.
//!
//! Every asset class the profile explicitly requested must be
//! covered by at least one allocated asset's tag. When no allocated
//! asset carries a tag at all, class information is considered
//! unavailable and the check is skipped rather than failing on
//! missing metadata.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{Allocation, PriceSeries, RiskProfile};

/// Returns a failure reason naming every requested asset class not
/// covered by the allocation.
#[must_use]
pub fn check_diversification(
    allocation: &Allocation,
    series: &PriceSeries,
    profile: &RiskProfile,
) -> Option<String> {
    if profile.preferred_asset_classes.is_empty() {
        return None;
    }

    let covered: BTreeSet<&str> = allocation
        .tickers()
        .filter_map(|ticker| series.get(ticker).and_then(|a| a.asset_class()))
        .collect();

    if covered.is_empty() {
        debug!("no allocated asset carries a class tag; diversification check skipped");
        return None;
    }

    let missing: Vec<&str> = profile
        .preferred_asset_classes
        .iter()
        .map(String::as_str)
        .filter(|class| !covered.contains(class))
        .collect();

    if missing.is_empty() {
        return None;
    }
    Some(format!(
        "allocation is missing requested asset class(es): {}",
        missing.join(", ")
    ))
}
