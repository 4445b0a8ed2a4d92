//! Single-asset concentration check.
//!
//! The cap depends on the profile's risk tolerance: a conservative
//! investor gets a tighter cap than an aggressive one.

use crate::config::ConcentrationCaps;
use crate::domain::{Allocation, RiskProfile};

/// Returns a failure reason naming every asset whose weight exceeds
/// the tolerance-dependent cap.
#[must_use]
pub fn check_concentration(
    allocation: &Allocation,
    profile: &RiskProfile,
    caps: &ConcentrationCaps,
) -> Option<String> {
    let cap = caps.cap_for(profile.risk_tolerance);
    let offenders: Vec<String> = allocation
        .iter()
        .filter(|(_, weight)| *weight > cap)
        .map(|(ticker, weight)| format!("{ticker} at {:.1}%", weight * 100.0))
        .collect();
    if offenders.is_empty() {
        return None;
    }
    Some(format!(
        "single-asset weight exceeds the {:.0}% cap for a {} profile: {}",
        cap * 100.0,
        profile.risk_tolerance,
        offenders.join(", ")
    ))
}
