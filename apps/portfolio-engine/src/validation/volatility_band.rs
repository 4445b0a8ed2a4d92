//! Volatility-band check.
//!
//! Portfolio annualized volatility must fall within the band for the
//! profile's tolerance. Aggressive bands carry a floor, so an
//! aggressive profile handed an overly conservative portfolio is
//! flagged just like the reverse.

use crate::config::VolatilityBands;
use crate::domain::RiskProfile;
use crate::portfolio::PortfolioMetrics;

/// Returns a failure reason when portfolio volatility falls outside
/// the tolerance-dependent acceptable band.
#[must_use]
pub fn check_volatility_band(
    metrics: &PortfolioMetrics,
    profile: &RiskProfile,
    bands: &VolatilityBands,
) -> Option<String> {
    let band = bands.band_for(profile.risk_tolerance);
    let vol = metrics.annualized_volatility;
    if vol < band.min {
        return Some(format!(
            "portfolio volatility {:.1}% is below the {:.1}% floor for a {} profile",
            vol * 100.0,
            band.min * 100.0,
            profile.risk_tolerance
        ));
    }
    if vol > band.max {
        return Some(format!(
            "portfolio volatility {:.1}% exceeds the {:.1}% ceiling for a {} profile",
            vol * 100.0,
            band.max * 100.0,
            profile.risk_tolerance
        ));
    }
    None
}
