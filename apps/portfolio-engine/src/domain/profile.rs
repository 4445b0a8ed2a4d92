//! Investor risk profiles.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Investor risk tolerance, the axis every validation threshold
/// keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTolerance {
    /// Capital preservation first.
    Conservative,
    /// Balanced risk and return.
    Medium,
    /// Growth-seeking, higher drawdown appetite.
    Aggressive,
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Conservative => "conservative",
            Self::Medium => "medium",
            Self::Aggressive => "aggressive",
        };
        write!(f, "{label}")
    }
}

/// A structured investor profile, supplied whole by the external
/// profiling collaborator and read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Free-text investment goal (e.g. "retirement", "growth").
    pub goal: String,
    /// Risk tolerance.
    pub risk_tolerance: RiskTolerance,
    /// Investment horizon in years.
    pub time_horizon_years: u32,
    /// Asset classes the investor explicitly asked for. The
    /// diversification check requires each to be covered by at least
    /// one allocated asset.
    #[serde(default)]
    pub preferred_asset_classes: BTreeSet<String>,
}

impl RiskProfile {
    /// Convenience constructor for a profile without class
    /// preferences.
    #[must_use]
    pub fn new(goal: impl Into<String>, risk_tolerance: RiskTolerance, time_horizon_years: u32) -> Self {
        Self {
            goal: goal.into(),
            risk_tolerance,
            time_horizon_years,
            preferred_asset_classes: BTreeSet::new(),
        }
    }
}
