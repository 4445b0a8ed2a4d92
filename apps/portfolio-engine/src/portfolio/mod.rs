//! Portfolio-level aggregation of per-asset metrics.

mod aggregator;
mod types;

pub use aggregator::PortfolioAggregator;
pub use types::PortfolioMetrics;
