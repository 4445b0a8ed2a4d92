//! Per-asset metric evaluation: returns, risk, momentum, CAPM.

pub mod constants;
pub mod math;
pub mod returns;

mod evaluator;
mod types;

pub use evaluator::MetricEvaluator;
pub use types::{AssetMetrics, CapmAssumptions, Momentum};
