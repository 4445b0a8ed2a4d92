// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Portfolio Engine - Rust Core Library
//!
//! Deterministic metrics and allocation validation engine. Given
//! historical price series for a set of assets, a proposed weight
//! allocation and an investor risk profile, it produces:
//!
//! - per-asset risk/return/momentum/CAPM statistics,
//! - portfolio-level aggregates computed on the portfolio's own
//!   reconstructed return series and covariance matrix,
//! - a PASS/FAIL validation verdict with an exhaustive reason list.
//!
//! The engine consumes already-materialized inputs and performs no
//! I/O; profile parsing, price fetching, news retrieval, commentary
//! generation and report rendering are external collaborators.
//!
//! # Pipeline
//!
//! - `domain`: immutable inputs (price series, allocation, profile)
//! - `metrics`: per-asset evaluation, embarrassingly parallel
//! - `portfolio`: the aggregation join point
//! - `validation`: the synchronous verdict
//! - `engine`: the facade orchestrating one run
//!
//! Every derived value is a pure function of the inputs plus the
//! explicit [`EngineConfig`], so identical inputs always reproduce
//! identical reports.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Engine configuration: rates, windows, thresholds, bands.
pub mod config;

/// Input data model supplied by external collaborators.
pub mod domain;

/// Engine facade orchestrating one evaluation run.
pub mod engine;

/// Error types.
pub mod error;

/// Per-asset metric evaluation.
pub mod metrics;

/// Portfolio-level aggregation.
pub mod portfolio;

/// Risk-profile validation.
pub mod validation;

pub use config::{ConcentrationCaps, EngineConfig, ParallelSettings, VolatilityBand, VolatilityBands};
pub use domain::{Allocation, Asset, PricePoint, PriceSeries, RiskProfile, RiskTolerance};
pub use engine::{Engine, EvaluationReport};
pub use error::EngineError;
pub use metrics::{AssetMetrics, CapmAssumptions, MetricEvaluator, Momentum};
pub use portfolio::{PortfolioAggregator, PortfolioMetrics};
pub use validation::{RiskValidator, ValidationResult, ValidationStatus};
