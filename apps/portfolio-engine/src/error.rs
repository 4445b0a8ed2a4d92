//! Error types for the portfolio engine.
//!
//! Fatal conditions abort the whole `evaluate` call and name the
//! offending ticker(s). Degraded-but-valid conditions (absent beta,
//! absent SMA, absent CAPM) are represented as `Option::None` in the
//! result types, never as errors and never as sentinel zeros.
//! A FAIL validation verdict is ordinary data, not an error.

use thiserror::Error;

/// Errors from portfolio metric evaluation and aggregation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// An asset's return series has too few observations to compute
    /// any return-based metric. Fatal for the run.
    #[error(
        "insufficient price data for '{ticker}': {observations} observation(s), need at least 2 prices to form a return"
    )]
    InsufficientData {
        /// Ticker of the offending asset.
        ticker: String,
        /// Number of price observations found.
        observations: usize,
    },

    /// The allocated assets' date ranges do not overlap enough to
    /// form a joint covariance matrix. Fatal for the run.
    #[error(
        "insufficient overlapping history across {tickers:?}: {observations} shared observation(s), need {required}"
    )]
    InsufficientOverlap {
        /// Number of shared return observations found.
        observations: usize,
        /// Minimum required by configuration.
        required: usize,
        /// Tickers participating in the joint series.
        tickers: Vec<String>,
    },

    /// Allocation weights do not sum to 1.0 within tolerance.
    /// A caller bug; never silently renormalized.
    #[error("allocation weights sum to {total:.4}, expected 1.0 within {tolerance}")]
    AllocationWeight {
        /// Observed weight sum.
        total: f64,
        /// Tolerance applied to the comparison.
        tolerance: f64,
    },

    /// An individual allocation weight is outside [0, 1].
    #[error("allocation weight for '{ticker}' is {weight}, expected a fraction in [0, 1]")]
    WeightOutOfRange {
        /// Ticker carrying the invalid weight.
        ticker: String,
        /// The invalid weight value.
        weight: f64,
    },

    /// The allocation references tickers with no price history.
    /// A caller bug; the price-history provider must supply every
    /// allocated asset.
    #[error("allocation references tickers with no price history: {tickers:?}")]
    UnknownTickers {
        /// Tickers missing from the price series.
        tickers: Vec<String>,
    },

    /// A price series violates its construction invariants
    /// (non-increasing dates, duplicate dates, non-finite closes).
    #[error("invalid price series for '{ticker}': {message}")]
    InvalidSeries {
        /// Ticker of the malformed series.
        ticker: String,
        /// Description of the violated invariant.
        message: String,
    },

    /// Engine configuration failed validation.
    #[error("invalid engine configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid setting.
        message: String,
    },

    /// Thread pool initialization failed.
    #[error("failed to initialize thread pool: {message}")]
    ThreadPool {
        /// Error message from the pool builder.
        message: String,
    },
}
