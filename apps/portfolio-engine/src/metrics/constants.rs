//! Shared calculation constants.

/// Trading-day annualization convention.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Short simple-moving-average window.
pub const SMA_SHORT_WINDOW: usize = 50;

/// Long simple-moving-average window.
pub const SMA_LONG_WINDOW: usize = 200;

/// Below this many return observations a window total return is
/// reported unannualized; extrapolating a handful of days to a full
/// year produces absurd figures.
pub const MIN_OBS_FOR_ANNUALIZATION: usize = 5;

/// Annualized volatility below this is floating round-off from a
/// flat or perfectly hedged series, not a real risk figure; Sharpe
/// is undefined there rather than divided by noise.
pub const VOLATILITY_NOISE_FLOOR: f64 = 1e-9;
