//! Input data model.
//!
//! Everything here is supplied by external collaborators (a
//! price-history provider, an allocation constructor, a profiling
//! step) and is immutable once constructed for a run. The engine
//! only ever derives new values from these inputs.

mod allocation;
mod asset;
mod profile;

pub use allocation::{Allocation, WEIGHT_SUM_TOLERANCE};
pub use asset::{Asset, PricePoint, PriceSeries};
pub use profile::{RiskProfile, RiskTolerance};
