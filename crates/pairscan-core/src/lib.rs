//! Cointegration screening for pairs-trading universes.
//!
//! Given an aligned price matrix, [`CointegrationEngine`] runs the
//! Engle-Granger two-step test over every unordered symbol pair, derives
//! hedge ratios and spread series, and produces rankable, filterable
//! result sets. The statistical backbone — OLS, the augmented
//! Dickey-Fuller regression and the MacKinnon response surfaces — lives in
//! [`stats`]; seeded mock data for demos and tests lives in [`synthetic`].

pub mod analysis;
pub mod error;
pub mod stats;
pub mod types;

#[cfg(feature = "synthetic")]
pub mod synthetic;

pub use analysis::cointegration::{
    CointegrationEngine, CointegrationResult, PairAnalysis, PairFailure, PairOutcome,
    StationarityResult, SummaryRow, DEFAULT_MIN_OBSERVATIONS, DEFAULT_OBSERVATION_FLOOR,
    DEFAULT_SIGNIFICANCE_LEVEL,
};
pub use analysis::spread::SpreadStatistics;
pub use error::PairscanError;
pub use types::{align, AlignedPair, CriticalValues, PriceMatrix, TimeSeries};

/// Standard result type for all pairscan operations
pub type PairscanResult<T> = Result<T, PairscanError>;
