//! Pairwise Engle-Granger cointegration screening.
//!
//! [`CointegrationEngine`] runs the two-step test on series pairs, scans a
//! whole price matrix, and filters/summarizes the outcomes. All result
//! types are immutable value objects; callers sort and filter lists of
//! them but never mutate fields in place.

use serde::Serialize;

use crate::analysis::spread::SpreadStatistics;
use crate::error::PairscanError;
use crate::stats::adf::{self, Trend};
use crate::stats::{mackinnon, ols};
use crate::types::{align, CriticalValues, PriceMatrix, TimeSeries};
use crate::PairscanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default p-value threshold for both cointegration and stationarity calls.
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Default hard floor on aligned observations per test. Below this the
/// asymptotic distributions are unreliable. A policy knob, not a constant
/// of nature — see [`CointegrationEngine::with_observation_floor`].
pub const DEFAULT_OBSERVATION_FLOOR: usize = 10;

/// Default row count below which [`CointegrationEngine::analyze_pairs`]
/// warns (and proceeds anyway).
pub const DEFAULT_MIN_OBSERVATIONS: usize = 50;

/// R² beyond which the cointegrating regression is treated as collinear.
const COLLINEARITY_RSQUARED: f64 = 1.0 - 1.5e-6; // 1 - 100·√ε

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome of one Engle-Granger pair test.
#[derive(Debug, Clone, Serialize)]
pub struct CointegrationResult {
    /// First series, in the order given to the test (not sorted).
    pub symbol_a: String,
    /// Second series.
    pub symbol_b: String,
    /// ADF t-statistic of the cointegrating-regression residuals. `-∞` for
    /// a (near-)perfectly collinear pair.
    pub statistic: f64,
    /// Asymptotic probability of the null "no cointegration".
    pub p_value: f64,
    /// Finite-sample critical values for the statistic.
    pub critical_values: CriticalValues,
    /// Snapshot of `p_value < significance_level` **at test time**. This is
    /// not a live property: re-filtering under a different threshold must go
    /// through [`CointegrationEngine::filter_cointegrated`], which reads
    /// `p_value`, never this flag.
    pub is_cointegrated: bool,
    /// Slope of the regression of A on B (with intercept).
    pub hedge_ratio: f64,
    /// Intercept of the cointegrating regression. Reported for reference;
    /// the spread below does not subtract it.
    pub intercept: f64,
    /// `A − hedge_ratio·B` over the aligned index; gap-free by
    /// construction, indexed by a strict subsequence of the input index.
    pub spread: Option<TimeSeries>,
}

/// Outcome of a single-series augmented Dickey-Fuller test.
#[derive(Debug, Clone, Serialize)]
pub struct StationarityResult {
    pub symbol: String,
    /// ADF t-statistic.
    pub statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
    /// Snapshot of `p_value < significance_level` at test time.
    pub is_stationary: bool,
    /// Lag order selected by AIC.
    pub lag: usize,
    /// Observations used in the test regression.
    pub observations: usize,
}

/// A pair the batch scan could not test.
#[derive(Debug, Clone, Serialize)]
pub struct PairFailure {
    pub symbol_a: String,
    pub symbol_b: String,
    pub reason: String,
}

/// Per-pair outcome of a batch scan, in enumeration order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairOutcome {
    Tested(CointegrationResult),
    Skipped(PairFailure),
}

/// Batch scan report: one outcome per attempted pair plus non-fatal
/// warnings. A failed pair never aborts the batch.
#[derive(Debug, Clone, Serialize)]
pub struct PairAnalysis {
    pub outcomes: Vec<PairOutcome>,
    pub warnings: Vec<String>,
}

impl PairAnalysis {
    /// Number of pairs attempted: `C(N, 2)` for an N-column matrix.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Successfully tested pairs, in enumeration order.
    pub fn results(&self) -> impl Iterator<Item = &CointegrationResult> {
        self.outcomes.iter().filter_map(|o| match o {
            PairOutcome::Tested(r) => Some(r),
            PairOutcome::Skipped(_) => None,
        })
    }

    /// Successfully tested pairs by value, in enumeration order.
    pub fn into_results(self) -> Vec<CointegrationResult> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                PairOutcome::Tested(r) => Some(r),
                PairOutcome::Skipped(_) => None,
            })
            .collect()
    }

    /// Pairs that were skipped, with reasons.
    pub fn failures(&self) -> impl Iterator<Item = &PairFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            PairOutcome::Skipped(f) => Some(f),
            PairOutcome::Tested(_) => None,
        })
    }
}

/// One row of the tabular summary report.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub symbol_a: String,
    pub symbol_b: String,
    pub p_value: f64,
    pub statistic: f64,
    pub hedge_ratio: f64,
    pub is_cointegrated: bool,
    #[serde(rename = "critical_1%")]
    pub critical_1pct: f64,
    #[serde(rename = "critical_5%")]
    pub critical_5pct: f64,
    #[serde(rename = "critical_10%")]
    pub critical_10pct: f64,
}

impl SummaryRow {
    fn from_result(result: &CointegrationResult) -> Self {
        Self {
            symbol_a: result.symbol_a.clone(),
            symbol_b: result.symbol_b.clone(),
            p_value: result.p_value,
            statistic: result.statistic,
            hedge_ratio: result.hedge_ratio,
            is_cointegrated: result.is_cointegrated,
            critical_1pct: result.critical_values.one_percent,
            critical_5pct: result.critical_values.five_percent,
            critical_10pct: result.critical_values.ten_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Pairwise cointegration analyzer.
///
/// Pure computation over in-memory data: no I/O, no shared mutable state.
/// All operations are deterministic functions of their inputs and the
/// configured thresholds.
#[derive(Debug, Clone)]
pub struct CointegrationEngine {
    significance_level: f64,
    observation_floor: usize,
}

impl Default for CointegrationEngine {
    fn default() -> Self {
        Self {
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            observation_floor: DEFAULT_OBSERVATION_FLOOR,
        }
    }
}

impl CointegrationEngine {
    /// Build an engine with the given p-value threshold, which must lie
    /// strictly inside (0, 1).
    pub fn new(significance_level: f64) -> PairscanResult<Self> {
        if !significance_level.is_finite()
            || significance_level <= 0.0
            || significance_level >= 1.0
        {
            return Err(PairscanError::InvalidConfiguration {
                field: "significance_level".into(),
                reason: format!(
                    "must lie strictly inside (0, 1), got {}",
                    significance_level
                ),
            });
        }
        Ok(Self {
            significance_level,
            ..Self::default()
        })
    }

    /// Override the per-test observation floor (default 10).
    pub fn with_observation_floor(mut self, floor: usize) -> Self {
        self.observation_floor = floor;
        self
    }

    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    pub fn observation_floor(&self) -> usize {
        self.observation_floor
    }

    /// Engle-Granger two-step cointegration test on one pair.
    ///
    /// Aligns the series on their shared timestamps, dropping rows where
    /// either observation is missing; regresses A on B with an intercept
    /// for the hedge ratio; unit-root-tests the residuals (no deterministic
    /// terms, AIC lag selection); derives `spread = A − hedge_ratio·B` over
    /// the aligned index.
    pub fn test_pair(
        &self,
        series_a: &TimeSeries,
        series_b: &TimeSeries,
    ) -> PairscanResult<CointegrationResult> {
        let aligned = align(series_a, series_b);
        let n = aligned.len();
        if n < self.observation_floor {
            return Err(PairscanError::InsufficientData(format!(
                "pair {}/{}: {} aligned observations, need at least {}",
                series_a.symbol(),
                series_b.symbol(),
                n,
                self.observation_floor
            )));
        }

        // Step 1: cointegrating regression A = c + β·B + ε.
        let fit = ols::fit(&aligned.a, &ols::design_with_intercept(&aligned.b))?;
        let intercept = fit.params[0];
        let hedge_ratio = fit.params[1];

        let mean_a = aligned.a.iter().sum::<f64>() / n as f64;
        let tss: f64 = aligned.a.iter().map(|v| (v - mean_a).powi(2)).sum();
        let r_squared = if tss > 0.0 { 1.0 - fit.ssr / tss } else { 1.0 };

        // Step 2: unit-root test on the residuals. A (near-)perfect fit —
        // a series against itself, or an exact linear combination — leaves
        // no residual variation to test; report the strongest possible
        // rejection instead of a spurious numerical error.
        let (statistic, p_value) = if r_squared > COLLINEARITY_RSQUARED {
            (f64::NEG_INFINITY, 0.0)
        } else {
            let outcome = adf::statistic(&fit.residuals, Trend::NoConstant, None)?;
            (outcome.statistic, mackinnon::p_value(outcome.statistic, 2))
        };
        let critical_values = mackinnon::critical_values(2, n.saturating_sub(1));

        let spread_values: Vec<f64> = aligned
            .a
            .iter()
            .zip(&aligned.b)
            .map(|(a, b)| a - hedge_ratio * b)
            .collect();
        let spread = TimeSeries::new_unchecked(
            format!("{}-{}", series_a.symbol(), series_b.symbol()),
            aligned.timestamps,
            spread_values,
        );

        Ok(CointegrationResult {
            symbol_a: series_a.symbol().to_string(),
            symbol_b: series_b.symbol().to_string(),
            statistic,
            p_value,
            critical_values,
            is_cointegrated: p_value < self.significance_level,
            hedge_ratio,
            intercept,
            spread: Some(spread),
        })
    }

    /// Augmented Dickey-Fuller stationarity test on a single series.
    pub fn test_stationarity(
        &self,
        series: &TimeSeries,
    ) -> PairscanResult<StationarityResult> {
        let (_, values) = series.observed();
        if values.len() < self.observation_floor {
            return Err(PairscanError::InsufficientData(format!(
                "series {}: {} observations, need at least {}",
                series.symbol(),
                values.len(),
                self.observation_floor
            )));
        }

        let outcome = adf::statistic(&values, Trend::Constant, None)?;
        let p_value = mackinnon::p_value(outcome.statistic, 1);

        Ok(StationarityResult {
            symbol: series.symbol().to_string(),
            statistic: outcome.statistic,
            p_value,
            critical_values: mackinnon::critical_values(1, outcome.nobs),
            is_stationary: p_value < self.significance_level,
            lag: outcome.lag,
            observations: outcome.nobs,
        })
    }

    /// Test every unordered column pair of `matrix` exactly once.
    ///
    /// Pairs are enumerated in a fixed order — columns in matrix order,
    /// `(i, j)` with `i < j` by position — and the outcome list preserves
    /// that order, so repeated runs on identical input are reproducible.
    /// A matrix shorter than `min_observations` rows yields a warning, not
    /// an error; a pair that fails is recorded and skipped, never fatal.
    pub fn analyze_pairs(&self, matrix: &PriceMatrix, min_observations: usize) -> PairAnalysis {
        let mut warnings = Vec::new();
        if matrix.num_rows() < min_observations {
            warnings.push(format!(
                "price matrix has {} rows, below the requested minimum of {} — proceeding anyway",
                matrix.num_rows(),
                min_observations
            ));
        }

        let series: Vec<TimeSeries> = (0..matrix.num_symbols())
            .filter_map(|i| matrix.series(i))
            .collect();

        let mut outcomes = Vec::new();
        for i in 0..series.len() {
            for j in (i + 1)..series.len() {
                match self.test_pair(&series[i], &series[j]) {
                    Ok(result) => outcomes.push(PairOutcome::Tested(result)),
                    Err(e) => outcomes.push(PairOutcome::Skipped(PairFailure {
                        symbol_a: series[i].symbol().to_string(),
                        symbol_b: series[j].symbol().to_string(),
                        reason: e.to_string(),
                    })),
                }
            }
        }

        PairAnalysis { outcomes, warnings }
    }

    /// Keep only results with `p_value < threshold` (the engine's
    /// significance level when `threshold` is `None`), most significant
    /// first; ties keep their original pair order.
    ///
    /// Always recomputed from `p_value`. The stored `is_cointegrated` flag
    /// is a snapshot against the threshold that was active at test time and
    /// would be stale under any other threshold.
    pub fn filter_cointegrated(
        &self,
        results: &[CointegrationResult],
        threshold: Option<f64>,
    ) -> Vec<CointegrationResult> {
        let threshold = threshold.unwrap_or(self.significance_level);
        let mut filtered: Vec<CointegrationResult> = results
            .iter()
            .filter(|r| r.p_value < threshold)
            .cloned()
            .collect();
        filtered.sort_by(|a, b| {
            a.p_value
                .partial_cmp(&b.p_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        filtered
    }

    /// Tabular report: one row per result, cointegrated-only unless
    /// `include_all`, ascending by p-value. Empty input yields an empty
    /// table, never an error.
    pub fn summarize(
        &self,
        results: &[CointegrationResult],
        include_all: bool,
    ) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = results
            .iter()
            .filter(|r| include_all || r.p_value < self.significance_level)
            .map(SummaryRow::from_result)
            .collect();
        rows.sort_by(|a, b| {
            a.p_value
                .partial_cmp(&b.p_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    /// Descriptive statistics of a result's spread, `Ok(None)` when the
    /// spread is absent. A degenerate spread (empty or zero variance) is an
    /// `UndefinedStatistic` error, not a silent `NaN`.
    pub fn spread_statistics(
        &self,
        result: &CointegrationResult,
    ) -> PairscanResult<Option<SpreadStatistics>> {
        match &result.spread {
            None => Ok(None),
            Some(spread) => SpreadStatistics::from_series(spread).map(Some),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
