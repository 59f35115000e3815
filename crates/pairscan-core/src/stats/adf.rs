//! Augmented Dickey-Fuller regression with automatic lag selection.
//!
//! Fits `Δy_t = [c] + γ·y_{t-1} + Σ φ_j·Δy_{t-j} + ε_t` and reports the
//! t-statistic of `γ`. The lag order is chosen by minimizing AIC over a
//! common estimation sample, up to the Schwert bound `12·(T/100)^¼`.

use nalgebra::DMatrix;

use super::ols;
use crate::error::PairscanError;
use crate::PairscanResult;

/// Deterministic terms included in the test regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Constant term — the standard single-series unit-root test.
    Constant,
    /// No deterministic terms — used on residuals of a cointegrating
    /// regression, which are mean-zero by construction.
    NoConstant,
}

impl Trend {
    fn num_terms(self) -> usize {
        match self {
            Trend::Constant => 1,
            Trend::NoConstant => 0,
        }
    }
}

/// Outcome of the ADF regression.
#[derive(Debug, Clone, Copy)]
pub struct AdfOutcome {
    /// t-statistic of the lagged-level coefficient.
    pub statistic: f64,
    /// Lag order selected by AIC.
    pub lag: usize,
    /// Observations used in the final regression.
    pub nobs: usize,
}

/// Compute the ADF t-statistic for `series`.
///
/// `max_lag` overrides the Schwert bound; in both cases the bound is capped
/// so every candidate regression keeps at least one residual degree of
/// freedom.
pub fn statistic(
    series: &[f64],
    trend: Trend,
    max_lag: Option<usize>,
) -> PairscanResult<AdfOutcome> {
    let n = series.len();
    let ntrend = trend.num_terms();
    if n < ntrend + 3 {
        return Err(PairscanError::InsufficientData(format!(
            "ADF regression needs at least {} observations, got {}",
            ntrend + 3,
            n
        )));
    }

    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let df_cap = n.saturating_sub(3 + ntrend) / 2;
    let bound = match max_lag {
        Some(m) => m.min(df_cap),
        None => schwert.min(df_cap),
    };

    // Select the lag on a common sample so AICs are comparable.
    let start = bound + 1;
    let mut best_lag = 0usize;
    let mut best_aic = f64::INFINITY;
    for lag in 0..=bound {
        let (y, x) = build_regression(series, &diffs, lag, start, trend);
        let fit = ols::fit(&y, &x)?;
        let aic = fit.aic();
        if aic < best_aic {
            best_aic = aic;
            best_lag = lag;
        }
    }

    // Refit on the full usable sample for the chosen lag.
    let (y, x) = build_regression(series, &diffs, best_lag, best_lag + 1, trend);
    let fit = ols::fit(&y, &x)?;
    let statistic = fit.t_value(ntrend);
    if !statistic.is_finite() {
        return Err(PairscanError::Numerical {
            context: "ADF t-statistic — zero residual variance".into(),
        });
    }

    Ok(AdfOutcome {
        statistic,
        lag: best_lag,
        nobs: fit.nobs,
    })
}

/// Rows are time indices `t = start..n`; the dependent value is `Δy_t` and
/// the regressors are `[c], y_{t-1}, Δy_{t-1}, …, Δy_{t-lag}`.
fn build_regression(
    series: &[f64],
    diffs: &[f64],
    lag: usize,
    start: usize,
    trend: Trend,
) -> (Vec<f64>, DMatrix<f64>) {
    let n = series.len();
    let ntrend = trend.num_terms();
    let rows = n - start;
    let cols = ntrend + 1 + lag;

    let y: Vec<f64> = (start..n).map(|t| diffs[t - 1]).collect();
    let x = DMatrix::from_fn(rows, cols, |r, c| {
        let t = start + r;
        if c < ntrend {
            1.0
        } else if c == ntrend {
            series[t - 1]
        } else {
            let j = c - ntrend; // lag j in 1..=lag
            diffs[t - 1 - j]
        }
    });

    (y, x)
}
