use nalgebra::{DMatrix, DVector};

use crate::error::PairscanError;
use crate::PairscanResult;

/// A fitted ordinary-least-squares regression.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Coefficients, one per design-matrix column.
    pub params: Vec<f64>,
    /// Coefficient standard errors.
    pub std_errors: Vec<f64>,
    /// Residuals `y - X·β`.
    pub residuals: Vec<f64>,
    /// Number of observations.
    pub nobs: usize,
    /// Sum of squared residuals.
    pub ssr: f64,
}

impl OlsFit {
    /// Residual degrees of freedom. At least 1 by construction.
    pub fn df_resid(&self) -> usize {
        self.nobs - self.params.len()
    }

    /// t-statistic for coefficient `index`.
    pub fn t_value(&self, index: usize) -> f64 {
        self.params[index] / self.std_errors[index]
    }

    /// Akaike information criterion under the Gaussian likelihood,
    /// `-2·llf + 2·k`. Comparable across fits on the same observations.
    pub fn aic(&self) -> f64 {
        let n = self.nobs as f64;
        let k = self.params.len() as f64;
        let llf = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0);
        -2.0 * llf + 2.0 * k
    }
}

/// Fit `y = X·β + ε` by solving the normal equations.
///
/// Requires more observations than regressors; a rank-deficient design
/// matrix is reported as a numerical failure rather than silently
/// pseudo-inverted.
pub fn fit(y: &[f64], design: &DMatrix<f64>) -> PairscanResult<OlsFit> {
    let n = y.len();
    let k = design.ncols();

    if design.nrows() != n {
        return Err(PairscanError::InvalidInput {
            field: "design".into(),
            reason: format!("{} rows for {} observations", design.nrows(), n),
        });
    }
    if n <= k {
        return Err(PairscanError::InsufficientData(format!(
            "OLS needs more than {} observations for {} regressors, got {}",
            k, k, n
        )));
    }

    let y_vec = DVector::from_column_slice(y);
    let xtx = design.transpose() * design;
    let xty = design.transpose() * &y_vec;

    let xtx_inv = xtx.try_inverse().ok_or_else(|| PairscanError::Numerical {
        context: "OLS normal equations — singular design matrix".into(),
    })?;

    let beta = &xtx_inv * xty;
    let fitted = design * &beta;
    let resid = &y_vec - fitted;
    let ssr = resid.dot(&resid);

    let sigma2 = ssr / (n - k) as f64;
    let std_errors = (0..k)
        .map(|i| (sigma2 * xtx_inv[(i, i)].max(0.0)).sqrt())
        .collect();

    Ok(OlsFit {
        params: beta.iter().copied().collect(),
        std_errors,
        residuals: resid.iter().copied().collect(),
        nobs: n,
        ssr,
    })
}

/// Design matrix `[1, x]` for a univariate regression with intercept.
pub fn design_with_intercept(x: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(x.len(), 2, |r, c| if c == 0 { 1.0 } else { x[r] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_line() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 + 2.0 * v).collect();

        let fit = fit(&y, &design_with_intercept(&x)).unwrap();
        assert!((fit.params[0] - 3.0).abs() < 1e-9);
        assert!((fit.params[1] - 2.0).abs() < 1e-9);
        assert!(fit.ssr < 1e-12);
    }

    #[test]
    fn residuals_sum_to_zero_with_intercept() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.0 + 0.5 * v + if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();

        let fit = fit(&y, &design_with_intercept(&x)).unwrap();
        let sum: f64 = fit.residuals.iter().sum();
        assert!(sum.abs() < 1e-8);
    }

    #[test]
    fn rejects_singular_design() {
        // Two identical columns.
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let design = DMatrix::from_fn(10, 2, |r, _| x[r]);
        let y = x.clone();

        let result = fit(&y, &design);
        assert!(matches!(result, Err(PairscanError::Numerical { .. })));
    }

    #[test]
    fn rejects_more_regressors_than_observations() {
        let design = DMatrix::from_element(2, 3, 1.0);
        let result = fit(&[1.0, 2.0], &design);
        assert!(matches!(result, Err(PairscanError::InsufficientData(_))));
    }

    #[test]
    fn standard_errors_positive_for_noisy_fit() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 2.0 * v + ((i * 7) % 5) as f64 * 0.1)
            .collect();

        let fit = fit(&y, &design_with_intercept(&x)).unwrap();
        assert!(fit.std_errors.iter().all(|se| *se > 0.0));
        assert!(fit.t_value(1).is_finite());
    }

    #[test]
    fn aic_matches_the_gaussian_likelihood_form() {
        let x: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 0.7 * v + if i % 3 == 0 { 0.5 } else { -0.25 })
            .collect();

        let fit = fit(&y, &design_with_intercept(&x)).unwrap();
        let n = fit.nobs as f64;
        let llf = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (fit.ssr / n).ln() + 1.0);
        let expected = -2.0 * llf + 2.0 * 2.0;
        assert!((fit.aic() - expected).abs() < 1e-9);
    }
}
