//! MacKinnon response surfaces for Dickey-Fuller-type tests.
//!
//! Asymptotic p-values follow MacKinnon (1994): a low-order polynomial in
//! the test statistic, mapped through the standard normal CDF, with a
//! small-p/large-p branch switch and clamping at the tabulated extremes.
//! Finite-sample critical values follow MacKinnon (2010): `b0 + b1/T +
//! b2/T² + b3/T³`. Coefficients are the published tables for the
//! constant-only case — index 0 for a single series (ADF), index 1 for the
//! two-variable Engle-Granger residual test. They are transcribed, never
//! re-derived.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::types::CriticalValues;

/// Above this statistic the p-value saturates at 1.
const TAU_MAX: [f64; 2] = [2.74, 0.92];
/// Below this statistic the p-value saturates at 0.
const TAU_MIN: [f64; 2] = [-18.83, -18.86];
/// Branch switch between the small-p and large-p polynomials.
const TAU_STAR: [f64; 2] = [-1.61, -2.62];

const TAU_SMALL_P: [[f64; 3]; 2] = [
    [2.1659, 1.4412, 0.038269],
    [2.92, 1.5012, 0.039796],
];

const TAU_LARGE_P: [[f64; 4]; 2] = [
    [1.7339, 0.93202, -0.12745, -0.010368],
    [2.1945, 0.64695, -0.29198, -0.042377],
];

/// Critical-value surfaces at the 1% / 5% / 10% levels.
const CRIT_1PCT: [[f64; 4]; 2] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-3.89644, -10.9519, -22.527, 0.0],
];
const CRIT_5PCT: [[f64; 4]; 2] = [
    [-2.86154, -2.8903, -4.234, -40.040],
    [-3.33613, -6.1101, -6.823, 0.0],
];
const CRIT_10PCT: [[f64; 4]; 2] = [
    [-2.56677, -1.5384, -2.809, 0.0],
    [-3.04445, -4.2412, -2.720, 0.0],
];

fn table_index(num_series: usize) -> usize {
    assert!(
        (1..=2).contains(&num_series),
        "MacKinnon tables are transcribed for 1 (ADF) or 2 (Engle-Granger) series"
    );
    num_series - 1
}

/// Asymptotic p-value for a Dickey-Fuller `tau` statistic.
///
/// `num_series` is 1 for a plain unit-root test and 2 for the residual test
/// of a two-variable cointegrating regression. Returns `NaN` for a `NaN`
/// statistic.
pub fn p_value(statistic: f64, num_series: usize) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    let idx = table_index(num_series);

    if statistic <= TAU_MIN[idx] {
        return 0.0;
    }
    if statistic >= TAU_MAX[idx] {
        return 1.0;
    }

    let z = if statistic <= TAU_STAR[idx] {
        let c = TAU_SMALL_P[idx];
        c[0] + statistic * (c[1] + statistic * c[2])
    } else {
        let c = TAU_LARGE_P[idx];
        c[0] + statistic * (c[1] + statistic * (c[2] + statistic * c[3]))
    };

    let standard_normal = match Normal::new(0.0, 1.0) {
        Ok(n) => n,
        Err(_) => return f64::NAN, // unreachable: unit variance is valid
    };
    standard_normal.cdf(z).clamp(0.0, 1.0)
}

/// Finite-sample critical values for `nobs` regression observations.
pub fn critical_values(num_series: usize, nobs: usize) -> CriticalValues {
    let idx = table_index(num_series);
    let t = nobs.max(1) as f64;

    let eval = |c: &[f64; 4]| c[0] + c[1] / t + c[2] / (t * t) + c[3] / (t * t * t);

    CriticalValues {
        one_percent: eval(&CRIT_1PCT[idx]),
        five_percent: eval(&CRIT_5PCT[idx]),
        ten_percent: eval(&CRIT_10PCT[idx]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_value_matches_levels_at_asymptotic_critical_values() {
        // At each asymptotic critical value the surface must reproduce the
        // level itself.
        assert!((p_value(-3.43035, 1) - 0.01).abs() < 0.005);
        assert!((p_value(-2.86154, 1) - 0.05).abs() < 0.005);
        assert!((p_value(-2.56677, 1) - 0.10).abs() < 0.01);

        assert!((p_value(-3.89644, 2) - 0.01).abs() < 0.005);
        assert!((p_value(-3.33613, 2) - 0.05).abs() < 0.005);
        assert!((p_value(-3.04445, 2) - 0.10).abs() < 0.01);
    }

    #[test]
    fn p_value_is_monotone_in_the_statistic() {
        for num_series in [1, 2] {
            let mut prev = -1.0;
            let mut tau = -20.0;
            while tau < 4.0 {
                let p = p_value(tau, num_series);
                assert!(p >= prev, "p-value decreased at tau={}", tau);
                assert!((0.0..=1.0).contains(&p));
                prev = p;
                tau += 0.05;
            }
        }
    }

    #[test]
    fn p_value_branches_agree_at_the_switch_point() {
        for (idx, num_series) in [1usize, 2].iter().enumerate() {
            let tau = TAU_STAR[idx];
            let small = TAU_SMALL_P[idx];
            let large = TAU_LARGE_P[idx];
            let zs = small[0] + tau * (small[1] + tau * small[2]);
            let zl = large[0] + tau * (large[1] + tau * (large[2] + tau * large[3]));
            assert!(
                (zs - zl).abs() < 0.01,
                "branch mismatch for {} series: {} vs {}",
                num_series,
                zs,
                zl
            );
        }
    }

    #[test]
    fn p_value_clamps_outside_tabulated_range() {
        assert_eq!(p_value(-50.0, 1), 0.0);
        assert_eq!(p_value(f64::NEG_INFINITY, 2), 0.0);
        assert_eq!(p_value(5.0, 1), 1.0);
        assert_eq!(p_value(5.0, 2), 1.0);
        assert!(p_value(f64::NAN, 1).is_nan());
    }

    #[test]
    fn critical_values_are_ordered_and_converge() {
        for num_series in [1, 2] {
            let small = critical_values(num_series, 50);
            let large = critical_values(num_series, 100_000);

            assert!(small.one_percent < small.five_percent);
            assert!(small.five_percent < small.ten_percent);

            // Finite-sample values are more negative than the asymptote and
            // approach it as the sample grows.
            assert!(small.five_percent < large.five_percent);
        }

        let adf = critical_values(1, 100);
        assert!((adf.five_percent + 2.8909).abs() < 0.005);

        let eg = critical_values(2, 100_000);
        assert!((eg.five_percent + 3.33613).abs() < 0.001);
    }
}
