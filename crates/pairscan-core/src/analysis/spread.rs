//! Descriptive statistics of a pair's spread series.

use serde::Serialize;

use crate::error::PairscanError;
use crate::types::TimeSeries;
use crate::PairscanResult;

/// Summary of a spread series, computed on demand — derived, never stored
/// on the result itself.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpreadStatistics {
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Most recent spread value.
    pub last: f64,
    /// `(last − mean) / std_dev` against the full-sample moments.
    pub z_score: f64,
}

impl SpreadStatistics {
    /// Compute statistics over a gap-free spread series.
    ///
    /// A spread with fewer than two points has no sample deviation, and a
    /// zero-variance spread has no z-score; both are `UndefinedStatistic`
    /// errors rather than silently valid `NaN`s.
    pub fn from_series(spread: &TimeSeries) -> PairscanResult<Self> {
        let values = spread.values();
        let n = values.len();
        if n < 2 {
            return Err(PairscanError::UndefinedStatistic(format!(
                "spread {}: {} observations, need at least 2",
                spread.symbol(),
                n
            )));
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std_dev = variance.sqrt();

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            min = min.min(*v);
            max = max.max(*v);
        }
        let last = values[n - 1];

        if std_dev == 0.0 {
            return Err(PairscanError::UndefinedStatistic(format!(
                "spread {}: zero variance, z-score is undefined",
                spread.symbol()
            )));
        }

        Ok(Self {
            mean,
            std_dev,
            min,
            max,
            last,
            z_score: (last - mean) / std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn spread(values: Vec<f64>) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ts: Vec<DateTime<Utc>> = (0..values.len())
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect();
        TimeSeries::new("A-B", ts, values).unwrap()
    }

    #[test]
    fn known_moments_and_z_score() {
        // Mean 3, sample std 1.5811…, last 5 → z = (5-3)/1.5811 ≈ 1.2649.
        let stats = SpreadStatistics::from_series(&spread(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
            .unwrap();
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.std_dev - 1.5811388300841898).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.last, 5.0);
        assert!((stats.z_score - (5.0 - 3.0) / 1.5811388300841898).abs() < 1e-12);
    }

    #[test]
    fn last_equal_to_mean_has_zero_z_score() {
        let stats =
            SpreadStatistics::from_series(&spread(vec![2.0, 4.0, 3.0])).unwrap();
        assert!((stats.z_score).abs() < 1e-12);
    }

    #[test]
    fn constant_spread_is_undefined() {
        let result = SpreadStatistics::from_series(&spread(vec![1.5; 20]));
        assert!(matches!(
            result,
            Err(PairscanError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn single_point_spread_is_undefined() {
        let result = SpreadStatistics::from_series(&spread(vec![1.0]));
        assert!(matches!(
            result,
            Err(PairscanError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn empty_spread_is_undefined() {
        let result = SpreadStatistics::from_series(&spread(vec![]));
        assert!(matches!(
            result,
            Err(PairscanError::UndefinedStatistic(_))
        ));
    }
}
