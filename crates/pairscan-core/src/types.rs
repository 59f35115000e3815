use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PairscanError;
use crate::PairscanResult;

// ---------------------------------------------------------------------------
// Critical values
// ---------------------------------------------------------------------------

/// Critical statistic values keyed by confidence level.
///
/// Serialized with the conventional `"1%"` / `"5%"` / `"10%"` labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    #[serde(rename = "1%")]
    pub one_percent: f64,
    #[serde(rename = "5%")]
    pub five_percent: f64,
    #[serde(rename = "10%")]
    pub ten_percent: f64,
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// A named price series on a strictly increasing time index.
///
/// Missing observations are stored as `NaN`; alignment and the test
/// operations drop them before any statistics are computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TimeSeriesData")]
pub struct TimeSeries {
    symbol: String,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TimeSeriesData {
    symbol: String,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TryFrom<TimeSeriesData> for TimeSeries {
    type Error = PairscanError;

    fn try_from(raw: TimeSeriesData) -> Result<Self, Self::Error> {
        TimeSeries::new(raw.symbol, raw.timestamps, raw.values)
    }
}

impl TimeSeries {
    /// Build a series, validating that the index and values have equal
    /// length and that timestamps are strictly increasing (hence unique).
    pub fn new(
        symbol: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
    ) -> PairscanResult<Self> {
        let symbol = symbol.into();
        if timestamps.len() != values.len() {
            return Err(PairscanError::InvalidInput {
                field: "values".into(),
                reason: format!(
                    "series '{}' has {} values for {} timestamps",
                    symbol,
                    values.len(),
                    timestamps.len()
                ),
            });
        }
        if let Some(w) = timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PairscanError::InvalidInput {
                field: "timestamps".into(),
                reason: format!(
                    "series '{}' index is not strictly increasing at {}",
                    symbol, w[1]
                ),
            });
        }
        Ok(Self {
            symbol,
            timestamps,
            values,
        })
    }

    /// Construct from parts whose invariants the caller has already
    /// established (matrix columns, spread series).
    pub(crate) fn new_unchecked(
        symbol: String,
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            symbol,
            timestamps,
            values,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The series with missing (non-finite) observations dropped.
    pub fn observed(&self) -> (Vec<DateTime<Utc>>, Vec<f64>) {
        self.timestamps
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| v.is_finite())
            .map(|(t, v)| (*t, *v))
            .unzip()
    }
}

/// Two series joined on their shared time index.
#[derive(Debug, Clone)]
pub struct AlignedPair {
    pub timestamps: Vec<DateTime<Utc>>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Inner-join two series on their timestamps, keeping only rows where both
/// observations are present. Both indices are strictly increasing, so this
/// is a single merge pass.
pub fn align(a: &TimeSeries, b: &TimeSeries) -> AlignedPair {
    let mut timestamps = Vec::new();
    let mut va = Vec::new();
    let mut vb = Vec::new();

    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        let (ta, tb) = (a.timestamps[i], b.timestamps[j]);
        if ta < tb {
            i += 1;
        } else if tb < ta {
            j += 1;
        } else {
            let (x, y) = (a.values[i], b.values[j]);
            if x.is_finite() && y.is_finite() {
                timestamps.push(ta);
                va.push(x);
                vb.push(y);
            }
            i += 1;
            j += 1;
        }
    }

    AlignedPair {
        timestamps,
        a: va,
        b: vb,
    }
}

// ---------------------------------------------------------------------------
// Price matrix
// ---------------------------------------------------------------------------

/// An aligned price matrix: one shared, strictly increasing time index and
/// one column of prices per symbol. Gaps are `NaN`.
///
/// The matrix is read-only once built; the engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "PriceMatrixData", try_from = "PriceMatrixData")]
pub struct PriceMatrix {
    timestamps: Vec<DateTime<Utc>>,
    symbols: Vec<String>,
    columns: Vec<Vec<f64>>,
}

/// Wire form of [`PriceMatrix`]: missing cells are `null` rather than the
/// in-memory `NaN`, so JSON/YAML round trips preserve gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PriceMatrixData {
    timestamps: Vec<DateTime<Utc>>,
    symbols: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl From<PriceMatrix> for PriceMatrixData {
    fn from(m: PriceMatrix) -> Self {
        let columns = m
            .columns
            .into_iter()
            .map(|col| {
                col.into_iter()
                    .map(|v| if v.is_finite() { Some(v) } else { None })
                    .collect()
            })
            .collect();
        Self {
            timestamps: m.timestamps,
            symbols: m.symbols,
            columns,
        }
    }
}

impl TryFrom<PriceMatrixData> for PriceMatrix {
    type Error = PairscanError;

    fn try_from(raw: PriceMatrixData) -> Result<Self, Self::Error> {
        let columns = raw
            .columns
            .into_iter()
            .map(|col| col.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect();
        PriceMatrix::new(raw.timestamps, raw.symbols, columns)
    }
}

impl PriceMatrix {
    /// Build a matrix, validating index monotonicity, symbol uniqueness and
    /// column shapes.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        symbols: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> PairscanResult<Self> {
        if symbols.len() != columns.len() {
            return Err(PairscanError::InvalidInput {
                field: "columns".into(),
                reason: format!(
                    "{} symbols but {} columns",
                    symbols.len(),
                    columns.len()
                ),
            });
        }
        if let Some(w) = timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PairscanError::InvalidInput {
                field: "timestamps".into(),
                reason: format!("index is not strictly increasing at {}", w[1]),
            });
        }
        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(PairscanError::InvalidInput {
                    field: "symbols".into(),
                    reason: format!("duplicate symbol '{}'", symbol),
                });
            }
        }
        for (symbol, col) in symbols.iter().zip(&columns) {
            if col.len() != timestamps.len() {
                return Err(PairscanError::InvalidInput {
                    field: "columns".into(),
                    reason: format!(
                        "column '{}' has {} rows, index has {}",
                        symbol,
                        col.len(),
                        timestamps.len()
                    ),
                });
            }
        }
        Ok(Self {
            timestamps,
            symbols,
            columns,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.timestamps.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Raw column values for a symbol, `NaN` where missing.
    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    /// Extract one column as a standalone [`TimeSeries`].
    pub fn series(&self, index: usize) -> Option<TimeSeries> {
        let symbol = self.symbols.get(index)?;
        Some(TimeSeries::new_unchecked(
            symbol.clone(),
            self.timestamps.clone(),
            self.columns[index].clone(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn hourly(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect()
    }

    #[test]
    fn series_rejects_length_mismatch() {
        let result = TimeSeries::new("A", hourly(3), vec![1.0, 2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn series_rejects_unsorted_index() {
        let mut ts = hourly(3);
        ts.swap(0, 1);
        let result = TimeSeries::new("A", ts, vec![1.0, 2.0, 3.0]);
        assert!(result.is_err());
    }

    #[test]
    fn series_rejects_duplicate_timestamps() {
        let mut ts = hourly(3);
        ts[2] = ts[1];
        let result = TimeSeries::new("A", ts, vec![1.0, 2.0, 3.0]);
        assert!(result.is_err());
    }

    #[test]
    fn observed_drops_nan() {
        let series =
            TimeSeries::new("A", hourly(4), vec![1.0, f64::NAN, 3.0, 4.0]).unwrap();
        let (ts, values) = series.observed();
        assert_eq!(values, vec![1.0, 3.0, 4.0]);
        assert_eq!(ts.len(), 3);
    }

    #[test]
    fn align_inner_joins_on_timestamps() {
        let index = hourly(5);
        let a = TimeSeries::new("A", index[..4].to_vec(), vec![1.0, 2.0, 3.0, 4.0])
            .unwrap();
        let b = TimeSeries::new("B", index[1..].to_vec(), vec![10.0, 20.0, 30.0, 40.0])
            .unwrap();

        let aligned = align(&a, &b);
        // Shared stamps are hours 1..=3.
        assert_eq!(aligned.len(), 3);
        assert_eq!(aligned.a, vec![2.0, 3.0, 4.0]);
        assert_eq!(aligned.b, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn align_drops_rows_with_either_side_missing() {
        let index = hourly(4);
        let a = TimeSeries::new("A", index.clone(), vec![1.0, f64::NAN, 3.0, 4.0])
            .unwrap();
        let b = TimeSeries::new("B", index, vec![1.0, 2.0, 3.0, f64::NAN]).unwrap();

        let aligned = align(&a, &b);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned.a, vec![1.0, 3.0]);
        assert_eq!(aligned.b, vec![1.0, 3.0]);
    }

    #[test]
    fn matrix_rejects_duplicate_symbols() {
        let result = PriceMatrix::new(
            hourly(2),
            vec!["A".into(), "A".into()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn matrix_rejects_ragged_columns() {
        let result = PriceMatrix::new(
            hourly(3),
            vec!["A".into(), "B".into()],
            vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn matrix_rejects_non_increasing_index() {
        let mut ts = hourly(3);
        ts[1] = ts[0];
        let result = PriceMatrix::new(ts, vec!["A".into()], vec![vec![1.0, 2.0, 3.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn matrix_column_lookup() {
        let matrix = PriceMatrix::new(
            hourly(2),
            vec!["A".into(), "B".into()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .unwrap();

        assert_eq!(matrix.column("B"), Some(&[3.0, 4.0][..]));
        assert_eq!(matrix.column("C"), None);
        assert_eq!(matrix.series(0).unwrap().symbol(), "A");
        assert!(matrix.series(2).is_none());
    }

    #[test]
    fn matrix_json_round_trip_preserves_gaps() {
        let matrix = PriceMatrix::new(
            hourly(3),
            vec!["A".into(), "B".into()],
            vec![vec![1.0, f64::NAN, 3.0], vec![4.0, 5.0, f64::NAN]],
        )
        .unwrap();

        let json = serde_json::to_string(&matrix).unwrap();
        assert!(json.contains("null"));

        let back: PriceMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back.symbols(), matrix.symbols());
        assert_eq!(back.timestamps(), matrix.timestamps());
        let col = back.column("A").unwrap();
        assert_eq!(col[0], 1.0);
        assert!(col[1].is_nan());
        assert_eq!(col[2], 3.0);
    }

    #[test]
    fn matrix_deserialization_revalidates() {
        // Duplicate symbol smuggled through the wire form must be rejected.
        let json = r#"{
            "timestamps": ["2024-01-01T00:00:00Z", "2024-01-01T01:00:00Z"],
            "symbols": ["A", "A"],
            "columns": [[1.0, 2.0], [3.0, 4.0]]
        }"#;
        let result: Result<PriceMatrix, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
