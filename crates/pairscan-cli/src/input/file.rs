use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use pairscan_core::PriceMatrix;

/// Read a price matrix from a CSV, JSON or YAML file, dispatching on the
/// extension.
///
/// CSV layout: a `timestamp` header column followed by one column per
/// symbol; blank cells (or `nan`) are missing observations.
pub fn read_price_matrix(path: &str) -> Result<PriceMatrix, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let extension = canonical
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => read_csv(&canonical),
        "json" => {
            let contents = read_contents(&canonical)?;
            let matrix: PriceMatrix = serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
            Ok(matrix)
        }
        "yaml" | "yml" => {
            let contents = read_contents(&canonical)?;
            let matrix: PriceMatrix = serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
            Ok(matrix)
        }
        other => Err(format!(
            "Unsupported input format '{}' — use .csv, .json or .yaml",
            other
        )
        .into()),
    }
}

fn read_contents(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e).into())
}

fn read_csv(path: &Path) -> Result<PriceMatrix, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;

    let headers = reader.headers()?.clone();
    if headers.get(0) != Some("timestamp") {
        return Err(format!(
            "'{}': first CSV column must be 'timestamp', found '{}'",
            path.display(),
            headers.get(0).unwrap_or("")
        )
        .into());
    }
    let symbols: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); symbols.len()];

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let raw_ts = record
            .get(0)
            .ok_or_else(|| format!("row {}: missing timestamp", line + 2))?;
        timestamps.push(parse_timestamp(raw_ts).ok_or_else(|| {
            format!("row {}: unparseable timestamp '{}'", line + 2, raw_ts)
        })?);

        for (i, column) in columns.iter_mut().enumerate() {
            let field = record.get(i + 1).unwrap_or("");
            column.push(parse_price(field).ok_or_else(|| {
                format!(
                    "row {}: unparseable value '{}' for symbol '{}'",
                    line + 2,
                    field,
                    symbols[i]
                )
            })?);
        }
    }

    Ok(PriceMatrix::new(timestamps, symbols, columns)?)
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (assumed UTC) or epoch seconds.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(epoch) = raw.parse::<i64>() {
        return DateTime::from_timestamp(epoch, 0);
    }
    None
}

/// Blank cells and `nan` markers are missing observations.
fn parse_price(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

/// Resolve and validate the path, preventing surprises from relative cwd.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pairscan-test-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_matrix_parses_with_gaps() {
        let path = write_temp(
            "gaps.csv",
            "timestamp,AAA,BBB\n\
             2024-01-01T00:00:00Z,100.0,50.0\n\
             2024-01-01T01:00:00Z,,50.5\n\
             2024-01-01T02:00:00Z,101.5,nan\n",
        );
        let matrix = read_price_matrix(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(matrix.symbols(), &["AAA".to_string(), "BBB".to_string()]);
        assert_eq!(matrix.num_rows(), 3);
        let aaa = matrix.column("AAA").unwrap();
        assert!(aaa[1].is_nan());
        let bbb = matrix.column("BBB").unwrap();
        assert!(bbb[2].is_nan());
    }

    #[test]
    fn csv_requires_timestamp_header() {
        let path = write_temp("nohdr.csv", "time,AAA\n2024-01-01T00:00:00Z,1.0\n");
        let result = read_price_matrix(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn csv_rejects_duplicate_timestamps() {
        let path = write_temp(
            "dup.csv",
            "timestamp,AAA\n\
             2024-01-01T00:00:00Z,1.0\n\
             2024-01-01T00:00:00Z,2.0\n",
        );
        let result = read_price_matrix(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn json_matrix_round_trips_through_reader() {
        let json = r#"{
            "timestamps": ["2024-01-01T00:00:00Z", "2024-01-01T01:00:00Z"],
            "symbols": ["AAA"],
            "columns": [[1.0, null]]
        }"#;
        let path = write_temp("matrix.json", json);
        let matrix = read_price_matrix(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(matrix.num_rows(), 2);
        assert!(matrix.column("AAA").unwrap()[1].is_nan());
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2024-01-01T00:00:00Z").is_some());
        assert!(parse_timestamp("2024-01-01 12:30:00").is_some());
        assert!(parse_timestamp("1704067200").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = write_temp("matrix.txt", "whatever");
        let result = read_price_matrix(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
